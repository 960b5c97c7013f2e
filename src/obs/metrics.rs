// self
use crate::obs::{CheckOutcome, LimiterKind};

/// Records a check outcome via the global metrics recorder (when enabled).
pub fn record_check_outcome(kind: LimiterKind, outcome: CheckOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"login_throttle_check_total",
			"limiter" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records reaper evictions via the global metrics recorder (when enabled).
pub fn record_reaped(kind: LimiterKind, count: usize) {
	#[cfg(feature = "metrics")]
	{
		if count > 0 {
			metrics::counter!("login_throttle_reaped_total", "limiter" => kind.as_str())
				.increment(count as u64);
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, count);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_check_outcome_noop_without_metrics() {
		record_check_outcome(LimiterKind::Login, CheckOutcome::DenyOverflow);
	}

	#[test]
	fn record_reaped_noop_without_metrics() {
		record_reaped(LimiterKind::Quota, 3);
	}
}
