//! Allow/deny outcomes handed back to the request-handling layer.

// self
use crate::_prelude::*;

/// Outcome of a limiter check.
///
/// There are exactly two outcomes; a check never raises on valid input. Callers translate
/// [`Decision::Deny`] into their own rejection response (an HTTP 429 equivalent) using the
/// attached directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
	/// The request may proceed.
	Allow,
	/// The request must be rejected; the directive says when to retry.
	Deny(RetryDirective),
}
impl Decision {
	/// Returns `true` when the request may proceed.
	pub fn is_allow(&self) -> bool {
		matches!(self, Self::Allow)
	}

	/// Returns the retry directive when the request was denied.
	pub fn retry(&self) -> Option<&RetryDirective> {
		match self {
			Self::Allow => None,
			Self::Deny(directive) => Some(directive),
		}
	}
}

/// Advises a denied caller when it is safe to retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDirective {
	/// Instant when it is safe to retry.
	pub earliest_retry_at: OffsetDateTime,
	/// Cooldown remaining at the instant the decision was made.
	pub retry_after: Duration,
}
impl RetryDirective {
	/// Builds a directive for a cooldown ending at `earliest_retry_at`, observed at `now`.
	pub fn until(earliest_retry_at: OffsetDateTime, now: OffsetDateTime) -> Self {
		Self { earliest_retry_at, retry_after: earliest_retry_at - now }
	}

	/// Remaining cooldown rounded up to whole seconds, never less than one.
	pub fn retry_after_seconds(&self) -> u64 {
		let millis = self.retry_after.whole_milliseconds();

		if millis <= 0 {
			return 1;
		}

		(millis as u64).div_ceil(1_000)
	}
}
impl Display for RetryDirective {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let seconds = self.retry_after_seconds();

		if seconds < 60 {
			write!(f, "try again in {seconds} seconds")
		} else {
			write!(f, "try again in {} minutes", seconds.div_ceil(60))
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn now() -> OffsetDateTime {
		datetime!(2026-01-01 00:00 UTC)
	}

	#[test]
	fn retry_seconds_round_up() {
		let directive = RetryDirective::until(now() + Duration::milliseconds(400_000), now());

		assert_eq!(directive.retry_after_seconds(), 400);

		let fractional = RetryDirective::until(now() + Duration::milliseconds(400_001), now());

		assert_eq!(fractional.retry_after_seconds(), 401);

		let tiny = RetryDirective::until(now() + Duration::milliseconds(1), now());

		assert_eq!(tiny.retry_after_seconds(), 1);
	}

	#[test]
	fn retry_seconds_never_report_zero() {
		let elapsed = RetryDirective::until(now(), now());

		assert_eq!(elapsed.retry_after_seconds(), 1);
	}

	#[test]
	fn display_switches_to_minutes_for_long_cooldowns() {
		let short = RetryDirective::until(now() + Duration::seconds(42), now());

		assert_eq!(short.to_string(), "try again in 42 seconds");

		let full_window = RetryDirective::until(now() + Duration::minutes(15), now());

		assert_eq!(full_window.to_string(), "try again in 15 minutes");
	}

	#[test]
	fn decisions_expose_their_directive() {
		let directive = RetryDirective::until(now() + Duration::seconds(30), now());
		let denied = Decision::Deny(directive.clone());

		assert!(!denied.is_allow());
		assert_eq!(denied.retry(), Some(&directive));
		assert!(Decision::Allow.is_allow());
		assert_eq!(Decision::Allow.retry(), None);
	}

	#[test]
	fn directives_serialize_for_rejection_payloads() {
		let directive = RetryDirective::until(now() + Duration::seconds(900), now());
		let payload = serde_json::to_string(&directive)
			.expect("Retry directive should serialize to JSON.");
		let round_trip: RetryDirective = serde_json::from_str(&payload)
			.expect("Serialized directive should deserialize from JSON.");

		assert_eq!(round_trip, directive);
	}
}
