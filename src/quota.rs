//! Fixed-budget quota limiter: a per-minute sliding budget plus a rolling daily budget.
//!
//! Guards expensive endpoints (outbound model calls, report generation) where a short
//! burst budget alone is not enough: each key gets N requests per trailing minute and M
//! per rolling day. Denials consume neither budget, so a caller bouncing off the minute
//! budget does not burn through its daily allowance.

// self
use crate::{
	_prelude::*,
	decision::{Decision, RetryDirective},
	key::ClientKey,
	obs::{self, CheckOutcome, CheckSpan, LimiterKind},
	policy::QuotaPolicy,
};

/// Per-key quota state: recent in-minute requests plus the rolling day counter.
#[derive(Clone, Debug)]
struct QuotaBucket {
	recent: VecDeque<OffsetDateTime>,
	day_count: u32,
	day_started_at: OffsetDateTime,
}
impl QuotaBucket {
	fn new(now: OffsetDateTime) -> Self {
		Self { recent: VecDeque::new(), day_count: 0, day_started_at: now }
	}

	fn roll_day(&mut self, now: OffsetDateTime, day_window: Duration) {
		if now - self.day_started_at >= day_window {
			self.day_count = 0;
			self.day_started_at = now;
		}
	}

	fn prune(&mut self, cutoff: OffsetDateTime) {
		while let Some(&front) = self.recent.front() {
			if front < cutoff {
				self.recent.pop_front();
			} else {
				break;
			}
		}
	}
}

type QuotaMap = Arc<RwLock<HashMap<ClientKey, QuotaBucket>>>;

/// Dual-budget request counter enforcing per-minute and per-day allowances.
///
/// Clones share the underlying store, mirroring [`crate::limiter::RateLimiter`].
#[derive(Clone, Debug, Default)]
pub struct QuotaLimiter {
	policy: QuotaPolicy,
	buckets: QuotaMap,
}
impl QuotaLimiter {
	/// Creates a limiter with the default policy (5 per minute, 20 per day).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a limiter after validating the provided policy.
	pub fn with_policy(policy: QuotaPolicy) -> Result<Self> {
		policy.validate()?;

		Ok(Self { policy, buckets: Default::default() })
	}

	/// Returns the policy governing this limiter.
	pub fn policy(&self) -> &QuotaPolicy {
		&self.policy
	}

	/// Evaluates `key` against both budgets at the current UTC instant.
	pub fn check(&self, key: &ClientKey) -> Decision {
		self.check_at(key, OffsetDateTime::now_utc())
	}

	/// Evaluates `key` against both budgets at `now`.
	///
	/// The day counter rolls forward once the day window has fully elapsed. The minute
	/// budget is consulted first: a denial reports when the oldest in-window request ages
	/// out. A spent daily budget reports the start of the next day window instead.
	pub fn check_at(&self, key: &ClientKey, now: OffsetDateTime) -> Decision {
		const KIND: LimiterKind = LimiterKind::Quota;

		let _span = CheckSpan::new(KIND, "check").entered();
		let mut buckets = self.buckets.write();
		let bucket = buckets.entry(key.clone()).or_insert_with(|| QuotaBucket::new(now));

		bucket.roll_day(now, self.policy.day_window);
		bucket.prune(now - self.policy.minute_window);

		if bucket.recent.len() >= self.policy.per_minute as usize {
			let oldest = bucket.recent.front().copied().unwrap_or(now);

			obs::record_check_outcome(KIND, CheckOutcome::DenyOverflow);

			return Decision::Deny(RetryDirective::until(
				oldest + self.policy.minute_window,
				now,
			));
		}
		if bucket.day_count >= self.policy.per_day {
			obs::record_check_outcome(KIND, CheckOutcome::DenyQuota);

			return Decision::Deny(RetryDirective::until(
				bucket.day_started_at + self.policy.day_window,
				now,
			));
		}

		bucket.recent.push_back(now);
		bucket.day_count += 1;

		obs::record_check_outcome(KIND, CheckOutcome::Allow);

		Decision::Allow
	}

	/// Evicts exhausted buckets at the current UTC instant and returns the evicted count.
	pub fn reap(&self) -> usize {
		self.reap_at(OffsetDateTime::now_utc())
	}

	/// Evicts buckets with no in-window requests once their day window has elapsed.
	///
	/// A bucket still inside its day window is retained even when the minute deque is
	/// empty; dropping it would forget the daily usage it tracks.
	pub fn reap_at(&self, now: OffsetDateTime) -> usize {
		let cutoff = now - self.policy.minute_window;
		let day_window = self.policy.day_window;
		let mut buckets = self.buckets.write();
		let before = buckets.len();

		buckets.retain(|_, bucket| {
			bucket.prune(cutoff);

			!bucket.recent.is_empty() || now - bucket.day_started_at < day_window
		});

		let reaped = before - buckets.len();

		obs::record_reaped(LimiterKind::Quota, reaped);

		reaped
	}

	/// Number of keys currently tracked.
	pub fn tracked_keys(&self) -> usize {
		self.buckets.read().len()
	}

	/// Returns `true` when no bucket is tracked.
	pub fn is_empty(&self) -> bool {
		self.buckets.read().is_empty()
	}
}
