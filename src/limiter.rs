//! Sliding-window login limiter owning its per-key bucket store.
//!
//! [`RateLimiter::check_at`] evaluates one request against the attempt budget: a blocked
//! key is denied without touching its attempts, an over-budget key enters a cooldown that
//! restarts the full window (an escalation, never an extension of the original window),
//! and every permitted attempt is appended to the bucket. [`RateLimiter::reap_at`] evicts
//! buckets that are simultaneously unblocked and empty so idle keys cannot accumulate.

// self
use crate::{
	_prelude::*,
	bucket::{AttemptBucket, BucketPhase},
	decision::{Decision, RetryDirective},
	key::ClientKey,
	obs::{self, CheckOutcome, CheckSpan, LimiterKind},
	policy::ThrottlePolicy,
};

type BucketMap = Arc<RwLock<HashMap<ClientKey, AttemptBucket>>>;

/// Sliding-window attempt counter with a cooldown escalation.
///
/// Each instance owns its bucket store; construct one per process and hand clones to the
/// request-handling layer and the reaper (clones share the same store). Independent
/// instances never share state, which keeps tests isolated.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
	policy: ThrottlePolicy,
	buckets: BucketMap,
}
impl RateLimiter {
	/// Creates a limiter with the default policy (30 attempts per 15 minutes).
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a limiter after validating the provided policy.
	pub fn with_policy(policy: ThrottlePolicy) -> Result<Self> {
		policy.validate()?;

		Ok(Self { policy, buckets: Default::default() })
	}

	/// Returns the policy governing this limiter.
	pub fn policy(&self) -> &ThrottlePolicy {
		&self.policy
	}

	/// Evaluates `key` against the attempt budget at the current UTC instant.
	pub fn check(&self, key: &ClientKey) -> Decision {
		self.check_at(key, OffsetDateTime::now_utc())
	}

	/// Evaluates `key` against the attempt budget at `now`.
	///
	/// A key inside an active cooldown is denied with the remaining wait and its attempts
	/// are left untouched; denied requests are never recorded. Otherwise stale attempts
	/// are pruned, an over-budget key is blocked for one full window, and a permitted
	/// attempt is appended before allowing the request.
	pub fn check_at(&self, key: &ClientKey, now: OffsetDateTime) -> Decision {
		const KIND: LimiterKind = LimiterKind::Login;

		let _span = CheckSpan::new(KIND, "check").entered();
		let mut buckets = self.buckets.write();
		let bucket = buckets.entry(key.clone()).or_insert_with(AttemptBucket::new);

		if let Some(until) = bucket.blocked_until_at(now) {
			obs::record_check_outcome(KIND, CheckOutcome::DenyBlocked);

			return Decision::Deny(RetryDirective::until(until, now));
		}

		bucket.prune(now - self.policy.window);

		if bucket.attempt_count() >= self.policy.max_attempts as usize {
			let until = now + self.policy.window;

			bucket.block(until);
			obs::record_check_outcome(KIND, CheckOutcome::DenyOverflow);

			return Decision::Deny(RetryDirective::until(until, now));
		}

		bucket.record(now);
		obs::record_check_outcome(KIND, CheckOutcome::Allow);

		Decision::Allow
	}

	/// Evicts idle buckets at the current UTC instant and returns the evicted count.
	pub fn reap(&self) -> usize {
		self.reap_at(OffsetDateTime::now_utc())
	}

	/// Evicts buckets that are simultaneously unblocked and empty after pruning at `now`.
	///
	/// Blocked buckets are always retained so an active cooldown can never be forgotten.
	/// The same write lock serializes eviction against [`RateLimiter::check_at`], so a
	/// bucket a concurrent check just created or refreshed is never deleted underneath it.
	pub fn reap_at(&self, now: OffsetDateTime) -> usize {
		let cutoff = now - self.policy.window;
		let mut buckets = self.buckets.write();
		let before = buckets.len();

		buckets.retain(|_, bucket| {
			if bucket.is_blocked_at(now) {
				return true;
			}

			bucket.prune(cutoff);

			bucket.attempt_count() > 0
		});

		let reaped = before - buckets.len();

		obs::record_reaped(LimiterKind::Login, reaped);

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

	/// Number of attempts currently recorded for `key`, zero when untracked.
	pub fn attempt_count(&self, key: &ClientKey) -> usize {
		self.buckets.read().get(key).map(AttemptBucket::attempt_count).unwrap_or(0)
	}

	/// Reports the lifecycle phase for `key` at `now`, when tracked.
	pub fn phase_at(&self, key: &ClientKey, now: OffsetDateTime) -> Option<BucketPhase> {
		self.buckets.read().get(key).map(|bucket| bucket.phase_at(now, self.policy.window))
	}
}
