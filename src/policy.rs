//! Limiter policies: attempt budgets, trailing windows, and environment overrides.

// std
use std::env;
// self
use crate::_prelude::*;

/// Environment variable overriding [`ThrottlePolicy::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "LOGIN_THROTTLE_MAX_ATTEMPTS";
/// Environment variable overriding [`ThrottlePolicy::window`], in whole seconds.
pub const ENV_WINDOW_SECS: &str = "LOGIN_THROTTLE_WINDOW_SECS";
/// Environment variable overriding [`QuotaPolicy::per_minute`].
pub const ENV_QUOTA_RPM: &str = "LOGIN_THROTTLE_QUOTA_RPM";
/// Environment variable overriding [`QuotaPolicy::per_day`].
pub const ENV_QUOTA_RPD: &str = "LOGIN_THROTTLE_QUOTA_RPD";

/// Validation failures raised while constructing limiter policies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PolicyError {
	/// Windows must span a positive duration.
	#[error("The {field} window must be positive.")]
	NonPositiveWindow {
		/// Policy field that failed validation.
		field: &'static str,
	},
	/// A budget of zero would deny every request unconditionally.
	#[error("The {field} budget must allow at least one attempt.")]
	ZeroBudget {
		/// Policy field that failed validation.
		field: &'static str,
	},
	/// The daily window must be at least as long as the per-minute window.
	#[error("The day window must not be shorter than the minute window.")]
	WindowOrder,
}

/// Sliding-window policy governing the login limiter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottlePolicy {
	/// Trailing span over which attempts are counted.
	pub window: Duration,
	/// Attempts permitted inside a window before the key enters a cooldown.
	pub max_attempts: u32,
}
impl ThrottlePolicy {
	/// Creates a policy from the provided window and attempt budget.
	pub fn new(window: Duration, max_attempts: u32) -> Self {
		Self { window, max_attempts }
	}

	/// Creates the default policy with any environment overrides applied.
	///
	/// Unset or unparseable variables fall back to the default values.
	pub fn from_env() -> Self {
		let mut policy = Self::default();

		if let Some(secs) = parse_var(env::var(ENV_WINDOW_SECS).ok()) {
			policy.window = Duration::seconds(i64::from(secs));
		}
		if let Some(max_attempts) = parse_var(env::var(ENV_MAX_ATTEMPTS).ok()) {
			policy.max_attempts = max_attempts;
		}

		policy
	}

	/// Overrides the trailing window.
	pub fn with_window(mut self, window: Duration) -> Self {
		self.window = window;

		self
	}

	/// Overrides the attempt budget.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts;

		self
	}

	/// Validates invariants for the policy.
	pub fn validate(&self) -> Result<(), PolicyError> {
		if self.window <= Duration::ZERO {
			return Err(PolicyError::NonPositiveWindow { field: "throttle" });
		}
		if self.max_attempts == 0 {
			return Err(PolicyError::ZeroBudget { field: "throttle" });
		}

		Ok(())
	}
}
impl Default for ThrottlePolicy {
	fn default() -> Self {
		Self { window: Duration::minutes(15), max_attempts: 30 }
	}
}

/// Dual-budget policy governing the quota limiter: a per-minute sliding budget plus a
/// rolling daily budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
	/// Requests permitted inside the trailing minute window.
	pub per_minute: u32,
	/// Requests permitted inside the rolling day window.
	pub per_day: u32,
	/// Trailing span for the per-minute budget.
	pub minute_window: Duration,
	/// Rolling span for the daily budget.
	pub day_window: Duration,
}
impl QuotaPolicy {
	/// Creates a policy from the provided budgets with the default windows.
	pub fn new(per_minute: u32, per_day: u32) -> Self {
		Self { per_minute, per_day, ..Default::default() }
	}

	/// Creates the default policy with any environment overrides applied.
	///
	/// Unset or unparseable variables fall back to the default values.
	pub fn from_env() -> Self {
		let mut policy = Self::default();

		if let Some(per_minute) = parse_var(env::var(ENV_QUOTA_RPM).ok()) {
			policy.per_minute = per_minute;
		}
		if let Some(per_day) = parse_var(env::var(ENV_QUOTA_RPD).ok()) {
			policy.per_day = per_day;
		}

		policy
	}

	/// Overrides the per-minute budget.
	pub fn with_per_minute(mut self, per_minute: u32) -> Self {
		self.per_minute = per_minute;

		self
	}

	/// Overrides the daily budget.
	pub fn with_per_day(mut self, per_day: u32) -> Self {
		self.per_day = per_day;

		self
	}

	/// Validates invariants for the policy.
	pub fn validate(&self) -> Result<(), PolicyError> {
		if self.minute_window <= Duration::ZERO {
			return Err(PolicyError::NonPositiveWindow { field: "minute" });
		}
		if self.day_window <= Duration::ZERO {
			return Err(PolicyError::NonPositiveWindow { field: "day" });
		}
		if self.per_minute == 0 {
			return Err(PolicyError::ZeroBudget { field: "minute" });
		}
		if self.per_day == 0 {
			return Err(PolicyError::ZeroBudget { field: "day" });
		}
		if self.day_window < self.minute_window {
			return Err(PolicyError::WindowOrder);
		}

		Ok(())
	}
}
impl Default for QuotaPolicy {
	fn default() -> Self {
		Self {
			per_minute: 5,
			per_day: 20,
			minute_window: Duration::minutes(1),
			day_window: Duration::days(1),
		}
	}
}

fn parse_var(raw: Option<String>) -> Option<u32> {
	raw.and_then(|value| value.trim().parse().ok())
}
