//! Optional observability helpers for limiter checks.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `login_throttle.check` with the
//!   `limiter` (kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `login_throttle_check_total` counter for every
//!   decision, labeled by `limiter` + `outcome`, and the `login_throttle_reaped_total`
//!   counter for every reaper eviction, labeled by `limiter`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Limiter kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimiterKind {
	/// Sliding-window login limiter.
	Login,
	/// Dual-budget quota limiter.
	Quota,
}
impl LimiterKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LimiterKind::Login => "login",
			LimiterKind::Quota => "quota",
		}
	}
}
impl Display for LimiterKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
	/// The request was permitted.
	Allow,
	/// The request was denied by an already-active cooldown.
	DenyBlocked,
	/// The request overflowed the window budget and started a cooldown.
	DenyOverflow,
	/// The request exhausted a fixed quota budget.
	DenyQuota,
}
impl CheckOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CheckOutcome::Allow => "allow",
			CheckOutcome::DenyBlocked => "deny_blocked",
			CheckOutcome::DenyOverflow => "deny_overflow",
			CheckOutcome::DenyQuota => "deny_quota",
		}
	}
}
impl Display for CheckOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
