//! Crate-level error types shared across limiter construction and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
///
/// Limiter checks are infallible: a check has exactly two outcomes and never raises on
/// valid input. Only constructing a limiter from an invalid policy can fail.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
	/// Limiter or quota policy failed validation.
	#[error(transparent)]
	Policy(#[from] crate::policy::PolicyError),
}
