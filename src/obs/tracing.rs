// self
use crate::{_prelude::*, obs::LimiterKind};

/// A span builder used by limiter checks.
#[derive(Clone, Debug)]
pub struct CheckSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CheckSpan {
	/// Creates a new span tagged with the provided limiter kind + stage.
	pub fn new(kind: LimiterKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("login_throttle.check", limiter = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for the duration of a synchronous check.
	pub fn entered(self) -> CheckSpanGuard {
		#[cfg(feature = "tracing")]
		{
			CheckSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			CheckSpanGuard {}
		}
	}
}

/// RAII guard returned by [`CheckSpan::entered`].
pub struct CheckSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for CheckSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CheckSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn check_span_noop_without_tracing() {
		let _guard = CheckSpan::new(LimiterKind::Login, "test").entered();
		// Compile-time smoke test ensures the guard exists even when tracing is disabled.
	}
}
