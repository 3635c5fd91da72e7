// crates.io
use oauth2::http::{Method, Uri};
// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by provider flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the flow kind, provider name, and stage.
	pub fn new(kind: FlowKind, provider: &str, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_socialite.flow", flow = kind.as_str(), provider, stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, provider, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Emits a debug event for an outgoing provider request (when tracing is enabled).
///
/// Only the host and path are recorded; query strings may carry tokens.
pub fn trace_request(method: &Method, uri: &Uri) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			method = method.as_str(),
			host = uri.host().unwrap_or_default(),
			path = uri.path(),
			"dispatching provider request"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, uri);
	}
}
