// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `oauth2_socialite_flow_total{flow, provider, outcome}` (when enabled).
pub fn record_flow_outcome(kind: FlowKind, provider: &str, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_socialite_flow_total",
			"flow" => kind.as_str(),
			"provider" => provider.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, provider, outcome);
	}
}

/// Increments `oauth2_socialite_state_rejected_total{provider}` for a callback whose CSRF state
/// failed verification.
pub fn record_state_rejection(provider: &str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_socialite_state_rejected_total", "provider" => provider.to_owned())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = provider;
	}
}
