//! Optional observability helpers for provider flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_socialite.flow` with the `flow`
//!   (workflow stage), `provider` (driver name), and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oauth2_socialite_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow`, `provider`, and `outcome`. Rejected callback
//!   states also bump `oauth2_socialite_state_rejected_total`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Workflow stages observed by providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization URL construction (and CSRF state issuance).
	Redirect,
	/// Authorization code exchange against the token endpoint.
	TokenExchange,
	/// Profile retrieval and normalization.
	FetchUser,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Redirect => "redirect",
			FlowKind::TokenExchange => "token_exchange",
			FlowKind::FetchUser => "fetch_user",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a workflow stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the outcome of `result` for `kind` and hands the result back.
pub fn observe<T>(kind: FlowKind, provider: &str, result: Result<T>) -> Result<T> {
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	record_flow_outcome(kind, provider, outcome);

	result
}
