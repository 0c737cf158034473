//! Observability helpers for bridge flows.
//!
//! Every flow runs inside a `oauth2_calendar_bridge.flow` span carrying `flow` and `stage`
//! fields. With the `metrics` feature enabled, each attempt, success, and failure also bumps
//! the `oauth2_calendar_bridge_flow_total` counter labeled by `flow` and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Building the provider consent URL.
	Authorize,
	/// Exchanging an authorization code for tokens.
	CodeExchange,
	/// Checking whether a credential record exists.
	StatusCheck,
	/// Creating a calendar event on the user's behalf.
	CreateEvent,
	/// Redeeming the stored refresh token.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::CodeExchange => "code_exchange",
			FlowKind::StatusCheck => "status_check",
			FlowKind::CreateEvent => "create_event",
			FlowKind::Refresh => "refresh",
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
	/// Entry to a bridge flow.
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

	/// Picks [`FlowOutcome::Success`] or [`FlowOutcome::Failure`] for a finished flow.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_snake_case() {
		assert_eq!(FlowKind::CodeExchange.to_string(), "code_exchange");
		assert_eq!(FlowOutcome::of::<(), ()>(&Err(())), FlowOutcome::Failure);
		assert_eq!(FlowOutcome::of::<(), ()>(&Ok(())).as_str(), "success");
	}
}
