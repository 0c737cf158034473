//! Endpoint error taxonomy rendered as JSON `{"error": ...}` bodies.

// crates.io
use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::json;
// self
use crate::_prelude::*;

/// Errors surfaced by the HTTP endpoints.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The callback arrived without an authorization code.
	#[error("No code in request")]
	MissingCode,
	/// Exchanging or persisting the code failed.
	#[error("Token fetch failed: {0}")]
	TokenExchange(#[source] Error),
	/// No credential record is stored.
	#[error("Not authenticated")]
	NotAuthenticated,
	/// The delegated action failed after authentication.
	#[error("{0}")]
	RemoteAction(#[source] Error),
}
impl ApiError {
	/// Classifies a broker error raised by an authenticated action.
	pub fn from_action(err: Error) -> Self {
		match err {
			Error::NotAuthenticated => Self::NotAuthenticated,
			other => Self::RemoteAction(other),
		}
	}

	/// HTTP status for the variant.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::MissingCode => StatusCode::BAD_REQUEST,
			Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
			Self::TokenExchange(_) | Self::RemoteAction(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = ?self, "Request failed.");
		} else {
			tracing::debug!(error = %self, "Request rejected.");
		}

		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}
