//! Minimal Google Calendar v3 client used by the delegated event action.

pub mod event;

pub use event::*;

// crates.io
use reqwest::StatusCode;
// self
use crate::{_prelude::*, auth::CalendarId};

/// Errors raised while talking to the calendar API.
#[derive(Debug, ThisError)]
pub enum CalendarError {
	/// The access token was rejected.
	#[error("Calendar API rejected the access token.")]
	Unauthorized,
	/// The API answered with a non-success status.
	#[error("Calendar API returned {status}: {message}")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Error message extracted from the response body.
		message: String,
	},
	/// Request could not be sent or the response could not be read.
	#[error("Calendar API request failed: {0}")]
	Network(#[source] ReqwestError),
	/// Successful response body did not match the expected shape.
	#[error("Calendar API returned an unreadable event: {0}")]
	Decode(#[source] ReqwestError),
	/// Default event window could not be rendered.
	#[error("Failed to format the event window.")]
	Format(#[from] time::error::Format),
	/// Base URL cannot carry path segments.
	#[error("Calendar API base URL `{0}` cannot be used.")]
	InvalidBase(String),
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
	error: ApiErrorBody,
}
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
	message: String,
}

/// Calendar API client bound to one base URL.
#[derive(Clone, Debug)]
pub struct CalendarClient {
	http: ReqwestClient,
	base: Url,
}
impl CalendarClient {
	/// Creates a client that issues requests against `base` (for example
	/// `https://www.googleapis.com/calendar/v3`).
	pub fn new(http: ReqwestClient, base: Url) -> Self {
		Self { http, base }
	}

	/// Builds `{base}/calendars/{calendar_id}/events`.
	pub fn events_url(&self, calendar_id: &CalendarId) -> Result<Url, CalendarError> {
		let mut url = self.base.clone();

		url.path_segments_mut()
			.map_err(|_| CalendarError::InvalidBase(self.base.to_string()))?
			.pop_if_empty()
			.extend(["calendars", calendar_id.as_ref(), "events"]);

		Ok(url)
	}

	/// Inserts one event using `access_token` as the bearer credential.
	pub async fn insert_event(
		&self,
		access_token: &str,
		calendar_id: &CalendarId,
		payload: &EventPayload,
	) -> Result<CreatedEvent, CalendarError> {
		let url = self.events_url(calendar_id)?;
		let response = self
			.http
			.post(url)
			.bearer_auth(access_token)
			.json(payload)
			.send()
			.await
			.map_err(CalendarError::Network)?;
		let status = response.status();

		if status == StatusCode::UNAUTHORIZED {
			return Err(CalendarError::Unauthorized);
		}
		if !status.is_success() {
			let body = response
				.text()
				.await
				.inspect_err(|e| tracing::warn!(error = %e, "Failed to read calendar error body."))
				.ok();
			let message = api_error_message(status, body);

			return Err(CalendarError::Api { status: status.as_u16(), message });
		}

		response.json::<CreatedEvent>().await.map_err(CalendarError::Decode)
	}
}

/// Google's `{"error": {"message"}}` text, the raw body, or the status reason when the body is
/// unreadable.
fn api_error_message(status: StatusCode, body: Option<String>) -> String {
	match body {
		Some(body) => serde_json::from_str::<ApiErrorEnvelope>(&body)
			.map(|envelope| envelope.error.message)
			.unwrap_or(body),
		None => status.canonical_reason().unwrap_or("Unknown Error").to_owned(),
	}
}
