//! Event request, wire payload, and response types.

// crates.io
use time::{
	Time,
	macros::{format_description, time},
};
// self
use crate::{_prelude::*, calendar::CalendarError};

/// Summary used when the caller does not provide one.
pub const DEFAULT_SUMMARY: &str = "Test Event";

const DEFAULT_START: Time = time!(14:00);
const DEFAULT_END: Time = time!(15:00);

/// Caller-supplied event parameters; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRequest {
	/// Event title.
	pub summary: Option<String>,
	/// Start instant as an RFC 3339 string, passed through unvalidated.
	pub start: Option<String>,
	/// End instant as an RFC 3339 string, passed through unvalidated.
	pub end: Option<String>,
}
impl EventRequest {
	/// Fills in defaults: [`DEFAULT_SUMMARY`] and a 14:00 to 15:00 UTC window on `today`.
	///
	/// Empty strings are treated the same as missing values.
	pub fn resolve(self, today: Date) -> Result<EventPayload, CalendarError> {
		let summary = non_empty(self.summary).unwrap_or_else(|| DEFAULT_SUMMARY.to_owned());
		let start = match non_empty(self.start) {
			Some(start) => start,
			None => utc_timestamp(today, DEFAULT_START)?,
		};
		let end = match non_empty(self.end) {
			Some(end) => end,
			None => utc_timestamp(today, DEFAULT_END)?,
		};

		Ok(EventPayload {
			summary,
			start: EventDateTime { date_time: start },
			end: EventDateTime { date_time: end },
		})
	}
}

/// Request body sent to the events insert endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
	/// Event title.
	pub summary: String,
	/// Start boundary.
	pub start: EventDateTime,
	/// End boundary.
	pub end: EventDateTime,
}

/// `{"dateTime": ...}` wrapper used by the calendar API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
	/// RFC 3339 timestamp.
	#[serde(rename = "dateTime")]
	pub date_time: String,
}

/// Subset of the inserted event returned by the calendar API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
	/// Browser link to the event, when the API returned one.
	#[serde(rename = "htmlLink", default)]
	pub html_link: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

fn utc_timestamp(date: Date, at: Time) -> Result<String, CalendarError> {
	let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

	Ok(date.with_time(at).format(&format)?)
}
