//! Strongly typed identifiers for providers, OAuth clients, and calendars.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (provider, client, calendar).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (provider, client, calendar).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (provider, client, calendar).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ProviderId, "Identifier for an OAuth provider descriptor.", "Provider" }
def_id! { ClientId, "OAuth 2.0 client identifier issued by the provider console.", "Client" }
def_id! { CalendarId, "Calendar identifier (`primary` or a calendar address).", "Calendar" }

impl ProviderId {
	/// Identifier used for the Google descriptor.
	pub fn google() -> Self {
		Self("google".into())
	}
}
impl CalendarId {
	/// The signed-in user's primary calendar.
	pub fn primary() -> Self {
		Self("primary".into())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_padding_and_blanks() {
		assert!(ClientId::new(" client").is_err(), "Leading whitespace must be rejected.");
		assert!(ClientId::new("client ").is_err(), "Trailing whitespace must be rejected.");
		assert!(ProviderId::new("").is_err());

		let client = ClientId::new("1234-abc.apps.googleusercontent.com")
			.expect("Google-style client identifier should be valid.");

		assert_eq!(client.as_ref(), "1234-abc.apps.googleusercontent.com");
	}

	#[test]
	fn serde_enforces_validation() {
		let calendar: CalendarId = serde_json::from_str("\"team@group.calendar.google.com\"")
			.expect("Calendar identifier should deserialize successfully.");

		assert_eq!(&*calendar, "team@group.calendar.google.com");
		assert!(serde_json::from_str::<CalendarId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		ClientId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(ClientId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn primary_calendar_is_valid() {
		assert_eq!(CalendarId::primary(), CalendarId::new("primary").expect("Valid calendar."));
	}
}
