//! Provider descriptor data structures and helpers shared by all flows.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Consent parameters appended to authorization URLs.
pub mod consent;

pub use builder::*;
pub use consent::*;

// self
use crate::{_prelude::*, auth::ProviderId, error::ConfigError};

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Base URL for Google Calendar API v3.
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint used by the Authorization Code flow.
	pub authorization: Url,
	/// Token endpoint used for exchanges and refreshes.
	pub token: Url,
	/// Base URL of the calendar API the delegated action talks to.
	pub calendar: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Parameters appended to the authorization URL.
	pub consent: ConsentParams,
	/// Whether plain-HTTP endpoints were accepted (local development only).
	pub insecure_transport: bool,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Builder pre-populated with Google's endpoints.
	pub fn google() -> Result<ProviderDescriptorBuilder, ConfigError> {
		let parse =
			|raw: &str| Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { source });

		Ok(ProviderDescriptorBuilder::new(ProviderId::google())
			.authorization_endpoint(parse(GOOGLE_AUTH_URL)?)
			.token_endpoint(parse(GOOGLE_TOKEN_URL)?)
			.calendar_endpoint(parse(GOOGLE_CALENDAR_API)?))
	}
}
