// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{ConsentParams, ProviderDescriptor, ProviderEndpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Authorization endpoint is required for Authorization Code flows.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory for all flows.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Calendar API base URL is mandatory for the delegated action.
	#[error("Missing calendar endpoint.")]
	MissingCalendarEndpoint,
	/// Endpoints must use HTTPS outside of insecure-transport mode.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint scheme is neither HTTP nor HTTPS.
	#[error("The {endpoint} endpoint uses an unsupported scheme: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Authorization endpoint.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint used for exchanges and refreshes.
	pub token_endpoint: Option<Url>,
	/// Calendar API base URL.
	pub calendar_endpoint: Option<Url>,
	/// Accept plain-HTTP endpoints (local development only).
	pub insecure_transport: bool,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorization_endpoint: None,
			token_endpoint: None,
			calendar_endpoint: None,
			insecure_transport: false,
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the calendar API base URL.
	pub fn calendar_endpoint(mut self, url: Url) -> Self {
		self.calendar_endpoint = Some(url);

		self
	}

	/// Accepts plain-HTTP endpoints. Never enable this outside local development.
	pub fn allow_insecure_transport(mut self, allow: bool) -> Self {
		self.insecure_transport = allow;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let calendar =
			self.calendar_endpoint.ok_or(ProviderDescriptorError::MissingCalendarEndpoint)?;
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints: ProviderEndpoints { authorization, token, calendar },
			consent: ConsentParams::default(),
			insecure_transport: self.insecure_transport,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let insecure = self.insecure_transport;

		validate_endpoint("authorization", &self.endpoints.authorization, insecure)?;
		validate_endpoint("token", &self.endpoints.token, insecure)?;
		validate_endpoint("calendar", &self.endpoints.calendar, insecure)?;

		Ok(())
	}
}

fn validate_endpoint(
	name: &'static str,
	url: &Url,
	insecure: bool,
) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if insecure => Ok(()),
		"http" =>
			Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
		_ => Err(ProviderDescriptorError::UnsupportedScheme {
			endpoint: name,
			url: url.to_string(),
		}),
	}
}
