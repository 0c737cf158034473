//! Bridge-level error types shared across flows, providers, stores, and the calendar client.

// self
use crate::_prelude::*;

/// Bridge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint answered with something other than tokens.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Calendar API failure.
	#[error(transparent)]
	Calendar(#[from] crate::calendar::CalendarError),

	/// Provider rejected the grant (e.g., bad code or refresh token).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or bridge-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or bridge-supplied reason string.
		reason: String,
	},
	/// No credential record has been stored yet.
	#[error("Not authenticated")]
	NotAuthenticated,
}

/// Configuration and validation failures raised at startup or while building clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// An endpoint URL cannot be used by the OAuth client.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed or used.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI uses plain HTTP while insecure transport is disabled.
	#[error(
		"Redirect URI `{url}` must use HTTPS unless BRIDGE_INSECURE_TRANSPORT is enabled for local development."
	)]
	InsecureRedirect {
		/// Offending redirect URI.
		url: String,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Credential record builder validation failed.
	#[error("Unable to build credential record.")]
	CredentialBuild(#[from] crate::auth::CredentialRecordBuilderError),
	/// Client secrets file could not be read.
	#[error("Failed to read client secrets file {path}.")]
	ClientSecretsRead {
		/// Path that was read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Client secrets file is not valid JSON or lacks a client section.
	#[error("Failed to parse client secrets file {path}.")]
	ClientSecretsParse {
		/// Path that was parsed.
		path: PathBuf,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Environment variable holds an unusable value.
	#[error("Environment variable {key} has an invalid value `{value}`: {reason}.")]
	InvalidEnv {
		/// Variable name.
		key: &'static str,
		/// Raw value.
		value: String,
		/// Parser message.
		reason: String,
	},
	/// Stored record lacks a refresh secret.
	#[error("Stored credential record is missing a refresh token.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures that are not protocol-level grant rejections.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected response.
	#[error("{message}")]
	TokenEndpoint {
		/// Provider- or bridge-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn not_authenticated_message_matches_endpoint_body() {
		assert_eq!(Error::NotAuthenticated.to_string(), "Not authenticated");
	}

	#[test]
	fn grant_rejections_carry_provider_text() {
		let err = Error::InvalidGrant { reason: "Bad Request".into() };

		assert_eq!(err.to_string(), "Provider rejected the grant: Bad Request.");
	}

	#[test]
	fn insecure_redirect_names_the_development_flag() {
		let err = ConfigError::InsecureRedirect { url: "http://localhost:8000/cb".into() };

		assert!(err.to_string().contains("BRIDGE_INSECURE_TRANSPORT"));
	}
}
