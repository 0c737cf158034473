//! The persisted credential record and its builder.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TokenSecret},
};

/// Errors produced by [`CredentialRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no client secret was provided.
	#[error("Client secret is required.")]
	MissingClientSecret,
}

/// The single credential set the bridge persists.
///
/// Serializes to the flat six-key layout `token`, `refresh_token`, `token_uri`,
/// `client_id`, `client_secret`, `scopes`. There is no expiry field: a record is trusted until
/// the calendar API rejects it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Access token secret.
	#[serde(rename = "token")]
	pub access_token: TokenSecret,
	/// Refresh token secret; `null` when the provider did not issue one.
	pub refresh_token: Option<TokenSecret>,
	/// Token endpoint used to mint and refresh the tokens.
	pub token_uri: Url,
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Scopes granted to the access token.
	pub scopes: ScopeSet,
}
impl CredentialRecord {
	/// Returns a builder bound to the client identity and token endpoint.
	pub fn builder(client_id: ClientId, token_uri: Url) -> CredentialRecordBuilder {
		CredentialRecordBuilder::new(client_id, token_uri)
	}

	/// Returns a copy holding a refreshed access token.
	///
	/// A rotated refresh token replaces the stored one; otherwise the existing refresh token is
	/// kept.
	pub fn refreshed(
		&self,
		access_token: impl Into<String>,
		refresh_token: Option<String>,
	) -> Self {
		let mut next = self.clone();

		next.access_token = TokenSecret::new(access_token);

		if let Some(refresh) = refresh_token {
			next.refresh_token = Some(TokenSecret::new(refresh));
		}

		next
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_uri", &self.token_uri.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("scopes", &self.scopes)
			.finish()
	}
}

/// Builder for [`CredentialRecord`].
#[derive(Clone, Debug)]
pub struct CredentialRecordBuilder {
	client_id: ClientId,
	token_uri: Url,
	client_secret: Option<TokenSecret>,
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	scopes: ScopeSet,
}
impl CredentialRecordBuilder {
	fn new(client_id: ClientId, token_uri: Url) -> Self {
		Self {
			client_id,
			token_uri,
			client_secret: None,
			access_token: None,
			refresh_token: None,
			scopes: ScopeSet::default(),
		}
	}

	/// Provides the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the granted scopes.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = scopes;

		self
	}

	/// Consumes the builder and produces a [`CredentialRecord`].
	pub fn build(self) -> Result<CredentialRecord, CredentialRecordBuilderError> {
		let access_token =
			self.access_token.ok_or(CredentialRecordBuilderError::MissingAccessToken)?;
		let client_secret =
			self.client_secret.ok_or(CredentialRecordBuilderError::MissingClientSecret)?;

		Ok(CredentialRecord {
			access_token,
			refresh_token: self.refresh_token,
			token_uri: self.token_uri,
			client_id: self.client_id,
			client_secret,
			scopes: self.scopes,
		})
	}
}
