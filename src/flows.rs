//! Bridge operations: consent URL, code exchange, status check, event creation, and refresh.
//!
//! All operations hang off [`Broker`], which owns the token transport, the credential store,
//! the provider descriptor, and the client identity. Each operation runs inside a
//! [`FlowSpan`](crate::obs::FlowSpan) and records its outcome through
//! [`record_flow_outcome`](crate::obs::record_flow_outcome).

mod authorize;
mod event;
mod exchange;
mod refresh;
mod status;

// self
use crate::{
	_prelude::*,
	auth::{CalendarId, ClientId, CredentialRecordBuilderError, ScopeSet},
	calendar::CalendarClient,
	config::AppConfig,
	error::ConfigError,
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::TokenFacade,
	provider::ProviderDescriptor,
	store::{CredentialStore, FileStore},
};

/// Broker specialized for the crate's reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates the bridge's operations against a single provider descriptor.
#[derive(Clone)]
pub struct Broker<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	/// Transport used for token endpoint calls.
	pub http_client: Arc<C>,
	/// Store holding the single credential record.
	pub store: Arc<dyn CredentialStore>,
	/// Provider endpoints and consent parameters.
	pub descriptor: ProviderDescriptor,
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// OAuth 2.0 client secret; required by the code exchange.
	pub client_secret: Option<String>,
	/// Callback URL registered with the provider.
	pub redirect_uri: Url,
	/// Scopes requested on the consent screen.
	pub scope: ScopeSet,
	/// Calendar API client used by the delegated action.
	pub calendar: CalendarClient,
	/// Calendar that receives created events.
	pub calendar_id: CalendarId,
	/// Write refreshed credentials back to the store.
	pub persist_refreshed: bool,
}
impl<C> Broker<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a broker from a token transport and a separate calendar client.
	pub fn with_transports(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		client_id: ClientId,
		redirect_uri: Url,
		scope: ScopeSet,
		http_client: impl Into<Arc<C>>,
		calendar: CalendarClient,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			descriptor,
			client_id,
			client_secret: None,
			redirect_uri,
			scope,
			calendar,
			calendar_id: CalendarId::primary(),
			persist_refreshed: false,
		}
	}

	/// Sets or replaces the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Targets a calendar other than `primary`.
	pub fn with_calendar_id(mut self, calendar_id: CalendarId) -> Self {
		self.calendar_id = calendar_id;

		self
	}

	/// Controls whether refreshed credentials replace the stored record.
	pub fn with_persist_refreshed(mut self, persist: bool) -> Self {
		self.persist_refreshed = persist;

		self
	}

	fn require_client_secret(&self) -> Result<&str> {
		self.client_secret.as_deref().ok_or_else(|| {
			ConfigError::from(CredentialRecordBuilderError::MissingClientSecret).into()
		})
	}

	fn token_facade(
		&self,
		token_uri: &Url,
		client_id: &ClientId,
		client_secret: &str,
		redirect_uri: Option<&Url>,
	) -> Result<TokenFacade<C>> {
		TokenFacade::new(
			token_uri,
			client_id,
			client_secret,
			redirect_uri,
			self.http_client.clone(),
		)
	}
}
impl Broker<ReqwestHttpClient> {
	/// Creates a broker whose token exchanges and calendar calls share one reqwest client.
	pub fn with_http_client(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		client_id: ClientId,
		redirect_uri: Url,
		scope: ScopeSet,
		http_client: ReqwestHttpClient,
	) -> Self {
		let calendar =
			CalendarClient::new(http_client.0.clone(), descriptor.endpoints.calendar.clone());

		Self::with_transports(
			store,
			descriptor,
			client_id,
			redirect_uri,
			scope,
			http_client,
			calendar,
		)
	}

	/// Wires a broker from environment configuration: client secrets file, file store,
	/// Google descriptor, and transport mode.
	pub fn from_config(config: &AppConfig) -> Result<Self> {
		let secrets = config.client_secrets()?;
		let mut builder = ProviderDescriptor::google()?
			.calendar_endpoint(config.calendar_api.clone())
			.allow_insecure_transport(config.insecure_transport);

		if let Some(auth_uri) = secrets.auth_uri.clone() {
			builder = builder.authorization_endpoint(auth_uri);
		}
		if let Some(token_uri) = secrets.token_uri.clone() {
			builder = builder.token_endpoint(token_uri);
		}

		let descriptor = builder.build().map_err(ConfigError::from)?;
		let store: Arc<dyn CredentialStore> = Arc::new(FileStore::open(&config.token_store)?);
		let http_client = ReqwestHttpClient::for_transport(config.insecure_transport)?;

		Ok(Self::with_http_client(
			store,
			descriptor,
			secrets.client_id,
			config.redirect_uri.clone(),
			ScopeSet::google_calendar(),
			http_client,
		)
		.with_client_secret(secrets.client_secret)
		.with_calendar_id(config.calendar_id.clone())
		.with_persist_refreshed(config.persist_refreshed))
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("calendar_id", &self.calendar_id)
			.field("persist_refreshed", &self.persist_refreshed)
			.finish()
	}
}
