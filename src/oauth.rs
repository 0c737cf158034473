//! Token endpoint facade built on the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthorizationCode, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RedirectUrl, RefreshToken, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet},
	error::{ConfigError, TransientError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Tokens returned by a successful exchange or refresh.
#[derive(Clone, Debug)]
pub struct TokenGrant {
	/// Newly minted access token.
	pub access_token: String,
	/// Refresh token, when the provider issued (or rotated) one.
	pub refresh_token: Option<String>,
	/// Scopes the provider reported as granted, if it reported any.
	pub scopes: Option<ScopeSet>,
}

/// Thin wrapper around a configured [`BasicClient`] and a [`TokenHttpClient`].
pub struct TokenFacade<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
}
impl<C> TokenFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Configures a facade for one token endpoint and client identity.
	///
	/// The client secret is sent in the request body (`client_secret_post`). `redirect_uri` is
	/// only required for the authorization-code exchange.
	pub fn new(
		token_uri: &Url,
		client_id: &ClientId,
		client_secret: &str,
		redirect_uri: Option<&Url>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let token_url = TokenUrl::new(token_uri.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let mut oauth_client = BasicClient::new(oauth2::ClientId::new(client_id.to_string()))
			.set_client_secret(ClientSecret::new(client_secret.to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		if let Some(redirect) = redirect_uri {
			let redirect_url = RedirectUrl::new(redirect.to_string())
				.map_err(|source| ConfigError::InvalidRedirect { source })?;

			oauth_client = oauth_client.set_redirect_uri(redirect_url);
		}

		Ok(Self { oauth_client, http_client: http_client.into() })
	}

	/// Exchanges an authorization code for tokens.
	pub async fn exchange_authorization_code(&self, code: &str) -> Result<TokenGrant> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(response)
	}

	/// Redeems a refresh token for a new access token.
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(response)
	}
}

fn map_token_response(response: FacadeTokenResponse) -> Result<TokenGrant> {
	let scopes = match response.scopes() {
		Some(scopes) => Some(
			ScopeSet::new(
				scopes.iter().map(|scope| scope.to_string()).filter(|scope| !scope.is_empty()),
			)
			.map_err(ConfigError::from)?,
		),
		None => None,
	};

	Ok(TokenGrant {
		access_token: response.access_token().secret().to_owned(),
		refresh_token: response.refresh_token().map(|token| token.secret().to_owned()),
		scopes: scopes.filter(|set| !set.is_empty()),
	})
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(source, _body) =>
			TransientError::TokenResponseParse { source, status }.into(),
		RequestTokenError::Other(message) => TransientError::TokenEndpoint {
			message: format!("Token endpoint returned an unexpected response: {message}."),
			status,
		}
		.into(),
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let code = response.error().as_ref().to_owned();
	let reason = match response.error_description() {
		Some(description) => format!("{code}: {description}"),
		None => code,
	};

	match response.error() {
		BasicErrorResponseType::InvalidGrant => Error::InvalidGrant { reason },
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			Error::InvalidClient { reason },
		_ => TransientError::TokenEndpoint {
			message: format!("Token endpoint returned an OAuth error: {reason}."),
			status,
		}
		.into(),
	}
}

fn map_transport_error<E>(err: HttpClientError<E>, status: Option<u16>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransientError::TokenEndpoint {
			message: format!(
				"HTTP client error occurred while calling the token endpoint: {message}."
			),
			status,
		}
		.into(),
		_ => TransientError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint.".into(),
			status,
		}
		.into(),
	}
}
