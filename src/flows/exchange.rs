// self
use crate::{
	_prelude::*,
	auth::CredentialRecord,
	error::ConfigError,
	flows::Broker,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Broker<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Exchanges an authorization code and overwrites the stored credential record.
	///
	/// Granted scopes come from the token response when it reports them, otherwise the
	/// requested scope set is recorded. Nothing is written when the exchange fails.
	pub async fn exchange_code(&self, code: &str) -> Result<CredentialRecord> {
		const KIND: FlowKind = FlowKind::CodeExchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client_secret = self.require_client_secret()?;
				let token_uri = &self.descriptor.endpoints.token;
				let facade = self.token_facade(
					token_uri,
					&self.client_id,
					client_secret,
					Some(&self.redirect_uri),
				)?;
				let grant = facade.exchange_authorization_code(code).await?;
				let mut builder =
					CredentialRecord::builder(self.client_id.clone(), token_uri.clone())
						.client_secret(client_secret)
						.access_token(grant.access_token)
						.scopes(grant.scopes.unwrap_or_else(|| self.scope.clone()));

				if let Some(refresh) = grant.refresh_token {
					builder = builder.refresh_token(refresh);
				}

				let record = builder.build().map_err(ConfigError::from)?;

				self.store.save(record.clone()).await?;

				tracing::info!(
					refresh_token = record.refresh_token.is_some(),
					scopes = %record.scopes,
					"Stored credential record."
				);

				Ok(record)
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
