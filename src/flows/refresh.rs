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
	/// Redeems the record's refresh token at the record's own `token_uri` with the record's
	/// client identity.
	///
	/// A rotated refresh token replaces the old one. The returned record is only written back
	/// when the broker was built with [`Broker::with_persist_refreshed`].
	pub async fn refresh_credentials(&self, record: &CredentialRecord) -> Result<CredentialRecord> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_credentials");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let refresh_token =
					record.refresh_token.as_ref().ok_or(ConfigError::MissingRefreshToken)?;
				let facade = self.token_facade(
					&record.token_uri,
					&record.client_id,
					record.client_secret.expose(),
					None,
				)?;
				let grant = facade.refresh(refresh_token.expose()).await?;
				let mut updated = record.refreshed(grant.access_token, grant.refresh_token);

				if let Some(scopes) = grant.scopes {
					updated.scopes = scopes;
				}
				if self.persist_refreshed {
					self.store.save(updated.clone()).await?;

					tracing::info!("Persisted refreshed credential record.");
				} else {
					tracing::debug!("Refreshed credential record kept in memory only.");
				}

				Ok(updated)
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
