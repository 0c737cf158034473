// self
use crate::{
	_prelude::*,
	flows::Broker,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Broker<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Builds the provider consent URL.
	///
	/// Carries `response_type=code`, the client identity, the redirect URI, the space-delimited
	/// scope set, and the descriptor's consent parameters. No state is created or stored.
	pub fn authorization_url(&self) -> Url {
		const KIND: FlowKind = FlowKind::Authorize;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let url = FlowSpan::new(KIND, "authorization_url").in_scope(|| {
			let consent = &self.descriptor.consent;
			let delimiter = consent.scope_delimiter.to_string();
			let scope = self.scope.iter().collect::<Vec<_>>().join(&delimiter);
			let mut url = self.descriptor.endpoints.authorization.clone();

			{
				let mut pairs = url.query_pairs_mut();

				pairs
					.append_pair("response_type", "code")
					.append_pair("client_id", &self.client_id)
					.append_pair("redirect_uri", self.redirect_uri.as_str())
					.append_pair("scope", &scope);

				for (key, value) in consent.query_pairs() {
					pairs.append_pair(key, value);
				}
			}

			tracing::debug!(
				endpoint = %self.descriptor.endpoints.authorization,
				"Built consent URL."
			);

			url
		});

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		url
	}
}

#[cfg(test)]
mod tests {
	// self
	use crate::{_preludet::*, store::CredentialStore};

	#[tokio::test]
	async fn consent_url_carries_offline_access_and_forced_prompt() {
		let (broker, store) = build_test_broker("http://127.0.0.1:9");
		let url = broker.authorization_url();
		let pairs = url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(url.path(), "/o/oauth2/v2/auth");
		assert_eq!(pairs["response_type"], "code");
		assert_eq!(pairs["client_id"], TEST_CLIENT_ID);
		assert_eq!(pairs["redirect_uri"], TEST_REDIRECT_URI);
		assert_eq!(pairs["access_type"], "offline");
		assert_eq!(pairs["include_granted_scopes"], "true");
		assert_eq!(pairs["prompt"], "consent");
		assert_eq!(
			pairs["scope"],
			"https://www.googleapis.com/auth/calendar \
			https://www.googleapis.com/auth/userinfo.email \
			https://www.googleapis.com/auth/userinfo.profile openid"
		);
		assert!(!pairs.contains_key("state"));
		assert!(!store.exists().await.expect("Existence check should succeed."));
	}
}
