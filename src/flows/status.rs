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
	/// Reports whether a credential record is present.
	///
	/// Presence is the only signal: the record is neither parsed nor checked for expiry.
	pub async fn is_authenticated(&self) -> Result<bool> {
		const KIND: FlowKind = FlowKind::StatusCheck;

		let span = FlowSpan::new(KIND, "is_authenticated");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(async move { Ok(self.store.exists().await?) }).await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
