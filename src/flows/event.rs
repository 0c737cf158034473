// self
use crate::{
	_prelude::*,
	calendar::{CalendarError, CreatedEvent, EventRequest},
	flows::Broker,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Broker<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates one calendar event with the stored credentials.
	///
	/// Returns [`Error::NotAuthenticated`] without any remote call when no record exists. When
	/// the calendar API rejects the access token and a refresh token is on file, the record is
	/// refreshed once and the insert retried once.
	pub async fn create_event(&self, request: EventRequest) -> Result<CreatedEvent> {
		const KIND: FlowKind = FlowKind::CreateEvent;

		let span = FlowSpan::new(KIND, "create_event");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if !self.store.exists().await? {
					return Err(Error::NotAuthenticated);
				}

				let record = self.store.load().await?.ok_or(Error::NotAuthenticated)?;
				let payload = request.resolve(OffsetDateTime::now_utc().date())?;
				let first = self
					.calendar
					.insert_event(record.access_token.expose(), &self.calendar_id, &payload)
					.await;
				let created = match first {
					Err(CalendarError::Unauthorized) if record.refresh_token.is_some() => {
						tracing::info!("Access token rejected; refreshing once.");

						let refreshed = self.refresh_credentials(&record).await?;

						self.calendar
							.insert_event(
								refreshed.access_token.expose(),
								&self.calendar_id,
								&payload,
							)
							.await?
					},
					other => other?,
				};

				tracing::info!(link = created.html_link.as_deref(), "Created calendar event.");

				Ok(created)
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
