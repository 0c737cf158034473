//! `oauth2-calendar-bridge` binary: load configuration, wire the broker, serve HTTP.

// crates.io
use oauth2_calendar_bridge::{
	config::AppConfig,
	flows::ReqwestBroker,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let config = AppConfig::load()?;

	obs::init_subscriber(config.log_json);

	if config.insecure_transport {
		tracing::warn!("Insecure transport is enabled; use this for local development only.");
	}

	let broker = ReqwestBroker::from_config(&config)?;
	let state = AppState::new(broker, config.app_url.clone());
	let app = server::router(state, &config.allowed_origin)?;

	server::serve(config.bind, app).await?;

	Ok(())
}
