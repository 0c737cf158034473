//! HTTP surface: five fixed endpoints, a single-origin CORS policy, and request tracing.

pub mod error;

pub use error::ApiError;

// std
use std::net::SocketAddr;
// crates.io
use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderValue, StatusCode, header},
	response::{IntoResponse, Response},
	routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::{
	cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
	trace::TraceLayer,
};
// self
use crate::{_prelude::*, calendar::EventRequest, error::ConfigError, flows::ReqwestBroker};

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Broker performing every operation.
	pub broker: Arc<ReqwestBroker>,
	/// Destination after a successful callback.
	pub app_url: Url,
}
impl AppState {
	/// Wraps a broker and the post-login destination.
	pub fn new(broker: ReqwestBroker, app_url: Url) -> Self {
		Self { broker: Arc::new(broker), app_url }
	}
}

/// Raw query pairs in request order.
///
/// Repeated keys resolve to their last value, and decoding never rejects a request.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct QueryPairs(Vec<(String, String)>);
impl QueryPairs {
	fn last(&self, key: &str) -> Option<String> {
		self.0.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
	}
}

/// Builds the router with CORS restricted to `allowed_origin`.
///
/// Methods and headers are mirrored from the preflight since wildcards cannot be combined with
/// credentials.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router, ConfigError> {
	let origin = HeaderValue::from_str(allowed_origin).map_err(|e| ConfigError::InvalidEnv {
		key: "BRIDGE_ALLOWED_ORIGIN",
		value: allowed_origin.to_owned(),
		reason: e.to_string(),
	})?;
	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::list([origin]))
		.allow_methods(AllowMethods::mirror_request())
		.allow_headers(AllowHeaders::mirror_request())
		.allow_credentials(true);

	Ok(Router::new()
		.route("/", get(index))
		.route("/auth", get(authorize))
		.route("/auth/callback", get(callback))
		.route("/is-authenticated", get(is_authenticated))
		.route("/add-event", get(add_event))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state))
}

/// Binds `addr` and serves `app` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
	let listener = TcpListener::bind(addr).await?;

	tracing::info!(addr = %listener.local_addr()?, "Listening.");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to install the Ctrl-C handler.");
	}

	tracing::info!("Shutting down.");
}

async fn index() -> Json<Value> {
	Json(json!({ "message": "Visit /auth to authenticate with Google." }))
}

async fn authorize(State(state): State<AppState>) -> Response {
	found(state.broker.authorization_url())
}

async fn callback(
	State(state): State<AppState>,
	Query(query): Query<QueryPairs>,
) -> Result<Response, ApiError> {
	let code = query.last("code").filter(|code| !code.is_empty()).ok_or(ApiError::MissingCode)?;

	state.broker.exchange_code(&code).await.map_err(ApiError::TokenExchange)?;

	Ok(found(state.app_url.clone()))
}

async fn is_authenticated(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	if state.broker.is_authenticated().await.map_err(ApiError::from_action)? {
		Ok(Json(json!({ "status": "authenticated" })))
	} else {
		Err(ApiError::NotAuthenticated)
	}
}

async fn add_event(
	State(state): State<AppState>,
	Query(query): Query<QueryPairs>,
) -> Result<Json<Value>, ApiError> {
	let request = EventRequest {
		summary: query.last("summary"),
		start: query.last("start"),
		end: query.last("end"),
	};
	let created = state.broker.create_event(request).await.map_err(ApiError::from_action)?;

	Ok(Json(json!({ "message": "Event created", "event_link": created.html_link })))
}

fn found(location: Url) -> Response {
	(StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
