// crates.io
use axum::{
	Router,
	body::{Body, to_bytes},
	http::{Method, Request, StatusCode, header},
	response::Response,
};
use httpmock::prelude::*;
use tower::ServiceExt;
// self
use oauth2_calendar_bridge::{
	_preludet::*,
	server::{self, AppState},
	store::{CredentialStore, FileStore},
};

const APP_URL: &str = "http://localhost:5173/chat";
const ALLOWED_ORIGIN: &str = "http://localhost:5173";

struct Harness {
	server: MockServer,
	app: Router,
	record_path: PathBuf,
	_dir: tempfile::TempDir,
}
impl Harness {
	async fn start() -> Self {
		let server = MockServer::start_async().await;
		let dir = tempfile::tempdir().expect("Temporary directory should be created.");
		let record_path = dir.path().join("token_store.json");
		let store: Arc<dyn CredentialStore> =
			Arc::new(FileStore::open(&record_path).expect("File store should open."));
		let broker = build_test_broker_with_store(&server.base_url(), store);
		let state =
			AppState::new(broker, Url::parse(APP_URL).expect("App URL fixture should parse."));
		let app = server::router(state, ALLOWED_ORIGIN).expect("Router should build.");

		Self { server, app, record_path, _dir: dir }
	}

	async fn get(&self, uri: &str) -> Response {
		self.app
			.clone()
			.oneshot(
				Request::builder().uri(uri).body(Body::empty()).expect("Request should build."),
			)
			.await
			.expect("Router should respond.")
	}

	async fn mock_token_success(&self) {
		self.server
			.mock_async(|when, then| {
				when.method(POST).path("/token");
				then.status(200).header("content-type", "application/json").body(
					"{\"access_token\":\"access-1\",\"refresh_token\":\"refresh-1\",\
					\"token_type\":\"Bearer\",\"expires_in\":3599}",
				);
			})
			.await;
	}
}

async fn json_body(response: Response) -> serde_json::Value {
	let bytes = to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Response body should be readable.");

	serde_json::from_slice(&bytes).expect("Response body should be JSON.")
}

fn location(response: &Response) -> &str {
	response
		.headers()
		.get(header::LOCATION)
		.expect("Redirect should carry a Location header.")
		.to_str()
		.expect("Location header should be ASCII.")
}

#[tokio::test]
async fn index_points_to_auth() {
	let harness = Harness::start().await;
	let response = harness.get("/").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({ "message": "Visit /auth to authenticate with Google." })
	);
}

#[tokio::test]
async fn auth_redirects_to_consent_without_side_effects() {
	let harness = Harness::start().await;
	let response = harness.get("/auth").await;

	assert_eq!(response.status(), StatusCode::FOUND);

	let target = Url::parse(location(&response)).expect("Consent URL should parse.");
	let pairs = target.query_pairs().into_owned().collect::<HashMap<_, _>>();

	assert_eq!(target.path(), "/o/oauth2/v2/auth");
	assert_eq!(pairs["access_type"], "offline");
	assert_eq!(pairs["prompt"], "consent");
	assert!(!harness.record_path.exists());
}

#[tokio::test]
async fn callback_without_code_is_rejected_and_writes_nothing() {
	let harness = Harness::start().await;
	let token = harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200);
		})
		.await;

	for uri in ["/auth/callback", "/auth/callback?code=", "/auth/callback?error=access_denied"] {
		let response = harness.get(uri).await;

		assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(json_body(response).await, serde_json::json!({ "error": "No code in request" }));
	}

	token.assert_hits_async(0).await;

	assert!(!harness.record_path.exists());
}

#[tokio::test]
async fn callback_stores_record_and_status_flips() {
	let harness = Harness::start().await;
	let response = harness.get("/is-authenticated").await;

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(json_body(response).await, serde_json::json!({ "error": "Not authenticated" }));

	harness.mock_token_success().await;

	let response = harness.get("/auth/callback?code=valid-code&scope=openid").await;

	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), APP_URL);

	let stored: serde_json::Value = serde_json::from_slice(
		&std::fs::read(&harness.record_path).expect("Record file should exist after callback."),
	)
	.expect("Record file should hold JSON.");

	assert_eq!(stored.as_object().map(|object| object.len()), Some(6));
	assert_eq!(stored["token"], "access-1");
	assert_eq!(stored["refresh_token"], "refresh-1");

	let response = harness.get("/is-authenticated").await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, serde_json::json!({ "status": "authenticated" }));
}

#[tokio::test]
async fn repeated_code_uses_the_last_value() {
	let harness = Harness::start().await;
	let token = harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/token").form_urlencoded_tuple("code", "second");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-2\",\"refresh_token\":\"refresh-2\",\
				\"token_type\":\"Bearer\"}",
			);
		})
		.await;
	let response = harness.get("/auth/callback?code=first&code=second").await;

	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), APP_URL);

	token.assert_async().await;
}

#[tokio::test]
async fn token_endpoint_failure_is_a_token_fetch_error() {
	let harness = Harness::start().await;

	harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"Bad Request\"}");
		})
		.await;

	let response = harness.get("/auth/callback?code=stale").await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = json_body(response).await;
	let message = body["error"].as_str().expect("Error body should carry a message.");

	assert!(message.starts_with("Token fetch failed: "), "{message}");
	assert!(message.contains("Bad Request"), "{message}");
	assert!(!harness.record_path.exists());
}

#[tokio::test]
async fn add_event_requires_authentication() {
	let harness = Harness::start().await;
	let calendar = harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/calendar/v3/calendars/primary/events");
			then.status(200).body("{}");
		})
		.await;
	let response = harness.get("/add-event").await;

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(json_body(response).await, serde_json::json!({ "error": "Not authenticated" }));

	calendar.assert_hits_async(0).await;
}

#[tokio::test]
async fn add_event_after_login_returns_link() {
	let harness = Harness::start().await;

	harness.mock_token_success().await;

	let calendar = harness
		.server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/calendar/v3/calendars/primary/events")
				.header("authorization", "Bearer access-1")
				.json_body(serde_json::json!({
					"summary": "Lunch",
					"start": { "dateTime": "2030-01-01T12:00:00Z" },
					"end": { "dateTime": "2030-01-01T13:00:00Z" },
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"htmlLink\":\"https://calendar.google.com/event?eid=lunch\"}");
		})
		.await;

	assert_eq!(harness.get("/auth/callback?code=valid-code").await.status(), StatusCode::FOUND);

	let response = harness
		.get("/add-event?summary=Lunch&start=2030-01-01T12:00:00Z&end=2030-01-01T13:00:00Z")
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({
			"message": "Event created",
			"event_link": "https://calendar.google.com/event?eid=lunch",
		})
	);

	calendar.assert_async().await;
}

#[tokio::test]
async fn add_event_repeated_parameters_use_the_last_value() {
	let harness = Harness::start().await;

	harness.mock_token_success().await;

	let calendar = harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/calendar/v3/calendars/primary/events").json_body(
				serde_json::json!({
					"summary": "Dinner",
					"start": { "dateTime": "2030-01-01T18:00:00Z" },
					"end": { "dateTime": "2030-01-01T19:00:00Z" },
				}),
			);
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;

	assert_eq!(harness.get("/auth/callback?code=valid-code").await.status(), StatusCode::FOUND);

	let response = harness
		.get(
			"/add-event?summary=Lunch&summary=Dinner\
			&start=2030-01-01T18:00:00Z&end=2030-01-01T19:00:00Z",
		)
		.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({ "message": "Event created", "event_link": null })
	);

	calendar.assert_async().await;
}

#[tokio::test]
async fn add_event_remote_failure_is_500() {
	let harness = Harness::start().await;

	harness.mock_token_success().await;
	harness
		.server
		.mock_async(|when, then| {
			when.method(POST).path("/calendar/v3/calendars/primary/events");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"error\":{\"code\":404,\"message\":\"Not Found\"}}");
		})
		.await;

	assert_eq!(harness.get("/auth/callback?code=valid-code").await.status(), StatusCode::FOUND);

	let response = harness.get("/add-event").await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({ "error": "Calendar API returned 404: Not Found" })
	);
}

#[tokio::test]
async fn cors_preflight_allows_only_the_configured_origin() {
	let harness = Harness::start().await;
	let preflight = |origin: &str| {
		Request::builder()
			.method(Method::OPTIONS)
			.uri("/add-event")
			.header(header::ORIGIN, origin)
			.header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
			.header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
			.body(Body::empty())
			.expect("Preflight request should build.")
	};
	let response = harness
		.app
		.clone()
		.oneshot(preflight(ALLOWED_ORIGIN))
		.await
		.expect("Router should respond.");
	let headers = response.headers();

	assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
	assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
	assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
	assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");

	let response = harness
		.app
		.clone()
		.oneshot(preflight("http://evil.example"))
		.await
		.expect("Router should respond.");

	assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
