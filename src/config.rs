//! Environment-driven configuration and the Google client-secrets file.

// std
use std::{env, fs, net::SocketAddr};
// self
use crate::{
	_prelude::*,
	auth::{CalendarId, ClientId},
	error::ConfigError,
	provider::GOOGLE_CALENDAR_API,
};

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";
const DEFAULT_TOKEN_STORE: &str = "token_store.json";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/auth/callback";
const DEFAULT_APP_URL: &str = "http://localhost:5173/chat";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Runtime settings for the bridge binary.
#[derive(Clone, Debug)]
pub struct AppConfig {
	/// Socket the HTTP server binds to (`BRIDGE_BIND`).
	pub bind: SocketAddr,
	/// Google client-secrets JSON (`BRIDGE_CLIENT_SECRET_FILE`).
	pub client_secret_file: PathBuf,
	/// Credential record file (`BRIDGE_TOKEN_STORE`).
	pub token_store: PathBuf,
	/// OAuth callback URL (`BRIDGE_REDIRECT_URI`).
	pub redirect_uri: Url,
	/// Where the callback sends the browser after a successful exchange (`BRIDGE_APP_URL`).
	pub app_url: Url,
	/// The single cross-origin caller allowed to talk to the bridge (`BRIDGE_ALLOWED_ORIGIN`).
	pub allowed_origin: String,
	/// Calendar that receives created events (`BRIDGE_CALENDAR_ID`).
	pub calendar_id: CalendarId,
	/// Calendar API base URL (`BRIDGE_CALENDAR_API`).
	pub calendar_api: Url,
	/// Local-development switch permitting plain-HTTP transport (`BRIDGE_INSECURE_TRANSPORT`).
	pub insecure_transport: bool,
	/// Write refreshed credentials back to the store (`BRIDGE_PERSIST_REFRESHED`).
	pub persist_refreshed: bool,
	/// Emit JSON log lines (`BRIDGE_LOG_JSON`).
	pub log_json: bool,
}
impl AppConfig {
	/// Loads `.env` (when present) and then reads the process environment.
	pub fn load() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();

		Self::from_env()
	}

	/// Reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds a configuration from an arbitrary key lookup. Unset or empty keys use defaults.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let get = |key: &'static str, default: &str| {
			lookup(key)
				.filter(|value| !value.trim().is_empty())
				.unwrap_or_else(|| default.to_owned())
		};
		let insecure_transport =
			parse_flag("BRIDGE_INSECURE_TRANSPORT", &get("BRIDGE_INSECURE_TRANSPORT", "false"))?;
		let redirect_uri =
			parse_url("BRIDGE_REDIRECT_URI", &get("BRIDGE_REDIRECT_URI", DEFAULT_REDIRECT_URI))?;

		if redirect_uri.scheme() != "https" && !insecure_transport {
			return Err(ConfigError::InsecureRedirect { url: redirect_uri.to_string() });
		}

		let bind_raw = get("BRIDGE_BIND", DEFAULT_BIND);
		let bind = bind_raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidEnv {
			key: "BRIDGE_BIND",
			value: bind_raw.clone(),
			reason: e.to_string(),
		})?;
		let calendar_id = CalendarId::new(get("BRIDGE_CALENDAR_ID", "primary"))?;

		Ok(Self {
			bind,
			client_secret_file: get("BRIDGE_CLIENT_SECRET_FILE", DEFAULT_CLIENT_SECRET_FILE).into(),
			token_store: get("BRIDGE_TOKEN_STORE", DEFAULT_TOKEN_STORE).into(),
			redirect_uri,
			app_url: parse_url("BRIDGE_APP_URL", &get("BRIDGE_APP_URL", DEFAULT_APP_URL))?,
			allowed_origin: get("BRIDGE_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
			calendar_id,
			calendar_api: parse_url(
				"BRIDGE_CALENDAR_API",
				&get("BRIDGE_CALENDAR_API", GOOGLE_CALENDAR_API),
			)?,
			insecure_transport,
			persist_refreshed: parse_flag(
				"BRIDGE_PERSIST_REFRESHED",
				&get("BRIDGE_PERSIST_REFRESHED", "false"),
			)?,
			log_json: parse_flag("BRIDGE_LOG_JSON", &get("BRIDGE_LOG_JSON", "false"))?,
		})
	}

	/// Reads the configured client-secrets file.
	pub fn client_secrets(&self) -> Result<ClientSecrets, ConfigError> {
		ClientSecrets::from_file(&self.client_secret_file)
	}
}

/// Client identity parsed from a Google client-secrets JSON file.
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// OAuth client secret.
	pub client_secret: String,
	/// Authorization endpoint override.
	#[serde(default)]
	pub auth_uri: Option<Url>,
	/// Token endpoint override.
	#[serde(default)]
	pub token_uri: Option<Url>,
}
impl ClientSecrets {
	/// Loads `{"web": {...}}` or `{"installed": {...}}` from disk.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let bytes = fs::read(path)
			.map_err(|source| ConfigError::ClientSecretsRead { path: path.to_owned(), source })?;

		Self::from_slice(&bytes)
			.map_err(|source| ConfigError::ClientSecretsParse { path: path.to_owned(), source })
	}

	/// Parses the client-secrets JSON layout.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
		#[derive(Deserialize)]
		#[serde(rename_all = "lowercase")]
		enum Envelope {
			Web(ClientSecrets),
			Installed(ClientSecrets),
		}

		match serde_json::from_slice(bytes)? {
			Envelope::Web(secrets) | Envelope::Installed(secrets) => Ok(secrets),
		}
	}
}
impl Debug for ClientSecrets {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientSecrets")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("auth_uri", &self.auth_uri.as_ref().map(Url::as_str))
			.field("token_uri", &self.token_uri.as_ref().map(Url::as_str))
			.finish()
	}
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ConfigError::InvalidEnv {
			key,
			value: raw.to_owned(),
			reason: "expected a boolean".into(),
		}),
	}
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|e| ConfigError::InvalidEnv {
		key,
		value: raw.to_owned(),
		reason: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
		let map = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect::<HashMap<_, _>>();

		AppConfig::from_lookup(|key| map.get(key).cloned())
	}

	#[test]
	fn defaults_require_insecure_transport_for_local_redirect() {
		let err = config(&[]).expect_err("Plain-HTTP default redirect must need the dev flag.");

		assert!(matches!(err, ConfigError::InsecureRedirect { .. }));

		let cfg = config(&[("BRIDGE_INSECURE_TRANSPORT", "true")])
			.expect("Development defaults should load.");

		assert_eq!(cfg.bind.port(), 8000);
		assert_eq!(cfg.redirect_uri.as_str(), DEFAULT_REDIRECT_URI);
		assert_eq!(cfg.app_url.as_str(), DEFAULT_APP_URL);
		assert_eq!(cfg.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
		assert_eq!(cfg.calendar_id, CalendarId::primary());
		assert_eq!(cfg.calendar_api.as_str(), GOOGLE_CALENDAR_API);
		assert_eq!(cfg.token_store, PathBuf::from(DEFAULT_TOKEN_STORE));
		assert!(!cfg.persist_refreshed);
		assert!(!cfg.log_json);
	}

	#[test]
	fn https_redirect_needs_no_flag() {
		let cfg = config(&[
			("BRIDGE_REDIRECT_URI", "https://bridge.example.com/auth/callback"),
			("BRIDGE_PERSIST_REFRESHED", "yes"),
			("BRIDGE_BIND", "127.0.0.1:9100"),
		])
		.expect("HTTPS redirect should load without the dev flag.");

		assert!(!cfg.insecure_transport);
		assert!(cfg.persist_refreshed);
		assert_eq!(cfg.bind.to_string(), "127.0.0.1:9100");
	}

	#[test]
	fn malformed_values_name_the_variable() {
		let err = config(&[("BRIDGE_INSECURE_TRANSPORT", "sometimes")])
			.expect_err("Unknown boolean spelling must fail.");

		assert!(matches!(err, ConfigError::InvalidEnv { key: "BRIDGE_INSECURE_TRANSPORT", .. }));

		let err = config(&[("BRIDGE_INSECURE_TRANSPORT", "1"), ("BRIDGE_BIND", "nowhere")])
			.expect_err("Unparsable bind address must fail.");

		assert!(matches!(err, ConfigError::InvalidEnv { key: "BRIDGE_BIND", .. }));
	}

	#[test]
	fn client_secrets_accept_web_and_installed_layouts() {
		let web = ClientSecrets::from_slice(
			br#"{"web":{"client_id":"abc.apps.googleusercontent.com","client_secret":"shh",
			"auth_uri":"https://accounts.google.com/o/oauth2/auth",
			"token_uri":"https://oauth2.googleapis.com/token","project_id":"demo"}}"#,
		)
		.expect("Web client secrets should parse.");

		assert_eq!(web.client_id.as_ref(), "abc.apps.googleusercontent.com");
		assert_eq!(
			web.token_uri.as_ref().map(Url::as_str),
			Some("https://oauth2.googleapis.com/token")
		);

		let installed =
			ClientSecrets::from_slice(br#"{"installed":{"client_id":"cli","client_secret":"s"}}"#)
				.expect("Installed client secrets should parse.");

		assert_eq!(installed.client_secret, "s");
		assert!(installed.auth_uri.is_none());
		assert!(format!("{installed:?}").contains("<redacted>"));
		assert!(ClientSecrets::from_slice(br#"{"service_account":{}}"#).is_err());
	}

	#[test]
	fn missing_client_secrets_file_is_reported_with_path() {
		let err = ClientSecrets::from_file("/nonexistent/client_secret.json")
			.expect_err("Missing file must fail.");

		assert!(matches!(err, ConfigError::ClientSecretsRead { .. }));
	}
}
