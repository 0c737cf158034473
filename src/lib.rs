//! Single-user OAuth 2.0 bridge: sign a user in with Google, keep one credential record on
//! disk, and create calendar events on their behalf.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod server;
pub mod store;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by unit and integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientId, ProviderId, ScopeSet},
		flows::ReqwestBroker,
		http::ReqwestHttpClient,
		provider::ProviderDescriptor,
		store::{CredentialStore, MemoryStore},
	};

	/// Client identifier used by test brokers.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret used by test brokers.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";
	/// Redirect URI used by test brokers.
	pub const TEST_REDIRECT_URI: &str = "http://localhost:8000/auth/callback";

	/// Builds a descriptor whose endpoints all live on the provided mock server base URL.
	///
	/// The descriptor is built in insecure-transport mode so plain-HTTP mock servers pass
	/// validation.
	pub fn mock_descriptor(base: &str) -> ProviderDescriptor {
		let join = |path: &str| {
			Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
				.expect("Mock endpoint URL should parse successfully.")
		};

		ProviderDescriptor::builder(
			ProviderId::new("mock-google").expect("Mock provider identifier should be valid."),
		)
		.authorization_endpoint(join("/o/oauth2/v2/auth"))
		.token_endpoint(join("/token"))
		.calendar_endpoint(join("/calendar/v3"))
		.allow_insecure_transport(true)
		.build()
		.expect("Mock provider descriptor should build successfully.")
	}

	/// Builds a reqwest HTTP client that may talk to plain-HTTP mock servers.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::for_transport(true)
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Constructs a [`ReqwestBroker`] backed by the provided store and a mock descriptor.
	pub fn build_test_broker_with_store(
		base: &str,
		store: Arc<dyn CredentialStore>,
	) -> ReqwestBroker {
		let scope = ScopeSet::google_calendar();

		ReqwestBroker::with_http_client(
			store,
			mock_descriptor(base),
			ClientId::new(TEST_CLIENT_ID).expect("Test client identifier should be valid."),
			Url::parse(TEST_REDIRECT_URI).expect("Test redirect URI should parse successfully."),
			scope,
			test_reqwest_http_client(),
		)
		.with_client_secret(TEST_CLIENT_SECRET)
	}

	/// Constructs a [`ReqwestBroker`] backed by an in-memory store.
	pub fn build_test_broker(base: &str) -> (ReqwestBroker, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();

		(build_test_broker_with_store(base, store), store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Date, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Used by the binary target only.
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
