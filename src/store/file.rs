//! File-backed [`CredentialStore`] holding the record as one JSON object.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
};
// self
use crate::{
	_prelude::*,
	auth::CredentialRecord,
	store::{CredentialStore, StoreError, StoreFuture},
};

/// Persists the credential record to a single JSON file.
///
/// Nothing is cached: every load reads the file again, so edits made by other processes are
/// picked up. Writes go through a temporary sibling file that is renamed into place, so readers
/// never observe a half-written record.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	write_lock: Arc<parking_lot::Mutex<()>>,
}
impl FileStore {
	/// Binds a store to `path`, creating the parent directory when needed.
	///
	/// The file itself is only created by the first [`CredentialStore::save`].
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, write_lock: Default::default() })
	}

	/// Location of the record file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn read_now(&self) -> Result<Option<CredentialRecord>, StoreError> {
		let bytes = match fs::read(&self.path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", self.path.display()),
				}),
		};
		let record = serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", self.path.display()),
		})?;

		Ok(Some(record))
	}

	fn write_now(&self, record: &CredentialRecord) -> Result<(), StoreError> {
		let serialized =
			serde_json::to_vec_pretty(record).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize credential record: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		let _guard = self.write_lock.lock();

		Self::ensure_parent_exists(&self.path)?;

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			#[cfg(unix)]
			{
				use std::os::unix::fs::PermissionsExt;

				file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(|e| {
					StoreError::Backend {
						message: format!(
							"Failed to restrict permissions on {}: {e}",
							tmp_path.display()
						),
					}
				})?;
			}

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn save(&self, record: CredentialRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.write_now(&record) })
	}

	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>> {
		Box::pin(async move { self.read_now() })
	}

	fn exists(&self) -> StoreFuture<'_, bool> {
		Box::pin(async move { Ok(self.path.exists()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{ClientId, ScopeSet};

	fn record(access: &str) -> CredentialRecord {
		CredentialRecord::builder(
			ClientId::new("client-file").expect("Client fixture should be valid."),
			Url::parse("https://oauth2.googleapis.com/token").expect("Token URI should parse."),
		)
		.client_secret("secret-file")
		.access_token(access)
		.refresh_token("refresh-file")
		.scopes(ScopeSet::google_calendar())
		.build()
		.expect("Credential fixture should build.")
	}

	#[tokio::test]
	async fn missing_file_means_no_record() {
		let dir = tempfile::tempdir().expect("Temporary directory should be created.");
		let store = FileStore::open(dir.path().join("token_store.json"))
			.expect("File store should open.");

		assert!(!store.exists().await.expect("Existence check should succeed."));
		assert!(store.load().await.expect("Load should succeed.").is_none());
	}

	#[tokio::test]
	async fn save_replaces_previous_record() {
		let dir = tempfile::tempdir().expect("Temporary directory should be created.");
		let store = FileStore::open(dir.path().join("nested/token_store.json"))
			.expect("File store should create missing parents.");

		store.save(record("first")).await.expect("First save should succeed.");
		store.save(record("second")).await.expect("Second save should succeed.");

		let loaded = store
			.load()
			.await
			.expect("Load should succeed.")
			.expect("Record should be present after save.");

		assert_eq!(loaded.access_token.expose(), "second");
		assert!(!dir.path().join("nested/token_store.tmp").exists());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn record_file_is_owner_only() {
		use std::os::unix::fs::PermissionsExt;

		let dir = tempfile::tempdir().expect("Temporary directory should be created.");
		let store =
			FileStore::open(dir.path().join("token_store.json")).expect("File store should open.");

		store.save(record("access")).await.expect("Save should succeed.");

		let mode =
			fs::metadata(store.path()).expect("Record file should exist.").permissions().mode();

		assert_eq!(mode & 0o777, 0o600);
	}

	#[tokio::test]
	async fn corrupt_file_exists_but_fails_to_load() {
		let dir = tempfile::tempdir().expect("Temporary directory should be created.");
		let path = dir.path().join("token_store.json");

		fs::write(&path, b"").expect("Fixture file should be written.");

		let store = FileStore::open(&path).expect("File store should open.");

		assert!(store.exists().await.expect("Existence check should succeed."));
		assert!(matches!(store.load().await, Err(StoreError::Serialization { .. })));
	}
}
