//! Storage contract and built-in stores for the single credential record.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CredentialRecord};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend holding at most one [`CredentialRecord`].
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists the record, replacing any previous one wholesale.
	fn save(&self, record: CredentialRecord) -> StoreFuture<'_, ()>;

	/// Loads the stored record, if present.
	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>>;

	/// Reports whether a record is present without validating its contents.
	fn exists(&self) -> StoreFuture<'_, bool>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The stored payload could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
