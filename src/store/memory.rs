//! In-memory [`CredentialStore`] for tests and ephemeral runs.

// self
use crate::{
	_prelude::*,
	auth::CredentialRecord,
	store::{CredentialStore, StoreFuture},
};

/// Keeps the record in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<CredentialRecord>>>);
impl MemoryStore {
	/// Returns a copy of the stored record without going through the async contract.
	pub fn snapshot(&self) -> Option<CredentialRecord> {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn save(&self, record: CredentialRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			*self.0.write() = Some(record);

			Ok(())
		})
	}

	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>> {
		Box::pin(async move { Ok(self.snapshot()) })
	}

	fn exists(&self) -> StoreFuture<'_, bool> {
		Box::pin(async move { Ok(self.0.read().is_some()) })
	}
}
