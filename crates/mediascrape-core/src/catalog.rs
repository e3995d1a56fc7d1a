//! Serialized access to a shared remote catalog client.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Shared handle to one catalog client.
///
/// Callers lock the client for exactly one fetch and drop the guard before
/// mapping or merging anything:
///
/// ```ignore
/// let details = {
///     let api = catalog.lock().await;
///     api.tv_details(id, "de", &[]).await
/// };
/// ```
#[derive(Debug)]
pub struct CatalogHandle<A> {
    inner: Arc<Mutex<A>>,
}

impl<A> Clone for CatalogHandle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> CatalogHandle<A> {
    /// Wraps `api` in a new handle.
    pub fn new(api: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(api)),
        }
    }

    /// Waits for exclusive access to the client.
    pub async fn lock(&self) -> MutexGuard<'_, A> {
        self.inner.lock().await
    }
}
