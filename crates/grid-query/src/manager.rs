//! Dataset handle lifecycle and serialized access.
//!
//! Every query runs under one process-wide access lock for the whole time
//! its handle is open, so at most one handle exists at any instant. The
//! lock and the handle travel together in a [`DatasetLease`].
//!
//! Metadata has its own cache and init lock, so reading it never waits on
//! a running query once it has been computed.

use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, OnceLock};

use tracing::{debug, error, trace};

use crate::error::Result;
use crate::source::DatasetOpener;
use crate::types::DatasetMetadata;

/// Exclusive use of an open dataset handle.
///
/// Dropping the lease closes the handle and then releases the access lock.
pub struct DatasetLease<'a, H> {
    // Field order is drop order: the handle closes before the lock opens.
    handle: H,
    _guard: MutexGuard<'a, ()>,
}

impl<H> Deref for DatasetLease<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H> Drop for DatasetLease<'_, H> {
    fn drop(&mut self) {
        trace!("Releasing dataset handle");
    }
}

/// Computed-once dataset metadata.
///
/// Failed computations are not cached; the next caller tries again.
#[derive(Debug, Default)]
pub struct MetadataCache {
    value: OnceLock<DatasetMetadata>,
    init: Mutex<()>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value, if computed.
    pub fn get(&self) -> Option<&DatasetMetadata> {
        self.value.get()
    }

    /// Return the cached value or compute it, at most one computation at a time.
    pub fn get_or_try_init<F>(&self, compute: F) -> Result<&DatasetMetadata>
    where
        F: FnOnce() -> Result<DatasetMetadata>,
    {
        if let Some(metadata) = self.value.get() {
            return Ok(metadata);
        }

        let _init = self.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(metadata) = self.value.get() {
            return Ok(metadata);
        }

        let metadata = compute()?;
        Ok(self.value.get_or_init(|| metadata))
    }
}

/// Owns the dataset opener, the access lock and the metadata cache.
pub struct DatasetManager<O> {
    opener: O,
    access: Mutex<()>,
    metadata: MetadataCache,
}

impl<O: DatasetOpener> DatasetManager<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            access: Mutex::new(()),
            metadata: MetadataCache::new(),
        }
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Wait for exclusive access, then open a handle.
    ///
    /// If opening fails the lock is released before the error is returned.
    pub fn acquire(&self) -> Result<DatasetLease<'_, O::Handle>> {
        // The guarded state is `()`, so a poisoned lock is safe to reuse.
        let guard = self.access.lock().unwrap_or_else(|e| e.into_inner());

        let handle = self.opener.open().map_err(|e| {
            error!(dataset = %self.opener.describe(), error = %e, "Failed to open dataset");
            e
        })?;

        trace!(dataset = %self.opener.describe(), "Acquired dataset handle");
        Ok(DatasetLease {
            handle,
            _guard: guard,
        })
    }

    /// Close the handle and release the lock now rather than at scope end.
    pub fn release(&self, lease: DatasetLease<'_, O::Handle>) {
        drop(lease);
    }

    /// Dataset metadata, computed on first use.
    pub fn metadata(&self) -> Result<&DatasetMetadata> {
        self.metadata.get_or_try_init(|| {
            debug!(dataset = %self.opener.describe(), "Computing dataset metadata");
            self.opener.read_metadata()
        })
    }

    pub fn cached_metadata(&self) -> Option<&DatasetMetadata> {
        self.metadata.get()
    }
}
