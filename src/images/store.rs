//! In-memory image cache
//!
//! Generated images are cached under a minted identifier and served back by a
//! later request. Entries are immutable after insertion and are never evicted;
//! the cache lives until process exit and grows without bound (a known
//! limitation of the gateway).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::{distr::Alphanumeric, Rng};
use tracing::debug;

/// A cached generated image
///
/// The payload is kept base64-encoded as returned by the model; it is decoded
/// when the image is served.
#[derive(Debug, Clone)]
pub struct CachedImage {
    pub data: String,
    pub created_at: DateTime<Utc>,
}

/// Concurrent in-memory image store
///
/// The lock is held only for map operations, never across an await point.
#[derive(Debug, Default)]
pub struct ImageStore {
    entries: RwLock<HashMap<String, CachedImage>>,
}

impl ImageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache an image payload, returning its freshly minted id
    pub fn put(&self, data: String) -> String {
        let id = mint_id();
        let entry = CachedImage {
            data,
            created_at: Utc::now(),
        };
        self.entries.write().insert(id.clone(), entry);
        debug!("cached image {}", id);
        id
    }

    /// Get a cached image by id
    pub fn get(&self, id: &str) -> Option<CachedImage> {
        self.entries.read().get(id).cloned()
    }

    /// Number of cached images
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Mint a practically-unique id: millisecond timestamp plus a random
/// alphanumeric suffix
fn mint_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}
