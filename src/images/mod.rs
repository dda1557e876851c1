//! In-memory image cache

mod store;

pub use store::{CachedImage, ImageStore};
