//! Filesystem storage for video artifacts.
//!
//! `VideoStore` is the single module allowed to touch the upload root:
//! every read, write, and delete of an artifact goes through it, and every
//! stored name is containment-checked before it becomes a path.

mod store;

pub use store::{StorageError, StorageResult, VideoStore};
