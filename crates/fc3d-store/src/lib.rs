//! Storage layer: whole-document JSON snapshots on the local filesystem.

mod error;
pub use error::StoreError;

mod json;
pub use json::{PersistSummary, SnapshotStore, StoreConfig};
pub use json::{DEFAULT_DIR, DEFAULT_LATEST_FILE, DEFAULT_SNAPSHOT_FILE};
