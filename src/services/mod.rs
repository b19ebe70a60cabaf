// Service exports
pub mod dataset;
pub mod snapshot;

pub use dataset::{load_dataset, parse_dataset, DatasetError};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError, SNAPSHOT_FORMAT_VERSION};
