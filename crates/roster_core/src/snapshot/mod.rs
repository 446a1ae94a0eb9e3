// Model snapshot persistence
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod handle;
pub mod store;

pub use error::SnapshotError;
pub use format::{current_timestamp, decode, encode, ModelSnapshot};
pub use handle::SnapshotHandle;
pub use store::SnapshotStore;

pub const SNAPSHOT_VERSION: u32 = 1;
