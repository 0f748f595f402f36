//! Save/resume support: a minimal serializable position and a file store.

mod format;
mod store;

pub use format::GameSnapshot;
pub use store::SnapshotStore;
