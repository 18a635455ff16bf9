//! CLI command implementations

pub mod sync;
pub mod watch;

pub use sync::SyncCmd;
pub use watch::WatchCmd;
