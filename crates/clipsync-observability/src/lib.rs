//! Clipsync Observability Module
//!
//! Structured logging and end-user notification for clipsync.
//!
//! # Features
//!
//! - **Multiple Output Formats**: Pretty, JSON, and compact output formats
//! - **Environment-based Filtering**: Dynamic log level control via `RUST_LOG`
//! - **Desktop Notifications**: Fire-and-forget toast notifications for
//!   mount/commit outcomes
//!
//! # Example
//!
//! ```ignore
//! use clipsync_observability::{init_tracing, LogFormat};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing(LogFormat::Pretty, None)?;
//!     tracing::info!("watcher started");
//! }
//! ```

pub mod config;
pub mod init;
pub mod notify;

pub use config::{LogConfig, LogError, LogFormat};
pub use init::{init_tracing, init_tracing_with_config};
pub use notify::Notifier;

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level};
