//! Infrastructure Layer
//!
//! Cross-cutting concerns: database hot reload and process signals.

pub mod db_watcher;
pub mod shutdown;

pub use db_watcher::DatabaseWatcher;
pub use shutdown::shutdown_signal;
