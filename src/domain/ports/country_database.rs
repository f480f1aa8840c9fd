//! Country Database Port
//!
//! Defines the interface for resolving IP addresses to countries and for
//! opening the database that backs those lookups.

use crate::domain::value_objects::CountryCode;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The database could not be opened.
///
/// Returned by startup and reload; the engine keeps whatever handle it had.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("database file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unable to load database {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// A lookup failed for a reason other than "address not present".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lookup failed for {ip}: {reason}")]
pub struct LookupError {
    pub ip: IpAddr,
    pub reason: String,
}

/// An opened, queryable geolocation database.
///
/// This is an outbound port that abstracts the MaxMind reader. Dropping the
/// value closes the database.
pub trait CountryDatabase: Send + Sync {
    /// Resolve an IP address to its country.
    ///
    /// `Ok(None)` is a miss: the address is not in the database, or its
    /// record carries no country code.
    fn resolve(&self, ip: IpAddr) -> Result<Option<CountryCode>, LookupError>;

    /// Short description of the database for log lines.
    fn describe(&self) -> String;
}

/// Opens databases by path.
///
/// The engine goes through this port on every reload so tests can swap in
/// databases without touching the filesystem.
pub trait DatabaseLoader: Send + Sync {
    fn open(&self, path: &Path) -> Result<Arc<dyn CountryDatabase>, DatabaseError>;
}
