//! geoip-filter Library
//!
//! Country based allow/deny decisions for incoming connections, backed by
//! a MaxMind database that can be reloaded while checks are running.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{CheckResponse, CheckServer};
pub use adapters::outbound::{MaxMindCountryDatabase, MaxMindLoader};
pub use application::GeoFilter;
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{Decision, Denial};
pub use domain::ports::{CountryDatabase, DatabaseError, DatabaseLoader, LookupError};
pub use domain::services::{CountryPolicy, PolicyError};
pub use domain::value_objects::{AddressParseError, ClientAddr, CountryCode};
pub use infrastructure::DatabaseWatcher;
