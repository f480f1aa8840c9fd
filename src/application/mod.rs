//! Application Layer
//!
//! Use cases that orchestrate the domain: the geo filter itself.

mod filter_service;

pub use filter_service::GeoFilter;
