//! Domain Layer
//!
//! Decision types, country policy and the ports the application
//! service depends on.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
