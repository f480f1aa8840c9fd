mod country_policy;

pub use country_policy::{CountryPolicy, PolicyError};
