mod country_database;

pub use country_database::{CountryDatabase, DatabaseError, DatabaseLoader, LookupError};
