mod maxmind_country_db;

pub use maxmind_country_db::{MaxMindCountryDatabase, MaxMindLoader};
