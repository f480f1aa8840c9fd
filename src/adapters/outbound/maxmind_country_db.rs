//! MaxMind Country Database
//!
//! Implements CountryDatabase using a MaxMind GeoLite2/GeoIP2 database.

use crate::domain::ports::{CountryDatabase, DatabaseError, DatabaseLoader, LookupError};
use crate::domain::value_objects::CountryCode;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// MaxMind country database.
///
/// The whole file is read into memory on open; every lookup walks the
/// in-memory search tree, nothing is cached on top of it.
pub struct MaxMindCountryDatabase {
    reader: Reader<Vec<u8>>,
}

impl MaxMindCountryDatabase {
    /// Load a database from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatabaseError::NotFound(path.to_path_buf()));
        }

        let reader = Reader::open_readfile(path).map_err(|e| DatabaseError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self { reader })
    }

    /// Load a database from an in-memory buffer.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Self, DatabaseError> {
        let reader = Reader::from_source(buf).map_err(|e| DatabaseError::Invalid {
            path: "<memory>".into(),
            reason: e.to_string(),
        })?;

        Ok(Self { reader })
    }
}

impl CountryDatabase for MaxMindCountryDatabase {
    fn resolve(&self, ip: IpAddr) -> Result<Option<CountryCode>, LookupError> {
        #[derive(Debug, Deserialize)]
        struct Country {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct CountryRecord {
            country: Option<Country>,
        }

        match self.reader.lookup::<CountryRecord>(ip) {
            Ok(record) => Ok(record
                .country
                .and_then(|c| c.iso_code)
                .filter(|iso| !iso.is_empty())
                .map(CountryCode::new)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => Err(LookupError {
                ip,
                reason: e.to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        let meta = &self.reader.metadata;
        format!("{} (build {})", meta.database_type, meta.build_epoch)
    }
}

/// Opens MaxMind databases from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMindLoader;

impl DatabaseLoader for MaxMindLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn CountryDatabase>, DatabaseError> {
        let db = MaxMindCountryDatabase::open(path)?;
        Ok(Arc::new(db))
    }
}
