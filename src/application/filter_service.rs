//! Filter Service - Main application use case
//!
//! Decides whether a connection from a given address is allowed, based on
//! the country the address resolves to. Owns the database handle and
//! swaps it on reload while evaluations keep running.

use crate::adapters::outbound::MaxMindLoader;
use crate::domain::entities::{Decision, Denial};
use crate::domain::ports::{CountryDatabase, DatabaseError, DatabaseLoader};
use crate::domain::services::CountryPolicy;
use crate::domain::value_objects::{ClientAddr, CountryCode};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Geo filter - main application use case.
///
/// Every path that cannot classify an address ends in `Allow`: unparsable
/// input, private ranges, no database, a miss or a failed lookup.
///
/// Evaluations hold the read lock for the whole "read handle + lookup"
/// step, so a handle is never dropped while a lookup is using it, and each
/// evaluation sees either the old or the new handle, never a mix.
pub struct GeoFilter {
    policy: CountryPolicy,
    loader: Arc<dyn DatabaseLoader>,
    database: RwLock<Option<Arc<dyn CountryDatabase>>>,
}

impl GeoFilter {
    /// Create a filter with no database loaded.
    pub fn new(policy: CountryPolicy, loader: Arc<dyn DatabaseLoader>) -> Self {
        Self {
            policy,
            loader,
            database: RwLock::new(None),
        }
    }

    /// Create a filter that opens MaxMind databases from disk.
    pub fn with_maxmind(policy: CountryPolicy) -> Self {
        Self::new(policy, Arc::new(MaxMindLoader))
    }

    /// Open the database at `path` and make it the active one.
    ///
    /// On failure the current database, if any, stays in service.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
        let path = path.as_ref();

        let db = self.loader.open(path).map_err(|e| {
            tracing::error!("unable to load the database file {}: {}", path.display(), e);
            e
        })?;

        tracing::info!("database loaded from {}: {}", path.display(), db.describe());
        self.install(db);
        Ok(())
    }

    /// Make `db` the active database, dropping the previous one.
    pub fn install(&self, db: Arc<dyn CountryDatabase>) {
        let previous = self.database.write().replace(db);

        // write guard is released, no evaluation can reach `previous` now
        if let Some(previous) = previous {
            let desc = previous.describe();
            drop(previous);
            tracing::debug!("closed previous database {}", desc);
        }
    }

    /// Drop the active database. Calling it again is a no-op.
    ///
    /// Evaluations after this behave as if no database was configured.
    pub fn close(&self) {
        let previous = self.database.write().take();

        if let Some(previous) = previous {
            let desc = previous.describe();
            drop(previous);
            tracing::debug!("closed database {}", desc);
        }
    }

    /// Whether a database is currently loaded.
    pub fn has_database(&self) -> bool {
        self.database.read().is_some()
    }

    pub fn policy(&self) -> &CountryPolicy {
        &self.policy
    }

    /// Decide whether a connection from `remote_addr` is allowed.
    pub fn evaluate(&self, remote_addr: &str) -> Decision {
        let addr = match ClientAddr::parse(remote_addr) {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!("error parsing the provided IP address, the IP will be allowed: {}", e);
                return Decision::Allow;
            }
        };

        if addr.is_private() {
            return Decision::Allow;
        }

        let Some(country) = self.resolve_country(addr) else {
            return Decision::Allow;
        };

        let decision = self.policy.judge(&country, addr);
        if let Decision::Deny(denial) = &decision {
            tracing::debug!("{}", denial);
        }
        decision
    }

    /// Check a connection the way the host's IP filter hook expects:
    /// `Ok(())` to let it through, the denial otherwise.
    ///
    /// The interface name is part of the hook signature but plays no part
    /// in the decision.
    pub fn check_ip(&self, remote_addr: &str, _remote_iface: &str) -> Result<(), Denial> {
        self.evaluate(remote_addr).into_result()
    }

    fn resolve_country(&self, addr: ClientAddr) -> Option<CountryCode> {
        let lookup = {
            let database = self.database.read();
            database.as_ref().map(|db| db.resolve(addr.ip()))
        };

        match lookup {
            Some(Ok(Some(country))) => Some(country),
            Some(Ok(None)) => {
                tracing::warn!("unable to get country for {}, the IP will be allowed", addr);
                None
            }
            Some(Err(e)) => {
                tracing::warn!("unable to lookup the provided IP address, the IP will be allowed: {}", e);
                None
            }
            None => {
                tracing::warn!("no database loaded, the IP {} will be allowed", addr);
                None
            }
        }
    }
}
