//! Domain Entities - Core business objects
//!
//! These entities represent the outcome of a filtering decision.
//! They have no external dependencies and contain only business logic.

use crate::domain::value_objects::{ClientAddr, CountryCode};

/// Why a connection was refused.
///
/// The display form is the message handed back to the host, so it names
/// both the country and the offending address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// The country is on the deny list.
    #[error("country {country} is denied, ip {addr}")]
    CountryDenied {
        country: CountryCode,
        addr: ClientAddr,
    },
    /// An allow list is configured and the country is not on it.
    #[error("country {country} is not in the allow list, ip {addr}")]
    CountryNotAllowed {
        country: CountryCode,
        addr: ClientAddr,
    },
}

impl Denial {
    pub fn country(&self) -> &CountryCode {
        match self {
            Self::CountryDenied { country, .. } | Self::CountryNotAllowed { country, .. } => {
                country
            }
        }
    }

    pub fn addr(&self) -> ClientAddr {
        match self {
            Self::CountryDenied { addr, .. } | Self::CountryNotAllowed { addr, .. } => *addr,
        }
    }
}

/// Result of evaluating a single connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert into the `Result` shape used at the transport boundary.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(denial) => Err(denial),
        }
    }
}
