//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// ISO 3166-1 alpha-2 country code.
///
/// Codes coming out of the database are kept exactly as returned; there is
/// no check against a list of known countries. A code that never shows up
/// in the database simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Wrap a code returned by the geo database.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Normalize an operator supplied code (`" fr "` -> `"FR"`).
    ///
    /// Returns None for blank input.
    pub fn from_config(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote address that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid IP address {input:?}")]
pub struct AddressParseError {
    pub input: String,
}

/// A client address as seen on an incoming connection.
///
/// Parsing strips any zone/scope suffix (`fe80::1%eth0`) and unwraps
/// IPv4-mapped IPv6 addresses, so `ip()` is always the address that gets
/// classified and looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientAddr {
    ip: IpAddr,
}

impl ClientAddr {
    /// Parse a textual address, with or without a zone suffix.
    pub fn parse(input: &str) -> Result<Self, AddressParseError> {
        let err = || AddressParseError {
            input: input.to_string(),
        };

        let (addr, zone) = match input.split_once('%') {
            Some((addr, zone)) => (addr, Some(zone)),
            None => (input, None),
        };

        let ip: IpAddr = addr.parse().map_err(|_| err())?;

        // zones only exist for IPv6 and must name something
        if let Some(zone) = zone {
            if zone.is_empty() || ip.is_ipv4() {
                return Err(err());
            }
        }

        Ok(Self {
            ip: ip.to_canonical(),
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Whether the address belongs to a range that is never geo-filtered:
    /// RFC1918, unique-local IPv6, loopback and link-local.
    pub fn is_private(&self) -> bool {
        match self.ip {
            IpAddr::V4(v4) => is_private_v4(v4),
            IpAddr::V6(v6) => is_private_v6(v6),
        }
    }
}

impl From<IpAddr> for ClientAddr {
    fn from(ip: IpAddr) -> Self {
        Self {
            ip: ip.to_canonical(),
        }
    }
}

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_private() || ip.is_loopback() || ip.is_link_local()
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    // fc00::/7
    let unique_local = (first & 0xfe00) == 0xfc00;
    // fe80::/10
    let link_local = (first & 0xffc0) == 0xfe80;

    unique_local || link_local || ip.is_loopback()
}
