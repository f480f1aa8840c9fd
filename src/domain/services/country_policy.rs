//! Country Policy - allow/deny precedence rules
//!
//! Pure domain logic: given a resolved country, decide whether the
//! connection goes through. Address classification and database access
//! happen before this point, in the application service.

use crate::domain::entities::{Decision, Denial};
use crate::domain::value_objects::{ClientAddr, CountryCode};
use std::collections::HashSet;

/// A policy with neither list set would allow everything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("please set allowed or denied countries or both")]
    NoCountries,
}

/// Allowed and denied country sets, fixed at construction.
///
/// The sets are not required to be disjoint: a country present in both is
/// denied.
#[derive(Debug, Clone)]
pub struct CountryPolicy {
    allowed: HashSet<CountryCode>,
    denied: HashSet<CountryCode>,
}

impl CountryPolicy {
    pub fn new(
        allowed: impl IntoIterator<Item = CountryCode>,
        denied: impl IntoIterator<Item = CountryCode>,
    ) -> Result<Self, PolicyError> {
        let allowed: HashSet<_> = allowed.into_iter().collect();
        let denied: HashSet<_> = denied.into_iter().collect();

        if allowed.is_empty() && denied.is_empty() {
            return Err(PolicyError::NoCountries);
        }

        Ok(Self { allowed, denied })
    }

    /// Apply the precedence rules to a resolved country:
    /// explicit deny, then explicit allow, then implicit allow when no
    /// allow list is set, otherwise implicit deny.
    pub fn judge(&self, country: &CountryCode, addr: ClientAddr) -> Decision {
        if self.denied.contains(country) {
            return Decision::Deny(Denial::CountryDenied {
                country: country.clone(),
                addr,
            });
        }

        if self.allowed.is_empty() || self.allowed.contains(country) {
            return Decision::Allow;
        }

        Decision::Deny(Denial::CountryNotAllowed {
            country: country.clone(),
            addr,
        })
    }

    pub fn allowed(&self) -> &HashSet<CountryCode> {
        &self.allowed
    }

    pub fn denied(&self) -> &HashSet<CountryCode> {
        &self.denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<CountryCode> {
        list.iter().map(|c| CountryCode::new(*c)).collect()
    }

    fn addr() -> ClientAddr {
        ClientAddr::parse("203.0.113.7").unwrap()
    }

    #[test]
    fn test_new_rejects_empty_policy() {
        let result = CountryPolicy::new(codes(&[]), codes(&[]));
        assert!(matches!(result, Err(PolicyError::NoCountries)));
    }

    #[test]
    fn test_new_accepts_allow_only_and_deny_only() {
        assert!(CountryPolicy::new(codes(&["AU"]), codes(&[])).is_ok());
        assert!(CountryPolicy::new(codes(&[]), codes(&["FR"])).is_ok());
    }

    #[test]
    fn test_new_deduplicates() {
        let policy = CountryPolicy::new(codes(&["AU", "AU", "NZ"]), codes(&["FR"])).unwrap();
        assert_eq!(policy.allowed().len(), 2);
        assert_eq!(policy.denied().len(), 1);
    }

    #[test]
    fn test_allow_list_member_is_allowed() {
        let policy = CountryPolicy::new(codes(&["AU"]), codes(&[])).unwrap();
        assert_eq!(policy.judge(&CountryCode::new("AU"), addr()), Decision::Allow);
    }

    #[test]
    fn test_allow_list_non_member_is_denied() {
        let policy = CountryPolicy::new(codes(&["AU"]), codes(&[])).unwrap();
        let decision = policy.judge(&CountryCode::new("FR"), addr());

        assert!(matches!(
            decision,
            Decision::Deny(Denial::CountryNotAllowed { .. })
        ));
    }

    #[test]
    fn test_deny_list_member_is_denied() {
        let policy = CountryPolicy::new(codes(&[]), codes(&["FR"])).unwrap();
        let decision = policy.judge(&CountryCode::new("FR"), addr());

        assert_eq!(
            decision,
            Decision::Deny(Denial::CountryDenied {
                country: CountryCode::new("FR"),
                addr: addr(),
            })
        );
    }

    #[test]
    fn test_no_allow_list_allows_everything_not_denied() {
        let policy = CountryPolicy::new(codes(&[]), codes(&["FR"])).unwrap();

        for country in ["AU", "US", "DE", "ZZ"] {
            assert_eq!(
                policy.judge(&CountryCode::new(country), addr()),
                Decision::Allow,
                "Failed for country: {}",
                country
            );
        }
    }

    #[test]
    fn test_deny_takes_precedence_over_allow() {
        let policy = CountryPolicy::new(codes(&["FR", "AU"]), codes(&["FR"])).unwrap();
        let decision = policy.judge(&CountryCode::new("FR"), addr());

        assert!(matches!(decision, Decision::Deny(Denial::CountryDenied { .. })));
        assert_eq!(policy.judge(&CountryCode::new("AU"), addr()), Decision::Allow);
    }

    #[test]
    fn test_country_match_is_exact() {
        // database codes are matched as returned, no case folding
        let policy = CountryPolicy::new(codes(&["AU"]), codes(&[])).unwrap();
        assert!(!policy.judge(&CountryCode::new("au"), addr()).is_allowed());
    }

    #[test]
    fn test_policy_error_display() {
        assert_eq!(
            PolicyError::NoCountries.to_string(),
            "please set allowed or denied countries or both"
        );
    }
}
