use crate::context::RequestContext;
use crate::country::CountryCode;
use crate::options::AclConfig;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

pub type ResolutionPredicateFn =
    dyn for<'a> Fn(&RequestContext<'a>, &Location, &AclConfig) -> bool + Send + Sync;

/// Parsed client address together with the country the lookup reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub address: IpAddr,
    pub country: Option<CountryCode>,
}

/// The allow/deny check run for every request that is not bypassed.
#[derive(Clone, Default)]
pub enum Resolution {
    /// Admit when the resolved country equals [`AclConfig::country`].
    #[default]
    CountryMatch,
    Predicate(Arc<ResolutionPredicateFn>),
}

impl Resolution {
    pub fn country_match() -> Self {
        Self::CountryMatch
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&RequestContext<'a>, &Location, &AclConfig) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn is_allowed(
        &self,
        request: &RequestContext<'_>,
        location: &Location,
        config: &AclConfig,
    ) -> bool {
        match self {
            Resolution::CountryMatch => country_matches(location, config),
            Resolution::Predicate(predicate) => predicate(request, location, config),
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::CountryMatch => f.write_str("CountryMatch"),
            Resolution::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// True iff the resolved country is exactly the configured one. An address
/// without a known country never matches.
pub fn country_matches(location: &Location, config: &AclConfig) -> bool {
    location.country == Some(config.country)
}

#[cfg(test)]
#[path = "resolution_test.rs"]
mod resolution_test;
