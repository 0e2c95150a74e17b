use crate::address::parse_client_ip;
use crate::constants::address;
use crate::context::RequestContext;
use ipnet::IpNet;
use regex_automata::meta::{BuildError, Regex};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type BypassPredicateFn = dyn for<'a> Fn(&RequestContext<'a>) -> bool + Send + Sync;

/// Decides whether the country check is skipped entirely for a request.
#[derive(Clone, Default)]
pub enum Bypass {
    /// Skip the check when the client IP is exactly `127.0.0.1`.
    #[default]
    Loopback,
    Never,
    List(Vec<AddressMatcher>),
    Predicate(Arc<BypassPredicateFn>),
}

#[derive(Debug)]
pub enum PatternError {
    Build(Box<BuildError>),
    Timeout { elapsed: Duration, budget: Duration },
    TooLong { length: usize, max: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Build(_) => write!(f, "failed to compile address pattern"),
            PatternError::Timeout { .. } => {
                write!(f, "compiling address pattern exceeded the configured budget")
            }
            PatternError::TooLong { length, max } => write!(
                f,
                "address pattern length {} exceeds maximum allowed {}",
                length, max
            ),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Build(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

const PATTERN_COMPILE_BUDGET: Duration = Duration::from_millis(100);
const MAX_PATTERN_LENGTH: usize = 4_096;

/// A single entry of a [`Bypass::List`].
///
/// `Exact` and `Pattern` compare against the raw IP string the framework
/// reported; `Network` parses it first and never matches an unparseable value.
#[derive(Clone)]
pub enum AddressMatcher {
    Exact(String),
    Network(IpNet),
    Pattern(Regex),
    Bool(bool),
}

impl AddressMatcher {
    pub fn exact<S: Into<String>>(value: S) -> Self {
        Self::Exact(value.into())
    }

    pub fn network(network: IpNet) -> Self {
        Self::Network(network.trunc())
    }

    pub fn pattern(regex: Regex) -> Self {
        Self::Pattern(regex)
    }

    pub fn pattern_str(pattern: &str) -> Result<Self, PatternError> {
        Self::compile_pattern(pattern, PATTERN_COMPILE_BUDGET).map(Self::Pattern)
    }

    fn compile_pattern(pattern: &str, budget: Duration) -> Result<Regex, PatternError> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                length: pattern.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let started = Instant::now();
        let regex = Regex::new(pattern).map_err(|err| PatternError::Build(Box::new(err)))?;
        let elapsed = started.elapsed();
        if elapsed > budget {
            return Err(PatternError::Timeout { elapsed, budget });
        }

        Ok(regex)
    }

    #[cfg(test)]
    pub(crate) fn pattern_str_with_budget(
        pattern: &str,
        budget: Duration,
    ) -> Result<Self, PatternError> {
        Self::compile_pattern(pattern, budget).map(Self::Pattern)
    }

    pub fn matches(&self, ip: &str) -> bool {
        match self {
            AddressMatcher::Exact(value) => value == ip,
            AddressMatcher::Network(network) => parse_client_ip(ip)
                .map(|address| network.contains(&address))
                .unwrap_or(false),
            AddressMatcher::Pattern(regex) => regex.is_match(ip.as_bytes()),
            AddressMatcher::Bool(value) => *value,
        }
    }
}

impl From<String> for AddressMatcher {
    fn from(value: String) -> Self {
        AddressMatcher::Exact(value)
    }
}

impl From<&str> for AddressMatcher {
    fn from(value: &str) -> Self {
        AddressMatcher::Exact(value.to_owned())
    }
}

impl From<IpNet> for AddressMatcher {
    fn from(value: IpNet) -> Self {
        AddressMatcher::network(value)
    }
}

impl From<bool> for AddressMatcher {
    fn from(value: bool) -> Self {
        AddressMatcher::Bool(value)
    }
}

impl Bypass {
    pub fn loopback() -> Self {
        Self::Loopback
    }

    pub fn never() -> Self {
        Self::Never
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AddressMatcher>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&RequestContext<'a>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn should_bypass(&self, request: &RequestContext<'_>) -> bool {
        match self {
            Bypass::Loopback => request.ip == address::LOOPBACK_V4,
            Bypass::Never => false,
            Bypass::List(matchers) => matchers.iter().any(|matcher| matcher.matches(request.ip)),
            Bypass::Predicate(predicate) => predicate(request),
        }
    }
}

impl fmt::Debug for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bypass::Loopback => f.write_str("Loopback"),
            Bypass::Never => f.write_str("Never"),
            Bypass::List(matchers) => f.debug_tuple("List").field(&matchers.len()).finish(),
            Bypass::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
#[path = "bypass_test.rs"]
mod bypass_test;
