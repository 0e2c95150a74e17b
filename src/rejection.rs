use crate::constants::status;
use crate::context::RequestContext;
use crate::country::CountryCode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Headers = HashMap<String, String>;

pub type RejectionFn =
    dyn for<'a> Fn(&RequestContext<'a>, &RejectionReason) -> Rejection + Send + Sync;

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The resolution predicate returned false. `country` is what the lookup
    /// reported for the client address, if anything.
    CountryNotAllowed { country: Option<CountryCode> },
    /// The client address could not be parsed.
    InvalidAddress,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::CountryNotAllowed { country: Some(country) } => {
                write!(f, "country {country} is not allowed")
            }
            RejectionReason::CountryNotAllowed { country: None } => {
                f.write_str("country could not be determined")
            }
            RejectionReason::InvalidAddress => f.write_str("client address is invalid"),
        }
    }
}

/// Framework-neutral terminal response for a denied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<String>,
}

impl Rejection {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body<B: Into<String>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Produces the response returned when a request is denied.
#[derive(Clone)]
pub enum RejectionHandler {
    /// Respond with a bare status code.
    Status(u16),
    Custom(Arc<RejectionFn>),
}

impl Default for RejectionHandler {
    fn default() -> Self {
        Self::Status(status::GATEWAY_TIMEOUT)
    }
}

impl RejectionHandler {
    pub fn status(status: u16) -> Self {
        Self::Status(status)
    }

    pub fn custom<F>(handler: F) -> Self
    where
        F: for<'a> Fn(&RequestContext<'a>, &RejectionReason) -> Rejection + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(handler))
    }

    pub fn reject(&self, request: &RequestContext<'_>, reason: &RejectionReason) -> Rejection {
        match self {
            RejectionHandler::Status(status) => Rejection::status(*status),
            RejectionHandler::Custom(handler) => handler(request, reason),
        }
    }
}

impl fmt::Debug for RejectionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionHandler::Status(status) => f.debug_tuple("Status").field(status).finish(),
            RejectionHandler::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
#[path = "rejection_test.rs"]
mod rejection_test;
