use crate::country::CountryCode;
use crate::lookup::LookupError;
use crate::rejection::{Rejection, RejectionReason};
use thiserror::Error;

/// Outcome of evaluating a single request.
#[derive(Debug, Clone)]
pub enum AclDecision {
    /// The bypass predicate matched; the country check never ran.
    Bypassed,
    /// The resolution predicate admitted the request.
    Allowed { country: Option<CountryCode> },
    /// The request is denied and `response` is the terminal response for it.
    Rejected {
        reason: RejectionReason,
        response: Rejection,
    },
}

impl AclDecision {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, AclDecision::Rejected { .. })
    }
}

/// Errors that can be produced while evaluating a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("client address '{value}' is not a valid IP address")]
    InvalidAddress { value: String },
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl AclError {
    pub(crate) fn invalid_address(value: &str) -> Self {
        Self::InvalidAddress {
            value: value.to_string(),
        }
    }
}
