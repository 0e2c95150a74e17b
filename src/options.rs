use crate::address::parse_client_ip;
use crate::bypass::Bypass;
use crate::constants::status;
use crate::context::RequestContext;
use crate::country::{CountryCode, InvalidCountryCode};
use crate::lookup::CountryLookup;
use crate::rejection::RejectionHandler;
use crate::resolution::{Location, Resolution};
use crate::result::AclError;
use thiserror::Error;

/// What to do with a request whose client address cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidAddressPolicy {
    /// Deny through the rejection handler with [`RejectionReason::InvalidAddress`].
    ///
    /// [`RejectionReason::InvalidAddress`]: crate::RejectionReason::InvalidAddress
    #[default]
    Reject,
    /// Surface [`AclError::InvalidAddress`] to the caller.
    Fail,
}

/// User-supplied configuration. Every field left as `None` is filled with its
/// default by [`AclOptions::resolve`].
#[derive(Debug, Clone, Default)]
pub struct AclOptions {
    pub bypass: Option<Bypass>,
    pub rejection: Option<RejectionHandler>,
    pub resolution: Option<Resolution>,
    pub country: Option<String>,
    pub invalid_address: Option<InvalidAddressPolicy>,
}

/// Fully populated, validated configuration shared by every request.
#[derive(Debug, Clone)]
pub struct AclConfig {
    pub bypass: Bypass,
    pub rejection: RejectionHandler,
    pub resolution: Resolution,
    pub country: CountryCode,
    pub invalid_address: InvalidAddressPolicy,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    InvalidCountryCode(#[from] InvalidCountryCode),
    #[error("rejection status {0} must be a client or server error status (400-599)")]
    InvalidRejectionStatus(u16),
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            bypass: Bypass::default(),
            rejection: RejectionHandler::default(),
            resolution: Resolution::default(),
            country: CountryCode::DEFAULT,
            invalid_address: InvalidAddressPolicy::default(),
        }
    }
}

/// Resolve zero or one set of options into a complete configuration.
///
/// `None` yields [`AclConfig::default`] untouched.
pub fn resolve_config(options: Option<AclOptions>) -> Result<AclConfig, ValidationError> {
    match options {
        None => Ok(AclConfig::default()),
        Some(options) => options.resolve(),
    }
}

impl AclOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bypass(mut self, bypass: Bypass) -> Self {
        self.bypass = Some(bypass);
        self
    }

    pub fn rejection(mut self, rejection: RejectionHandler) -> Self {
        self.rejection = Some(rejection);
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn invalid_address(mut self, policy: InvalidAddressPolicy) -> Self {
        self.invalid_address = Some(policy);
        self
    }

    /// Fill every unset field with its default and validate the result. An
    /// empty or whitespace-only country counts as unset; any other value is
    /// parsed as given, so surrounding whitespace is rejected.
    pub fn resolve(self) -> Result<AclConfig, ValidationError> {
        let AclConfig {
            bypass: default_bypass,
            rejection: default_rejection,
            resolution: default_resolution,
            country: default_country,
            invalid_address: default_invalid_address,
        } = AclConfig::default();

        let country = match self.country.as_deref() {
            Some(value) if !value.trim().is_empty() => value.parse::<CountryCode>()?,
            _ => default_country,
        };

        let config = AclConfig {
            bypass: self.bypass.unwrap_or(default_bypass),
            rejection: self.rejection.unwrap_or(default_rejection),
            resolution: self.resolution.unwrap_or(default_resolution),
            country,
            invalid_address: self.invalid_address.unwrap_or(default_invalid_address),
        };
        config.validate()?;
        Ok(config)
    }
}

impl AclConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let RejectionHandler::Status(code) = self.rejection
            && !status::ERROR_RANGE.contains(&code)
        {
            return Err(ValidationError::InvalidRejectionStatus(code));
        }

        Ok(())
    }

    /// Parse the request's client address and look up its country.
    pub fn locate(
        &self,
        request: &RequestContext<'_>,
        lookup: &dyn CountryLookup,
    ) -> Result<Location, AclError> {
        let address = parse_client_ip(request.ip)?;
        let country = lookup.lookup(address)?;
        Ok(Location { address, country })
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;
