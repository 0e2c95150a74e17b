use crate::constants::country;
use crate::context::RequestContext;
use crate::country::CountryCode;
use crate::lookup::CountryLookup;
use crate::options::{AclConfig, AclOptions, InvalidAddressPolicy, ValidationError, resolve_config};
use crate::policy::AccessPolicy;
use crate::rejection::RejectionReason;
use crate::result::{AclDecision, AclError};
use std::sync::Arc;
use tracing::{info, warn};

/// Country-based access check, built once and shared by every request.
#[derive(Clone)]
pub struct IpAcl<P: AccessPolicy = AclConfig> {
    policy: P,
    lookup: Arc<dyn CountryLookup>,
}

impl IpAcl<AclConfig> {
    pub fn new<L>(config: AclConfig, lookup: L) -> Result<Self, ValidationError>
    where
        L: CountryLookup + 'static,
    {
        config.validate()?;
        Ok(Self::with_policy(config, lookup))
    }

    pub fn with_options<L>(options: Option<AclOptions>, lookup: L) -> Result<Self, ValidationError>
    where
        L: CountryLookup + 'static,
    {
        let config = resolve_config(options)?;
        Ok(Self::with_policy(config, lookup))
    }

    pub fn config(&self) -> &AclConfig {
        &self.policy
    }
}

impl<P: AccessPolicy> IpAcl<P> {
    pub fn with_policy<L>(policy: P, lookup: L) -> Self
    where
        L: CountryLookup + 'static,
    {
        Self {
            policy,
            lookup: Arc::new(lookup),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn check(&self, request: &RequestContext<'_>) -> Result<AclDecision, AclError> {
        if self.policy.should_bypass(request) {
            info!(ip = request.ip, "client address bypassed the country check");
            return Ok(AclDecision::Bypassed);
        }

        let verdict = match self.policy.resolve(request, self.lookup.as_ref()) {
            Ok(verdict) => verdict,
            Err(AclError::InvalidAddress { value }) => {
                return self.reject_invalid_address(request, value);
            }
            Err(err) => return Err(err),
        };

        let resolved = verdict.location.country;
        let label = country_label(resolved.as_ref());
        if verdict.allowed {
            info!(ip = request.ip, country = label, "client address allowed");
            return Ok(AclDecision::Allowed { country: resolved });
        }

        info!(
            ip = request.ip,
            country = label,
            "client address is not from an allowed country"
        );
        let reason = RejectionReason::CountryNotAllowed { country: resolved };
        let response = self.policy.on_rejected(request, &reason);
        Ok(AclDecision::Rejected { reason, response })
    }

    fn reject_invalid_address(
        &self,
        request: &RequestContext<'_>,
        value: String,
    ) -> Result<AclDecision, AclError> {
        match self.policy.invalid_address_policy() {
            InvalidAddressPolicy::Fail => {
                warn!(ip = %value, "client address is not a valid IP address");
                Err(AclError::InvalidAddress { value })
            }
            InvalidAddressPolicy::Reject => {
                warn!(ip = %value, "rejecting request with an invalid client address");
                let reason = RejectionReason::InvalidAddress;
                let response = self.policy.on_rejected(request, &reason);
                Ok(AclDecision::Rejected { reason, response })
            }
        }
    }
}

fn country_label(country: Option<&CountryCode>) -> &str {
    country.map_or(country::UNKNOWN, CountryCode::as_str)
}

#[cfg(test)]
#[path = "acl_test.rs"]
mod acl_test;
