use crate::context::RequestContext;
use crate::lookup::CountryLookup;
use crate::options::{AclConfig, InvalidAddressPolicy};
use crate::rejection::{Rejection, RejectionReason};
use crate::resolution::Location;
use crate::result::AclError;

/// Result of the resolution step for a request that was not bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub location: Location,
}

/// The capabilities [`IpAcl`](crate::IpAcl) drives for every request.
///
/// [`AclConfig`] is the stock implementation; implement this trait directly to
/// plug in a policy that does not fit the configuration model.
pub trait AccessPolicy: Send + Sync {
    fn should_bypass(&self, request: &RequestContext<'_>) -> bool;

    fn resolve(
        &self,
        request: &RequestContext<'_>,
        lookup: &dyn CountryLookup,
    ) -> Result<Verdict, AclError>;

    fn on_rejected(&self, request: &RequestContext<'_>, reason: &RejectionReason) -> Rejection;

    fn invalid_address_policy(&self) -> InvalidAddressPolicy {
        InvalidAddressPolicy::default()
    }
}

impl AccessPolicy for AclConfig {
    fn should_bypass(&self, request: &RequestContext<'_>) -> bool {
        self.bypass.should_bypass(request)
    }

    fn resolve(
        &self,
        request: &RequestContext<'_>,
        lookup: &dyn CountryLookup,
    ) -> Result<Verdict, AclError> {
        let location = self.locate(request, lookup)?;
        let allowed = self.resolution.is_allowed(request, &location, self);
        Ok(Verdict { allowed, location })
    }

    fn on_rejected(&self, request: &RequestContext<'_>, reason: &RejectionReason) -> Rejection {
        self.rejection.reject(request, reason)
    }

    fn invalid_address_policy(&self) -> InvalidAddressPolicy {
        self.invalid_address
    }
}
