mod acl;
mod address;
mod bypass;
pub mod constants;
mod context;
mod country;
mod lookup;
mod options;
mod policy;
mod rejection;
mod resolution;
mod result;

pub use acl::IpAcl;
pub use address::parse_client_ip;
pub use bypass::{AddressMatcher, Bypass, BypassPredicateFn, PatternError};
pub use context::RequestContext;
pub use country::{CountryCode, InvalidCountryCode};
pub use lookup::{CountryLookup, CountryTable, LookupError, MmdbCountryLookup, TableError};
pub use options::{AclConfig, AclOptions, InvalidAddressPolicy, ValidationError, resolve_config};
pub use policy::{AccessPolicy, Verdict};
pub use rejection::{Headers, Rejection, RejectionFn, RejectionHandler, RejectionReason};
pub use resolution::{Location, Resolution, ResolutionPredicateFn, country_matches};
pub use result::{AclDecision, AclError};
