use std::env;
use std::sync::Arc;

use ipacl_rs::constants::address;
use ipacl_rs::{AclOptions, Bypass, CountryCode, CountryTable, IpAcl, MmdbCountryLookup};

pub const HEALTH_PATH: &str = "/healthz";

pub type SharedAcl = Arc<IpAcl>;
pub type SharedAppState = Arc<AppState>;

#[derive(Clone)]
pub struct AppState {
    pub acl: SharedAcl,
}

/// Country the ACL admitted the request for, stored in the request extensions.
#[derive(Clone, Copy, Debug)]
pub struct Visitor {
    pub country: Option<CountryCode>,
}

pub fn build_state() -> Result<SharedAppState, Box<dyn std::error::Error + Send + Sync>> {
    let options = AclOptions::new()
        .country(env::var("IPACL_COUNTRY").unwrap_or_default())
        .bypass(Bypass::predicate(|request| {
            request.ip == address::LOOPBACK_V4 || request.path == HEALTH_PATH
        }));

    let acl = match env::var("IPACL_MMDB") {
        Ok(path) => IpAcl::with_options(Some(options), MmdbCountryLookup::open(path)?)?,
        Err(_) => IpAcl::with_options(
            Some(options),
            CountryTable::try_from_entries([("81.20.0.0/16", "EE"), ("193.166.0.0/16", "FI")])?,
        )?,
    };

    Ok(Arc::new(AppState { acl: Arc::new(acl) }))
}

pub mod middleware;
