use std::env;
use std::sync::Arc;

use ipacl_rs::constants::address;
use ipacl_rs::{
    AclOptions, Bypass, CountryCode, CountryTable, IpAcl, MmdbCountryLookup, RejectionHandler,
};

pub const HEALTH_PATH: &str = "/healthz";

pub type SharedAcl = Arc<IpAcl>;

#[derive(Clone)]
pub struct AppState {
    pub acl: SharedAcl,
}

/// Country the ACL admitted the request for, stored in the request extensions.
#[derive(Clone, Copy, Debug)]
pub struct Visitor {
    pub country: Option<CountryCode>,
}

pub fn build_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let options = AclOptions::new()
        .country(env::var("IPACL_COUNTRY").unwrap_or_default())
        .bypass(Bypass::predicate(|request| {
            request.ip == address::LOOPBACK_V4 || request.path == HEALTH_PATH
        }))
        .rejection(RejectionHandler::status(403));

    let acl = match env::var("IPACL_MMDB") {
        Ok(path) => IpAcl::with_options(Some(options), MmdbCountryLookup::open(path)?)?,
        Err(_) => IpAcl::with_options(Some(options), demo_table()?)?,
    };

    Ok(AppState { acl: Arc::new(acl) })
}

fn demo_table() -> Result<CountryTable, ipacl_rs::TableError> {
    CountryTable::try_from_entries([("81.20.0.0/16", "EE"), ("193.166.0.0/16", "FI")])
}

pub mod middleware;
