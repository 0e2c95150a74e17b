#![allow(dead_code)]

use ipacl_rs::{
    AclDecision, AclError, AclOptions, Bypass, CountryTable, InvalidAddressPolicy, IpAcl,
    MmdbCountryLookup, RejectionHandler, RequestContext, Resolution,
};

pub const ESTONIAN_IP: &str = "81.20.150.1";
pub const FINNISH_IP: &str = "193.166.3.2";
pub const US_IP: &str = "8.8.8.8";
pub const UNMAPPED_IP: &str = "10.20.30.40";

pub const COUNTRY_DATABASE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/country-test.mmdb");

pub fn country_table() -> CountryTable {
    CountryTable::try_from_entries([
        ("81.20.0.0/16", "EE"),
        ("2a02:29e8::/32", "EE"),
        ("193.166.0.0/16", "FI"),
        ("8.8.8.0/24", "US"),
        ("2001:4860::/32", "US"),
    ])
    .expect("valid country table")
}

pub fn country_database() -> MmdbCountryLookup {
    MmdbCountryLookup::open(COUNTRY_DATABASE).expect("fixture database opens")
}

#[derive(Default)]
pub struct AclBuilder {
    bypass: Option<Bypass>,
    rejection: Option<RejectionHandler>,
    resolution: Option<Resolution>,
    country: Option<String>,
    invalid_address: Option<InvalidAddressPolicy>,
    table: Option<CountryTable>,
}

impl AclBuilder {
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

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn invalid_address(mut self, policy: InvalidAddressPolicy) -> Self {
        self.invalid_address = Some(policy);
        self
    }

    pub fn table(mut self, table: CountryTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn build(self) -> IpAcl {
        let options = AclOptions {
            bypass: self.bypass,
            rejection: self.rejection,
            resolution: self.resolution,
            country: self.country,
            invalid_address: self.invalid_address,
        };
        IpAcl::with_options(Some(options), self.table.unwrap_or_else(country_table))
            .expect("valid ACL configuration")
    }
}

pub struct RequestBuilder {
    ip: String,
    path: String,
}

impl RequestBuilder {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            path: "/".into(),
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn try_check(self, acl: &IpAcl) -> Result<AclDecision, AclError> {
        let ctx = RequestContext {
            ip: &self.ip,
            path: &self.path,
        };
        acl.check(&ctx)
    }

    pub fn check(self, acl: &IpAcl) -> AclDecision {
        self.try_check(acl).expect("request evaluation should succeed")
    }
}

pub fn acl() -> AclBuilder {
    AclBuilder::new()
}

pub fn request(ip: impl Into<String>) -> RequestBuilder {
    RequestBuilder::new(ip)
}
