use crate::country::{CountryCode, InvalidCountryCode};
use indexmap::IndexMap;
use ipnet::IpNet;
use maxminddb::{MaxMindDBError, geoip2};
use std::cmp::Reverse;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Source of IP-to-country resolution.
///
/// `Ok(None)` means the address is known not to belong to any country in the
/// backing data (private ranges, loopback, missing records). `Err` is reserved
/// for failures of the backend itself.
pub trait CountryLookup: Send + Sync {
    fn lookup(&self, address: IpAddr) -> Result<Option<CountryCode>, LookupError>;
}

impl<F> CountryLookup for F
where
    F: Fn(IpAddr) -> Option<CountryCode> + Send + Sync,
{
    fn lookup(&self, address: IpAddr) -> Result<Option<CountryCode>, LookupError> {
        Ok(self(address))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("failed to read geoip database '{path}': {message}")]
    Open { path: String, message: String },
    #[error("geoip database error: {message}")]
    Database { message: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("'{0}' is neither an IP network nor an IP address")]
    InvalidNetwork(String),
    #[error(transparent)]
    InvalidCountry(#[from] InvalidCountryCode),
}

/// In-memory table of networks to countries.
///
/// The most specific network containing an address wins; between networks of
/// equal prefix length the one inserted first wins.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    networks: IndexMap<IpNet, CountryCode>,
}

impl CountryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from textual `(network, country)` pairs. A bare address is
    /// treated as a single-host network.
    pub fn try_from_entries<I, N, C>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut table = Self::new();
        for (network, country) in entries {
            let network = parse_network(network.as_ref())?;
            let country = country.as_ref().parse::<CountryCode>()?;
            table.insert(network, country);
        }
        Ok(table)
    }

    /// Insert or replace the country for `network`. A replaced entry keeps its
    /// original position.
    pub fn insert(&mut self, network: IpNet, country: CountryCode) -> Option<CountryCode> {
        self.networks.insert(network.trunc(), country)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IpNet, &CountryCode)> {
        self.networks.iter()
    }

    pub fn country_of(&self, address: IpAddr) -> Option<CountryCode> {
        self.networks
            .iter()
            .filter(|(network, _)| network.contains(&address))
            .min_by_key(|(network, _)| Reverse(network.prefix_len()))
            .map(|(_, country)| *country)
    }
}

impl FromIterator<(IpNet, CountryCode)> for CountryTable {
    fn from_iter<T: IntoIterator<Item = (IpNet, CountryCode)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (network, country) in iter {
            table.insert(network, country);
        }
        table
    }
}

impl CountryLookup for CountryTable {
    fn lookup(&self, address: IpAddr) -> Result<Option<CountryCode>, LookupError> {
        Ok(self.country_of(address))
    }
}

fn parse_network(value: &str) -> Result<IpNet, TableError> {
    let value = value.trim();
    if let Ok(network) = value.parse::<IpNet>() {
        return Ok(network);
    }
    value
        .parse::<IpAddr>()
        .map(IpNet::from)
        .map_err(|_| TableError::InvalidNetwork(value.to_string()))
}

/// Country lookup backed by a MaxMind-format (`.mmdb`) database such as
/// GeoLite2-Country or DB-IP Country Lite.
pub struct MmdbCountryLookup {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl MmdbCountryLookup {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| LookupError::Open {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let lookup = Self::from_bytes(bytes)?;
        debug!(
            path = %path.display(),
            database_type = lookup.database_type(),
            "geoip database loaded"
        );
        Ok(lookup)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LookupError> {
        let reader = maxminddb::Reader::from_source(bytes).map_err(database_error)?;
        Ok(Self { reader })
    }

    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl CountryLookup for MmdbCountryLookup {
    fn lookup(&self, address: IpAddr) -> Result<Option<CountryCode>, LookupError> {
        if address.is_loopback() || address.is_multicast() || address.is_unspecified() {
            return Ok(None);
        }

        match self.reader.lookup::<geoip2::Country>(address) {
            Ok(record) => {
                let iso_code = record
                    .country
                    .and_then(|country| country.iso_code)
                    .or_else(|| record.registered_country.and_then(|country| country.iso_code));
                Ok(iso_code.and_then(|code| code.parse().ok()))
            }
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                debug!(%address, "address not found in geoip database");
                Ok(None)
            }
            Err(err) => Err(database_error(err)),
        }
    }
}

fn database_error(err: MaxMindDBError) -> LookupError {
    LookupError::Database {
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "lookup_test.rs"]
mod lookup_test;
