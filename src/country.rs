use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Two-letter ISO 3166-1 alpha-2 country code.
///
/// Stored inline so lookups and comparisons never allocate. Only uppercase
/// ASCII letters are accepted, which keeps comparisons case-sensitive and exact.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{0}' is not a two-letter uppercase ISO 3166-1 country code")]
pub struct InvalidCountryCode(pub String);

impl CountryCode {
    /// Estonia, allowed when no country is configured.
    pub const DEFAULT: CountryCode = CountryCode(*b"EE");

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for CountryCode {
    type Err = InvalidCountryCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidCountryCode(value.to_string()));
        }

        Ok(Self([bytes[0], bytes[1]]))
    }
}

impl TryFrom<&str> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialEq<str> for CountryCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for CountryCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CountryCode").field(&self.as_str()).finish()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "country_test.rs"]
mod country_test;
