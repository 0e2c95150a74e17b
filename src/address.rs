use crate::result::AclError;
use std::net::IpAddr;

/// Parse the client address reported by the host framework.
///
/// Accepts the forms frameworks commonly hand over besides a bare address:
/// surrounding whitespace, a bracketed IPv6 literal and an IPv6 zone suffix
/// (`fe80::1%eth0`). IPv4-mapped IPv6 addresses are canonicalised to IPv4 so
/// lookups and network matchers see the same address family.
pub fn parse_client_ip(value: &str) -> Result<IpAddr, AclError> {
    let trimmed = value.trim();
    let unbracketed = trimmed
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(trimmed);
    let without_zone = match unbracketed.split_once('%') {
        Some((address, zone)) if !zone.is_empty() && address.contains(':') => address,
        _ => unbracketed,
    };

    let address: IpAddr = without_zone
        .parse()
        .map_err(|_| AclError::invalid_address(value))?;

    Ok(canonicalize(address))
}

fn canonicalize(address: IpAddr) -> IpAddr {
    match address {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

#[cfg(test)]
#[path = "address_test.rs"]
mod address_test;
