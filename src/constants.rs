pub mod address {
    pub const LOOPBACK_V4: &str = "127.0.0.1";
}

pub mod country {
    pub const DEFAULT: &str = "EE";
    /// Placeholder reported in log events when no country is known for an address.
    pub const UNKNOWN: &str = "--";
}

pub mod status {
    use std::ops::RangeInclusive;

    pub const GATEWAY_TIMEOUT: u16 = 504;
    /// Statuses a rejection handler may respond with.
    pub const ERROR_RANGE: RangeInclusive<u16> = 400..=599;
}
