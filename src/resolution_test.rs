use super::*;
use std::net::Ipv4Addr;

fn location(country: Option<&str>) -> Location {
    Location {
        address: IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)),
        country: country.map(|value| value.parse().expect("valid country code")),
    }
}

mod country_matches {
    use super::*;

    #[test]
    fn when_country_equals_configured_should_return_true() {
        // Arrange
        let config = AclConfig::default();

        // Act & Assert
        assert!(super::super::country_matches(&location(Some("EE")), &config));
    }

    #[test]
    fn when_country_differs_should_return_false() {
        // Arrange
        let config = AclConfig::default();

        // Act & Assert
        assert!(!super::super::country_matches(&location(Some("US")), &config));
    }

    #[test]
    fn when_country_unknown_should_return_false() {
        // Arrange
        let config = AclConfig::default();

        // Act & Assert
        assert!(!super::super::country_matches(&location(None), &config));
    }
}

mod resolution {
    use super::*;

    #[test]
    fn when_default_should_use_country_match() {
        // Arrange
        let resolution = Resolution::default();
        let config = AclConfig::default();
        let request = RequestContext::new("198.51.100.7");

        // Act & Assert
        assert!(resolution.is_allowed(&request, &location(Some("EE")), &config));
        assert!(!resolution.is_allowed(&request, &location(Some("FI")), &config));
    }

    #[test]
    fn when_predicate_should_override_country_match() {
        // Arrange
        let resolution = Resolution::predicate(|_, location, _| location.country.is_none());
        let config = AclConfig::default();
        let request = RequestContext::new("198.51.100.7");

        // Act & Assert
        assert!(resolution.is_allowed(&request, &location(None), &config));
        assert!(!resolution.is_allowed(&request, &location(Some("EE")), &config));
        assert_eq!(format!("{resolution:?}"), "Predicate(..)");
    }
}
