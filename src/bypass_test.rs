use super::*;

fn request(ip: &'static str) -> RequestContext<'static> {
    RequestContext::new(ip)
}

mod bypass {
    use super::*;

    mod loopback {
        use super::*;

        #[test]
        fn when_ip_is_ipv4_loopback_should_bypass() {
            // Arrange
            let bypass = Bypass::default();

            // Act & Assert
            assert!(bypass.should_bypass(&request("127.0.0.1")));
        }

        #[test]
        fn when_ip_is_other_loopback_form_should_not_bypass() {
            // Arrange
            let bypass = Bypass::loopback();

            // Act & Assert
            assert!(!bypass.should_bypass(&request("::1")));
            assert!(!bypass.should_bypass(&request("127.0.0.2")));
            assert!(!bypass.should_bypass(&request(" 127.0.0.1")));
        }
    }

    mod never {
        use super::*;

        #[test]
        fn when_ip_is_loopback_should_still_not_bypass() {
            // Arrange
            let bypass = Bypass::never();

            // Act & Assert
            assert!(!bypass.should_bypass(&request("127.0.0.1")));
        }
    }

    mod list {
        use super::*;

        #[test]
        fn when_any_matcher_matches_should_bypass() {
            // Arrange
            let bypass = Bypass::list([
                AddressMatcher::exact("203.0.113.9"),
                AddressMatcher::network("10.0.0.0/8".parse().expect("valid network")),
            ]);

            // Act & Assert
            assert!(bypass.should_bypass(&request("203.0.113.9")));
            assert!(bypass.should_bypass(&request("10.20.30.40")));
            assert!(!bypass.should_bypass(&request("192.0.2.1")));
        }

        #[test]
        fn when_list_empty_should_not_bypass() {
            // Arrange
            let bypass = Bypass::list(Vec::<AddressMatcher>::new());

            // Act & Assert
            assert!(!bypass.should_bypass(&request("127.0.0.1")));
        }
    }

    mod predicate {
        use super::*;

        #[test]
        fn when_predicate_uses_path_should_bypass_matching_requests() {
            // Arrange
            let bypass = Bypass::predicate(|request| request.path == "/healthz");

            // Act & Assert
            assert!(bypass.should_bypass(&request("8.8.8.8").with_path("/healthz")));
            assert!(!bypass.should_bypass(&request("8.8.8.8").with_path("/api")));
        }
    }

    mod debug {
        use super::*;

        #[test]
        fn when_formatted_should_not_expose_closure() {
            // Arrange
            let bypass = Bypass::predicate(|_| true);

            // Act
            let rendered = format!("{bypass:?}");

            // Assert
            assert_eq!(rendered, "Predicate(..)");
        }
    }
}

mod address_matcher {
    use super::*;

    mod exact {
        use super::*;

        #[test]
        fn when_strings_differ_only_in_formatting_should_not_match() {
            // Arrange
            let matcher = AddressMatcher::from("2001:db8::1");

            // Act & Assert
            assert!(matcher.matches("2001:db8::1"));
            assert!(!matcher.matches("2001:DB8::1"));
        }
    }

    mod network {
        use super::*;

        #[test]
        fn when_ip_is_ipv4_mapped_should_match_ipv4_network() {
            // Arrange
            let network = "192.168.0.0/16".parse::<IpNet>().expect("valid network");
            let matcher = AddressMatcher::from(network);

            // Act & Assert
            assert!(matcher.matches("::ffff:192.168.1.1"));
        }

        #[test]
        fn when_ip_unparseable_should_not_match() {
            // Arrange
            let matcher = AddressMatcher::network("0.0.0.0/0".parse().expect("valid network"));

            // Act & Assert
            assert!(!matcher.matches("unknown"));
        }
    }

    mod pattern {
        use super::*;

        #[test]
        fn when_pattern_matches_should_return_true() {
            // Arrange
            let matcher = AddressMatcher::pattern_str(r"^10\.1\.\d+\.\d+$").expect("valid pattern");

            // Act & Assert
            assert!(matcher.matches("10.1.200.3"));
            assert!(!matcher.matches("10.2.200.3"));
        }

        #[test]
        fn when_pattern_too_long_should_return_error() {
            // Arrange
            let pattern = "a".repeat(MAX_PATTERN_LENGTH + 1);

            // Act
            let result = AddressMatcher::pattern_str(&pattern);

            // Assert
            let Err(PatternError::TooLong { length, max }) = result else {
                panic!("expected pattern length error");
            };
            assert_eq!(length, MAX_PATTERN_LENGTH + 1);
            assert_eq!(max, MAX_PATTERN_LENGTH);
        }

        #[test]
        fn when_pattern_invalid_should_return_build_error() {
            // Arrange & Act
            let result = AddressMatcher::pattern_str("(unclosed");

            // Assert
            match result {
                Err(err @ PatternError::Build(_)) => {
                    assert_eq!(err.to_string(), "failed to compile address pattern");
                    assert!(std::error::Error::source(&err).is_some());
                }
                _ => panic!("expected build error"),
            }
        }

        #[test]
        fn when_budget_exhausted_should_return_timeout() {
            // Arrange & Act
            let result = AddressMatcher::pattern_str_with_budget(r"^10\.", Duration::ZERO);

            // Assert
            assert!(matches!(result, Err(PatternError::Timeout { .. })));
        }
    }

    mod constant {
        use super::*;

        #[test]
        fn when_constant_should_ignore_input() {
            // Arrange & Act & Assert
            assert!(AddressMatcher::from(true).matches("anything"));
            assert!(!AddressMatcher::from(false).matches("127.0.0.1"));
        }
    }
}
