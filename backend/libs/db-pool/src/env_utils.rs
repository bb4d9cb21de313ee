//! Environment variable parsing helpers shared by pool and service configuration.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is unset or malformed.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, `None` if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off` (any case).
pub fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("DB_POOL_TEST_MISSING", 42);
        assert_eq!(result, 42);

        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_bool() {
        std::env::remove_var("DB_POOL_TEST_FLAG");
        assert!(parse_env_bool("DB_POOL_TEST_FLAG", true));

        for (raw, expected) in [("TRUE", true), ("1", true), ("off", false), ("No", false)] {
            std::env::set_var("DB_POOL_TEST_FLAG", raw);
            assert_eq!(parse_env_bool("DB_POOL_TEST_FLAG", !expected), expected);
        }

        std::env::set_var("DB_POOL_TEST_FLAG", "maybe");
        assert!(!parse_env_bool("DB_POOL_TEST_FLAG", false));
        std::env::remove_var("DB_POOL_TEST_FLAG");
    }
}
