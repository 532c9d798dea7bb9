//! REST server configuration, resolved once at startup.

use std::net::SocketAddr;
use std::time::Duration;

/// Default listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default idle lifetime of a session: two weeks.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 14;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid listen address '{0}'")]
    Address(String),
    #[error("session ttl must be a positive number of seconds, got '{0}'")]
    SessionTtl(String),
    #[error("secure cookies flag must be true or false, got '{0}'")]
    SecureCookies(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestConfig {
    addr: SocketAddr,
    session_ttl: Duration,
    secure_cookies: bool,
}

impl RestConfig {
    pub fn new(addr: SocketAddr, session_ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            addr,
            session_ttl,
            secure_cookies,
        }
    }

    /// Build from raw environment values. Missing or blank values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first value that does not parse.
    pub fn from_env_values(
        addr: Option<String>,
        session_ttl_secs: Option<String>,
        secure_cookies: Option<String>,
    ) -> Result<Self, ConfigError> {
        let addr = non_blank(addr).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Address(addr.clone()))?;

        let session_ttl = match non_blank(session_ttl_secs) {
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::SessionTtl(raw)),
            },
        };

        let secure_cookies = match non_blank(secure_cookies) {
            None => false,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(ConfigError::SecureCookies(raw)),
            },
        };

        Ok(Self::new(addr, session_ttl, secure_cookies))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset_or_blank() {
        let cfg = RestConfig::from_env_values(None, Some(" ".into()), None).unwrap();
        assert_eq!(cfg.addr().to_string(), DEFAULT_REST_ADDR);
        assert_eq!(cfg.session_ttl(), Duration::from_secs(1_209_600));
        assert!(!cfg.secure_cookies());
    }

    #[test]
    fn test_values_are_parsed() {
        let cfg = RestConfig::from_env_values(
            Some("127.0.0.1:8080".into()),
            Some("60".into()),
            Some("TRUE".into()),
        )
        .unwrap();
        assert_eq!(cfg.addr().port(), 8080);
        assert_eq!(cfg.session_ttl(), Duration::from_secs(60));
        assert!(cfg.secure_cookies());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert_eq!(
            RestConfig::from_env_values(Some("localhost".into()), None, None),
            Err(ConfigError::Address("localhost".into()))
        );
        assert!(RestConfig::from_env_values(None, Some("0".into()), None).is_err());
        assert!(RestConfig::from_env_values(None, None, Some("maybe".into())).is_err());
    }
}
