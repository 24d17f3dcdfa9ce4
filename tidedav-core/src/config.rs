//! Centralized configuration for Tidedav.
//!
//! The bridge is stateless; everything tunable lives in one value that is
//! passed explicitly into the server and backend client constructors.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Central configuration for the WebDAV bridge.
///
/// Built once at startup (CLI flags with environment fallbacks) and shared
/// read-only across request handlers.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the TorrServer instance, without trailing slash
    pub backend_url: String,
    /// Address the WebDAV server listens on
    pub bind_addr: SocketAddr,
    /// Optional HTTP Basic credentials; `None` disables authentication
    pub credentials: Option<Credentials>,
    /// User agent for requests the bridge itself originates
    pub user_agent: &'static str,
}

/// Username/password pair for HTTP Basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8090".to_string(),
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080)),
            credentials: None,
            user_agent: "tidedav/0.1.0",
        }
    }
}

impl BridgeConfig {
    /// Returns true when Basic authentication is enforced.
    pub fn auth_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_auth() {
        let config = BridgeConfig::default();
        assert!(!config.auth_enabled());
        assert_eq!(config.backend_url, "http://localhost:8090");
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn auth_enabled_with_credentials() {
        let config = BridgeConfig {
            credentials: Some(Credentials {
                username: "dav".to_string(),
                password: "secret".to_string(),
            }),
            ..BridgeConfig::default()
        };
        assert!(config.auth_enabled());
    }
}
