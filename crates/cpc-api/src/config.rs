//! Connection configuration for a WHM server.
//!
//! A [`ServerConfig`] is a plain value: build it with the builder, parse it
//! from TOML, or read it from the `WHM_*` environment variables. It is
//! validated once, when a [`crate::Server`] is created from it.

use std::fmt;

use cpc_error::{PanelError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER: &str = "root";
pub const SSL_PORT: u16 = 2087;
pub const PLAIN_PORT: u16 = 2086;

/// Which URL namespace requests are sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// `/json-api/`, JSON responses.
    #[default]
    Standard,
    /// `/scripts2/`, the host-manager pages. Responses are HTML.
    Whostmgr,
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Whostmgr => write!(f, "whostmgr"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    /// Remote access hash, as found in `/root/.accesshash`.
    AccessHash(String),
    ApiToken(String),
}

impl Credential {
    fn secret(&self) -> &str {
        match self {
            Self::AccessHash(s) | Self::ApiToken(s) => s,
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessHash(_) => write!(f, "AccessHash(<redacted>)"),
            Self::ApiToken(_) => write!(f, "ApiToken(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub credential: Option<Credential>,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub mode: ApiMode,
    #[serde(default = "default_true")]
    pub ssl: bool,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    pub fn builder(host: impl Into<String>) -> ServerConfigBuilder {
        ServerConfigBuilder::new(host)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| PanelError::configuration(format!("Invalid TOML config: {}", e)))
    }

    /// Reads `WHM_HOST`, `WHM_HASH` or `WHM_TOKEN`, `WHM_USER`,
    /// `WHM_WHOSTMGR`, `WHM_SSL`, `WHM_PORT`, `WHM_VERIFY_SSL` and
    /// `WHM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = match (lookup("WHM_TOKEN"), lookup("WHM_HASH")) {
            (Some(token), _) => Some(Credential::ApiToken(token)),
            (None, Some(hash)) => Some(Credential::AccessHash(hash)),
            (None, None) => None,
        };

        let flag = |key: &str, default: bool| -> Result<bool> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => parse_flag(&raw).ok_or_else(|| {
                    PanelError::configuration(format!("{} must be a boolean, got {:?}", key, raw))
                }),
            }
        };

        let port = match lookup("WHM_PORT") {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                PanelError::configuration(format!("WHM_PORT must be a port number, got {:?}", raw))
            })?),
            None => None,
        };

        let timeout_secs = match lookup("WHM_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                PanelError::configuration(format!(
                    "WHM_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    raw
                ))
            })?),
            None => None,
        };

        Ok(Self {
            host: lookup("WHM_HOST").unwrap_or_default(),
            credential,
            user: lookup("WHM_USER").unwrap_or_else(default_user),
            mode: if flag("WHM_WHOSTMGR", false)? {
                ApiMode::Whostmgr
            } else {
                ApiMode::Standard
            },
            ssl: flag("WHM_SSL", true)?,
            port,
            verify_ssl: flag("WHM_VERIFY_SSL", true)?,
            timeout_secs,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(PanelError::configuration("host is required"));
        }
        if host.contains("://") || host.contains('/') || host.contains(char::is_whitespace) {
            return Err(PanelError::configuration(format!(
                "host must be a bare address, got {:?}",
                self.host
            )));
        }
        match &self.credential {
            None => return Err(PanelError::configuration("an access hash or API token is required")),
            Some(credential) if credential.secret().trim().is_empty() => {
                return Err(PanelError::configuration("credential must not be empty"))
            }
            Some(_) => {}
        }
        if self.user.trim().is_empty() {
            return Err(PanelError::configuration("user is required"));
        }
        if self.port == Some(0) {
            return Err(PanelError::configuration("port must not be 0"));
        }
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
            .unwrap_or(if self.ssl { SSL_PORT } else { PLAIN_PORT })
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host.trim(), self.port())
    }

    /// Value of the `Authorization` header. Access hashes are stored with
    /// line breaks which the server does not accept.
    pub fn auth_header(&self) -> Option<String> {
        self.credential.as_ref().map(|credential| match credential {
            Credential::AccessHash(hash) => {
                let hash: String = hash.chars().filter(|c| *c != '\r' && *c != '\n').collect();
                format!("WHM {}:{}", self.user, hash)
            }
            Credential::ApiToken(token) => format!("whm {}:{}", self.user, token.trim()),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    fn new(host: impl Into<String>) -> Self {
        Self {
            config: ServerConfig {
                host: host.into(),
                credential: None,
                user: default_user(),
                mode: ApiMode::Standard,
                ssl: true,
                port: None,
                verify_ssl: true,
                timeout_secs: None,
            },
        }
    }

    pub fn access_hash(mut self, hash: impl Into<String>) -> Self {
        self.config.credential = Some(Credential::AccessHash(hash.into()));
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.credential = Some(Credential::ApiToken(token.into()));
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    pub fn whostmgr(mut self, enabled: bool) -> Self {
        self.config.mode = if enabled { ApiMode::Whostmgr } else { ApiMode::Standard };
        self
    }

    pub fn ssl(mut self, enabled: bool) -> Self {
        self.config.ssl = enabled;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    pub fn verify_ssl(mut self, enabled: bool) -> Self {
        self.config.verify_ssl = enabled;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_follow_ssl_flag() {
        let config = ServerConfig::builder("203.0.113.10").access_hash("abc").build();
        assert_eq!(config.port(), SSL_PORT);
        assert_eq!(config.base_url(), "https://203.0.113.10:2087");

        let plain = ServerConfig::builder("203.0.113.10")
            .access_hash("abc")
            .ssl(false)
            .build();
        assert_eq!(plain.base_url(), "http://203.0.113.10:2086");

        let custom = ServerConfig::builder("panel.example.com")
            .access_hash("abc")
            .port(8443)
            .build();
        assert_eq!(custom.base_url(), "https://panel.example.com:8443");
    }

    #[test]
    fn validate_rejects_missing_pieces() {
        let missing_host = ServerConfig::builder("").access_hash("abc").build();
        let err = missing_host.validate().expect_err("empty host");
        assert!(err.is_configuration());
        assert_eq!(err.message(), "host is required");

        let with_scheme = ServerConfig::builder("https://panel.example.com")
            .access_hash("abc")
            .build();
        assert!(with_scheme.validate().expect_err("scheme").is_configuration());

        let no_credential = ServerConfig::builder("panel.example.com").build();
        assert!(no_credential.validate().expect_err("no credential").is_configuration());

        let blank_hash = ServerConfig::builder("panel.example.com").access_hash("\n").build();
        assert!(blank_hash.validate().is_err());

        let zero_port = ServerConfig::builder("panel.example.com")
            .access_hash("abc")
            .port(0)
            .build();
        assert!(zero_port.validate().is_err());

        let ok = ServerConfig::builder("panel.example.com").access_hash("abc").build();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn auth_header_strips_hash_line_breaks() {
        let config = ServerConfig::builder("panel.example.com")
            .access_hash("abc\r\ndef\nghi")
            .build();
        assert_eq!(config.auth_header().as_deref(), Some("WHM root:abcdefghi"));

        let token = ServerConfig::builder("panel.example.com")
            .api_token("TOKEN123")
            .user("reseller")
            .build();
        assert_eq!(token.auth_header().as_deref(), Some("whm reseller:TOKEN123"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = ServerConfig::builder("panel.example.com")
            .access_hash("supersecret")
            .build();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            host = "panel.example.com"
            mode = "whostmgr"
            credential = { access_hash = "abc" }
            "#,
        )
        .expect("parse toml");
        assert_eq!(config.host, "panel.example.com");
        assert_eq!(config.mode, ApiMode::Whostmgr);
        assert_eq!(config.user, DEFAULT_USER);
        assert!(config.ssl);
        assert!(config.verify_ssl);
        assert_eq!(config.credential, Some(Credential::AccessHash("abc".to_string())));
    }

    #[test]
    fn toml_without_host_parses_but_fails_validation() {
        let config = ServerConfig::from_toml_str(r#"credential = { api_token = "t" }"#)
            .expect("parse toml");
        assert!(config.validate().expect_err("missing host").is_configuration());

        let broken = ServerConfig::from_toml_str("host = ");
        assert!(broken.expect_err("bad toml").is_configuration());
    }

    #[test]
    fn reads_environment_lookup() {
        let vars: HashMap<&str, &str> = [
            ("WHM_HOST", "198.51.100.7"),
            ("WHM_HASH", "hash"),
            ("WHM_WHOSTMGR", "1"),
            ("WHM_SSL", "false"),
            ("WHM_PORT", "2086"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("env config");
        assert_eq!(config.host, "198.51.100.7");
        assert_eq!(config.mode, ApiMode::Whostmgr);
        assert!(!config.ssl);
        assert_eq!(config.port(), 2086);
        assert_eq!(config.credential, Some(Credential::AccessHash("hash".to_string())));

        let bad_port = ServerConfig::from_lookup(|key| match key {
            "WHM_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert!(bad_port.expect_err("bad port").is_configuration());
    }
}
