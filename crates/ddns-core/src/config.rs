//! Configuration types for the DDNS updater
//!
//! All values are supplied once at startup and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::traits::AddressFamily;

/// Default echo service for IPv4
pub const DEFAULT_IPV4_ECHO_URL: &str = "https://4.ipw.cn";

/// Default echo service for IPv6
pub const DEFAULT_IPV6_ECHO_URL: &str = "https://6.ipw.cn";

/// Default GoDaddy API base URL
pub const DEFAULT_API_BASE: &str = "https://api.godaddy.com";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Provider credentials
    pub credentials: Credentials,

    /// Record to keep up to date
    pub target: DnsTarget,

    /// Scheduler and request settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Outbound endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl DdnsConfig {
    /// Create a new configuration with default engine and endpoint settings
    pub fn new(credentials: Credentials, target: DnsTarget) -> Self {
        Self {
            credentials,
            target,
            engine: EngineConfig::default(),
            endpoints: EndpointConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// Checked in the order an operator would fix them: secret, key,
    /// domain, then everything optional.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;
        self.target.validate()?;
        self.engine.validate()?;
        self.endpoints.validate()?;

        Ok(())
    }
}

/// Provider credentials
///
/// The Debug implementation intentionally does NOT expose either value.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API key
    pub api_key: String,
    /// API secret
    /// ⚠️ NEVER log this value
    pub api_secret: String,
}

impl Credentials {
    /// Create a new credentials pair
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Validate that both halves are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_secret.trim().is_empty() {
            return Err(crate::Error::config("You need to provide your API secret"));
        }
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("You need to provide your API key"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .finish()
    }
}

/// DNS record to inspect and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsTarget {
    /// Zone registered with the provider (e.g., "example.com")
    pub domain: String,

    /// Record name within the zone (e.g., "home"), "@" for the apex
    #[serde(default = "default_host_name")]
    pub host_name: String,
}

impl DnsTarget {
    /// Create a new target
    pub fn new(domain: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            host_name: host_name.into(),
        }
    }

    /// Create a target for the zone apex ("@")
    pub fn apex(domain: impl Into<String>) -> Self {
        Self::new(domain, default_host_name())
    }

    /// Fully qualified name of the record, for log lines
    pub fn fqdn(&self) -> String {
        if self.host_name == "@" {
            self.domain.clone()
        } else {
            format!("{}.{}", self.host_name, self.domain)
        }
    }

    /// Validate domain and host name syntax
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.trim().is_empty() {
            return Err(crate::Error::config("You need to provide your domain"));
        }
        validate_domain_name(&self.domain, false)?;

        if self.host_name != "@" {
            validate_domain_name(&self.host_name, true)?;
        }

        Ok(())
    }
}

impl fmt::Display for DnsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn())
    }
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks. Host names may additionally use a `*`
/// wildcard label.
fn validate_domain_name(name: &str, allow_wildcard: bool) -> Result<(), crate::Error> {
    if name.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if name.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            name.len(),
            name
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                name
            )));
        }

        if allow_wildcard && label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between scheduler ticks
    ///
    /// Look up the provider's rate limits before setting this low.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Timeout applied to every outbound HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Address families updated on each tick
    #[serde(default = "default_families")]
    pub families: Vec<AddressFamily>,

    /// Read records but never write them
    #[serde(default)]
    pub dry_run: bool,
}

impl EngineConfig {
    /// Scheduler tick period
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Enabled families, each listed once, in configured order
    ///
    /// `--families ipv4,4` names IPv4 twice; it still gets one task per tick.
    pub fn enabled_families(&self) -> Vec<AddressFamily> {
        let mut families = Vec::with_capacity(self.families.len());
        for &family in &self.families {
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }

    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Polling interval must be > 0 seconds"));
        }
        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0 seconds"));
        }
        if self.families.is_empty() {
            return Err(crate::Error::config(
                "At least one address family (ipv4, ipv6) must be enabled",
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            families: default_families(),
            dry_run: false,
        }
    }
}

/// Outbound endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Echo service returning the caller's IPv4 address as plain text
    #[serde(default = "default_ipv4_echo_url")]
    pub ipv4_echo_url: String,

    /// Echo service returning the caller's IPv6 address as plain text
    #[serde(default = "default_ipv6_echo_url")]
    pub ipv6_echo_url: String,

    /// Provider API base URL (scheme and host, no trailing path)
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl EndpointConfig {
    /// Echo endpoint for `family`
    pub fn echo_url(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4_echo_url,
            AddressFamily::V6 => &self.ipv6_echo_url,
        }
    }

    /// Validate URL schemes
    ///
    /// Echo URLs may use plain HTTP. The API base carries the credentials
    /// in a header, so it must use HTTPS unless it points at the local host.
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (what, url) in [
            ("IPv4 echo URL", &self.ipv4_echo_url),
            ("IPv6 echo URL", &self.ipv6_echo_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "{} must use HTTP or HTTPS scheme. Got: {}",
                    what, url
                )));
            }
        }

        if !self.api_base.starts_with("https://") && !is_loopback_http(&self.api_base) {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTPS scheme. Got: {}",
                self.api_base
            )));
        }
        Ok(())
    }
}

/// `http://` URL whose host is `localhost`, `127.0.0.1` or `[::1]`
fn is_loopback_http(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("http://") else {
        return false;
    };
    let authority = rest.split('/').next().unwrap_or_default();
    let host = match authority.strip_prefix('[') {
        Some(v6) => v6.split(']').next().map(|h| format!("[{}]", h)),
        None => authority.split(':').next().map(str::to_string),
    };
    matches!(host.as_deref(), Some("localhost" | "127.0.0.1" | "[::1]"))
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ipv4_echo_url: default_ipv4_echo_url(),
            ipv6_echo_url: default_ipv6_echo_url(),
            api_base: default_api_base(),
        }
    }
}

fn default_host_name() -> String {
    "@".to_string()
}

fn default_interval_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_families() -> Vec<AddressFamily> {
    AddressFamily::ALL.to_vec()
}

fn default_ipv4_echo_url() -> String {
    DEFAULT_IPV4_ECHO_URL.to_string()
}

fn default_ipv6_echo_url() -> String {
    DEFAULT_IPV6_ECHO_URL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
