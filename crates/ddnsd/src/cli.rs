//! Command-line and environment configuration
//!
//! Every flag can also be set through the environment variable named in
//! its help text. Flags win over the environment.

use clap::Parser;
use ddns_core::config::{
    DEFAULT_API_BASE, DEFAULT_IPV4_ECHO_URL, DEFAULT_IPV6_ECHO_URL, Credentials, DdnsConfig,
    DnsTarget, EndpointConfig, EngineConfig,
};
use ddns_core::AddressFamily;
use std::path::PathBuf;
use tracing::Level;

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "ddnsd")]
#[command(version)]
#[command(about = "Keeps GoDaddy A/AAAA records pointed at this host's public IP")]
pub struct Cli {
    /// GoDaddy API key
    #[arg(long, env = "DDNS_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// GoDaddy API secret
    #[arg(long, env = "DDNS_API_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Top level domain (e.g., example.com) registered with GoDaddy on the same account as the API key
    #[arg(long, env = "DDNS_DOMAIN")]
    pub domain: Option<String>,

    /// Host of the record within the domain ("home" for home.example.com). The record must already exist
    #[arg(long, env = "DDNS_SUBDOMAIN", default_value = "@")]
    pub subdomain: String,

    /// Polling interval in seconds. Look up GoDaddy's rate limits before setting this low
    #[arg(long, env = "DDNS_INTERVAL", default_value_t = 600)]
    pub interval: u64,

    /// Append log lines to this file (created if missing) instead of standard output
    #[arg(long, env = "DDNS_LOG_FILE", value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,

    /// Timeout for every HTTP request, in seconds
    #[arg(long, env = "DDNS_HTTP_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Address families to keep up to date
    #[arg(long, env = "DDNS_FAMILIES", value_delimiter = ',', default_values_t = AddressFamily::ALL)]
    pub families: Vec<AddressFamily>,

    /// Read records but never write them
    #[arg(long, env = "DDNS_DRY_RUN")]
    pub dry_run: bool,

    /// Echo service answering with the public IPv4 address
    #[arg(long = "ipv4-url", env = "DDNS_IPV4_URL", default_value = DEFAULT_IPV4_ECHO_URL)]
    pub ipv4_url: String,

    /// Echo service answering with the public IPv6 address
    #[arg(long = "ipv6-url", env = "DDNS_IPV6_URL", default_value = DEFAULT_IPV6_ECHO_URL)]
    pub ipv6_url: String,

    /// GoDaddy API base URL
    #[arg(long, env = "DDNS_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl Cli {
    /// Build the updater configuration
    ///
    /// Missing required values become empty strings so that
    /// `DdnsConfig::validate()` reports them by name.
    pub fn to_config(&self) -> DdnsConfig {
        DdnsConfig {
            credentials: Credentials::new(
                self.key.clone().unwrap_or_default(),
                self.secret.clone().unwrap_or_default(),
            ),
            target: DnsTarget::new(self.domain.clone().unwrap_or_default(), self.subdomain.clone()),
            engine: EngineConfig {
                interval_secs: self.interval,
                request_timeout_secs: self.timeout,
                families: self.families.clone(),
                dry_run: self.dry_run,
            },
            endpoints: EndpointConfig {
                ipv4_echo_url: self.ipv4_url.clone(),
                ipv6_echo_url: self.ipv6_url.clone(),
                api_base: self.api_base.clone(),
            },
        }
    }

    /// Where log lines go
    pub fn log_destination(&self) -> LogDestination {
        match &self.log {
            Some(path) => LogDestination::File(path.clone()),
            None => LogDestination::Stdout,
        }
    }
}
