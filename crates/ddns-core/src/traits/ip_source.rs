// # IP Source Trait
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP echo services: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{AddressFamily, IpSource};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let v4 = source.current(AddressFamily::V4).await?;
//     println!("public IPv4: {}", v4);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use super::dns_provider::RecordType;

/// Address family (IPv4 or IPv6)
///
/// The family fixes both the echo endpoint that is asked for the public
/// address and the DNS record type that publishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl AddressFamily {
    /// Both families, in scheduling order
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

    /// DNS record type that publishes addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }

    /// Whether `ip` belongs to this family
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(AddressFamily::V4),
            "6" | "v6" | "ipv6" => Ok(AddressFamily::V6),
            other => Err(crate::Error::invalid_input(format!(
                "Unknown address family '{}' (expected ipv4 or ipv6)",
                other
            ))),
        }
    }
}

/// Trait for IP source implementations
///
/// An IP source answers one question: what is this host's public address
/// for the given family, right now. It is called once per family per
/// scheduler tick.
///
/// # Contract
///
/// - One outbound request per call, no retry, no caching between calls
/// - The returned string is the IP literal exactly as it will be compared
///   against the published record (surrounding whitespace removed)
/// - A transport failure is `Error::Transport`, an unusable body is
///   `Error::Decode`
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address for `family`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The IP literal
    /// - `Err(Error)`: If the address could not be determined
    async fn current(&self, family: AddressFamily) -> Result<String, crate::Error>;
}
