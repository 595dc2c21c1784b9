// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via a
// provider's REST API.
//
// ## Implementations
//
// - GoDaddy: `ddns-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, DnsTarget, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let target = DnsTarget::new("example.com", "home");
//
//     let published = provider.get_record(&target, RecordType::A).await?;
//     if published != "203.0.113.7" {
//         provider.update_record(&target, RecordType::A, "203.0.113.7").await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::DnsTarget;

/// TTL written with every record update, in seconds
pub const RECORD_TTL_SECS: u32 = 600;

/// DNS record type
///
/// Only address records are managed. Any other type is rejected when
/// parsed, so a provider never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(crate::Error::invalid_input(format!(
                "The record type is neither 'A' nor 'AAAA': '{}'",
                other
            ))),
        }
    }
}

/// What a successful [`DnsProvider::update_record`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordWrite {
    /// The provider accepted the new value
    Written,
    /// Dry-run: the write was logged but never sent
    DryRun,
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// Providers are single-shot API clients:
/// - One HTTP request per method call
/// - No retry or backoff (the next scheduler tick is the retry)
/// - No caching of record values between calls
/// - No decision about whether an update is needed (owned by `DdnsEngine`)
///
/// Implementations must be thread-safe: the engine calls them from
/// concurrently running tasks, possibly for the same record.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Read the currently published value of a record
    ///
    /// # Parameters
    ///
    /// - `target`: Domain and host name of the record
    /// - `record_type`: A or AAAA
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The `data` value of the first matching record
    /// - `Err(Error)`: Transport, decode, rejection or not-found error
    async fn get_record(
        &self,
        target: &DnsTarget,
        record_type: RecordType,
    ) -> Result<String, crate::Error>;

    /// Replace the record's value with `value`, using [`RECORD_TTL_SECS`]
    ///
    /// # Returns
    ///
    /// - `Ok(RecordWrite::Written)`: The provider accepted the write
    /// - `Ok(RecordWrite::DryRun)`: Nothing was sent
    /// - `Err(Error)`: Transport error, or `Error::Rejected` carrying the
    ///   status code the provider answered with
    async fn update_record(
        &self,
        target: &DnsTarget,
        record_type: RecordType,
        value: &str,
    ) -> Result<RecordWrite, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
