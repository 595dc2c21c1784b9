//! Core traits for the DDNS updater
//!
//! - [`IpSource`]: Discover the public IP address of a family
//! - [`DnsProvider`]: Read and write DNS records via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{AddressFamily, IpSource};
pub use dns_provider::{DnsProvider, RecordType, RecordWrite, RECORD_TTL_SECS};
