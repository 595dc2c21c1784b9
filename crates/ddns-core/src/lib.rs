// # ddns-core
//
// Core library for the GoDaddy dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the public IP of an address family
// - **DnsProvider**: Trait for reading and writing DNS records via a provider API
// - **DdnsEngine**: Update workflow plus the fixed-cadence scheduler
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives in the engine, I/O in implementations
// 2. **Independent families**: IPv4 and IPv6 never share state or fail together
// 3. **Explicit logger**: The engine writes to the `Dispatch` it was given
// 4. **Library-First**: The daemon is a thin layer over this crate

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{AddressFamily, DnsProvider, IpSource, RecordType, RecordWrite, RECORD_TTL_SECS};
pub use engine::{DdnsEngine, UpdateAction, UpdateOutcome};
pub use config::{Credentials, DdnsConfig, DnsTarget, EndpointConfig, EngineConfig};
pub use error::{Error, ErrorKind, Result};
