//! Test doubles and common utilities for engine contract tests
//!
//! The doubles count every call so tests can assert on what the engine
//! did, not only on what it returned.

#![allow(dead_code)]

use ddns_core::config::{Credentials, DdnsConfig, DnsTarget};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{AddressFamily, DnsProvider, IpSource, RecordType, RecordWrite};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Dispatch;

/// How the echo service answers for one family
#[derive(Debug, Clone)]
pub enum Echo {
    /// Answer with this address
    Ip(String),
    /// Fail as if the connection was refused
    TransportError,
    /// Never answer
    Hang,
}

/// An IpSource whose answer is scripted per family
pub struct ScriptedIpSource {
    v4: Echo,
    v6: Echo,
    v4_calls: AtomicUsize,
    v6_calls: AtomicUsize,
}

impl ScriptedIpSource {
    pub fn new(v4: Echo, v6: Echo) -> Self {
        Self {
            v4,
            v6,
            v4_calls: AtomicUsize::new(0),
            v6_calls: AtomicUsize::new(0),
        }
    }

    /// Both families answer with fixed addresses
    pub fn answering(v4: &str, v6: &str) -> Self {
        Self::new(Echo::Ip(v4.to_string()), Echo::Ip(v6.to_string()))
    }

    /// Get the number of times current() was called for `family`
    pub fn calls(&self, family: AddressFamily) -> usize {
        match family {
            AddressFamily::V4 => self.v4_calls.load(Ordering::SeqCst),
            AddressFamily::V6 => self.v6_calls.load(Ordering::SeqCst),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self, family: AddressFamily) -> Result<String> {
        let echo = match family {
            AddressFamily::V4 => {
                self.v4_calls.fetch_add(1, Ordering::SeqCst);
                &self.v4
            }
            AddressFamily::V6 => {
                self.v6_calls.fetch_add(1, Ordering::SeqCst);
                &self.v6
            }
        };

        match echo {
            Echo::Ip(ip) => Ok(ip.clone()),
            Echo::TransportError => Err(Error::transport("connection refused")),
            Echo::Hang => std::future::pending().await,
        }
    }
}

/// A mock DnsProvider that tracks calls
///
/// Successful writes replace the published value, like the real API.
pub struct MockDnsProvider {
    published: Mutex<HashMap<RecordType, String>>,
    write_status: Option<u16>,
    dry_run: bool,
    get_call_count: AtomicUsize,
    update_call_count: AtomicUsize,
    writes: Mutex<Vec<(RecordType, String)>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(HashMap::new()),
            write_status: None,
            dry_run: false,
            get_call_count: AtomicUsize::new(0),
            update_call_count: AtomicUsize::new(0),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Publish `value` for `record_type`
    pub fn with_published(self, record_type: RecordType, value: &str) -> Self {
        self.published
            .lock()
            .unwrap()
            .insert(record_type, value.to_string());
        self
    }

    /// Reject every write with `status`
    pub fn rejecting_writes(mut self, status: u16) -> Self {
        self.write_status = Some(status);
        self
    }

    /// Accept writes without publishing them
    pub fn in_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Get the number of times get_record() was called
    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Every (record type, value) passed to update_record()
    pub fn writes(&self) -> Vec<(RecordType, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Currently published value for `record_type`
    pub fn published(&self, record_type: RecordType) -> Option<String> {
        self.published.lock().unwrap().get(&record_type).cloned()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_record(&self, target: &DnsTarget, record_type: RecordType) -> Result<String> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        self.published(record_type).ok_or_else(|| {
            Error::not_found(format!("{} record of {}", record_type, target))
        })
    }

    async fn update_record(
        &self,
        _target: &DnsTarget,
        record_type: RecordType,
        value: &str,
    ) -> Result<RecordWrite> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);

        if self.dry_run {
            return Ok(RecordWrite::DryRun);
        }

        self.writes
            .lock()
            .unwrap()
            .push((record_type, value.to_string()));

        if let Some(status) = self.write_status {
            return Err(Error::rejected("mock", status, "write rejected"));
        }

        self.published
            .lock()
            .unwrap()
            .insert(record_type, value.to_string());
        Ok(RecordWrite::Written)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// In-memory log sink
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger writing into this buffer
    pub fn dispatch(&self) -> Dispatch {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        Dispatch::new(subscriber)
    }

    /// Everything logged so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(domain: &str) -> DdnsConfig {
    DdnsConfig::new(Credentials::new("test-key", "test-secret"), DnsTarget::apex(domain))
}
