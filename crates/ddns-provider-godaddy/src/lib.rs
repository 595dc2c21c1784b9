// # GoDaddy DNS Provider
//
// This crate provides the GoDaddy DNS provider for the DDNS updater.
//
// ## Behaviour
//
// - One HTTP request per call (GET to read, PUT to write)
// - Full error propagation to the engine; no retry, no backoff
// - HTTP timeout on every request (configurable, 30 seconds by default)
// - Status codes mapped to specific messages (401, 403, 404, 422, 429, 5xx)
// - Dry-run mode for safe testing
// - A and AAAA records only
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or Debug output
// - Provider construction fails if either is empty
//
// ## API Reference
//
// - GoDaddy Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - Read records:    GET `/v1/domains/{domain}/records/{type}/{name}`
// - Replace records: PUT `/v1/domains/{domain}/records/{type}/{name}`
// - Auth header:     `Authorization: sso-key {key}:{secret}`

use async_trait::async_trait;
use ddns_core::config::{Credentials, DdnsConfig, DnsTarget};
use ddns_core::traits::{DnsProvider, RecordType, RecordWrite, RECORD_TTL_SECS};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER: &str = "godaddy";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One element of the record list returned by a read
#[derive(Debug, Deserialize)]
struct RecordData {
    data: String,
}

/// One element of the record list sent by a write
#[derive(Debug, Serialize)]
struct RecordUpdate<'a> {
    data: &'a str,
    ttl: u32,
}

/// GoDaddy DNS provider
///
/// Stateless and single-shot. All coordination (comparison, scheduling)
/// is owned by `DdnsEngine`.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform GET requests
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
pub struct GoDaddyProvider {
    /// API key and secret
    /// ⚠️ NEVER log these values
    credentials: Credentials,

    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("credentials", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a new GoDaddy provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: API key and secret of the account owning the domain
    /// - `api_base`: API base URL (e.g., "https://api.godaddy.com")
    /// - `timeout`: Upper bound for each request
    /// - `dry_run`: If true, perform GET requests but skip PUT updates
    pub fn new(
        credentials: Credentials,
        api_base: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        credentials.validate()?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create from the full configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        if config.engine.dry_run {
            tracing::warn!("GoDaddy provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.credentials.clone(),
            config.endpoints.api_base.clone(),
            config.engine.request_timeout(),
            config.engine.dry_run,
        )
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Read a record whose type is given as text
    ///
    /// Anything other than "A" or "AAAA" is rejected before a request is
    /// made.
    pub async fn get_record_by_type_name(&self, target: &DnsTarget, record_type: &str) -> Result<String> {
        let record_type: RecordType = record_type.parse()?;
        self.get_record(target, record_type).await
    }

    /// Write a record whose type is given as text
    ///
    /// Anything other than "A" or "AAAA" is rejected before a request is
    /// made.
    pub async fn update_record_by_type_name(
        &self,
        target: &DnsTarget,
        record_type: &str,
        value: &str,
    ) -> Result<RecordWrite> {
        let record_type: RecordType = record_type.parse()?;
        self.update_record(target, record_type, value).await
    }

    /// Record endpoint for (domain, type, name)
    fn record_url(&self, target: &DnsTarget, record_type: RecordType) -> String {
        format!(
            "{}/v1/domains/{}/records/{}/{}",
            self.api_base, target.domain, record_type, target.host_name
        )
    }

    /// `Authorization` header value
    fn authorization(&self) -> String {
        format!(
            "sso-key {}:{}",
            self.credentials.api_key, self.credentials.api_secret
        )
    }
}

/// Body of a record write
fn update_payload(value: &str) -> Vec<RecordUpdate<'_>> {
    vec![RecordUpdate {
        data: value,
        ttl: RECORD_TTL_SECS,
    }]
}

/// Map a non-success response to an error
fn rejection(status: StatusCode, error_text: &str, target: &DnsTarget, action: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => {
            "Authentication failed: Invalid API key/secret or the domain belongs to another account"
                .to_string()
        }
        404 => format!("Domain or record not found: {}", target),
        422 => format!("Request rejected as invalid: {}", error_text),
        429 => "Rate limit exceeded. Consider a longer polling interval".to_string(),
        500..=599 => format!("GoDaddy server error (transient): {}", error_text),
        _ => format!("{} failed: {}", action, error_text),
    };
    Error::rejected(PROVIDER, status.as_u16(), message)
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::transport(format!("HTTP request timed out: {}", e))
    } else {
        Error::transport(format!("HTTP request failed: {}", e))
    }
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    /// Read the current value of a record
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/domains/example.com/records/A/home
    /// Authorization: sso-key <key>:<secret>
    /// ```
    ///
    /// Response: `[{"data": "1.2.3.4", "name": "home", "ttl": 600, "type": "A"}]`
    async fn get_record(&self, target: &DnsTarget, record_type: RecordType) -> Result<String> {
        let url = self.record_url(target, record_type);
        tracing::debug!("Reading {} record of {}", record_type, target);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(rejection(status, &body, target, "Record lookup"));
        }

        let records: Vec<RecordData> = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Failed to parse response: {}", e)))?;

        let record = records.into_iter().next().ok_or_else(|| {
            Error::not_found(format!("{} record of {} (create it in GoDaddy first)", record_type, target))
        })?;

        tracing::debug!("Published {} record of {}: {}", record_type, target, record.data);
        Ok(record.data)
    }

    /// Replace a record's value
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v1/domains/example.com/records/A/home
    /// Authorization: sso-key <key>:<secret>
    /// Content-Type: application/json
    ///
    /// [{"data":"5.6.7.8","ttl":600}]
    /// ```
    ///
    /// Only HTTP 200 counts as success.
    async fn update_record(
        &self,
        target: &DnsTarget,
        record_type: RecordType,
        value: &str,
    ) -> Result<RecordWrite> {
        let url = self.record_url(target, record_type);
        let payload = update_payload(value);

        // In dry-run mode, log the intended update and report that nothing was sent
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(RecordWrite::DryRun);
        }

        tracing::debug!("Writing {} record of {}: {}", record_type, target, value);

        let response = self
            .client
            .put(&url)
            .header(AUTHORIZATION, self.authorization())
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(rejection(status, &error_text, target, "Record update"));
        }

        Ok(RecordWrite::Written)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
