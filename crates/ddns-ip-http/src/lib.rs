// # HTTP IP Source
//
// This crate provides the echo-service IP source for the DDNS updater.
//
// ## Architecture
//
// Each address family has its own echo service (by default
// https://4.ipw.cn and https://6.ipw.cn). The service is reached over that
// family only and answers with the caller's address as the entire
// plain-text body.
//
// One GET per call. No caching, no retry, no polling loop: the engine
// decides when to ask.

use ddns_core::config::{DdnsConfig, EndpointConfig};
use ddns_core::traits::{AddressFamily, IpSource};
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Largest echo body accepted, in bytes
///
/// An address literal is at most 45 characters; anything far beyond that is
/// not an echo answer.
pub const MAX_ECHO_BODY_BYTES: usize = 1024;

/// HTTP echo-service IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// Echo service for IPv4
    ipv4_url: String,

    /// Echo service for IPv6
    ipv6_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `endpoints`: Echo URLs per family
    /// - `timeout`: Upper bound for each request
    pub fn new(endpoints: &EndpointConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_url: endpoints.ipv4_echo_url.clone(),
            ipv6_url: endpoints.ipv6_echo_url.clone(),
            client,
        })
    }

    /// Create from the full configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(&config.endpoints, config.engine.request_timeout())
    }

    /// Echo URL asked for `family`
    pub fn url_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4_url,
            AddressFamily::V6 => &self.ipv6_url,
        }
    }

    /// Fetch current IP from the family's echo service
    async fn fetch_ip(&self, family: AddressFamily) -> Result<String> {
        let url = self.url_for(family);
        tracing::debug!("Asking {} for the public {} address", url, family);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("Request to {} timed out: {}", url, e))
            } else {
                Error::transport(format!("Request to {} failed: {}", url, e))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "{} answered with HTTP error: {}",
                url,
                response.status()
            )));
        }

        let body = read_limited(response, url).await?;
        parse_echo_body(&body, family)
    }
}

/// Read the response body, giving up once it exceeds [`MAX_ECHO_BODY_BYTES`]
async fn read_limited(mut response: reqwest::Response, url: &str) -> Result<String> {
    let too_large = || {
        Error::decode(format!(
            "Response from {} exceeds {} bytes",
            url, MAX_ECHO_BODY_BYTES
        ))
    };

    if response
        .content_length()
        .is_some_and(|len| len > MAX_ECHO_BODY_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::decode(format!("Failed to read response from {}: {}", url, e)))?
    {
        if body.len() + chunk.len() > MAX_ECHO_BODY_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    String::from_utf8(body)
        .map_err(|_| Error::decode(format!("Response from {} is not UTF-8 text", url)))
}

/// Extract the IP literal from an echo body
///
/// Surrounding whitespace is dropped; the rest must be a single address of
/// `family`. The literal is returned as sent, not re-formatted.
fn parse_echo_body(body: &str, family: AddressFamily) -> Result<String> {
    let ip_text = body.trim();

    let ip: IpAddr = ip_text
        .parse()
        .map_err(|_| Error::decode(format!("Invalid IP address: '{}'", ip_text)))?;

    if !family.matches(&ip) {
        return Err(Error::decode(format!("Expected {}, got: {}", family, ip)));
    }

    Ok(ip_text.to_string())
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self, family: AddressFamily) -> Result<String> {
        self.fetch_ip(family).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::ErrorKind;

    #[test]
    fn test_default_endpoints() {
        let source = HttpIpSource::new(&EndpointConfig::default(), Duration::from_secs(10)).unwrap();

        assert_eq!(source.url_for(AddressFamily::V4), "https://4.ipw.cn");
        assert_eq!(source.url_for(AddressFamily::V6), "https://6.ipw.cn");
    }

    #[test]
    fn test_parse_echo_body() {
        assert_eq!(parse_echo_body("1.2.3.4", AddressFamily::V4).unwrap(), "1.2.3.4");
        assert_eq!(parse_echo_body("1.2.3.4\n", AddressFamily::V4).unwrap(), "1.2.3.4");
        assert_eq!(
            parse_echo_body(" 2001:db8::1\r\n", AddressFamily::V6).unwrap(),
            "2001:db8::1"
        );
    }

    #[test]
    fn test_parse_echo_body_keeps_text_form() {
        let expanded = "2001:0db8:0000:0000:0000:0000:0000:0001";
        assert_eq!(parse_echo_body(expanded, AddressFamily::V6).unwrap(), expanded);
    }

    #[test]
    fn test_parse_echo_body_rejects_garbage() {
        let err = parse_echo_body("<html>rate limited</html>", AddressFamily::V4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = parse_echo_body("", AddressFamily::V4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_parse_echo_body_rejects_wrong_family() {
        let err = parse_echo_body("1.2.3.4", AddressFamily::V6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(parse_echo_body("2001:db8::1", AddressFamily::V4).is_err());
    }
}
