// DNS and HTTP egress probes
//
// Classification: any HTTP response, including 4xx/5xx, is success (the
// request left the host and something answered). Transport failures (DNS,
// connect, TLS, timeout) are attempted-failed.
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use probebench_core::domain::{ProbeCategory, Report};
use probebench_core::port::{Probe, ProbeContext, ProbeError, ProbeResult};

pub const DEFAULT_DNS_HOST: &str = "example.com";
pub const DEFAULT_EGRESS_URL: &str = "https://example.com";
pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/latest/meta-data/";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_millis(3000);
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_millis(1500);

/// Port used only to satisfy the resolver API
const DNS_LOOKUP_PORT: u16 = 443;

pub struct DnsLookupProbe {
    host: String,
}

impl DnsLookupProbe {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

#[async_trait]
impl Probe for DnsLookupProbe {
    fn id(&self) -> &str {
        "dns-lookup"
    }

    fn category(&self) -> ProbeCategory {
        ProbeCategory::Network
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        match tokio::net::lookup_host((self.host.as_str(), DNS_LOOKUP_PORT)).await {
            Ok(addrs) => {
                let addresses: Vec<String> = addrs.map(|a| a.ip().to_string()).collect();
                Ok(Report::from_ok(
                    !addresses.is_empty(),
                    json!({ "host": self.host, "addresses": addresses }),
                ))
            }
            Err(e) => Ok(Report::attempted_failed(json!({
                "host": self.host,
                "error": { "kind": "resolve", "message": e.to_string() },
            }))),
        }
    }
}

/// HTTP GET against one URL
///
/// The same body serves plain egress and cloud-metadata probing; only the
/// identity, category and deadline differ.
pub struct HttpProbe {
    id: String,
    category: ProbeCategory,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(
        id: impl Into<String>,
        category: ProbeCategory,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            url: url.into(),
            timeout,
        }
    }

    pub fn egress(url: impl Into<String>, timeout: Duration) -> Self {
        Self::new("https-egress", ProbeCategory::Network, url, timeout)
    }

    pub fn cloud_metadata(url: impl Into<String>, timeout: Duration) -> Self {
        Self::new("cloud-metadata", ProbeCategory::MetadataProbe, url, timeout)
    }
}

fn transport_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_builder() {
        "invalid-request"
    } else if error.is_request() {
        "request"
    } else {
        "transport"
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ProbeCategory {
        self.category.clone()
    }

    async fn execute(&self, _ctx: &ProbeContext) -> ProbeResult {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProbeError::operation("http-client", e.to_string()))?;

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        match client.get(&self.url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(url = %self.url, status = %status, "HTTP probe answered");
                Ok(Report::success(json!({
                    "url": self.url,
                    "httpStatus": status.as_u16(),
                    "timeoutMs": timeout_ms,
                })))
            }
            Err(e) => Ok(Report::attempted_failed(json!({
                "url": self.url,
                "timeoutMs": timeout_ms,
                "error": { "kind": transport_kind(&e), "message": e.to_string() },
            }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probebench_core::domain::ProbeStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn ctx() -> ProbeContext {
        ProbeContext::new("run", std::env::temp_dir())
    }

    /// One-shot HTTP server answering with `status_line`
    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_error_status_still_counts_as_answered() {
        let url = serve_once("503 Service Unavailable").await;
        let report = HttpProbe::egress(url, Duration::from_secs(5))
            .execute(&ctx())
            .await
            .unwrap();

        assert_eq!(report.status, ProbeStatus::Success);
        assert_eq!(report.detail.as_value()["httpStatus"], 503);
    }

    #[tokio::test]
    async fn test_refused_connection_is_attempted_failed() {
        // Bind then drop to get a port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let report = HttpProbe::cloud_metadata(
            format!("http://127.0.0.1:{}/latest/meta-data/", port),
            Duration::from_secs(2),
        )
        .execute(&ctx())
        .await
        .unwrap();

        assert_eq!(report.status, ProbeStatus::AttemptedFailed);
        assert!(report.detail.as_value()["error"]["kind"].is_string());
    }

    #[test]
    fn test_identities() {
        let egress = HttpProbe::egress(DEFAULT_EGRESS_URL, DEFAULT_HTTP_TIMEOUT);
        let metadata = HttpProbe::cloud_metadata(DEFAULT_METADATA_URL, DEFAULT_METADATA_TIMEOUT);
        assert_eq!(egress.id(), "https-egress");
        assert_eq!(metadata.id(), "cloud-metadata");
        assert_eq!(metadata.category(), ProbeCategory::MetadataProbe);
    }

    #[tokio::test]
    async fn test_localhost_resolves() {
        let report = DnsLookupProbe::new("localhost").execute(&ctx()).await.unwrap();
        assert_eq!(report.status, ProbeStatus::Success);
    }
}
