use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{HttpRequest, Transport};
use crate::error::{DnsError, Result};

const MAX_LOG_BODY: usize = 512;

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DnsError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| DnsError::Transport {
            status: None,
            message: format!("{} {} failed: {}", method, url, e),
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Error body: {}", truncate_for_log(&body));
            return Err(DnsError::Transport {
                status: Some(status.as_u16()),
                message: status_message(status),
            });
        }

        let bytes = response.bytes().await.map_err(|e| DnsError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to read response body: {}", e),
        })?;

        Ok(bytes.to_vec())
    }
}

/// "Not Found (404)"
fn status_message(status: StatusCode) -> String {
    format!(
        "{} ({})",
        status.canonical_reason().unwrap_or("Unknown Status"),
        status.as_u16()
    )
}

fn truncate_for_log(text: &str) -> String {
    if text.len() <= MAX_LOG_BODY {
        return text.to_string();
    }
    let mut end = MAX_LOG_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes)", &text[..end], text.len())
}
