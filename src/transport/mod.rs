//! HTTP plumbing consumed by the providers.
//!
//! Providers build an [`HttpRequest`] and hand it to a [`Transport`]; the
//! transport sends it, rejects any status outside 2xx and returns the raw
//! body. Tests substitute their own transport instead of a real network.

mod http;

pub use http::ReqwestTransport;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use crate::error::{DnsError, Result};

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(payload).map_err(DnsError::Encode)?);
        Ok(self)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the response body.
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::POST, "https://example.test/records")
            .header("Auth-API-Token", "secret")
            .json(&serde_json::json!({"name": "www"}))
            .unwrap();

        assert_eq!(request.header_value("auth-api-token"), Some("secret"));
        assert_eq!(request.body.as_deref(), Some(br#"{"name":"www"}"#.as_slice()));
        assert!(request.header_value("Authorization").is_none());
    }
}
