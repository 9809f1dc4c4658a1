use crate::{Error, Result};
use reqwest::{Method, Proxy};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A fully described outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
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

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body and mark it as JSON.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_string(value)?;
        Ok(self
            .header("Content-Type", "application/json")
            .body(body))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// Status and fully read body. Non-2xx statuses are not errors at this layer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(proxy_url: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    crate::ErrorContext::new()
                        .with_field_path("generator.proxy_url")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue `request` under a deadline.
    ///
    /// A cancellation token fires after `timeout`; when it does, the in-flight request
    /// (body read included) is dropped, which aborts the connection, and
    /// [`Error::Timeout`] is returned. Connection failures become [`Error::Network`];
    /// other transport errors pass through as [`Error::Transport`].
    pub async fn fetch_with_timeout(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse> {
        let token = CancellationToken::new();
        let timer = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                token.cancel();
            })
        };

        let timeout_ms = timeout.as_millis() as u64;
        let url = request.url.clone();
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!(url = url.as_str(), timeout_ms, "request aborted at deadline");
                Err(Error::Timeout { timeout_ms })
            }
            res = self.send(request, timeout_ms) => res,
        };
        timer.abort();
        result
    }

    async fn send(&self, request: HttpRequest, timeout_ms: u64) -> Result<HttpResponse> {
        let mut req = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| classify(e, timeout_ms))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| classify(e, timeout_ms))?;
        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

fn classify(e: reqwest::Error, timeout_ms: u64) -> Error {
    if e.is_connect() {
        Error::Network {
            cause: e.to_string(),
        }
    } else if e.is_timeout() {
        Error::Timeout { timeout_ms }
    } else {
        Error::Transport(TransportError::Http(e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_json() {
        let req = HttpRequest::post("http://localhost/x")
            .json(&serde_json::json!({"a": 1}))
            .unwrap();
        assert!(req.has_header("content-type"));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse {
            status: 204,
            reason: "No Content".into(),
            body: String::new(),
        };
        let bad = HttpResponse {
            status: 500,
            reason: "Internal Server Error".into(),
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
