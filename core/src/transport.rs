//! The HTTP round-trip, behind a trait so tests can replace it.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, RawResponse, RequestSpec};

/// Executes one request and returns whatever the server answered.
///
/// Non-2xx statuses are *not* errors at this layer; only failures to complete
/// the exchange are.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestSpec) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Wrap an existing client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestSpec) -> Result<RawResponse, TransportError> {
        let url = request.url();
        let body = request.form_body();
        let method = request.method;

        let mut builder = self
            .inner
            .request(http::Method::from(method), url)
            .headers(request.headers);
        if let Some(body) = body {
            builder = builder.body(body);
        } else if method == HttpMethod::Post {
            builder = builder.header(http::header::CONTENT_LENGTH, "0");
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
