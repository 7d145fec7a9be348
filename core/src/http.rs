//! HTTP request and response types exchanged with the transport.
//!
//! # Design
//! `RequestSpec` is plain data: the dispatcher builds it, the transport
//! consumes it exactly once. Parameters stay as unescaped `EncodedPair`s until
//! `url()` / `form_body()` percent-encode them, so tests can assert on the
//! flattened keys directly. Headers live in an `http::HeaderMap`, which gives
//! case-insensitive names and last-write-wins `insert`.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{StripeError, StripeResult};
use crate::params::EncodedPair;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// A fully built request, ready for one trip through the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub base_url: String,
    pub path: String,
    pub query: Vec<EncodedPair>,
    pub body: Vec<EncodedPair>,
    pub headers: HeaderMap,
    /// Correlation id, also sent as `X-Request-Id`.
    pub request_id: String,
}

impl RequestSpec {
    /// Absolute URL including the percent-encoded query string.
    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.base_url, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&form_encode(&self.query));
        }
        url
    }

    /// The `application/x-www-form-urlencoded` body, if the request has one.
    pub fn form_body(&self) -> Option<String> {
        if self.body.is_empty() {
            None
        } else {
            Some(form_encode(&self.body))
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Percent-encode pairs in order.
pub fn form_encode(pairs: &[EncodedPair]) -> String {
    let tuples: Vec<(&str, &str)> = pairs
        .iter()
        .map(|p| (p.key.as_str(), p.value.as_str()))
        .collect();
    // Serializing a slice of string tuples cannot fail.
    serde_urlencoded::to_string(tuples).unwrap_or_default()
}

/// Insert or replace a header, validating name and value.
pub fn set_header(headers: &mut HeaderMap, name: &str, value: &str) -> StripeResult<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| StripeError::InvalidHeader(format!("name {name:?}")))?;
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| StripeError::InvalidHeader(format!("value for {name}")))?;
    if name == http::header::AUTHORIZATION {
        value.set_sensitive(true);
    }
    headers.insert(name, value);
    Ok(())
}

/// A response described as plain data.
///
/// Built by the transport after the round-trip; the dispatcher consumes it
/// while decoding and does not keep it afterwards.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(query: Vec<EncodedPair>, body: Vec<EncodedPair>) -> RequestSpec {
        RequestSpec {
            method: HttpMethod::Get,
            base_url: "http://localhost:12111".to_string(),
            path: "/v1/skus".to_string(),
            query,
            body,
            headers: HeaderMap::new(),
            request_id: "req_test".to_string(),
        }
    }

    #[test]
    fn url_without_query_has_no_question_mark() {
        assert_eq!(spec(vec![], vec![]).url(), "http://localhost:12111/v1/skus");
    }

    #[test]
    fn query_keys_and_values_are_percent_encoded() {
        let req = spec(
            vec![
                EncodedPair::new("limit", "3"),
                EncodedPair::new("attributes[color]", "dark red"),
            ],
            vec![],
        );
        assert_eq!(
            req.url(),
            "http://localhost:12111/v1/skus?limit=3&attributes%5Bcolor%5D=dark+red"
        );
    }

    #[test]
    fn form_body_preserves_order() {
        let req = spec(
            vec![],
            vec![
                EncodedPair::new("inventory[type]", "finite"),
                EncodedPair::new("inventory[quantity]", "10"),
            ],
        );
        assert_eq!(
            req.form_body().as_deref(),
            Some("inventory%5Btype%5D=finite&inventory%5Bquantity%5D=10")
        );
        assert!(spec(vec![], vec![]).form_body().is_none());
    }

    #[test]
    fn headers_are_case_insensitive_last_write_wins() {
        let mut headers = HeaderMap::new();
        set_header(&mut headers, "Stripe-Version", "2017-08-15").unwrap();
        set_header(&mut headers, "stripe-version", "2018-02-28").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("STRIPE-VERSION").unwrap(), "2018-02-28");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let mut headers = HeaderMap::new();
        let err = set_header(&mut headers, "bad header", "x").unwrap_err();
        assert!(matches!(err, StripeError::InvalidHeader(_)));
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let mut resp = RawResponse::new(200, "{}");
        resp.headers
            .push(("Request-Id".to_string(), "req_1".to_string()));
        assert_eq!(resp.header("request-id"), Some("req_1"));
        assert!(resp.is_success());
    }
}
