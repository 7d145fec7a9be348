//! JSON response decoding into typed records and list envelopes.
//!
//! # Design
//! Field-level rules (wire names, optional fields, timestamps) live on the
//! model types as serde attributes; this module only decides *which* shape to
//! decode and turns every failure into a single `SchemaViolation` that names
//! the field path where it happened. The body is parsed into a `serde_json::Value` once so the
//! `"object": "list"` tag can be inspected before committing to a shape, and
//! list elements are decoded one by one so a bad element reports its index.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::error::{ApiError, StripeError, StripeResult};

const LIST_OBJECT: &str = "list";

/// A paginated collection as returned by list endpoints.
///
/// `has_more == false` means `data` holds every result for the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub object: String,
    pub has_more: bool,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Id of the last element, for use as `starting_after` on the next page.
    pub fn last_id(&self) -> Option<&str>
    where
        T: HasId,
    {
        self.data.last().map(HasId::id)
    }
}

/// Records carrying an upstream `id`.
pub trait HasId {
    fn id(&self) -> &str;
}

/// A successfully decoded body: one record or a list envelope of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Single(T),
    List(ListEnvelope<T>),
}

impl<T> Decoded<T> {
    pub fn into_single(self) -> StripeResult<T> {
        match self {
            Decoded::Single(value) => Ok(value),
            Decoded::List(_) => Err(StripeError::schema(
                "$",
                "expected a single object, found a list envelope",
            )),
        }
    }

    pub fn into_list(self) -> StripeResult<ListEnvelope<T>> {
        match self {
            Decoded::List(list) => Ok(list),
            Decoded::Single(_) => Err(StripeError::schema(
                "$",
                "expected a list envelope, found a single object",
            )),
        }
    }
}

/// Decode a body, picking the list shape when the top-level object is tagged
/// `"object": "list"`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StripeResult<Decoded<T>> {
    decode_value(parse_body(bytes)?)
}

/// Decode a body that must be a single record.
pub fn decode_single<T: DeserializeOwned>(bytes: &[u8]) -> StripeResult<T> {
    decode(bytes)?.into_single()
}

/// Decode a body that must be a list envelope.
pub fn decode_list<T: DeserializeOwned>(bytes: &[u8]) -> StripeResult<ListEnvelope<T>> {
    decode(bytes)?.into_list()
}

/// Parse a body as JSON without committing to a shape.
pub fn parse_body(bytes: &[u8]) -> StripeResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| StripeError::schema("$", e))
}

/// `decode` over a body that has already been parsed.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> StripeResult<Decoded<T>> {
    if is_list(&value) {
        decode_list_value(value).map(Decoded::List)
    } else {
        from_value(value, "$").map(Decoded::Single)
    }
}

/// The upstream error envelope carried by a parsed body, if there is one.
///
/// Checked on every response, since a rejection is signalled by the envelope
/// as well as by the status.
pub fn error_envelope(status: u16, value: &Value) -> Option<ApiError> {
    let error = value.get("error").filter(|e| e.is_object())?;
    let mut api = ApiError::deserialize(error).unwrap_or_else(|_| {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_string);
        generic_error(status, message)
    });
    api.status = Some(status);
    Some(api)
}

/// Build an `ApiError` from a rejected response.
///
/// Falls back to a generic `api_error` carrying the raw body when the
/// envelope is missing.
pub fn decode_error(status: u16, bytes: &[u8]) -> ApiError {
    let envelope = serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|value| error_envelope(status, &value));
    if let Some(error) = envelope {
        return error;
    }

    let body = String::from_utf8_lossy(bytes).trim().to_string();
    let message = if body.is_empty() {
        http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    };
    generic_error(status, message)
}

fn generic_error(status: u16, message: String) -> ApiError {
    ApiError {
        error_type: "api_error".to_string(),
        message,
        status: Some(status),
        code: None,
        param: None,
    }
}

fn is_list(value: &Value) -> bool {
    value.get("object").and_then(Value::as_str) == Some(LIST_OBJECT)
}

fn decode_list_value<T: DeserializeOwned>(mut value: Value) -> StripeResult<ListEnvelope<T>> {
    let data = match value.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => {
            return Err(StripeError::schema("$.data", "missing field `data`"));
        }
        Some(other) => {
            return Err(StripeError::schema(
                "$.data",
                format!("expected an array, found {}", kind(&other)),
            ));
        }
    };

    let header: ListHeader = from_value(value, "$")?;
    let data = data
        .into_iter()
        .enumerate()
        .map(|(index, item)| from_value(item, &format!("$.data[{index}]")))
        .collect::<StripeResult<Vec<T>>>()?;

    Ok(ListEnvelope {
        object: header.object,
        has_more: header.has_more,
        total_count: header.total_count,
        url: header.url,
        data,
    })
}

/// The envelope fields of a list, decoded separately from `data`.
#[derive(Deserialize)]
struct ListHeader {
    object: String,
    has_more: bool,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    url: Option<String>,
}

/// Deserialize `value`, reporting failures at `base` plus the field path
/// inside it (`$.inventory.type`, `$.data[1].price`).
fn from_value<T: DeserializeOwned>(value: Value, base: &str) -> StripeResult<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = json_path(base, err.path());
        StripeError::schema(path, err.into_inner())
    })
}

fn json_path(base: &str, path: &serde_path_to_error::Path) -> String {
    let mut out = base.to_string();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => out.push_str(&format!("[{index}]")),
            Segment::Map { key } => {
                out.push('.');
                out.push_str(key);
            }
            Segment::Enum { variant } => {
                out.push('.');
                out.push_str(variant);
            }
            Segment::Unknown => out.push_str(".?"),
        }
    }
    out
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        count: i64,
        #[serde(default)]
        note: Option<String>,
        #[serde(with = "chrono::serde::ts_seconds")]
        created: DateTime<Utc>,
    }

    const THING: &str = r#"{"id":"th_1","object":"thing","count":4,"note":null,"created":1517702745,"extra":"ignored"}"#;

    #[test]
    fn single_record_ignores_unknown_keys() {
        let thing: Thing = decode_single(THING.as_bytes()).unwrap();
        assert_eq!(thing.id, "th_1");
        assert_eq!(thing.count, 4);
        assert_eq!(thing.note, None);
        assert_eq!(thing.created.timestamp(), 1517702745);
    }

    #[test]
    fn empty_list_envelope() {
        let body = r#"{"object":"list","has_more":false,"total_count":0,"data":[],"url":"/v1/x"}"#;
        let list: ListEnvelope<Thing> = decode_list(body.as_bytes()).unwrap();
        assert!(!list.has_more);
        assert!(list.is_empty());
        assert_eq!(list.total_count, Some(0));
        assert_eq!(list.url.as_deref(), Some("/v1/x"));
    }

    #[test]
    fn list_element_matches_direct_decode() {
        let body = format!(r#"{{"object":"list","has_more":true,"data":[{THING}],"url":"/v1/x"}}"#);
        let list: ListEnvelope<Thing> = decode_list(body.as_bytes()).unwrap();
        let direct: Thing = decode_single(THING.as_bytes()).unwrap();
        assert!(list.has_more);
        assert_eq!(list.total_count, None);
        assert_eq!(list.data, vec![direct]);
    }

    #[test]
    fn missing_required_field_is_schema_violation() {
        let body = r#"{"id":"th_1","created":1517702745}"#;
        let err = decode_single::<Thing>(body.as_bytes()).unwrap_err();
        match err {
            StripeError::SchemaViolation { path, message } => {
                assert_eq!(path, "$");
                assert!(message.contains("count"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_required_field_names_its_path() {
        let body = r#"{"id":"th_1","count":null,"created":1517702745}"#;
        let err = decode_single::<Thing>(body.as_bytes()).unwrap_err();
        assert!(
            matches!(&err, StripeError::SchemaViolation { path, .. } if path == "$.count"),
            "{err:?}"
        );
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        id: String,
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        #[serde(rename = "type")]
        kind: String,
        quantity: i64,
    }

    #[test]
    fn nested_missing_field_names_the_enclosing_object() {
        let body = r#"{"id":"o_1","inner":{"quantity":3}}"#;
        match decode_single::<Outer>(body.as_bytes()).unwrap_err() {
            StripeError::SchemaViolation { path, message } => {
                assert_eq!(path, "$.inner");
                assert!(message.contains("`type`"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_wrong_type_in_list_element_names_full_path() {
        let body = r#"{"object":"list","has_more":false,"data":[
            {"id":"o_1","inner":{"type":"a","quantity":1}},
            {"id":"o_2","inner":{"type":"b","quantity":"two"}}
        ]}"#;
        let err = decode_list::<Outer>(body.as_bytes()).unwrap_err();
        assert!(
            matches!(&err, StripeError::SchemaViolation { path, .. } if path == "$.data[1].inner.quantity"),
            "{err:?}"
        );
    }

    #[test]
    fn bad_list_element_reports_its_index() {
        let body = format!(
            r#"{{"object":"list","has_more":false,"data":[{THING},{{"id":"th_2"}}]}}"#
        );
        let err = decode_list::<Thing>(body.as_bytes()).unwrap_err();
        assert!(
            matches!(&err, StripeError::SchemaViolation { path, .. } if path == "$.data[1]"),
            "{err:?}"
        );
    }

    #[test]
    fn list_without_data_array_is_schema_violation() {
        let body = r#"{"object":"list","has_more":false,"data":{}}"#;
        let err = decode_list::<Thing>(body.as_bytes()).unwrap_err();
        assert!(matches!(&err, StripeError::SchemaViolation { path, .. } if path == "$.data"));
    }

    #[test]
    fn malformed_json_is_schema_violation() {
        assert!(matches!(
            decode::<Thing>(b"not json"),
            Err(StripeError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn shape_mismatch_is_schema_violation() {
        let body = r#"{"object":"list","has_more":false,"data":[]}"#;
        match decode_single::<Thing>(body.as_bytes()).unwrap_err() {
            StripeError::SchemaViolation { path, message } => {
                assert_eq!(path, "$");
                assert!(message.contains("list envelope"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            decode_list::<Thing>(THING.as_bytes()),
            Err(StripeError::SchemaViolation { ref path, .. }) if path == "$"
        ));
    }

    #[test]
    fn error_envelope_is_decoded_with_status() {
        let body = r#"{"error":{"type":"card_error","message":"Your card was declined.","code":"card_declined"}}"#;
        let err = decode_error(402, body.as_bytes());
        assert_eq!(err.error_type, "card_error");
        assert_eq!(err.message, "Your card was declined.");
        assert_eq!(err.code.as_deref(), Some("card_declined"));
        assert_eq!(err.status, Some(402));
    }

    #[test]
    fn error_envelope_is_found_in_any_body() {
        let value: Value = serde_json::from_str(
            r#"{"error":{"type":"invalid_request_error","message":"No such sku"}}"#,
        )
        .unwrap();
        let err = error_envelope(200, &value).unwrap();
        assert_eq!(err.error_type, "invalid_request_error");
        assert_eq!(err.status, Some(200));

        let thing: Value = serde_json::from_str(THING).unwrap();
        assert!(error_envelope(200, &thing).is_none());

        let partial: Value = serde_json::from_str(r#"{"error":{"message":"odd"}}"#).unwrap();
        let err = error_envelope(400, &partial).unwrap();
        assert_eq!(err.error_type, "api_error");
        assert_eq!(err.message, "odd");
    }

    #[test]
    fn missing_envelope_falls_back_to_body_or_reason() {
        let err = decode_error(502, b"upstream exploded");
        assert_eq!(err.error_type, "api_error");
        assert_eq!(err.message, "upstream exploded");

        let err = decode_error(503, b"");
        assert_eq!(err.message, "Service Unavailable");
    }
}
