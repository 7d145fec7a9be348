//! Request parameter trees and their bracket-key flattening.
//!
//! # Design
//! The upstream API only accepts flat `application/x-www-form-urlencoded`
//! bodies and query strings, so nested parameters are flattened into
//! bracketed key paths (`inventory[type]`, `attributes[0]`,
//! `metadata[order_id]`). `ParamValue` is the closed set of values a caller
//! can pass; `encode` walks it depth-first and emits pairs in insertion
//! order, which keeps the output reproducible across calls.
//!
//! Absent values are dropped at every depth. Empty lists and maps also
//! produce no pairs, so there is no way to send "clear this field" through
//! the encoder.
//!
//! Keys and values are emitted raw; percent-encoding is applied later by
//! `RequestSpec`.

/// A single flattened `key=value` pair, not yet percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPair {
    pub key: String,
    pub value: String,
}

impl EncodedPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<(&str, &str)> for EncodedPair {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}

/// Any value that can appear in a request body or query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamValue {
    /// Unset. Never emitted.
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Str(String),
    /// Emitted as `prefix[0]`, `prefix[1]`, ...
    List(Vec<ParamValue>),
    /// Emitted as `prefix[key]` in insertion order.
    Map(Vec<(String, ParamValue)>),
    /// A structured sub-object, emitted as `prefix[field]` per wire name.
    Object(Params),
}

impl ParamValue {
    /// Wrap a structured value as a nested object.
    pub fn object<T: ToParams + ?Sized>(value: &T) -> Self {
        Self::Object(value.to_params())
    }

    /// A mapping emitted in the order `entries` yields, without sorting.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A type with a declared set of wire fields.
///
/// Implementors list their fields in declaration order using snake_case wire
/// names; unset optional fields should map to `ParamValue::Absent`.
pub trait ToParams {
    fn to_params(&self) -> Params;
}

impl ToParams for Params {
    fn to_params(&self) -> Params {
        self.clone()
    }
}

/// An ordered bag of named parameters.
///
/// Used both as the top-level parameter set of a request and as the body of
/// `ParamValue::Object`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    fields: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name` to `value`. An existing entry keeps its position and has its
    /// value replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_absent())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Flatten every field using its bare name as the root key.
    pub fn encode(&self) -> Vec<EncodedPair> {
        let mut out = Vec::new();
        for (name, value) in &self.fields {
            encode_into(value, name, &mut out);
        }
        out
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Flatten `value` under `prefix`.
///
/// With no prefix, map and object entries become root keys. A bare scalar
/// with no prefix has no key to live under and yields nothing.
pub fn encode(value: &ParamValue, prefix: Option<&str>) -> Vec<EncodedPair> {
    let mut out = Vec::new();
    match prefix {
        Some(prefix) => encode_into(value, prefix, &mut out),
        None => match value {
            ParamValue::Map(entries) => {
                for (key, value) in entries {
                    encode_into(value, key, &mut out);
                }
            }
            ParamValue::Object(params) => out = params.encode(),
            _ => {}
        },
    }
    out
}

fn encode_into(value: &ParamValue, key: &str, out: &mut Vec<EncodedPair>) {
    match value {
        ParamValue::Absent => {}
        ParamValue::Bool(b) => out.push(EncodedPair::new(key, if *b { "true" } else { "false" })),
        ParamValue::Int(n) => out.push(EncodedPair::new(key, n.to_string())),
        ParamValue::Str(s) => out.push(EncodedPair::new(key, s.as_str())),
        ParamValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                encode_into(item, &format!("{key}[{index}]"), out);
            }
        }
        ParamValue::Map(entries) => {
            for (name, item) in entries {
                encode_into(item, &format!("{key}[{name}]"), out);
            }
        }
        ParamValue::Object(params) => {
            for (name, item) in params.iter() {
                encode_into(item, &format!("{key}[{name}]"), out);
            }
        }
    }
}

// --- conversions ---

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
