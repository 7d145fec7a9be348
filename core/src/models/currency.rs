use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::params::ParamValue;

/// ISO 4217 currency code, lowercase on the wire.
///
/// Codes without a variant round-trip through `Other` so a new currency on
/// the upstream never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    Jpy,
    Other(String),
}

impl Currency {
    pub fn as_str(&self) -> &str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Cad => "cad",
            Currency::Aud => "aud",
            Currency::Jpy => "jpy",
            Currency::Other(code) => code,
        }
    }

    pub fn parse(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "usd" => Currency::Usd,
            "eur" => Currency::Eur,
            "gbp" => Currency::Gbp,
            "cad" => Currency::Cad,
            "aud" => Currency::Aud,
            "jpy" => Currency::Jpy,
            other => Currency::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Currency::parse(&code))
    }
}

impl From<Currency> for ParamValue {
    fn from(value: Currency) -> Self {
        ParamValue::Str(value.as_str().to_string())
    }
}

impl From<&Currency> for ParamValue {
    fn from(value: &Currency) -> Self {
        ParamValue::Str(value.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_codes() {
        let known: Currency = serde_json::from_str(r#""usd""#).unwrap();
        assert_eq!(known, Currency::Usd);
        let unknown: Currency = serde_json::from_str(r#""chf""#).unwrap();
        assert_eq!(unknown, Currency::Other("chf".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), r#""chf""#);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::parse("EUR"), Currency::Eur);
    }
}
