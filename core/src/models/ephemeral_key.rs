use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::HasId;

/// A short-lived key scoped to one customer, handed to mobile clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemeralKey {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub associated_objects: Vec<AssociatedObject>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires: DateTime<Utc>,
    pub livemode: bool,
    /// Only present in the create response.
    #[serde(default)]
    pub secret: Option<String>,
}

impl HasId for EphemeralKey {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}
