use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::decode::{HasId, ListEnvelope};

pub type OrderReturnList = ListEnvelope<OrderReturn>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReturn {
    pub id: String,
    pub object: String,
    pub amount: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    pub currency: Currency,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub livemode: bool,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub refund: Option<String>,
}

impl HasId for OrderReturn {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A line on an order or order return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub object: String,
    pub amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}
