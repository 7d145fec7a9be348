use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::decode::{HasId, ListEnvelope};
use crate::params::{ParamValue, Params, ToParams};

pub type SkuList = ListEnvelope<Sku>;

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    pub currency: Currency,
    #[serde(default)]
    pub image: Option<String>,
    pub inventory: Inventory,
    #[serde(default)]
    pub livemode: Option<bool>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub package_dimensions: Option<PackageDimensions>,
    pub price: i64,
    pub product: String,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated: Option<DateTime<Utc>>,
}

impl HasId for Sku {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Finite,
    Bucket,
    Infinite,
}

impl InventoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryType::Finite => "finite",
            InventoryType::Bucket => "bucket",
            InventoryType::Infinite => "infinite",
        }
    }
}

/// Availability level for `bucket` inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryValue {
    InStock,
    Limited,
    OutOfStock,
}

impl InventoryValue {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryValue::InStock => "in_stock",
            InventoryValue::Limited => "limited",
            InventoryValue::OutOfStock => "out_of_stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "type")]
    pub inventory_type: InventoryType,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub value: Option<InventoryValue>,
}

impl Inventory {
    pub fn finite(quantity: i64) -> Self {
        Self {
            inventory_type: InventoryType::Finite,
            quantity: Some(quantity),
            value: None,
        }
    }

    pub fn bucket(value: InventoryValue) -> Self {
        Self {
            inventory_type: InventoryType::Bucket,
            quantity: None,
            value: Some(value),
        }
    }

    pub fn infinite() -> Self {
        Self {
            inventory_type: InventoryType::Infinite,
            quantity: None,
            value: None,
        }
    }
}

impl ToParams for Inventory {
    fn to_params(&self) -> Params {
        Params::new()
            .field("type", self.inventory_type.as_str())
            .field("quantity", self.quantity)
            .field("value", self.value.map(InventoryValue::as_str))
    }
}

/// Shipping dimensions in inches and ounces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDimensions {
    pub height: f64,
    pub length: f64,
    pub weight: f64,
    pub width: f64,
}

impl ToParams for PackageDimensions {
    fn to_params(&self) -> Params {
        // Decimals travel as their shortest round-trip string.
        Params::new()
            .field("height", ParamValue::Str(self.height.to_string()))
            .field("length", ParamValue::Str(self.length.to_string()))
            .field("weight", ParamValue::Str(self.weight.to_string()))
            .field("width", ParamValue::Str(self.width.to_string()))
    }
}
