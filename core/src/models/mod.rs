//! Typed records returned by the upstream API.
//!
//! # Design
//! Wire keys are snake_case and so are Rust field names, so most fields need
//! no attribute at all; the exceptions (`type`) are renamed explicitly.
//! Everything the upstream may omit or send as `null` is an `Option`.
//! Timestamps are opted in per field with `chrono::serde::ts_seconds`, so a
//! plain integer such as `price` is never read as a time.

mod currency;
mod customer;
mod ephemeral_key;
mod order_return;
mod sku;

use serde::{Deserialize, Serialize};

use crate::decode::{HasId, ListEnvelope};

pub use currency::Currency;
pub use customer::{Customer, CustomerList, Discount, Shipping, ShippingAddress};
pub use ephemeral_key::{AssociatedObject, EphemeralKey};
pub use order_return::{OrderItem, OrderReturn, OrderReturnList};
pub use sku::{Inventory, InventoryType, InventoryValue, PackageDimensions, Sku, SkuList};

/// Response to a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedObject {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    pub deleted: bool,
}

impl HasId for DeletedObject {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A list whose element schema is not modelled.
pub type RawList = ListEnvelope<serde_json::Value>;
