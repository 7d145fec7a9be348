use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatcher;
use crate::endpoint::{Action, Resource};
use crate::error::StripeResult;
use crate::models::{Currency, DeletedObject, Inventory, PackageDimensions, Sku, SkuList};
use crate::params::{ParamValue, Params, ToParams};

/// Parameters for creating a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSku {
    /// Caller-chosen id; generated upstream when unset.
    #[serde(default)]
    pub id: Option<String>,
    pub currency: Currency,
    pub inventory: Inventory,
    pub price: i64,
    pub product: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    /// Key-value pairs, sent in the order given.
    #[serde(default)]
    pub metadata: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub package_dimensions: Option<PackageDimensions>,
}

impl CreateSku {
    pub fn new(
        currency: Currency,
        inventory: Inventory,
        price: i64,
        product: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            currency,
            inventory,
            price,
            product: product.into(),
            active: None,
            attributes: None,
            image: None,
            metadata: None,
            package_dimensions: None,
        }
    }
}

impl ToParams for CreateSku {
    fn to_params(&self) -> Params {
        Params::new()
            .field("id", self.id.as_ref())
            .field("currency", &self.currency)
            .field("inventory", ParamValue::object(&self.inventory))
            .field("price", self.price)
            .field("product", &self.product)
            .field("active", self.active)
            .field("attributes", self.attributes.clone())
            .field("image", self.image.as_ref())
            .field("metadata", self.metadata.as_deref().map(metadata))
            .field("package_dimensions", self.package_dimensions.as_ref().map(ParamValue::object))
    }
}

/// Parameters for updating a SKU. Unset fields are left unchanged upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSku {
    pub active: Option<bool>,
    pub attributes: Option<Vec<String>>,
    pub currency: Option<Currency>,
    pub image: Option<String>,
    pub inventory: Option<Inventory>,
    pub metadata: Option<Vec<(String, String)>>,
    pub package_dimensions: Option<PackageDimensions>,
    pub price: Option<i64>,
    pub product: Option<String>,
}

impl ToParams for UpdateSku {
    fn to_params(&self) -> Params {
        Params::new()
            .field("active", self.active)
            .field("attributes", self.attributes.clone())
            .field("currency", self.currency.as_ref())
            .field("image", self.image.as_ref())
            .field("inventory", self.inventory.as_ref().map(ParamValue::object))
            .field("metadata", self.metadata.as_deref().map(metadata))
            .field("package_dimensions", self.package_dimensions.as_ref().map(ParamValue::object))
            .field("price", self.price)
            .field("product", self.product.as_ref())
    }
}

fn metadata(entries: &[(String, String)]) -> ParamValue {
    ParamValue::map(entries.iter().map(|(key, value)| (key.as_str(), value.as_str())))
}

/// `/v1/skus`
#[derive(Debug, Clone, Copy)]
pub struct SkuRoutes<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> SkuRoutes<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create(&self, params: &CreateSku) -> StripeResult<Sku> {
        self.dispatcher
            .dispatch_single(Resource::Skus, None, Action::Create, &params.to_params(), &[])
            .await
    }

    pub async fn retrieve(&self, id: &str) -> StripeResult<Sku> {
        self.dispatcher
            .dispatch_single(Resource::Skus, Some(id), Action::Retrieve, &Params::new(), &[])
            .await
    }

    pub async fn update(&self, id: &str, params: &UpdateSku) -> StripeResult<Sku> {
        self.dispatcher
            .dispatch_single(Resource::Skus, Some(id), Action::Update, &params.to_params(), &[])
            .await
    }

    /// List SKUs matching `filter` (`active`, `product`, `limit`,
    /// `starting_after`, ...).
    pub async fn list_all(&self, filter: &Params) -> StripeResult<SkuList> {
        self.dispatcher
            .dispatch_list(Resource::Skus, Action::List, filter)
            .await
    }

    pub async fn delete(&self, id: &str) -> StripeResult<DeletedObject> {
        self.dispatcher
            .dispatch_single(Resource::Skus, Some(id), Action::Delete, &Params::new(), &[])
            .await
    }
}
