//! In-memory stand-in for the subset of the Stripe API the client covers.
//!
//! Accepts bracket-keyed form bodies, answers with Stripe-shaped JSON, list
//! envelopes and `{"error": {...}}` envelopes. State lives in one `RwLock`ed
//! store per router instance.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const STRIPE_VERSION: &str = "stripe-version";
pub const DEFAULT_VERSION: &str = "2017-08-15";
pub const SEEDED_ORDER_RETURN: &str = "orret_seeded";
const EPHEMERAL_KEY_TTL_SECS: i64 = 3600;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sku {
    pub id: String,
    pub object: String,
    pub active: bool,
    pub attributes: BTreeMap<String, String>,
    pub created: i64,
    pub currency: String,
    pub image: Option<String>,
    pub inventory: Inventory,
    pub livemode: bool,
    pub metadata: BTreeMap<String, String>,
    pub package_dimensions: Option<BTreeMap<String, f64>>,
    pub price: i64,
    pub product: String,
    pub updated: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: Option<i64>,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub object: String,
    pub account_balance: i64,
    pub created: i64,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub livemode: bool,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct Store {
    skus: BTreeMap<String, Sku>,
    customers: BTreeMap<String, Customer>,
    ephemeral_keys: HashMap<String, Value>,
    order_returns: BTreeMap<String, Value>,
}

pub type Db = Arc<RwLock<Store>>;

/// A Stripe-style error response.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: Value,
}

impl ApiFailure {
    fn new(status: StatusCode, kind: &str, message: String, code: Option<&str>, param: Option<&str>) -> Self {
        Self {
            status,
            body: json!({
                "error": {
                    "type": kind,
                    "message": message,
                    "code": code,
                    "param": param,
                }
            }),
        }
    }

    fn missing(resource: &str, id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "invalid_request_error",
            format!("No such {resource}: {id}"),
            Some("resource_missing"),
            Some("id"),
        )
    }

    fn missing_param(param: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            format!("Missing required param: {param}."),
            Some("parameter_missing"),
            Some(param),
        )
    }

    fn invalid_param(param: &str, value: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            format!("Invalid value for {param}: {value}"),
            Some("parameter_invalid"),
            Some(param),
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiFailure>;

/// Flattened form or query pairs, looked up by bracket key.
struct Fields(Vec<(String, String)>);

impl Fields {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &str) -> ApiResult<&str> {
        self.get(key).ok_or_else(|| ApiFailure::missing_param(key))
    }

    fn int(&self, key: &str) -> ApiResult<Option<i64>> {
        self.get(key)
            .map(|v| v.parse::<i64>().map_err(|_| ApiFailure::invalid_param(key, v)))
            .transpose()
    }

    fn bool(&self, key: &str) -> ApiResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(ApiFailure::invalid_param(key, other)),
        }
    }

    /// Entries under `root[...]`, keyed by the bracketed segment, in order.
    fn nested(&self, root: &str) -> Vec<(&str, &str)> {
        let prefix = format!("{root}[");
        self.0
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(|inner| (inner, v.as_str()))
            })
            .collect()
    }

    fn has_nested(&self, root: &str) -> bool {
        !self.nested(root).is_empty()
    }

    fn map(&self, root: &str) -> BTreeMap<String, String> {
        self.nested(root)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// `attributes[0]`, `attributes[1]` ... stored as `{"0": .., "1": ..}`.
    /// Segments that are not list indices are rejected.
    fn indexed(&self, root: &str) -> ApiResult<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        for (index, value) in self.nested(root) {
            if index.parse::<usize>().is_err() {
                return Err(ApiFailure::invalid_param(root, index));
            }
            out.insert(index.to_string(), value.to_string());
        }
        Ok(out)
    }

    fn inventory(&self) -> ApiResult<Inventory> {
        let kind = self.require("inventory[type]")?.to_string();
        if !matches!(kind.as_str(), "finite" | "bucket" | "infinite") {
            return Err(ApiFailure::invalid_param("inventory[type]", &kind));
        }
        Ok(Inventory {
            kind,
            quantity: self.int("inventory[quantity]")?,
            value: self.get("inventory[value]").map(str::to_string),
        })
    }

    fn package_dimensions(&self) -> ApiResult<Option<BTreeMap<String, f64>>> {
        if !self.has_nested("package_dimensions") {
            return Ok(None);
        }
        let mut dims = BTreeMap::new();
        for (key, value) in self.nested("package_dimensions") {
            let parsed = value
                .parse()
                .map_err(|_| ApiFailure::invalid_param("package_dimensions", value))?;
            dims.insert(key.to_string(), parsed);
        }
        Ok(Some(dims))
    }
}

fn new_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &raw[..14])
}

fn list_envelope<T: Serialize>(url: &str, items: Vec<T>, has_more: bool) -> Value {
    json!({
        "object": "list",
        "url": url,
        "has_more": has_more,
        "total_count": items.len(),
        "data": items,
    })
}

fn deleted(id: &str) -> Value {
    json!({ "id": id, "deleted": true })
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    seed(&db);
    Router::new()
        .route("/v1/skus", get(list_skus).post(create_sku))
        .route("/v1/skus/{id}", get(get_sku).post(update_sku).delete(delete_sku))
        .route("/v1/customers", get(list_customers).post(create_customer))
        .route(
            "/v1/customers/{id}",
            get(get_customer).post(update_customer).delete(delete_customer),
        )
        .route("/v1/ephemeral_keys", axum::routing::post(create_ephemeral_key))
        .route("/v1/ephemeral_keys/{id}", axum::routing::delete(delete_ephemeral_key))
        .route("/v1/order_returns", get(list_order_returns))
        .route("/v1/order_returns/{id}", get(get_order_return))
        .layer(middleware::from_fn(require_api_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn seed(db: &Db) {
    let order_return = json!({
        "id": SEEDED_ORDER_RETURN,
        "object": "order_return",
        "amount": 1500,
        "created": 1517702745,
        "currency": "usd",
        "items": [{
            "object": "order_item",
            "amount": 1500,
            "currency": "usd",
            "description": "T-shirt",
            "parent": "sku_seeded",
            "quantity": 1,
            "type": "sku"
        }],
        "livemode": false,
        "order": "or_seeded",
        "refund": null
    });
    // Fresh store, no other handle exists yet.
    if let Ok(mut store) = db.try_write() {
        store
            .order_returns
            .insert(SEEDED_ORDER_RETURN.to_string(), order_return);
    }
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|key| key.starts_with("sk_"));
    if !authorized {
        return ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "invalid_request_error",
            "You did not provide an API key.".to_string(),
            None,
            None,
        )
        .into_response();
    }
    next.run(request).await
}

// --- skus ---

async fn create_sku(State(db): State<Db>, Form(form): Form<Vec<(String, String)>>) -> ApiResult<Json<Sku>> {
    let fields = Fields(form);
    let now = Utc::now().timestamp();
    let id = fields
        .get("id")
        .map(str::to_string)
        .unwrap_or_else(|| new_id("sku"));
    let sku = Sku {
        id: id.clone(),
        object: "sku".to_string(),
        active: fields.bool("active")?.unwrap_or(true),
        attributes: fields.indexed("attributes")?,
        created: now,
        currency: fields.require("currency")?.to_string(),
        image: fields.get("image").map(str::to_string),
        inventory: fields.inventory()?,
        livemode: false,
        metadata: fields.map("metadata"),
        package_dimensions: fields.package_dimensions()?,
        price: fields.int("price")?.ok_or_else(|| ApiFailure::missing_param("price"))?,
        product: fields.require("product")?.to_string(),
        updated: now,
    };
    debug!(%id, "created sku");
    db.write().await.skus.insert(id, sku.clone());
    Ok(Json(sku))
}

async fn list_skus(State(db): State<Db>, Query(query): Query<Vec<(String, String)>>) -> ApiResult<Json<Value>> {
    let fields = Fields(query);
    let active = fields.bool("active")?;
    let product = fields.get("product");
    let limit = fields.int("limit")?.unwrap_or(10).max(0) as usize;

    let store = db.read().await;
    let matching: Vec<Sku> = store
        .skus
        .values()
        .filter(|sku| active.map_or(true, |a| sku.active == a))
        .filter(|sku| product.map_or(true, |p| sku.product == p))
        .cloned()
        .collect();
    let has_more = matching.len() > limit;
    let page: Vec<Sku> = matching.into_iter().take(limit).collect();
    Ok(Json(list_envelope("/v1/skus", page, has_more)))
}

async fn get_sku(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Sku>> {
    let store = db.read().await;
    store
        .skus
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::missing("sku", &id))
}

async fn update_sku(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult<Json<Sku>> {
    let fields = Fields(form);
    let mut store = db.write().await;
    let sku = store
        .skus
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::missing("sku", &id))?;

    if let Some(active) = fields.bool("active")? {
        sku.active = active;
    }
    if fields.has_nested("attributes") {
        sku.attributes = fields.indexed("attributes")?;
    }
    if let Some(currency) = fields.get("currency") {
        sku.currency = currency.to_string();
    }
    if let Some(image) = fields.get("image") {
        sku.image = Some(image.to_string());
    }
    if fields.has_nested("inventory") {
        sku.inventory = fields.inventory()?;
    }
    if fields.has_nested("metadata") {
        sku.metadata.extend(fields.map("metadata"));
    }
    if let Some(dims) = fields.package_dimensions()? {
        sku.package_dimensions = Some(dims);
    }
    if let Some(price) = fields.int("price")? {
        sku.price = price;
    }
    if let Some(product) = fields.get("product") {
        sku.product = product.to_string();
    }
    sku.updated = Utc::now().timestamp();
    Ok(Json(sku.clone()))
}

async fn delete_sku(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .skus
        .remove(&id)
        .map(|_| Json(deleted(&id)))
        .ok_or_else(|| ApiFailure::missing("sku", &id))
}

// --- customers ---

async fn create_customer(
    State(db): State<Db>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult<Json<Customer>> {
    let fields = Fields(form);
    let customer = Customer {
        id: new_id("cus"),
        object: "customer".to_string(),
        account_balance: fields.int("account_balance")?.unwrap_or(0),
        created: Utc::now().timestamp(),
        currency: None,
        description: fields.get("description").map(str::to_string),
        email: fields.get("email").map(str::to_string),
        livemode: false,
        metadata: fields.map("metadata"),
    };
    db.write()
        .await
        .customers
        .insert(customer.id.clone(), customer.clone());
    Ok(Json(customer))
}

async fn list_customers(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let fields = Fields(query);
    let email = fields.get("email");
    let store = db.read().await;
    let matching: Vec<Customer> = store
        .customers
        .values()
        .filter(|c| email.map_or(true, |e| c.email.as_deref() == Some(e)))
        .cloned()
        .collect();
    Ok(Json(list_envelope("/v1/customers", matching, false)))
}

async fn get_customer(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Customer>> {
    let store = db.read().await;
    store
        .customers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::missing("customer", &id))
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult<Json<Customer>> {
    let fields = Fields(form);
    let mut store = db.write().await;
    let customer = store
        .customers
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::missing("customer", &id))?;
    if let Some(description) = fields.get("description") {
        customer.description = Some(description.to_string());
    }
    if let Some(email) = fields.get("email") {
        customer.email = Some(email.to_string());
    }
    customer.metadata.extend(fields.map("metadata"));
    Ok(Json(customer.clone()))
}

async fn delete_customer(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .customers
        .remove(&id)
        .map(|_| Json(json!({ "id": id, "object": "customer", "deleted": true })))
        .ok_or_else(|| ApiFailure::missing("customer", &id))
}

// --- ephemeral keys ---

async fn create_ephemeral_key(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let fields = Fields(form);
    let customer = fields.require("customer")?.to_string();
    let version = headers
        .get(STRIPE_VERSION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_VERSION)
        .to_string();

    let id = new_id("ephkey");
    let created = Utc::now().timestamp();
    let key = json!({
        "id": id,
        "object": "ephemeral_key",
        "associated_objects": [{ "id": customer, "type": "customer" }],
        "created": created,
        "expires": created + EPHEMERAL_KEY_TTL_SECS,
        "livemode": false,
        "secret": format!("ek_test_{}", Uuid::new_v4().simple()),
    });
    db.write().await.ephemeral_keys.insert(id, key.clone());

    let mut response = Json(key).into_response();
    if let Ok(value) = HeaderValue::from_str(&version) {
        response.headers_mut().insert(STRIPE_VERSION, value);
    }
    Ok(response)
}

async fn delete_ephemeral_key(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let mut key = store
        .ephemeral_keys
        .remove(&id)
        .ok_or_else(|| ApiFailure::missing("ephemeral key", &id))?;
    // The deleted key is echoed back without its secret.
    if let Some(obj) = key.as_object_mut() {
        obj.remove("secret");
    }
    Ok(Json(key))
}

// --- order returns ---

async fn list_order_returns(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let fields = Fields(query);
    let order = fields.get("order");
    let store = db.read().await;
    let matching: Vec<Value> = store
        .order_returns
        .values()
        .filter(|r| order.map_or(true, |o| r["order"] == o))
        .cloned()
        .collect();
    Ok(Json(list_envelope("/v1/order_returns", matching, false)))
}

async fn get_order_return(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store
        .order_returns
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::missing("order return", &id))
}
