//! Route façades over a recording transport.
//!
//! The stub answers every call with a canned response and keeps the requests
//! it was handed, so each test can check both what went out and what came back.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stripe_core::dispatch::STRIPE_VERSION;
use stripe_core::models::{Currency, Inventory};
use stripe_core::routes::{CreateSku, UpdateSku};
use stripe_core::{
    Config, HttpMethod, Params, RawResponse, RequestSpec, StripeClient, StripeError, Transport,
    TransportError,
};

const SKU: &str = r#"{
  "id": "sku_1",
  "object": "sku",
  "active": true,
  "created": 1517705962,
  "currency": "usd",
  "inventory": {"type": "finite", "quantity": 10, "value": null},
  "livemode": false,
  "metadata": {},
  "price": 1500,
  "product": "prod_1"
}"#;

const EPHEMERAL_KEY: &str = r#"{
  "id": "ephkey_1",
  "object": "ephemeral_key",
  "associated_objects": [{"id": "cus_1", "type": "customer"}],
  "created": 1517705962,
  "expires": 1517709562,
  "livemode": false,
  "secret": "ek_test_1"
}"#;

struct Recording {
    reply: Result<(u16, &'static str), TransportError>,
    sent: Mutex<Vec<RequestSpec>>,
}

impl Recording {
    fn replying(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok((status, body)),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn only_request(&self) -> RequestSpec {
        let sent = self.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        sent[0].clone()
    }
}

#[async_trait]
impl Transport for Recording {
    async fn send(&self, request: RequestSpec) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        match &self.reply {
            Ok((status, body)) => Ok(RawResponse::new(*status, *body)),
            Err(err) => Err(err.clone()),
        }
    }
}

fn client(config: Config, transport: Arc<Recording>) -> StripeClient {
    StripeClient::with_transport(config, transport).unwrap()
}

fn config() -> Config {
    Config::new("sk_test_123").with_base_url("http://localhost:12111")
}

#[tokio::test]
async fn create_sku_sends_bracketed_form_body() {
    let transport = Recording::replying(200, SKU);
    let c = client(config(), transport.clone());

    let sku = c
        .skus()
        .create(&CreateSku::new(Currency::Usd, Inventory::finite(10), 1500, "prod_1"))
        .await
        .unwrap();
    assert_eq!(sku.id, "sku_1");
    assert_eq!(sku.inventory, Inventory::finite(10));

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url(), "http://localhost:12111/v1/skus");
    assert_eq!(
        req.form_body().as_deref(),
        Some("currency=usd&inventory%5Btype%5D=finite&inventory%5Bquantity%5D=10&price=1500&product=prod_1")
    );
}

#[tokio::test]
async fn update_sku_targets_item_path() {
    let transport = Recording::replying(200, SKU);
    let c = client(config(), transport.clone());

    let update = UpdateSku {
        price: Some(2000),
        ..UpdateSku::default()
    };
    c.skus().update("sku_1", &update).await.unwrap();

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.path, "/v1/skus/sku_1");
    assert_eq!(req.form_body().as_deref(), Some("price=2000"));
}

#[tokio::test]
async fn list_filters_travel_in_query() {
    let transport = Recording::replying(
        200,
        r#"{"object":"list","has_more":false,"url":"/v1/skus","data":[]}"#,
    );
    let c = client(config(), transport.clone());

    let filter = Params::new().field("active", true).field("limit", 3);
    let list = c.skus().list_all(&filter).await.unwrap();
    assert!(list.is_empty());
    assert!(!list.has_more);

    let req = transport.only_request();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url(), "http://localhost:12111/v1/skus?active=true&limit=3");
    assert!(req.form_body().is_none());
}

#[tokio::test]
async fn ephemeral_key_version_overrides_default() {
    let transport = Recording::replying(200, EPHEMERAL_KEY);
    let c = client(config().with_api_version("2017-08-15"), transport.clone());

    let key = c
        .ephemeral_keys()
        .create("cus_1", Some("2018-02-28"))
        .await
        .unwrap();
    assert_eq!(key.associated_objects[0].id, "cus_1");
    assert_eq!(key.secret.as_deref(), Some("ek_test_1"));

    let req = transport.only_request();
    assert_eq!(req.header(STRIPE_VERSION), Some("2018-02-28"));
    assert_eq!(req.form_body().as_deref(), Some("customer=cus_1"));
}

#[tokio::test]
async fn ephemeral_key_without_version_uses_default() {
    let transport = Recording::replying(200, EPHEMERAL_KEY);
    let c = client(config().with_api_version("2017-08-15"), transport.clone());

    c.ephemeral_keys().create("cus_1", None).await.unwrap();
    assert_eq!(transport.only_request().header(STRIPE_VERSION), Some("2017-08-15"));
}

#[tokio::test]
async fn card_error_surfaces_as_api_error() {
    let transport = Recording::replying(
        402,
        r#"{"error":{"type":"card_error","message":"Your card was declined.","code":"card_declined"}}"#,
    );
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    assert_eq!(err.status(), Some(402));
    assert!(err.is_client_error());
    match err {
        StripeError::Api(api) => {
            assert_eq!(api.error_type, "card_error");
            assert_eq!(api.message, "Your card was declined.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_envelope_with_ok_status_is_rejected() {
    let transport = Recording::replying(
        200,
        r#"{"error":{"type":"invalid_request_error","message":"No such sku: sku_1","param":"id"}}"#,
    );
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    match err {
        StripeError::Api(api) => {
            assert_eq!(api.error_type, "invalid_request_error");
            assert_eq!(api.message, "No such sku: sku_1");
            assert_eq!(api.param.as_deref(), Some("id"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn nested_schema_violation_names_the_field() {
    let transport = Recording::replying(
        200,
        r#"{"id":"sku_1","object":"sku","currency":"usd","inventory":{"quantity":3},"price":1,"product":"prod_1"}"#,
    );
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    match err {
        StripeError::SchemaViolation { path, message } => {
            assert_eq!(path, "$.inventory");
            assert!(message.contains("`type`"), "{message}");
        }
        other => panic!("expected schema violation, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_envelope_keeps_body() {
    let transport = Recording::replying(500, "upstream exploded");
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        StripeError::Api(ref api) if api.error_type == "api_error" && api.message == "upstream exploded"
    ));
}

#[tokio::test]
async fn transport_timeout_is_not_decoded() {
    let transport = Recording::failing(TransportError::Timeout);
    let c = client(config(), transport.clone());

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    assert!(matches!(err, StripeError::Transport(TransportError::Timeout)));
    assert!(err.is_retryable());
    transport.only_request();
}

#[tokio::test]
async fn success_with_bad_body_is_schema_violation() {
    let transport = Recording::replying(200, r#"{"id":"sku_1","object":"sku"}"#);
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    assert!(matches!(err, StripeError::SchemaViolation { ref path, .. } if path == "$"));
}

#[tokio::test]
async fn list_where_record_expected_is_schema_violation() {
    let transport = Recording::replying(
        200,
        r#"{"object":"list","has_more":false,"data":[]}"#,
    );
    let c = client(config(), transport);

    let err = c.skus().retrieve("sku_1").await.unwrap_err();
    assert!(matches!(err, StripeError::SchemaViolation { ref path, .. } if path == "$"));
}

#[tokio::test]
async fn empty_id_fails_before_sending() {
    let transport = Recording::replying(200, SKU);
    let c = client(config(), transport.clone());

    let err = c.skus().retrieve("").await.unwrap_err();
    assert!(matches!(err, StripeError::UnknownEndpoint { .. }));
    assert!(transport.sent.lock().unwrap().is_empty());
}
