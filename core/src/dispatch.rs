//! Turns a (resource, id, action, params) call into a typed result.
//!
//! # Design
//! Every call goes Building → Sent → {Decoded | TransportFailed | Rejected}.
//! `build` and `parse` are synchronous and pure, so the request and the
//! decoding of a response can be tested without any I/O; `dispatch` glues
//! them around the single `.await` on the transport. The dispatcher holds only
//! the immutable `Config` and the transport, so concurrent calls share
//! nothing mutable and need no locks.

use std::sync::Arc;

use http::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

use crate::config::Config;
use crate::decode::{self, Decoded};
use crate::endpoint::{self, Action, Resource};
use crate::error::{ApiError, StripeError, StripeResult};
use crate::http::{set_header, RawResponse, RequestSpec};
use crate::params::Params;
use crate::transport::Transport;

pub const STRIPE_VERSION: &str = "Stripe-Version";
pub const REQUEST_ID: &str = "X-Request-Id";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const USER_AGENT_VALUE: &str = concat!("stripe-core/", env!("CARGO_PKG_VERSION"));

/// Per-call header overrides, applied after the defaults.
pub type HeaderOverrides<'a> = &'a [(&'a str, &'a str)];

#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> StripeResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve, encode and assemble headers for one call.
    ///
    /// Read actions put the encoded parameters in the query string, write
    /// actions in the form body. Overrides replace defaults with the same
    /// (case-insensitive) name.
    pub fn build(
        &self,
        resource: Resource,
        id: Option<&str>,
        action: Action,
        params: &Params,
        overrides: HeaderOverrides<'_>,
    ) -> StripeResult<RequestSpec> {
        let target = endpoint::resolve(resource, id, action)?;
        let encoded = params.encode();
        let (query, body) = if action.is_read() {
            (encoded, Vec::new())
        } else {
            (Vec::new(), encoded)
        };

        let request_id = Uuid::new_v4().to_string();
        let mut headers = HeaderMap::new();
        set_header(
            &mut headers,
            AUTHORIZATION.as_str(),
            &format!("Bearer {}", self.config.api_key),
        )?;
        set_header(&mut headers, ACCEPT.as_str(), "application/json")?;
        set_header(&mut headers, USER_AGENT.as_str(), USER_AGENT_VALUE)?;
        set_header(&mut headers, REQUEST_ID, &request_id)?;
        if let Some(version) = &self.config.api_version {
            set_header(&mut headers, STRIPE_VERSION, version)?;
        }
        if !action.is_read() {
            set_header(&mut headers, CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)?;
        }
        for (name, value) in overrides {
            set_header(&mut headers, name, value)?;
        }

        Ok(RequestSpec {
            method: target.method,
            base_url: self.config.base_url.clone(),
            path: target.path,
            query,
            body,
            headers,
            request_id,
        })
    }

    /// Interpret a response.
    ///
    /// A non-2xx status or a body holding an `{"error": {...}}` envelope is an
    /// upstream rejection; anything else is decoded.
    pub fn parse<T: DeserializeOwned>(&self, response: RawResponse) -> StripeResult<Decoded<T>> {
        if !response.is_success() {
            return Err(rejected(decode::decode_error(response.status, &response.body)));
        }

        let status = response.status;
        let value = decode::parse_body(&response.body).inspect_err(|err| {
            warn!(status, %err, "response is not JSON");
        })?;
        if let Some(error) = decode::error_envelope(status, &value) {
            return Err(rejected(error));
        }
        decode::decode_value(value).inspect_err(|err| {
            warn!(status, %err, "response did not match schema");
        })
    }

    /// Build, send and decode one call.
    #[instrument(
        skip(self, params, overrides),
        fields(request_id = tracing::field::Empty)
    )]
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: Option<&str>,
        action: Action,
        params: &Params,
        overrides: HeaderOverrides<'_>,
    ) -> StripeResult<Decoded<T>> {
        let request = self.build(resource, id, action, params, overrides)?;
        Span::current().record("request_id", request.request_id.as_str());
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            query_pairs = request.query.len(),
            body_pairs = request.body.len(),
            "sending request"
        );

        let response = self.transport.send(request).await.inspect_err(|err| {
            warn!(%err, "transport failed");
        })?;
        debug!(status = response.status, bytes = response.body.len(), "received response");

        self.parse(response)
    }

    /// `dispatch` for endpoints that answer with one record.
    pub async fn dispatch_single<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: Option<&str>,
        action: Action,
        params: &Params,
        overrides: HeaderOverrides<'_>,
    ) -> StripeResult<T> {
        self.dispatch(resource, id, action, params, overrides)
            .await?
            .into_single()
    }

    /// `dispatch` for endpoints that answer with a list envelope.
    pub async fn dispatch_list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        action: Action,
        params: &Params,
    ) -> StripeResult<decode::ListEnvelope<T>> {
        self.dispatch(resource, None, action, params, &[])
            .await?
            .into_list()
    }
}

fn rejected(error: ApiError) -> StripeError {
    warn!(
        status = ?error.status,
        error_type = %error.error_type,
        code = ?error.code,
        "request rejected"
    );
    StripeError::Api(error)
}
