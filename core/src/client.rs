//! Entry point tying configuration, transport and route façades together.

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::StripeResult;
use crate::routes::{CustomerRoutes, EphemeralKeyRoutes, OrderReturnRoutes, SkuRoutes};
use crate::transport::{ReqwestTransport, Transport};

/// Typed client for the Stripe API.
///
/// Cheap to clone; clones share the configuration and the transport's
/// connection pool.
#[derive(Debug, Clone)]
pub struct StripeClient {
    dispatcher: Dispatcher,
}

impl StripeClient {
    /// Client over the default `reqwest` transport.
    pub fn new(config: Config) -> StripeResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Client configured from `STRIPE_*` environment variables.
    pub fn from_env() -> StripeResult<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> StripeResult<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config, transport)?,
        })
    }

    /// The underlying dispatcher, for resources without a façade.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn customers(&self) -> CustomerRoutes<'_> {
        CustomerRoutes::new(&self.dispatcher)
    }

    pub fn skus(&self) -> SkuRoutes<'_> {
        SkuRoutes::new(&self.dispatcher)
    }

    pub fn ephemeral_keys(&self) -> EphemeralKeyRoutes<'_> {
        EphemeralKeyRoutes::new(&self.dispatcher)
    }

    pub fn order_returns(&self) -> OrderReturnRoutes<'_> {
        OrderReturnRoutes::new(&self.dispatcher)
    }
}
