use crate::dispatch::{Dispatcher, STRIPE_VERSION};
use crate::endpoint::{Action, Resource};
use crate::error::StripeResult;
use crate::models::EphemeralKey;
use crate::params::Params;

/// `/v1/ephemeral_keys`
#[derive(Debug, Clone, Copy)]
pub struct EphemeralKeyRoutes<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> EphemeralKeyRoutes<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Create a key for `customer`.
    ///
    /// Mobile SDKs require the key to be minted with *their* API version, so
    /// `api_version` overrides the configured default for this call only.
    pub async fn create(&self, customer: &str, api_version: Option<&str>) -> StripeResult<EphemeralKey> {
        let params = Params::new().field("customer", customer);
        let overrides: Vec<(&str, &str)> = api_version
            .map(|version| (STRIPE_VERSION, version))
            .into_iter()
            .collect();
        self.dispatcher
            .dispatch_single(Resource::EphemeralKeys, None, Action::Create, &params, &overrides)
            .await
    }

    pub async fn delete(&self, ephemeral_key: &str) -> StripeResult<EphemeralKey> {
        self.dispatcher
            .dispatch_single(
                Resource::EphemeralKeys,
                Some(ephemeral_key),
                Action::Delete,
                &Params::new(),
                &[],
            )
            .await
    }
}
