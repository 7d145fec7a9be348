use crate::dispatch::Dispatcher;
use crate::endpoint::{Action, Resource};
use crate::error::StripeResult;
use crate::models::{OrderReturn, OrderReturnList};
use crate::params::Params;

/// `/v1/order_returns`
#[derive(Debug, Clone, Copy)]
pub struct OrderReturnRoutes<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> OrderReturnRoutes<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn retrieve(&self, id: &str) -> StripeResult<OrderReturn> {
        self.dispatcher
            .dispatch_single(Resource::OrderReturns, Some(id), Action::Retrieve, &Params::new(), &[])
            .await
    }

    /// List returns, optionally filtered by `order`, `created`, `limit`, ...
    pub async fn list_all(&self, filter: &Params) -> StripeResult<OrderReturnList> {
        self.dispatcher
            .dispatch_list(Resource::OrderReturns, Action::List, filter)
            .await
    }
}
