use crate::dispatch::Dispatcher;
use crate::endpoint::{Action, Resource};
use crate::error::StripeResult;
use crate::models::{Customer, CustomerList, DeletedObject};
use crate::params::Params;

/// `/v1/customers`
///
/// Customer payloads have too many optional fields to model one by one, so
/// create and update take a free-form `Params`.
#[derive(Debug, Clone, Copy)]
pub struct CustomerRoutes<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CustomerRoutes<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn create(&self, params: &Params) -> StripeResult<Customer> {
        self.dispatcher
            .dispatch_single(Resource::Customers, None, Action::Create, params, &[])
            .await
    }

    pub async fn retrieve(&self, id: &str) -> StripeResult<Customer> {
        self.dispatcher
            .dispatch_single(Resource::Customers, Some(id), Action::Retrieve, &Params::new(), &[])
            .await
    }

    pub async fn update(&self, id: &str, params: &Params) -> StripeResult<Customer> {
        self.dispatcher
            .dispatch_single(Resource::Customers, Some(id), Action::Update, params, &[])
            .await
    }

    pub async fn list_all(&self, filter: &Params) -> StripeResult<CustomerList> {
        self.dispatcher
            .dispatch_list(Resource::Customers, Action::List, filter)
            .await
    }

    pub async fn delete(&self, id: &str) -> StripeResult<DeletedObject> {
        self.dispatcher
            .dispatch_single(Resource::Customers, Some(id), Action::Delete, &Params::new(), &[])
            .await
    }
}
