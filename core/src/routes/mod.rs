//! Per-resource façades over the dispatcher.
//!
//! Each family is one concrete type borrowed from `StripeClient`. Operations
//! with many optional arguments take a single parameter struct whose unset
//! fields encode as absent.

mod customers;
mod ephemeral_keys;
mod order_returns;
mod skus;

pub use customers::CustomerRoutes;
pub use ephemeral_keys::EphemeralKeyRoutes;
pub use order_returns::OrderReturnRoutes;
pub use skus::{CreateSku, SkuRoutes, UpdateSku};
