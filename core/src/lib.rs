//! Typed async client core for the Stripe API.
//!
//! # Overview
//! Every route funnels through one pipeline: parameters are flattened into
//! bracket-keyed form pairs (`params`), the (resource, action) pair is mapped
//! to a method and path (`endpoint`), the request is sent through a pluggable
//! `Transport`, and the JSON response is decoded into a typed record or list
//! envelope (`decode`). `Dispatcher` runs that pipeline; the façades in
//! `routes` give it resource-specific shapes.
//!
//! # Design
//! - Encoding and decoding are pure and synchronous; the only `.await` in a
//!   call is the transport round-trip.
//! - `Dispatcher::build` and `Dispatcher::parse` are exposed on their own so
//!   requests and responses can be checked without I/O.
//! - The only shared state is an immutable `Config` behind an `Arc`.
//! - All failures are `StripeError` variants; nothing is retried or defaulted.

pub mod client;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod models;
pub mod params;
pub mod routes;
pub mod transport;

pub use client::StripeClient;
pub use config::Config;
pub use decode::{Decoded, ListEnvelope};
pub use dispatch::Dispatcher;
pub use endpoint::{Action, Endpoint, Resource};
pub use error::{ApiError, StripeError, StripeResult, TransportError};
pub use crate::http::{HttpMethod, RawResponse, RequestSpec};
pub use params::{EncodedPair, ParamValue, Params, ToParams};
pub use transport::{ReqwestTransport, Transport};
