//! Static routing table from (resource, action) to method and path.

use crate::error::{StripeError, StripeResult};
use crate::http::HttpMethod;

const API_PREFIX: &str = "/v1";

/// An upstream resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    Skus,
    Orders,
    OrderReturns,
    EphemeralKeys,
}

impl Resource {
    /// Path segment under `/v1`.
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Skus => "skus",
            Resource::Orders => "orders",
            Resource::OrderReturns => "order_returns",
            Resource::EphemeralKeys => "ephemeral_keys",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Retrieve,
    Update,
    List,
    Delete,
}

impl Action {
    /// Read actions carry their parameters in the query string, writes in the
    /// form body.
    pub fn is_read(self) -> bool {
        matches!(self, Action::Retrieve | Action::List)
    }

    fn targets_item(self) -> bool {
        matches!(self, Action::Retrieve | Action::Update | Action::Delete)
    }

    fn method(self) -> HttpMethod {
        match self {
            Action::Create | Action::Update => HttpMethod::Post,
            Action::Retrieve | Action::List => HttpMethod::Get,
            Action::Delete => HttpMethod::Delete,
        }
    }
}

/// Resolved target of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

const ROUTES: &[(Resource, &[Action])] = &[
    (
        Resource::Customers,
        &[Action::Create, Action::Retrieve, Action::Update, Action::List, Action::Delete],
    ),
    (
        Resource::Skus,
        &[Action::Create, Action::Retrieve, Action::Update, Action::List, Action::Delete],
    ),
    (
        Resource::Orders,
        &[Action::Create, Action::Retrieve, Action::Update, Action::List],
    ),
    (Resource::OrderReturns, &[Action::Retrieve, Action::List]),
    (Resource::EphemeralKeys, &[Action::Create, Action::Delete]),
];

/// Whether `action` is registered for `resource`.
pub fn is_registered(resource: Resource, action: Action) -> bool {
    ROUTES
        .iter()
        .any(|(r, actions)| *r == resource && actions.contains(&action))
}

/// Map `(resource, id, action)` to an HTTP method and path.
///
/// Item actions (retrieve, update, delete) need a non-empty `id`; collection
/// actions (create, list) must not be given one.
pub fn resolve(resource: Resource, id: Option<&str>, action: Action) -> StripeResult<Endpoint> {
    let unknown = || StripeError::UnknownEndpoint { resource, action };
    if !is_registered(resource, action) {
        return Err(unknown());
    }

    let path = match (action.targets_item(), id) {
        (true, Some(id)) if !id.is_empty() => {
            format!("{API_PREFIX}/{}/{id}", resource.segment())
        }
        (false, None) => format!("{API_PREFIX}/{}", resource.segment()),
        _ => return Err(unknown()),
    };

    Ok(Endpoint {
        method: action.method(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_and_item_paths() {
        let create = resolve(Resource::Skus, None, Action::Create).unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.path, "/v1/skus");

        let retrieve = resolve(Resource::Skus, Some("sku_123"), Action::Retrieve).unwrap();
        assert_eq!(retrieve.method, HttpMethod::Get);
        assert_eq!(retrieve.path, "/v1/skus/sku_123");

        let update = resolve(Resource::Skus, Some("sku_123"), Action::Update).unwrap();
        assert_eq!(update.method, HttpMethod::Post);

        let delete = resolve(Resource::Skus, Some("sku_123"), Action::Delete).unwrap();
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, "/v1/skus/sku_123");
    }

    #[test]
    fn order_returns_use_underscored_segment() {
        let list = resolve(Resource::OrderReturns, None, Action::List).unwrap();
        assert_eq!(list.method, HttpMethod::Get);
        assert_eq!(list.path, "/v1/order_returns");
    }

    #[test]
    fn unregistered_action_is_unknown() {
        let err = resolve(Resource::OrderReturns, None, Action::Create).unwrap_err();
        assert!(matches!(
            err,
            StripeError::UnknownEndpoint {
                resource: Resource::OrderReturns,
                action: Action::Create
            }
        ));
        assert!(resolve(Resource::EphemeralKeys, Some("ephkey_1"), Action::Retrieve).is_err());
    }

    #[test]
    fn id_must_match_action_kind() {
        assert!(resolve(Resource::Skus, None, Action::Retrieve).is_err());
        assert!(resolve(Resource::Skus, Some(""), Action::Delete).is_err());
        assert!(resolve(Resource::Skus, Some("sku_1"), Action::List).is_err());
    }

    #[test]
    fn resolution_is_idempotent() {
        let a = resolve(Resource::Customers, Some("cus_1"), Action::Update).unwrap();
        let b = resolve(Resource::Customers, Some("cus_1"), Action::Update).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn read_actions() {
        assert!(Action::Retrieve.is_read());
        assert!(Action::List.is_read());
        assert!(!Action::Create.is_read());
        assert!(!Action::Update.is_read());
        assert!(!Action::Delete.is_read());
    }
}
