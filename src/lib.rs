/// Typed error taxonomy shared by `ordered_tree` and `account_registry`.
pub mod error;

/// Self-balancing, order-statistics red-black tree keyed by account identifier.
pub mod ordered_tree;

/// Facade that maps account identifiers to balances and routes re-sorts through `ordered_tree`.
pub mod account_registry;

pub use account_registry::{AccountPayload, AccountRegistry};
pub use error::TreeError;
pub use ordered_tree::{AccountId, Color, OrderedPayload, OrderedTree};
