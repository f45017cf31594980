use crate::ordered_tree::AccountId;

/// Errors raised by `OrderedTree` and `AccountRegistry`.
///
/// All variants are recoverable from the caller's point of view: on any
/// returned error the tree is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The sentinel identifier was passed where a real key was required.
    #[error("the null identifier cannot be used as a key")]
    NullKey,

    /// `remove`/`node` was called with a key that is not tree-resident.
    #[error("identifier {0:?} is not tree-resident")]
    NotFound(AccountId),

    /// `insert` was called with a key that is already tree-resident.
    #[error("identifier {0:?} is already tree-resident")]
    Exists(AccountId),
}
