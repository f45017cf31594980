use crate::error::TreeError;
use crate::ordered_tree::{AccountId, OrderedPayload, OrderedTree};
use primitive_types::U256;

/// Per-identifier metadata stored by `AccountRegistry`.
///
/// The first field is `balance`, the ordering key `OrderedTree` sorts on;
/// the second is `active`, readable even once the identifier is no longer
/// tree-resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountPayload {
    pub balance: u128,
    pub active: bool,
}

impl OrderedPayload for AccountPayload {
    fn balance(&self) -> u128 {
        self.balance
    }
}

/// Facade over `OrderedTree<AccountPayload>` that implements the
/// remove-modify-reinsert idiom for balance changes and exposes
/// deposit/withdraw/top-N as a small demonstrator.
///
/// Routes at most one `OrderedTree` mutation per call; never allocates
/// beyond the vectors `top_n`/`bottom_n` return.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    tree: OrderedTree<AccountPayload>,
}

impl AccountRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        AccountRegistry {
            tree: OrderedTree::new(),
        }
    }

    /// Number of tree-resident (active, positive-balance) accounts.
    pub fn len(&self) -> u64 {
        self.tree.len()
    }

    /// True iff no account currently has a positive balance.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Sum of the balances of all tree-resident accounts.
    pub fn total_balance(&self) -> U256 {
        self.tree.total_balance()
    }

    /// Reads the stored payload for `key`, or the default payload if `key`
    /// has never been deposited into.
    pub fn get_payload(&self, key: AccountId) -> AccountPayload {
        self.tree.get_payload(key)
    }

    /// True iff `key` currently has a positive balance (is tree-resident).
    pub fn contains(&self, key: AccountId) -> bool {
        self.tree.exists(key)
    }

    /// Adds `delta` to `key`'s balance, creating the account if needed.
    ///
    /// This is the re-sort idiom: if `key` is already tree-resident its
    /// node is removed, the payload is updated, and it is reinserted so the
    /// tree re-sorts on the new balance. Never more than one `OrderedTree`
    /// mutation of each kind (`remove` then `insert`, or just `insert`).
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel.
    pub fn deposit(&mut self, key: AccountId, delta: u128) -> Result<(), TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }

        let mut payload = self.tree.get_payload(key);
        if self.tree.exists(key) {
            self.tree.remove(key)?;
        }
        payload.balance = payload.balance.checked_add(delta).expect(
            "account balance overflow: caller is responsible for bounding per-account deltas",
        );
        payload.active = true;
        self.tree.insert(key, payload)
    }

    /// Zeroes `key`'s balance, marks it inactive, and returns the amount
    /// that was withdrawn.
    ///
    /// The registry's atomicity boundary ends here: the mutation and the
    /// returned amount succeed together. Effecting any external transfer of
    /// that amount is the caller's responsibility, not the registry's.
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel. `NotFound(key)` if `key` is not
    /// currently tree-resident (it has no positive balance to withdraw).
    pub fn withdraw_all(&mut self, key: AccountId) -> Result<u128, TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }
        if !self.tree.exists(key) {
            return Err(TreeError::NotFound(key));
        }

        let withdrawn = self.tree.balance_of(key);
        self.tree.remove(key)?;

        let payload = AccountPayload {
            balance: 0,
            active: false,
        };
        // balance == 0, so this only updates the stored payload and never
        // touches tree structure, count or total_balance.
        self.tree
            .insert(key, payload)
            .expect("zero-balance insert into a freshly vacated key cannot fail");

        Ok(withdrawn)
    }

    /// Up to `n` identifiers in descending balance order, by walking from
    /// `last()` backwards via `prev`. Empty if the registry is empty.
    /// Calling this twice with no intervening mutation yields the same
    /// sequence both times.
    pub fn top_n(&self, n: usize) -> Vec<AccountId> {
        self.walk_n(n, self.tree.last(), |key| self.tree.prev(key))
    }

    /// Up to `n` identifiers in ascending balance order, the mirror image
    /// of `top_n`: walks from `first()` forward via `next`.
    pub fn bottom_n(&self, n: usize) -> Vec<AccountId> {
        self.walk_n(n, self.tree.first(), |key| self.tree.next(key))
    }

    fn walk_n(
        &self,
        n: usize,
        start: Option<AccountId>,
        step: impl Fn(AccountId) -> Result<Option<AccountId>, TreeError>,
    ) -> Vec<AccountId> {
        let mut result = Vec::with_capacity(n.min(self.tree.len() as usize));
        let mut cursor = start;
        while let Some(key) = cursor {
            if result.len() >= n {
                break;
            }
            result.push(key);
            cursor = step(key).expect("walking from a tree-resident key never hits the sentinel");
        }
        result
    }
}
