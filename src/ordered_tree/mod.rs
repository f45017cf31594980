mod id;
mod node;
mod tree_operations;

/// For visualizing (Graphviz, DOT format).
pub mod visualization;

pub use id::AccountId;
pub use node::Color;

use node::Node;
use std::collections::HashMap;

use primitive_types::U256;

/// Anything an `OrderedTree` can store: it must expose a `balance`, since
/// `balance` is the tree's only ordering key. `Default` backs the total
/// function `get_payload` on a key that was never inserted.
pub trait OrderedPayload: Clone + Default {
    fn balance(&self) -> u128;
}

/// A snapshot of one node's structural links and color, returned by
/// `OrderedTree::node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub key: AccountId,
    pub parent: Option<AccountId>,
    pub left: Option<AccountId>,
    pub right: Option<AccountId>,
    pub color: Color,
}

/// A self-balancing, order-statistics red-black tree.
///
/// Nodes are addressed by `AccountId` rather than by pointer: `root`,
/// `parent`, `left` and `right` are all `Option<AccountId>` lookups into
/// `nodes`. Ordering key is `payload.balance()`; ties are broken by
/// identifier so the order `(balance, identifier)` is total, and new
/// equal-balance nodes are routed right of any existing ones (stable FIFO
/// among equal balances in ascending iteration).
///
/// Identifiers whose payload balance is zero are stored (so `get_payload`
/// can still answer) but are **not** tree-resident: they do not appear in
/// `root`'s subtree, do not contribute to `count`, and do not contribute to
/// `total_balance`.
#[derive(Debug)]
pub struct OrderedTree<V: OrderedPayload> {
    root: Option<AccountId>,
    count: u64,
    total_balance: U256,
    nodes: HashMap<AccountId, Node<V>>,
}

impl<V: OrderedPayload> OrderedTree<V> {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        OrderedTree {
            root: None,
            count: 0,
            total_balance: U256::zero(),
            nodes: HashMap::new(),
        }
    }

    /// True iff the tree holds no tree-resident identifiers.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of tree-resident identifiers.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Sum of the balances of all tree-resident identifiers.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn total_balance(&self) -> U256 {
        self.total_balance
    }

    /// Checks the tree maintains Red-Black properties.
    ///
    /// Not called on any hot path; exists for tests and debug assertions.
    pub fn is_valid_red_black_tree(&self) -> bool {
        if let Some(root) = self.root {
            if self.nodes[&root].is_red() {
                return false;
            }
        }
        self.check_red_property(self.root) && self.check_black_height(self.root).is_some()
    }

    fn check_red_property(&self, key: Option<AccountId>) -> bool {
        match key {
            None => true,
            Some(key) => {
                let node = &self.nodes[&key];
                if node.is_red() && (self.is_red_key(node.left) || self.is_red_key(node.right)) {
                    return false;
                }
                self.check_red_property(node.left) && self.check_red_property(node.right)
            }
        }
    }

    fn check_black_height(&self, key: Option<AccountId>) -> Option<usize> {
        match key {
            None => Some(1),
            Some(key) => {
                let node = &self.nodes[&key];
                let left_height = self.check_black_height(node.left)?;
                let right_height = self.check_black_height(node.right)?;
                if left_height != right_height {
                    return None;
                }
                Some(left_height + if node.is_black() { 1 } else { 0 })
            }
        }
    }

    fn is_red_key(&self, key: Option<AccountId>) -> bool {
        key.map_or(false, |k| self.nodes[&k].is_red())
    }

    /// Checks the BST ordering invariant over `order(x) = (balance(x), identifier(x))`.
    ///
    /// Identifiers are unique, so `(balance, identifier)` pairs never collide and the
    /// tree's final shape is a strict BST on that tuple, even though equal-balance
    /// insertions are routed right of one another while descending.
    ///
    /// Not called on any hot path; exists for tests and debug assertions.
    pub fn is_valid_bst(&self) -> bool {
        fn check<V: OrderedPayload>(
            tree: &OrderedTree<V>,
            key: Option<AccountId>,
            min: Option<(u128, AccountId)>,
            max: Option<(u128, AccountId)>,
        ) -> bool {
            match key {
                None => true,
                Some(key) => {
                    let node = &tree.nodes[&key];
                    let order = (node.payload.balance(), key);
                    if let Some(min) = min {
                        if order <= min {
                            return false;
                        }
                    }
                    if let Some(max) = max {
                        if order >= max {
                            return false;
                        }
                    }
                    check(tree, node.left, min, Some(order)) && check(tree, node.right, Some(order), max)
                }
            }
        }
        check(self, self.root, None, None)
    }
}

impl<V: OrderedPayload> Default for OrderedTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Balance(u128);

    impl OrderedPayload for Balance {
        fn balance(&self) -> u128 {
            self.0
        }
    }

    fn addr(n: u64) -> AccountId {
        AccountId::from_low_u64_be(n)
    }

    #[test]
    fn is_and_isnt_empty_tree() {
        let tree_1 = OrderedTree::<Balance>::new();
        assert!(tree_1.is_empty());

        let mut tree_2 = OrderedTree::<Balance>::new();
        tree_2.insert(addr(1), Balance(42)).unwrap();
        assert!(!tree_2.is_empty());
    }

    #[test]
    fn exists_in_empty_tree() {
        let tree = OrderedTree::<Balance>::new();
        assert!(!tree.exists(addr(1)));
    }

    #[test]
    fn insert_maintains_red_black_properties() {
        let mut tree = OrderedTree::<Balance>::new();
        let values = [7u64, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13];

        for (i, balance) in values.iter().enumerate() {
            tree.insert(addr(i as u64 + 1), Balance(*balance as u128)).unwrap();
            assert!(tree.is_valid_red_black_tree(), "tree invalid after inserting {balance}");
            assert!(tree.is_valid_bst(), "BST property violated after inserting {balance}");
        }
    }
}
