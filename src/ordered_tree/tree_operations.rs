use super::node::{Color, Node};
use super::{AccountId, NodeView, OrderedPayload, OrderedTree};
use crate::error::TreeError;
use primitive_types::U256;

impl<V: OrderedPayload> OrderedTree<V> {
    /// Inserts `payload` under `key`, maintaining Red-Black Tree properties.
    ///
    /// If `payload.balance() == 0`, the payload is stored but **not** linked
    /// into the ordered structure: `count`, `total_balance` and the tree
    /// shape are left untouched, and the identifier is not tree-resident
    /// afterwards.
    ///
    /// # Complexity
    /// *O*(log n).
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel. `Exists(key)` if `key` is already
    /// tree-resident.
    pub fn insert(&mut self, key: AccountId, payload: V) -> Result<(), TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }
        if self.exists(key) {
            return Err(TreeError::Exists(key));
        }

        let balance = payload.balance();

        if balance == 0 {
            let mut node = Node::new_red(payload);
            node.color = Color::Black;
            self.nodes.insert(key, node);
            return Ok(());
        }

        let order = (balance, key);
        let mut node = Node::new_red(payload);

        let mut parent = None;
        let mut cursor = self.root;
        let mut goes_left = false;
        while let Some(cur) = cursor {
            parent = Some(cur);
            let cur_node = &self.nodes[&cur];
            let cur_order = (cur_node.payload.balance(), cur);
            if order < cur_order {
                goes_left = true;
                cursor = cur_node.left;
            } else {
                goes_left = false;
                cursor = cur_node.right;
            }
        }
        node.parent = parent;
        self.nodes.insert(key, node);

        match parent {
            None => self.root = Some(key),
            Some(p) if goes_left => self.nodes.get_mut(&p).unwrap().left = Some(key),
            Some(p) => self.nodes.get_mut(&p).unwrap().right = Some(key),
        }

        self.insert_fixup(key);

        self.count += 1;
        self.total_balance += U256::from(balance);
        debug_assert!(self.is_valid_red_black_tree());
        debug_assert!(self.is_valid_bst());
        Ok(())
    }

    /// CLRS RB-INSERT-FIXUP, adapted to identifier-keyed lookups.
    fn insert_fixup(&mut self, mut z: AccountId) {
        while self.color_of(self.nodes[&z].parent) == Color::Red {
            // parent is red, so it cannot be the root, so it has a parent.
            let p = self.nodes[&z].parent.unwrap();
            let g = self.nodes[&p].parent.unwrap();

            if Some(p) == self.nodes[&g].left {
                let uncle = self.nodes[&g].right;
                if self.color_of(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle.unwrap(), Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if Some(z) == self.nodes[&p].right {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.nodes[&z].parent.unwrap();
                    let g = self.nodes[&p].parent.unwrap();
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[&g].left;
                if self.color_of(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle.unwrap(), Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if Some(z) == self.nodes[&p].left {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.nodes[&z].parent.unwrap();
                    let g = self.nodes[&p].parent.unwrap();
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes `key` from the tree, maintaining Red-Black Tree properties.
    ///
    /// The payload entry is kept (unlinked: no parent/children, forced
    /// black) so `get_payload` keeps answering for a caller that retains
    /// the identifier; `exists` reports `false` afterwards.
    ///
    /// # Complexity
    /// *O*(log n).
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel. `NotFound(key)` if `key` is not
    /// tree-resident.
    pub fn remove(&mut self, key: AccountId) -> Result<(), TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }
        if !self.exists(key) {
            return Err(TreeError::NotFound(key));
        }

        let removed_balance = self.nodes[&key].payload.balance();
        let z_left = self.nodes[&key].left;
        let z_right = self.nodes[&key].right;

        let mut y = key;
        let mut y_original_color = self.nodes[&y].color;
        let x: Option<AccountId>;
        let x_parent: Option<AccountId>;

        if z_left.is_none() {
            x = z_right;
            x_parent = self.transplant(key, z_right);
        } else if z_right.is_none() {
            x = z_left;
            x_parent = self.transplant(key, z_left);
        } else {
            y = self.minimum(z_right.unwrap());
            y_original_color = self.nodes[&y].color;
            x = self.nodes[&y].right;

            if self.nodes[&y].parent == Some(key) {
                x_parent = Some(y);
                if let Some(xk) = x {
                    self.nodes.get_mut(&xk).unwrap().parent = Some(y);
                }
            } else {
                x_parent = self.nodes[&y].parent;
                self.transplant(y, x);
                self.nodes.get_mut(&y).unwrap().right = z_right;
                self.nodes.get_mut(&z_right.unwrap()).unwrap().parent = Some(y);
            }

            self.transplant(key, Some(y));
            self.nodes.get_mut(&y).unwrap().left = z_left;
            self.nodes.get_mut(&z_left.unwrap()).unwrap().parent = Some(y);
            let z_color = self.nodes[&key].color;
            self.nodes.get_mut(&y).unwrap().color = z_color;
        }

        // `key`'s node has been fully spliced out structurally by now;
        // its payload is kept, its links and color are forgotten.
        self.nodes.get_mut(&key).unwrap().unlink();

        if y_original_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }

        self.count -= 1;
        self.total_balance = self
            .total_balance
            .checked_sub(U256::from(removed_balance))
            .expect("total_balance underflow: caller-bounded invariant violated");

        debug_assert!(self.is_valid_red_black_tree());
        debug_assert!(self.is_valid_bst());
        Ok(())
    }

    /// CLRS RB-DELETE-FIXUP, adapted to identifier-keyed lookups.
    ///
    /// `x` may be the virtual NIL (`None`), so its parent is threaded
    /// through explicitly rather than recovered via a map lookup.
    fn remove_fixup(&mut self, mut x: Option<AccountId>, mut parent: Option<AccountId>) {
        while x != self.root && self.color_of(x) == Color::Black {
            let Some(p) = parent else { break };

            if x == self.nodes[&p].left {
                let mut w = self.nodes[&p].right.expect("sibling of a black node cannot be NIL");

                if self.color_of(Some(w)) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    w = self.nodes[&p].right.expect("sibling of a black node cannot be NIL");
                }

                if self.color_of(self.nodes[&w].left) == Color::Black
                    && self.color_of(self.nodes[&w].right) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = Some(p);
                    parent = self.nodes[&p].parent;
                } else {
                    if self.color_of(self.nodes[&w].right) == Color::Black {
                        if let Some(wl) = self.nodes[&w].left {
                            self.set_color(wl, Color::Black);
                        }
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.nodes[&p].right.expect("sibling of a black node cannot be NIL");
                    }
                    let p_color = self.nodes[&p].color;
                    self.set_color(w, p_color);
                    self.set_color(p, Color::Black);
                    if let Some(wr) = self.nodes[&w].right {
                        self.set_color(wr, Color::Black);
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut w = self.nodes[&p].left.expect("sibling of a black node cannot be NIL");

                if self.color_of(Some(w)) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    w = self.nodes[&p].left.expect("sibling of a black node cannot be NIL");
                }

                if self.color_of(self.nodes[&w].right) == Color::Black
                    && self.color_of(self.nodes[&w].left) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = Some(p);
                    parent = self.nodes[&p].parent;
                } else {
                    if self.color_of(self.nodes[&w].left) == Color::Black {
                        if let Some(wr) = self.nodes[&w].right {
                            self.set_color(wr, Color::Black);
                        }
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.nodes[&p].left.expect("sibling of a black node cannot be NIL");
                    }
                    let p_color = self.nodes[&p].color;
                    self.set_color(w, p_color);
                    self.set_color(p, Color::Black);
                    if let Some(wl) = self.nodes[&w].left {
                        self.set_color(wl, Color::Black);
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        if let Some(x_key) = x {
            self.set_color(x_key, Color::Black);
        }
    }

    /// Returns the stored payload for `key`, or the default payload if
    /// `key` has never been inserted. Total function, no allocation beyond
    /// the returned clone.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn get_payload(&self, key: AccountId) -> V {
        self.nodes.get(&key).map_or_else(V::default, |n| n.payload.clone())
    }

    /// Shortcut for `get_payload(key).balance()`; `0` if unknown.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn balance_of(&self, key: AccountId) -> u128 {
        self.get_payload(key).balance()
    }

    /// The tree-resident key with the smallest `(balance, identifier)`.
    ///
    /// # Complexity
    /// *O*(log n).
    pub fn first(&self) -> Option<AccountId> {
        self.root.map(|root| self.minimum(root))
    }

    /// The tree-resident key with the largest `(balance, identifier)`.
    ///
    /// # Complexity
    /// *O*(log n).
    pub fn last(&self) -> Option<AccountId> {
        self.root.map(|root| self.maximum(root))
    }

    /// In-order successor of `key`.
    ///
    /// `key` need not be tree-resident, but the result is only meaningful
    /// when it is; a non-resident key returns `None`.
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel.
    pub fn next(&self, key: AccountId) -> Result<Option<AccountId>, TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }
        let Some(node) = self.nodes.get(&key) else {
            return Ok(None);
        };
        if let Some(right) = node.right {
            return Ok(Some(self.minimum(right)));
        }
        let mut x = key;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.nodes[&p].right == Some(x) {
                x = p;
                parent = self.nodes[&p].parent;
            } else {
                return Ok(Some(p));
            }
        }
        Ok(None)
    }

    /// In-order predecessor of `key`.
    ///
    /// `key` need not be tree-resident, but the result is only meaningful
    /// when it is; a non-resident key returns `None`.
    ///
    /// # Errors
    /// `NullKey` if `key` is the sentinel.
    pub fn prev(&self, key: AccountId) -> Result<Option<AccountId>, TreeError> {
        if key.is_sentinel() {
            return Err(TreeError::NullKey);
        }
        let Some(node) = self.nodes.get(&key) else {
            return Ok(None);
        };
        if let Some(left) = node.left {
            return Ok(Some(self.maximum(left)));
        }
        let mut x = key;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.nodes[&p].left == Some(x) {
                x = p;
                parent = self.nodes[&p].parent;
            } else {
                return Ok(Some(p));
            }
        }
        Ok(None)
    }

    /// True iff `key` is tree-resident: non-sentinel, and either the root
    /// or a node with a recorded parent.
    ///
    /// # Complexity
    /// *O*(1).
    pub fn exists(&self, key: AccountId) -> bool {
        if key.is_sentinel() {
            return false;
        }
        match self.nodes.get(&key) {
            None => false,
            Some(node) => Some(key) == self.root || node.parent.is_some(),
        }
    }

    /// Returns a snapshot of `key`'s structural links and color.
    ///
    /// # Errors
    /// `NotFound(key)` if `key` is not tree-resident.
    pub fn node(&self, key: AccountId) -> Result<NodeView, TreeError> {
        if !self.exists(key) {
            return Err(TreeError::NotFound(key));
        }
        let n = &self.nodes[&key];
        Ok(NodeView {
            key,
            parent: n.parent,
            left: n.left,
            right: n.right,
            color: n.color,
        })
    }

    /// In-order traversal of tree-resident identifiers, in ascending
    /// `(balance, identifier)` order.
    ///
    /// # Complexity
    /// *O*(n).
    pub fn in_order(&self) -> Vec<AccountId> {
        let mut result = Vec::with_capacity(self.count as usize);
        self.in_order_from(self.root, &mut result);
        result
    }

    fn in_order_from(&self, key: Option<AccountId>, out: &mut Vec<AccountId>) {
        if let Some(key) = key {
            let node = &self.nodes[&key];
            self.in_order_from(node.left, out);
            out.push(key);
            self.in_order_from(node.right, out);
        }
    }

    /// Performs a tree traversal and returns all `(parent, child)` pairs.
    /// Used by `visualization` for Graphviz export.
    pub(super) fn find_connections(&self) -> Vec<(AccountId, AccountId)> {
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back(root);
        }
        while let Some(key) = queue.pop_front() {
            let node = &self.nodes[&key];
            if let Some(left) = node.left {
                queue.push_back(left);
                result.push((key, left));
            }
            if let Some(right) = node.right {
                queue.push_back(right);
                result.push((key, right));
            }
        }
        result
    }

    pub(super) fn color_at(&self, key: AccountId) -> Option<Color> {
        self.nodes.get(&key).map(|n| n.color)
    }

    fn minimum(&self, mut key: AccountId) -> AccountId {
        while let Some(left) = self.nodes[&key].left {
            key = left;
        }
        key
    }

    fn maximum(&self, mut key: AccountId) -> AccountId {
        while let Some(right) = self.nodes[&key].right {
            key = right;
        }
        key
    }

    fn color_of(&self, key: Option<AccountId>) -> Color {
        key.map_or(Color::Black, |k| self.nodes[&k].color)
    }

    fn set_color(&mut self, key: AccountId, color: Color) {
        self.nodes.get_mut(&key).unwrap().color = color;
    }

    /// CLRS LEFT-ROTATE, adapted to identifier-keyed lookups.
    fn rotate_left(&mut self, x: AccountId) {
        let y = self.nodes[&x].right.expect("rotate_left requires a right child");

        let y_left = self.nodes[&y].left;
        self.nodes.get_mut(&x).unwrap().right = y_left;
        if let Some(yl) = y_left {
            self.nodes.get_mut(&yl).unwrap().parent = Some(x);
        }

        let x_parent = self.nodes[&x].parent;
        self.nodes.get_mut(&y).unwrap().parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) if self.nodes[&p].left == Some(x) => {
                self.nodes.get_mut(&p).unwrap().left = Some(y);
            }
            Some(p) => self.nodes.get_mut(&p).unwrap().right = Some(y),
        }

        self.nodes.get_mut(&y).unwrap().left = Some(x);
        self.nodes.get_mut(&x).unwrap().parent = Some(y);
    }

    /// CLRS RIGHT-ROTATE, adapted to identifier-keyed lookups.
    fn rotate_right(&mut self, x: AccountId) {
        let y = self.nodes[&x].left.expect("rotate_right requires a left child");

        let y_right = self.nodes[&y].right;
        self.nodes.get_mut(&x).unwrap().left = y_right;
        if let Some(yr) = y_right {
            self.nodes.get_mut(&yr).unwrap().parent = Some(x);
        }

        let x_parent = self.nodes[&x].parent;
        self.nodes.get_mut(&y).unwrap().parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) if self.nodes[&p].right == Some(x) => {
                self.nodes.get_mut(&p).unwrap().right = Some(y);
            }
            Some(p) => self.nodes.get_mut(&p).unwrap().left = Some(y),
        }

        self.nodes.get_mut(&y).unwrap().right = Some(x);
        self.nodes.get_mut(&x).unwrap().parent = Some(y);
    }

    /// CLRS TRANSPLANT, adapted to identifier-keyed lookups: replaces the
    /// subtree rooted at `u` with the subtree rooted at `v` and returns
    /// `u`'s former parent, since `v` may be `None` and so cannot carry its
    /// own parent pointer back to the caller.
    fn transplant(&mut self, u: AccountId, v: Option<AccountId>) -> Option<AccountId> {
        let u_parent = self.nodes[&u].parent;
        match u_parent {
            None => self.root = v,
            Some(p) => {
                if self.nodes[&p].left == Some(u) {
                    self.nodes.get_mut(&p).unwrap().left = v;
                } else {
                    self.nodes.get_mut(&p).unwrap().right = v;
                }
            }
        }
        if let Some(v_key) = v {
            self.nodes.get_mut(&v_key).unwrap().parent = u_parent;
        }
        u_parent
    }
}
