use super::AccountId;

/// Node color in the order-statistics red-black tree.
///
/// Red-Black Trees maintain balance using color properties:
/// - Every node is either red or black
/// - The root is always black
/// - Red nodes cannot have red children
/// - All paths from root to leaves have the same number of black nodes
/// - NIL (the absence of a node) is black
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A node addressed by `AccountId` rather than by pointer.
///
/// `left`/`right`/`parent` are identifier-keyed lookups into the owning
/// tree's `nodes` map instead of owned `Box` links, because the map is the
/// only handle Rust ownership lets us hand out to more than one caller at a
/// time. `None` stands for the virtual NIL leaf.
#[derive(Debug, Clone)]
pub struct Node<V> {
    pub parent: Option<AccountId>,
    pub left: Option<AccountId>,
    pub right: Option<AccountId>,
    pub color: Color,
    pub payload: V,
}

impl<V> Node<V> {
    pub fn new_red(payload: V) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            payload,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// Clears all structural links and forces black, so a node that has
    /// been spliced out of the tree can no longer be mistaken for
    /// tree-resident by `OrderedTree::exists`.
    pub fn unlink(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.color = Color::Black;
    }
}
