use std::fs::File;
use std::io;
use std::io::Write;

use super::node::Color;
use super::{AccountId, OrderedPayload, OrderedTree};

/// Converts the parent/child pairs of an `OrderedTree` to a Graphviz (DOT) description,
/// coloring each node by its Red-Black color.
pub fn convert_to_graphviz<V: OrderedPayload>(tree: &OrderedTree<V>, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(&mut file, "digraph OrderedTree {{")?;
    writeln!(&mut file, "    node [shape=circle, style=filled, fontcolor=white];")?;

    for key in tree.in_order() {
        let color = tree.color_at(key).unwrap_or(Color::Black);
        writeln!(
            &mut file,
            "    \"{}\" [fillcolor={}];",
            node_label(tree, key),
            dot_color(color)
        )?;
    }

    for (parent, child) in tree.find_connections() {
        writeln!(&mut file, "    \"{}\" -> \"{}\";", node_label(tree, parent), node_label(tree, child))?;
    }

    writeln!(&mut file, "}}")?;

    Ok(())
}

fn node_label<V: OrderedPayload>(tree: &OrderedTree<V>, key: AccountId) -> String {
    format!("{}\\n{}", key, tree.balance_of(key))
}

fn dot_color(color: Color) -> &'static str {
    match color {
        Color::Red => "red",
        Color::Black => "black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered_tree::OrderedTree;
    use std::fs;
    use std::path::Path;

    #[derive(Debug, Clone, Default)]
    struct Balance(u128);

    impl OrderedPayload for Balance {
        fn balance(&self) -> u128 {
            self.0
        }
    }

    fn addr(n: u64) -> AccountId {
        AccountId::from_low_u64_be(n)
    }

    fn setup() {
        fs::create_dir_all("dots/OrderedTree").unwrap();
    }

    #[test]
    fn basic_tree_graphviz() {
        setup();

        let mut tree = OrderedTree::<Balance>::new();
        for (i, balance) in [7u64, 3, 18, 10, 22, 8, 11, 26].iter().enumerate() {
            tree.insert(addr(i as u64 + 1), Balance(*balance as u128)).unwrap();
        }

        convert_to_graphviz(&tree, "dots/OrderedTree/basic.dot").unwrap();
        assert!(Path::new("dots/OrderedTree/basic.dot").exists());
    }

    #[test]
    fn empty_tree_graphviz() {
        setup();

        let tree = OrderedTree::<Balance>::new();
        convert_to_graphviz(&tree, "dots/OrderedTree/empty_tree.dot").unwrap();
        assert!(Path::new("dots/OrderedTree/empty_tree.dot").exists());
    }

    #[test]
    fn after_deletions_graphviz() {
        setup();

        let mut tree = OrderedTree::<Balance>::new();
        let values = [7u64, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13];
        for (i, balance) in values.iter().enumerate() {
            tree.insert(addr(i as u64 + 1), Balance(*balance as u128)).unwrap();
        }

        tree.remove(addr(2)).unwrap();
        tree.remove(addr(3)).unwrap();
        tree.remove(addr(7)).unwrap();

        convert_to_graphviz(&tree, "dots/OrderedTree/after_deletions.dot").unwrap();
        assert!(Path::new("dots/OrderedTree/after_deletions.dot").exists());
    }
}
