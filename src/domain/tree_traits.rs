use termtree::Tree;
use tracing::instrument;

use crate::domain::tree::DependencyNode;

/// Conversion into a `termtree` for terminal display.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for DependencyNode {
    #[instrument(level = "trace", skip(self), fields(code = %self.code))]
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.is_cycle_stop() {
            format!("{} (cycle)", self.code)
        } else {
            self.code.clone()
        };

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for [DependencyNode] {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.iter().map(|n| n.to_tree_string()).collect();
        Tree::new(format!("{} courses", self.len())).with_leaves(leaves)
    }
}
