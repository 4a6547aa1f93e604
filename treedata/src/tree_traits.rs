use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::arena::{NodeRef, TreeArena};

/// Rendering of a hierarchy as a printable [`termtree::Tree`].
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display> TreeNodeConvert for NodeRef<'_, T> {
    fn to_tree_string(&self) -> Tree<String> {
        // explicit stack of (node, remaining children, rendered children) so deep trees render too
        let mut pending = vec![(*self, self.children(), Vec::<Tree<String>>::new())];

        while let Some((node, mut children, leaves)) = pending.pop() {
            if let Some(child) = children.next() {
                pending.push((node, children, leaves));
                pending.push((child, child.children(), Vec::new()));
                continue;
            }

            let rendered = Tree::new(node.data().to_string()).with_leaves(leaves);
            match pending.last_mut() {
                Some((_, _, siblings)) => siblings.push(rendered),
                None => return rendered,
            }
        }

        Tree::new(self.data().to_string())
    }
}

impl<T: Display> TreeNodeConvert for TreeArena<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root().and_then(|root| self.get(root)) {
            Some(root) => root.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::model::Model;

    #[test]
    fn test_render_tree() {
        let tree = TreeBuilder::new().parse(Model::new(1u32).with_children([
            Model::new(11).with_children([Model::new(111)]),
            Model::new(12),
        ]));
        let rendered = tree.to_tree_string().to_string();
        assert_eq!(rendered, "1\n├── 11\n│   └── 111\n└── 12\n");
    }

    #[test]
    fn test_render_empty_tree() {
        let tree: TreeArena<u32> = TreeArena::new();
        assert_eq!(tree.to_tree_string().to_string(), "Empty tree\n");
    }
}
