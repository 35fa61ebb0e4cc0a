/*
Terminal rendering of syntax trees via termtree.

Children carry their slot as a prefix ("L: a", "R: b") so unary nodes, which
only ever use the left slot, read the same way as binary ones.
 */
use std::collections::HashMap;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{EdgeRole, SyntaxTree};

pub trait TreeConvert {
    fn to_tree_string(&self) -> String;
}

impl TreeConvert for SyntaxTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> String {
        let tree = termtree_of(self);
        let rendered = tree.to_string();
        dismantle(tree);
        rendered
    }
}

/// Assemble the termtree for `tree`, one termtree level per syntax level.
pub(crate) fn termtree_of(tree: &SyntaxTree) -> Tree<String> {
    if tree.is_empty() {
        return Tree::new("Empty tree".to_string());
    }

    let roles: HashMap<_, EdgeRole> = tree
        .iter()
        .flat_map(|(_, node)| node.children())
        .map(|(role, idx)| (idx, role))
        .collect();

    // Post-order: children are complete before their parent is assembled
    let mut done: Vec<Tree<String>> = Vec::new();
    for (idx, node) in tree.iter_postorder() {
        let label = match roles.get(&idx) {
            Some(role) => format!("{}: {}", role, node.value()),
            None => node.value().to_string(),
        };
        let leaves = done.split_off(done.len().saturating_sub(node.arity()));
        done.push(Tree::new(label).with_leaves(leaves));
    }

    done.pop()
        .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
}

/// Drop a termtree level by level; the derived drop recurses once per level.
pub(crate) fn dismantle(tree: Tree<String>) {
    let mut pending = vec![tree];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build;

    #[test]
    fn given_alternation_when_rendering_then_shows_roles() {
        let tree = build("ab.c|").unwrap();
        let rendered = tree.to_tree_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "|");
        assert!(lines[1].ends_with("L: ."));
        assert!(lines[2].ends_with("L: a"));
        assert!(lines[3].ends_with("R: b"));
        assert!(lines[4].ends_with("R: c"));
    }

    #[test]
    fn given_empty_tree_when_rendering_then_says_so() {
        let rendered = SyntaxTree::new().to_tree_string();
        assert_eq!(rendered.trim(), "Empty tree");
    }

    #[test]
    fn given_long_unary_chain_when_assembling_termtree_then_drops_without_recursion() {
        let postfix = format!("a{}", "*".repeat(100_000));
        let tree = build(&postfix).unwrap();

        let termtree = termtree_of(&tree);
        assert_eq!(termtree.root, "*");
        assert_eq!(termtree.leaves.len(), 1);
        dismantle(termtree);
    }

    #[test]
    fn given_deep_unary_chain_when_rendering_then_one_line_per_node() {
        let postfix = format!("a{}", "*".repeat(2_000));
        let rendered = build(&postfix).unwrap().to_tree_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2_001);
        assert!(lines[2_000].ends_with("L: a"));
    }
}
