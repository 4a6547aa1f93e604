#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use treedata::{NodeId, TreeArena, TreeBuilder, WalkStrategy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

pub fn item(id: u32) -> treedata::Model<Item> {
    treedata::Model::new(Item { id })
}

pub fn parse_json(builder: &TreeBuilder<Item>, value: Value) -> TreeArena<Item> {
    builder.parse(serde_json::from_value(value).expect("valid model fixture"))
}

/// 1 -> [11 -> [111], 12 -> [121, 122]]
pub fn sample_json() -> Value {
    json!({
        "id": 1,
        "children": [
            { "id": 11, "children": [{ "id": 111 }] },
            { "id": 12, "children": [{ "id": 121 }, { "id": 122 }] }
        ]
    })
}

pub fn sample_tree() -> TreeArena<Item> {
    parse_json(&TreeBuilder::new(), sample_json())
}

pub fn find(tree: &TreeArena<Item>, id: u32) -> Option<NodeId> {
    let root = tree.root()?;
    tree.first(root, WalkStrategy::Pre, |n| n.data().id == id)
        .expect("root is valid")
}

pub fn child_ids(tree: &TreeArena<Item>, node: NodeId) -> Vec<u32> {
    tree.children(node)
        .expect("node is valid")
        .iter()
        .map(|&c| tree.data(c).expect("child is valid").id)
        .collect()
}

pub fn model_child_ids(tree: &TreeArena<Item>, node: NodeId) -> Vec<u32> {
    tree.to_model(node)
        .expect("node is valid")
        .children
        .iter()
        .map(|m| m.data.id)
        .collect()
}

/// Every node's children agree with the model view and point back to it.
pub fn assert_consistent(tree: &TreeArena<Item>, root: NodeId) {
    for node in tree.iter(root, WalkStrategy::Pre) {
        assert_eq!(child_ids(tree, node.id()), model_child_ids(tree, node.id()));
        for child in node.children() {
            assert_eq!(child.parent().map(|p| p.id()), Some(node.id()));
        }
    }
}
