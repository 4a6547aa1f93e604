//! Tests for traversal strategies, early termination and queries

mod common;

use rstest::{fixture, rstest};

use common::{find, sample_tree, Item};
use treedata::util::testing;
use treedata::{TreeArena, TreeError, TreeNodeConvert, WalkOptions, WalkStrategy};

#[fixture]
fn tree() -> TreeArena<Item> {
    testing::init_test_setup();
    sample_tree()
}

fn visit_until(tree: &TreeArena<Item>, strategy: WalkStrategy, stop_at: u32) -> Vec<u32> {
    let mut visited = Vec::new();
    tree.walk(tree.root().unwrap(), strategy, |node| {
        visited.push(node.data().id);
        node.data().id != stop_at
    })
    .unwrap();
    visited
}

#[rstest]
#[case(WalkStrategy::Pre, vec![1, 11, 111, 12, 121, 122])]
#[case(WalkStrategy::Post, vec![111, 11, 121, 122, 12, 1])]
#[case(WalkStrategy::Breadth, vec![1, 11, 12, 111, 121, 122])]
fn given_tree_when_walking_then_visits_every_node_once_in_order(
    tree: TreeArena<Item>,
    #[case] strategy: WalkStrategy,
    #[case] expected: Vec<u32>,
) {
    assert_eq!(visit_until(&tree, strategy, 0), expected);
}

#[rstest]
#[case(WalkStrategy::Pre, 121, vec![1, 11, 111, 12, 121])]
#[case(WalkStrategy::Breadth, 121, vec![1, 11, 12, 111, 121])]
#[case(WalkStrategy::Post, 121, vec![111, 11, 121])]
#[case(WalkStrategy::Pre, 111, vec![1, 11, 111])]
#[case(WalkStrategy::Post, 111, vec![111])]
#[case(WalkStrategy::Breadth, 11, vec![1, 11])]
#[case(WalkStrategy::Pre, 1, vec![1])]
fn given_visitor_returning_false_when_walking_then_halts_whole_traversal(
    tree: TreeArena<Item>,
    #[case] strategy: WalkStrategy,
    #[case] stop_at: u32,
    #[case] expected: Vec<u32>,
) {
    assert_eq!(visit_until(&tree, strategy, stop_at), expected);
}

#[rstest]
fn given_subtree_when_walking_then_starts_at_that_node(tree: TreeArena<Item>) {
    let n12 = find(&tree, 12).unwrap();
    let mut visited = Vec::new();
    tree.walk(n12, WalkStrategy::default(), |node| {
        visited.push(node.data().id);
        true
    })
    .unwrap();
    assert_eq!(visited, vec![12, 121, 122]);
}

#[rstest]
#[case(WalkStrategy::Pre, 11)]
#[case(WalkStrategy::Post, 111)]
#[case(WalkStrategy::Breadth, 11)]
fn given_predicate_when_finding_first_then_returns_first_in_strategy_order(
    tree: TreeArena<Item>,
    #[case] strategy: WalkStrategy,
    #[case] expected: u32,
) {
    let root = tree.root().unwrap();
    let found = tree
        .first(root, strategy, |node| node.data().id > 10)
        .unwrap()
        .unwrap();
    assert_eq!(tree.data(found).unwrap().id, expected);
}

#[rstest]
fn given_first_when_matching_then_stops_calling_predicate(tree: TreeArena<Item>) {
    let root = tree.root().unwrap();
    let mut calls = 0;
    let found = tree
        .first(root, WalkStrategy::Pre, |node| {
            calls += 1;
            node.data().id == 111
        })
        .unwrap();
    assert_eq!(found, find(&tree, 111));
    assert_eq!(calls, 3);
}

#[rstest]
fn given_no_match_when_finding_first_then_returns_none(tree: TreeArena<Item>) {
    let root = tree.root().unwrap();
    assert_eq!(
        tree.first(root, WalkStrategy::Breadth, |node| node.data().id == 999)
            .unwrap(),
        None
    );
}

#[rstest]
#[case(WalkStrategy::Pre, vec![111, 121, 122])]
#[case(WalkStrategy::Post, vec![111, 121, 122])]
#[case(WalkStrategy::Breadth, vec![111, 121, 122])]
fn given_predicate_when_collecting_all_then_returns_every_match(
    tree: TreeArena<Item>,
    #[case] strategy: WalkStrategy,
    #[case] expected: Vec<u32>,
) {
    let root = tree.root().unwrap();
    let mut calls = 0;
    let all = tree
        .all(root, strategy, |node| {
            calls += 1;
            node.data().id > 100
        })
        .unwrap();
    let ids: Vec<u32> = all.iter().map(|&id| tree.data(id).unwrap().id).collect();
    assert_eq!(ids, expected);
    assert_eq!(calls, 6);
}

#[rstest]
fn given_odd_predicate_when_collecting_all_post_order_then_keeps_order(tree: TreeArena<Item>) {
    let root = tree.root().unwrap();
    let ids: Vec<u32> = tree
        .all(root, WalkOptions { strategy: WalkStrategy::Post }.into(), |node| {
            node.data().id % 2 == 1
        })
        .unwrap()
        .into_iter()
        .map(|id| tree.data(id).unwrap().id)
        .collect();
    assert_eq!(ids, vec![111, 11, 121, 1]);
}

#[rstest]
fn given_unknown_node_when_walking_then_errors(mut tree: TreeArena<Item>) {
    let n12 = find(&tree, 12).unwrap();
    tree.take_model(n12).unwrap();

    assert_eq!(
        tree.walk(n12, WalkStrategy::Pre, |_| true),
        Err(TreeError::UnknownNode(n12))
    );
    assert_eq!(
        tree.all(n12, WalkStrategy::Pre, |_| true),
        Err(TreeError::UnknownNode(n12))
    );
    assert_eq!(tree.iter(n12, WalkStrategy::Breadth).count(), 0);
}

#[rstest]
fn given_tree_when_rendering_then_shows_hierarchy(tree: TreeArena<Item>) {
    let rendered = tree.to_tree_string().to_string();
    assert_eq!(
        rendered,
        "#1\n├── #11\n│   └── #111\n└── #12\n    ├── #121\n    └── #122\n"
    );
}
