use balanced_tree::{BalancedTree, TreeError};

fn insert_letter(tree: &mut BalancedTree, key: &str) -> bool {
    tree.insert(key.to_string(), key.as_bytes()[0] as i64)
}

fn sample() -> BalancedTree {
    let mut tree = BalancedTree::new();
    for key in ["F", "K", "X", "C", "A", "D", "R", "V", "A", "Z", "M", "D"] {
        insert_letter(&mut tree, key);
    }
    tree
}

#[test]
fn rotations_keep_order() {
    let mut tree = BalancedTree::new();
    assert!(insert_letter(&mut tree, "F"));
    assert!(!insert_letter(&mut tree, "F"));
    assert!(insert_letter(&mut tree, "K"));
    assert!(insert_letter(&mut tree, "X"));
    assert_eq!(tree.keys(), ["F", "K", "X"]);
    assert_eq!(tree.height(), 1);

    assert!(insert_letter(&mut tree, "C"));
    assert!(insert_letter(&mut tree, "A"));
    assert_eq!(tree.keys(), ["A", "C", "F", "K", "X"]);
    assert_eq!(tree.height(), 2);
}

#[test]
fn lookups() {
    let tree = sample();
    assert_eq!(tree.size(), 10);
    assert_eq!(tree.height(), 3);
    assert!(tree.contains("A"));
    assert!(!tree.contains("N"));
    assert_eq!(tree.get("A"), Some(&65));
    assert_eq!(tree.get("C"), Some(&67));
    assert_eq!(tree.get("Q"), None);
    assert_eq!(tree.find_range("D", "W"), [68, 70, 75, 77, 82, 86]);
}

#[test]
fn duplicate_insert_leaves_tree_unchanged() {
    let mut tree = sample();
    let before = tree.clone();
    assert!(!tree.insert("M".to_string(), 0));
    assert_eq!(tree.try_insert("M".to_string(), 0), Err(TreeError::DuplicateKey));
    assert_eq!(tree, before);
}

#[test]
fn value_update() {
    let mut tree = sample();
    assert_eq!(tree.set_value("A", 108), Ok(65));
    assert_eq!(tree.set_value("N", 108), Err(TreeError::KeyNotFound));
    assert_eq!(tree.to_string().lines().next(), Some("{A: 108}"));
    assert_eq!(tree.size(), 10);
}

#[test]
fn removals() {
    let mut tree = sample();
    assert!(tree.remove("A"));
    assert!(tree.remove("C"));
    assert!(tree.remove("F"));
    assert_eq!(tree.keys(), ["D", "K", "M", "R", "V", "X", "Z"]);

    assert!(tree.remove("V"));
    assert!(tree.remove("X"));
    assert!(tree.remove("Z"));
    assert!(!tree.remove("Z"));
    assert_eq!(tree.keys(), ["D", "K", "M", "R"]);
    assert_eq!(tree.size(), 4);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.to_string(), "{D: 68}\n{K: 75}\n{M: 77}\n{R: 82}\n");
}

#[test]
fn copies_are_independent() {
    let mut original = sample();
    let mut copy = original.clone();
    assert_eq!(copy.keys(), original.keys());

    copy.remove("F");
    original.set_value("A", 0).unwrap();
    assert!(original.contains("F"));
    assert_eq!(copy.get("A"), Some(&65));

    let mut assigned = BalancedTree::new();
    insert_letter(&mut assigned, "Q");
    assigned.clone_from(&copy);
    assert_eq!(assigned.keys(), copy.keys());
    assert!(!assigned.contains("Q"));
}
