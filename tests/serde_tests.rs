#![cfg(all(feature = "serde", feature = "ordered"))]

//! Integration tests for serde support in sylva.

use rstest::rstest;
use sylva::ordered::RedBlackTree;

// =============================================================================
// RedBlackTree Integration Tests
// =============================================================================

#[rstest]
fn test_tree_serializes_as_ascending_sequence() {
    let tree = RedBlackTree::try_from_iter([3, 1, 2]).unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(json, "[1,2,3]");
}

#[rstest]
fn test_tree_json_roundtrip() {
    let tree = RedBlackTree::try_from_iter((1..=50).map(|key| key * 3)).unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let restored: RedBlackTree<i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(tree, restored);
    assert!(restored.validate().is_ok());
}

#[rstest]
fn test_unsorted_input_is_accepted() {
    let restored: RedBlackTree<String> = serde_json::from_str(r#"["b", "c", "a"]"#).unwrap();
    let keys: Vec<&str> = restored.iter().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[rstest]
fn test_duplicate_keys_are_rejected() {
    let result: Result<RedBlackTree<i32>, _> = serde_json::from_str("[1, 2, 1]");
    let error = result.unwrap_err();
    assert!(error.to_string().contains("key is already present"));
}

#[rstest]
fn test_empty_tree_roundtrip() {
    let tree: RedBlackTree<i32> = RedBlackTree::new();
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(json, "[]");
    let restored: RedBlackTree<i32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}
