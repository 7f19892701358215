//! IAI-Callgrind benchmark for RedBlackTree construction.
//!
//! Measures instruction counts for bulk construction vs incremental insert,
//! on ascending and scrambled key orders.

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use std::hint::black_box;
use sylva::ordered::RedBlackTree;

// Setup functions for different data sizes
fn setup_ascending_1000() -> Vec<i32> {
    (0..1000).collect()
}

fn setup_ascending_10000() -> Vec<i32> {
    (0..10000).collect()
}

fn setup_scrambled_1000() -> Vec<i32> {
    (0..1000).map(|index| (index * 7919) % 1000).collect()
}

fn setup_scrambled_10000() -> Vec<i32> {
    (0..10000).map(|index| (index * 7919) % 10000).collect()
}

// try_from_iter benchmarks
#[library_benchmark]
#[bench::ascending_1000(setup_ascending_1000())]
#[bench::ascending_10000(setup_ascending_10000())]
#[bench::scrambled_1000(setup_scrambled_1000())]
#[bench::scrambled_10000(setup_scrambled_10000())]
fn try_from_iter(keys: Vec<i32>) -> RedBlackTree<i32> {
    black_box(RedBlackTree::try_from_iter(black_box(keys)).unwrap_or_default())
}

// insert_all benchmarks
#[library_benchmark]
#[bench::ascending_1000(setup_ascending_1000())]
#[bench::scrambled_10000(setup_scrambled_10000())]
fn insert_all(keys: Vec<i32>) -> RedBlackTree<i32> {
    let mut tree = RedBlackTree::new();
    let _ = tree.insert_all(black_box(keys));
    black_box(tree)
}

// remove benchmarks (tree built in setup)
fn setup_tree_10000() -> RedBlackTree<i32> {
    RedBlackTree::try_from_iter(0..10000).unwrap_or_default()
}

#[library_benchmark]
#[bench::every_other_10000(setup_tree_10000())]
fn remove_every_other(mut tree: RedBlackTree<i32>) -> RedBlackTree<i32> {
    for key in (0..10000).step_by(2) {
        let _ = tree.remove(black_box(&key));
    }
    black_box(tree)
}

library_benchmark_group!(
    name = red_black_tree_group;
    benchmarks = try_from_iter, insert_all, remove_every_other
);

main!(library_benchmark_groups = red_black_tree_group);
