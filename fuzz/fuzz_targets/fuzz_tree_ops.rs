//! Fuzz testing for tree operations.
//!
//! Applies an arbitrary operation sequence to a T*-tree and to
//! `std::collections::BTreeMap` as the reference model, re-auditing the
//! tree's structural invariants after every mutation. Any divergence
//! from the model or invariant violation aborts the run.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

use tstar::{Cursor, TStarTree};

#[derive(Debug, Arbitrary)]
struct OpsInput {
    /// Node width, mapped into the legal range before use.
    width: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(u16, u32),
    Delete(u16),
    Get(u16),
    Replace(u16, u32),
    WalkForward(u16, u8),
    WalkBackward(u16, u8),
    DrainFirst,
}

fuzz_target!(|input: OpsInput| {
    let width = 2 + (input.width as usize % 15);
    let mut tree: TStarTree<u16, u32> = TStarTree::with_keys_per_node(width).unwrap();
    let mut model: BTreeMap<u16, u32> = BTreeMap::new();

    for op in input.ops {
        match op {
            Op::Insert(k, v) => {
                let inserted = tree.insert(k, v).is_ok();
                assert_eq!(inserted, !model.contains_key(&k));
                if inserted {
                    model.insert(k, v);
                }
                tree.check_invariants().unwrap();
            }
            Op::Delete(k) => {
                assert_eq!(tree.delete(&k), model.remove(&k));
                tree.check_invariants().unwrap();
            }
            Op::Get(k) => {
                assert_eq!(tree.get(&k), model.get(&k));
            }
            Op::Replace(k, v) => {
                let expected = model.get(&k).copied();
                assert_eq!(tree.replace(&k, v), expected);
                if expected.is_some() {
                    model.insert(k, v);
                }
            }
            Op::WalkForward(k, steps) => {
                let mut cursor = Cursor::new();
                if tree.lookup(&k, &mut cursor).is_none() {
                    continue;
                }
                let mut walker =
                    model.range((std::ops::Bound::Excluded(k), std::ops::Bound::Unbounded));
                for _ in 0..steps {
                    let stepped = tree.cursor_next(&mut cursor);
                    match walker.next() {
                        Some((mk, mv)) => {
                            assert!(stepped);
                            assert_eq!(tree.key_at(&cursor), Some(mk));
                            assert_eq!(tree.value_at(&cursor), Some(mv));
                        }
                        None => {
                            assert!(!stepped);
                            break;
                        }
                    }
                }
            }
            Op::WalkBackward(k, steps) => {
                let mut cursor = Cursor::new();
                if tree.lookup(&k, &mut cursor).is_none() {
                    continue;
                }
                let mut walker = model.range(..k).rev();
                for _ in 0..steps {
                    let stepped = tree.cursor_prev(&mut cursor);
                    match walker.next() {
                        Some((mk, mv)) => {
                            assert!(stepped);
                            assert_eq!(tree.key_at(&cursor), Some(mk));
                            assert_eq!(tree.value_at(&cursor), Some(mv));
                        }
                        None => {
                            assert!(!stepped);
                            break;
                        }
                    }
                }
            }
            Op::DrainFirst => {
                let mut cursor = Cursor::new();
                if tree.cursor_first(&mut cursor) {
                    let (&mk, &mv) = model.iter().next().unwrap();
                    assert_eq!(tree.delete_at(&mut cursor), Some(mv));
                    model.remove(&mk);
                    tree.check_invariants().unwrap();
                }
            }
        }
        assert_eq!(tree.len(), model.len());
    }

    let pairs: Vec<(u16, u32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
    let expected: Vec<(u16, u32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, expected);
});
