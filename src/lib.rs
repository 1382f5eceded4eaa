//! # tstar - T*-tree In-Memory Ordered Index
//!
//! A T*-tree is the index structure main-memory database engines reach
//! for when a B-tree is too disk-shaped and a binary search tree touches
//! too many cache lines: an AVL-balanced binary tree whose nodes each
//! hold a small sorted run of entries (8 by default). Lookups descend
//! comparing only against each node's minimum and maximum, so a search
//! costs O(log N) node hops plus one in-node binary search.
//!
//! ## Quick Start
//!
//! ```
//! use tstar::TStarTree;
//!
//! let mut index = TStarTree::new();
//! index.insert(42u64, "answer")?;
//!
//! assert_eq!(index.get(&42), Some(&"answer"));
//! assert_eq!(index.delete(&42), Some("answer"));
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------+
//! |      Public API (TStarTree / Cursor)       |
//! +---------------------+----------------------+
//! |  Search primitive   |  Cursor navigation   |
//! |  (bounding node)    |  (successor thread)  |
//! +---------------------+----------------------+
//! |  Insert / delete paths (spill, borrow)     |
//! +--------------------------------------------+
//! |  AVL rebalance + T* key redistribution     |
//! +--------------------------------------------+
//! |  Node slab (NodeArena, free-list recycled) |
//! +--------------------------------------------+
//! ```
//!
//! ## Cursors
//!
//! [`TStarTree::lookup`] fills a [`Cursor`] describing where a key lives,
//! or where it would live if inserted. The placeful operations
//! ([`TStarTree::insert_at`], [`TStarTree::delete_at`]) consume that
//! cursor to mutate without a second descent, and
//! [`TStarTree::cursor_next`] / [`TStarTree::cursor_prev`] step through
//! keys in order from any position. Forward steps ride each node's
//! successor link in amortised O(1).
//!
//! ## Module Overview
//!
//! - `tree`: the core structure, search primitive, and plain entry points
//! - `cursor`: cursor state machine and placeful mutation
//! - `balance`: rotations and the T* post-rotation key redistribution
//! - `node`: node layout and in-node run operations
//! - `arena`: slab allocation of nodes with lifecycle accounting
//! - `validation`: full structural audit and debug rendering
//!
//! ## Thread Safety
//!
//! A `TStarTree` is a single-threaded structure with no interior
//! synchronisation; wrap it externally for concurrent use. Every
//! operation is synchronous and bounded.

mod arena;
mod balance;
mod cursor;
mod node;
mod tree;
mod validation;

pub use cursor::{Cursor, CursorSide, CursorState};
pub use tree::{Iter, TStarTree, DEFAULT_KEYS_PER_NODE, MAX_KEYS_PER_NODE, MIN_KEYS_PER_NODE};
