//! # Structural Self-Checks
//!
//! [`TStarTree::check_invariants`] audits every structural property the
//! tree promises and reports the first violation with enough context to
//! locate it. The walk verifies, per node and globally:
//!
//! 1. in-order traversal yields a non-decreasing key sequence,
//! 2. every balance factor matches the actual child heights and stays
//!    within ±1,
//! 3. occupancy: runs are non-empty, at most `keys_per_node` long, and
//!    internal nodes hold at least the half-full minimum,
//! 4. parent and side links mirror the child links that reached a node,
//! 5. the successor thread visits exactly the in-order node sequence,
//! 6. the key count and live node count match the tree's accounting.
//!
//! The test suites and the fuzz target run the audit after every
//! mutation; production callers can invoke it from their own debug
//! assertions. [`TStarTree::dump`] renders the node structure for eyeball
//! debugging.

use eyre::{ensure, Result};
use hashbrown::HashSet;

use crate::arena::NodeId;
use crate::node::Side;
use crate::tree::TStarTree;

impl<K: Ord, V> TStarTree<K, V> {
    /// Walks the whole tree and verifies every structural invariant.
    pub fn check_invariants(&self) -> Result<()> {
        if self.root.is_nil() {
            ensure!(self.len() == 0, "empty tree reports {} keys", self.len());
            ensure!(
                self.node_count() == 0,
                "empty tree holds {} live nodes",
                self.node_count()
            );
            return Ok(());
        }

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.audit(self.root, NodeId::NIL, Side::Left, &mut visited, &mut order)?;

        let mut keys = 0usize;
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            ensure!(
                self.arena[a].max_key() <= self.arena[b].min_key(),
                "nodes {:?} and {:?} out of order",
                a,
                b
            );
            ensure!(
                self.arena[a].successor == b,
                "successor of {:?} should be its in-order neighbor {:?}",
                a,
                b
            );
        }
        let last = *order.last().unwrap();
        ensure!(
            self.arena[last].successor.is_nil(),
            "maximum node {:?} has a successor",
            last
        );
        for &id in &order {
            keys += self.arena[id].entries.len();
        }
        ensure!(
            keys == self.len(),
            "tree reports {} keys but nodes hold {}",
            self.len(),
            keys
        );
        ensure!(
            order.len() == self.node_count(),
            "tree reaches {} nodes but arena holds {}",
            order.len(),
            self.node_count()
        );
        Ok(())
    }

    /// Recursive audit of the subtree at `id`; returns its height.
    fn audit(
        &self,
        id: NodeId,
        parent: NodeId,
        side: Side,
        visited: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<usize> {
        ensure!(visited.insert(id), "node {:?} reached twice", id);
        let n = &self.arena[id];
        ensure!(!n.entries.is_empty(), "node {:?} is empty", id);
        ensure!(
            n.entries.len() <= self.keys_per_node(),
            "node {:?} holds {} entries, limit {}",
            id,
            n.entries.len(),
            self.keys_per_node()
        );
        for w in n.entries.windows(2) {
            ensure!(w[0].key <= w[1].key, "node {:?} run out of order", id);
        }
        ensure!(
            n.parent == parent,
            "node {:?} parent link does not match the path that reached it",
            id
        );
        if !parent.is_nil() {
            ensure!(
                n.side == side,
                "node {:?} side does not match its slot in {:?}",
                id,
                parent
            );
        }
        if n.is_internal() {
            ensure!(
                n.entries.len() >= self.min_fill(),
                "internal node {:?} holds {} entries, minimum {}",
                id,
                n.entries.len(),
                self.min_fill()
            );
        }

        let left = n.child(Side::Left);
        let right = n.child(Side::Right);
        let lh = if left.is_nil() {
            0
        } else {
            self.audit(left, id, Side::Left, visited, order)?
        };
        order.push(id);
        let rh = if right.is_nil() {
            0
        } else {
            self.audit(right, id, Side::Right, visited, order)?
        };

        let bf = rh as i64 - lh as i64;
        ensure!(
            bf.abs() <= 1,
            "node {:?} subtree heights differ by {}",
            id,
            bf.abs()
        );
        ensure!(
            i64::from(n.bf) == bf,
            "node {:?} records bf {} but heights give {}",
            id,
            n.bf,
            bf
        );
        Ok(1 + lh.max(rh))
    }
}

impl<K: Ord + std::fmt::Debug, V> TStarTree<K, V> {
    /// Indented rendering of the node structure, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if self.root.is_nil() {
            out.push_str("(empty)\n");
            return out;
        }
        self.dump_node(self.root, 0, '*', &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, tag: char, out: &mut String) {
        use std::fmt::Write;
        let n = &self.arena[id];
        let keys: Vec<&K> = n.entries.iter().map(|e| &e.key).collect();
        let _ = writeln!(out, "{}{} {:?} bf={}", "  ".repeat(depth), tag, keys, n.bf);
        for (side, tag) in [(Side::Left, 'L'), (Side::Right, 'R')] {
            let child = n.child(side);
            if !child.is_nil() {
                self.dump_node(child, depth + 1, tag, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_accepts_a_busy_tree() {
        let mut tree = TStarTree::with_keys_per_node(4).unwrap();
        for k in 0..500 {
            tree.insert(k * 7 % 500, k).unwrap();
        }
        tree.check_invariants().unwrap();
        for k in (0..500).step_by(3) {
            tree.delete(&(k * 7 % 500));
        }
        tree.check_invariants().unwrap();
    }

    #[test]
    fn audit_accepts_the_empty_tree() {
        let tree: TStarTree<i32, i32> = TStarTree::new();
        tree.check_invariants().unwrap();
    }

    #[test]
    fn dump_renders_keys_and_structure() {
        let mut tree = TStarTree::with_keys_per_node(4).unwrap();
        for k in 1..=10 {
            tree.insert(k, ()).unwrap();
        }
        let rendered = tree.dump();
        assert!(rendered.lines().count() >= 3);
        assert!(rendered.contains("bf="));
        assert!(rendered.starts_with('*'));
    }
}
