//! # Rebalancing
//!
//! AVL rebalancing adapted to multi-key nodes. After a structural change
//! (a leaf attached, a node unlinked) the walk climbs parent-wards from
//! the mutation site adjusting each ancestor's balance factor; an
//! ancestor reaching ±2 is rotated.
//!
//! ## Rotations
//!
//! Both rotations are written once, parameterised by the heavy side, via
//! the `children[side]` array:
//!
//! ```text
//! single (heavy = RIGHT):          double (heavy = RIGHT, child leans LEFT):
//!
//!     n                c                 n                   g
//!      \              / \                 \                 / \
//!       c     =>     n   Z                 c       =>      n   c
//!      / \            \                   / \               \ / \
//!     Y   Z            Y                 g   Z              A B  Z
//!                                       / \
//!                                      A   B
//! ```
//!
//! A growth walk stops at the first rotation (the subtree regains its
//! prior height); a shrink walk continues while subtree heights keep
//! dropping, per the usual AVL rules.
//!
//! Rotations relink nodes but never move entries between them, so the
//! in-order node sequence, and with it every successor link, is invariant
//! under rotation.
//!
//! ## T* redistribution
//!
//! What separates a T*-tree from a plain T-tree: a rotation can leave the
//! subtree's new root (or, rarely, another rotated node) as an internal
//! node far below half occupancy while an in-order neighbor sits full.
//! After every rotation each rotated node that is internal and below the
//! half-full minimum pulls extreme entries, one at a time, from the
//! fuller of the two nodes adjacent to it in key order: the rightmost
//! node of its left subtree and the leftmost node of its right subtree.
//! Both donors lack a child on the taking side, so they are leaves or
//! half-leaves and exempt from the minimum themselves; they are never
//! drained below a single entry. Entries move only between in-order
//! neighbors, which keeps the successor thread intact.

use crate::arena::NodeId;
use crate::node::Side;
use crate::tree::TStarTree;

impl<K: Ord, V> TStarTree<K, V> {
    /// Walks up from `id` after the subtree hanging on `side` of `id`
    /// grew taller by one.
    pub(crate) fn rebalance_grown(&mut self, mut id: NodeId, mut side: Side) {
        loop {
            let bf = {
                let n = &mut self.arena[id];
                n.bf += side.delta();
                n.bf
            };
            match bf {
                0 => return,
                -1 | 1 => {
                    let n = &self.arena[id];
                    if n.parent.is_nil() {
                        return;
                    }
                    side = n.side;
                    id = n.parent;
                }
                _ => {
                    // One rotation restores the subtree's prior height.
                    self.rotate(id);
                    return;
                }
            }
        }
    }

    /// Walks up from `id` after the subtree hanging on `side` of `id`
    /// shrank by one.
    pub(crate) fn rebalance_shrunk(&mut self, mut id: NodeId, mut side: Side) {
        loop {
            let bf = {
                let n = &mut self.arena[id];
                n.bf -= side.delta();
                n.bf
            };
            let at = match bf {
                -1 | 1 => return,
                0 => id,
                _ => {
                    let (subtree, reduced) = self.rotate(id);
                    if !reduced {
                        return;
                    }
                    subtree
                }
            };
            let n = &self.arena[at];
            if n.parent.is_nil() {
                return;
            }
            side = n.side;
            id = n.parent;
        }
    }

    /// Rotates the ±2 node `id`. Returns the subtree's new root and
    /// whether the subtree lost a level of height.
    fn rotate(&mut self, id: NodeId) -> (NodeId, bool) {
        let n = &self.arena[id];
        debug_assert_eq!(n.bf.abs(), 2);
        let heavy = if n.bf > 0 { Side::Right } else { Side::Left };
        let child = n.child(heavy);
        if self.arena[child].bf == -heavy.delta() {
            (self.rotate_double(id, heavy), true)
        } else {
            self.rotate_single(id, heavy)
        }
    }

    fn rotate_single(&mut self, id: NodeId, side: Side) -> (NodeId, bool) {
        let sigma = side.delta();
        let (parent, old_side) = {
            let n = &self.arena[id];
            (n.parent, n.side)
        };
        let c = self.arena[id].child(side);
        let inner = self.arena[c].child(side.opposite());

        self.arena[id].set_child(side, inner);
        if !inner.is_nil() {
            self.arena[inner].parent = id;
            self.arena[inner].side = side;
        }
        self.replace_subtree_root(parent, old_side, c);
        self.arena[c].set_child(side.opposite(), id);
        self.arena[id].parent = c;
        self.arena[id].side = side.opposite();

        let reduced = if self.arena[c].bf == sigma {
            self.arena[id].bf = 0;
            self.arena[c].bf = 0;
            true
        } else {
            // Balanced child: reachable only from the shrink walk. The
            // subtree keeps its height.
            self.arena[id].bf = sigma;
            self.arena[c].bf = -sigma;
            false
        };

        self.refill(id);
        self.refill(c);
        (c, reduced)
    }

    fn rotate_double(&mut self, id: NodeId, side: Side) -> NodeId {
        let sigma = side.delta();
        let (parent, old_side) = {
            let n = &self.arena[id];
            (n.parent, n.side)
        };
        let c = self.arena[id].child(side);
        let g = self.arena[c].child(side.opposite());
        let g_near = self.arena[g].child(side);
        let g_far = self.arena[g].child(side.opposite());

        self.arena[c].set_child(side.opposite(), g_near);
        if !g_near.is_nil() {
            self.arena[g_near].parent = c;
            self.arena[g_near].side = side.opposite();
        }
        self.arena[id].set_child(side, g_far);
        if !g_far.is_nil() {
            self.arena[g_far].parent = id;
            self.arena[g_far].side = side;
        }
        self.replace_subtree_root(parent, old_side, g);
        self.arena[g].set_child(side, c);
        self.arena[c].parent = g;
        self.arena[c].side = side;
        self.arena[g].set_child(side.opposite(), id);
        self.arena[id].parent = g;
        self.arena[id].side = side.opposite();

        let g_bf = self.arena[g].bf;
        if g_bf == sigma {
            self.arena[id].bf = -sigma;
            self.arena[c].bf = 0;
        } else if g_bf == -sigma {
            self.arena[id].bf = 0;
            self.arena[c].bf = sigma;
        } else {
            self.arena[id].bf = 0;
            self.arena[c].bf = 0;
        }
        self.arena[g].bf = 0;

        self.refill(id);
        self.refill(c);
        self.refill(g);
        g
    }

    fn replace_subtree_root(&mut self, parent: NodeId, side: Side, new_root: NodeId) {
        self.arena[new_root].parent = parent;
        if parent.is_nil() {
            self.root = new_root;
        } else {
            self.arena[new_root].side = side;
            self.arena[parent].set_child(side, new_root);
        }
    }

    /// Pulls extreme entries from the in-order neighbors of `id` until it
    /// meets the internal half-full minimum. No-op for leaves and
    /// half-leaves.
    fn refill(&mut self, id: NodeId) {
        let min_fill = self.min_fill();
        loop {
            let n = &self.arena[id];
            if !n.is_internal() || n.entries.len() >= min_fill {
                return;
            }
            let glb = self.sidemost(n.child(Side::Left), Side::Right);
            let lub = self.sidemost(n.child(Side::Right), Side::Left);
            let glb_len = self.arena[glb].entries.len();
            let lub_len = self.arena[lub].entries.len();
            if glb_len <= 1 && lub_len <= 1 {
                return;
            }
            if glb_len >= lub_len {
                let entry = self.arena[glb].entries.pop().unwrap();
                self.arena[id].entries.insert(0, entry);
            } else {
                let entry = self.arena[lub].entries.remove(0);
                self.arena[id].entries.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree4() -> TStarTree<i32, i32> {
        TStarTree::with_keys_per_node(4).unwrap()
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = tree4();
        for k in 0..256 {
            tree.insert(k, k).unwrap();
            tree.check_invariants().unwrap();
        }
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = tree4();
        for k in (0..256).rev() {
            tree.insert(k, k).unwrap();
            tree.check_invariants().unwrap();
        }
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn zigzag_inserts_trigger_double_rotations() {
        let mut tree = tree4();
        // Alternate far ends towards the middle to exercise both double
        // rotation orientations.
        let (mut lo, mut hi) = (0, 1000);
        while lo < hi {
            tree.insert(lo, lo).unwrap();
            tree.insert(hi, hi).unwrap();
            tree.check_invariants().unwrap();
            lo += 3;
            hi -= 3;
        }
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        let mut want: Vec<i32> = Vec::new();
        let (mut lo, mut hi) = (0, 1000);
        while lo < hi {
            want.push(lo);
            want.push(hi);
            lo += 3;
            hi -= 3;
        }
        want.sort_unstable();
        assert_eq!(keys, want);
    }

    #[test]
    fn interleaved_deletes_stay_balanced() {
        let mut tree = tree4();
        for k in 0..200 {
            tree.insert(k, k).unwrap();
        }
        for k in (0..200).step_by(2) {
            assert_eq!(tree.delete(&k), Some(k));
            tree.check_invariants().unwrap();
        }
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (1..200).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn rotated_roots_meet_half_fill() {
        let mut tree = tree4();
        // Descending fill repeatedly promotes sparse left leaves; every
        // promoted root must come out of refill at two entries or more.
        for k in (0..100).rev() {
            tree.insert(k, k).unwrap();
        }
        tree.check_invariants().unwrap();
    }
}
