//! PQ-tree: a consecutive-ones constraint structure.
//!
//! A PQ-tree over `n` elements represents a family of permutations of
//! `0..n`. P-nodes permute their children freely; Q-nodes only reverse.
//! [`PqTree::reduce`] narrows the family to permutations where a given set
//! of elements appears consecutively; [`PqTree::enumerate`] lists (or
//! streams) the surviving permutations.
//!
//! Modeled as an independent `slotmap` arena rather than owning
//! parent/child `Rc`s, matching this crate's general policy of using
//! index-based arena references for structures with cyclic or
//! cross-cutting reachability.

mod reduce;

use std::fmt::Write as _;

use slotmap::{new_key_type, SlotMap};

use crate::perm;

new_key_type! {
    /// A handle into a [`PqTree`]'s internal arena. Not valid across trees.
    pub struct PqKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    Empty,
    Full,
    Partial,
}

#[derive(Debug, Clone)]
pub(crate) enum PqNodeKind {
    Leaf(usize),
    P,
    Q,
}

#[derive(Debug, Clone)]
pub(crate) struct PqNode {
    pub(crate) kind: PqNodeKind,
    pub(crate) children: Vec<PqKey>,
}

/// A PQ-tree over the elements `0..n`.
#[derive(Debug, Clone)]
pub struct PqTree {
    arena: SlotMap<PqKey, PqNode>,
    root: Option<PqKey>,
    leaves: Vec<PqKey>,
    n: usize,
}

impl PqTree {
    /// Build the universal tree over `0..n` (every permutation valid).
    ///
    /// `n == 0` represents the family containing only the empty
    /// permutation; `n == 1` is a single leaf.
    pub fn new(n: usize) -> Self {
        let mut arena = SlotMap::with_key();
        let mut leaves = Vec::with_capacity(n);
        for i in 0..n {
            leaves.push(arena.insert(PqNode {
                kind: PqNodeKind::Leaf(i),
                children: Vec::new(),
            }));
        }
        let root = match n {
            0 => None,
            1 => Some(leaves[0]),
            _ => Some(arena.insert(PqNode {
                kind: PqNodeKind::P,
                children: leaves.clone(),
            })),
        };
        Self { arena, root, leaves, n }
    }

    /// The number of elements this tree was built over.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Narrow the family of valid permutations to those where every element
    /// of `constraint` appears consecutively.
    ///
    /// Returns `false` if no permutation in the current family satisfies
    /// this alongside every previously applied constraint; the tree is then
    /// in an undefined state and must not be reused. Constraints of length
    /// `<= 1` or covering all `n` elements trivially succeed with no change.
    pub fn reduce(&mut self, constraint: &[usize]) -> bool {
        if constraint.len() <= 1 || constraint.len() >= self.n {
            return true;
        }
        let Some(root) = self.root else { return true };

        let full: std::collections::HashSet<usize> = constraint.iter().copied().collect();
        let mut marks = std::collections::HashMap::new();
        let root_mark = reduce::classify(self, root, &full, &mut marks);
        if matches!(root_mark, Mark::Empty) {
            return true;
        }
        match reduce::reduce_node(self, root, &mut marks) {
            Ok(()) => {
                self.promote_unary_root();
                true
            }
            Err(()) => false,
        }
    }

    fn promote_unary_root(&mut self) {
        while let Some(root) = self.root {
            if matches!(self.arena[root].kind, PqNodeKind::Leaf(_)) {
                break;
            }
            if self.arena[root].children.len() == 1 {
                self.root = Some(self.arena[root].children[0]);
            } else {
                break;
            }
        }
    }

    /// The number of permutations consistent with every constraint applied
    /// so far: leaves contribute 1, P-nodes `k! * product(children)`,
    /// Q-nodes `2 * product(children)` (a single-child Q-node still
    /// contributes a factor of 2, kept for uniformity).
    pub fn valid_count(&self) -> u128 {
        match self.root {
            None => 1,
            Some(r) => self.valid_count_node(r),
        }
    }

    fn valid_count_node(&self, key: PqKey) -> u128 {
        let node = &self.arena[key];
        match node.kind {
            PqNodeKind::Leaf(_) => 1,
            PqNodeKind::P => {
                let k = node.children.len() as u128;
                factorial(k) * node.children.iter().map(|&c| self.valid_count_node(c)).product::<u128>()
            }
            PqNodeKind::Q => 2u128 * node.children.iter().map(|&c| self.valid_count_node(c)).product::<u128>(),
        }
    }

    /// All permutations consistent with every constraint applied so far, up
    /// to `limit` of them (`None` for no limit).
    pub fn enumerate(&self, limit: Option<usize>) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        self.enumerate_with(limit, |perm| {
            out.push(perm.to_vec());
            true
        });
        out
    }

    /// Streaming variant of [`PqTree::enumerate`]: invokes `visit` with one
    /// permutation at a time, stopping once `limit` have been produced or
    /// `visit` returns `false`.
    pub fn enumerate_with(&self, limit: Option<usize>, mut visit: impl FnMut(&[usize]) -> bool) {
        let Some(root) = self.root else {
            visit(&[]);
            return;
        };
        let mut produced = 0usize;
        for perm in self.enumerate_node(root) {
            if !visit(&perm) {
                return;
            }
            produced += 1;
            if limit.is_some_and(|l| produced >= l) {
                return;
            }
        }
    }

    fn enumerate_node(&self, key: PqKey) -> Vec<Vec<usize>> {
        let node = &self.arena[key];
        match &node.kind {
            PqNodeKind::Leaf(elem) => vec![vec![*elem]],
            PqNodeKind::P => {
                let child_perms: Vec<Vec<Vec<usize>>> =
                    node.children.iter().map(|&c| self.enumerate_node(c)).collect();
                let k = node.children.len();
                let mut result = Vec::new();
                for order in perm::generate_permutations(k, None) {
                    combine(&child_perms, &order, &mut result);
                }
                result
            }
            PqNodeKind::Q => {
                let child_perms: Vec<Vec<Vec<usize>>> =
                    node.children.iter().map(|&c| self.enumerate_node(c)).collect();
                let k = node.children.len();
                let forward: Vec<usize> = (0..k).collect();
                let mut result = Vec::new();
                combine(&child_perms, &forward, &mut result);
                if k > 1 {
                    let reverse: Vec<usize> = (0..k).rev().collect();
                    combine(&child_perms, &reverse, &mut result);
                }
                result
            }
        }
    }

    /// Independent deep copy: mutating the clone never affects `self`.
    /// `SlotMap::clone` already copies every slot, so the default derive
    /// suffices; this exists to document that contract explicitly.
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Render with numeric leaf labels: P-nodes `{...}`, Q-nodes `[...]`.
    pub fn string(&self) -> String {
        self.string_with_labels(None)
    }

    /// Render with caller-supplied leaf labels (indexed by element value),
    /// falling back to the numeric element value when `labels` is `None` or
    /// too short.
    pub fn string_with_labels(&self, labels: Option<&[String]>) -> String {
        let mut out = String::new();
        match self.root {
            None => out.push_str("()"),
            Some(r) => self.write_node(r, labels, &mut out),
        }
        out
    }

    fn write_node(&self, key: PqKey, labels: Option<&[String]>, out: &mut String) {
        let node = &self.arena[key];
        match &node.kind {
            PqNodeKind::Leaf(elem) => {
                if let Some(label) = labels.and_then(|l| l.get(*elem)) {
                    out.push_str(label);
                } else {
                    let _ = write!(out, "{elem}");
                }
            }
            PqNodeKind::P | PqNodeKind::Q => {
                let (open, close) = match node.kind {
                    PqNodeKind::P => ('{', '}'),
                    _ => ('[', ']'),
                };
                out.push(open);
                for (i, &c) in node.children.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_node(c, labels, out);
                }
                out.push(close);
            }
        }
    }
}

fn combine(child_perms: &[Vec<Vec<usize>>], order: &[usize], out: &mut Vec<Vec<usize>>) {
    fn go(child_perms: &[Vec<Vec<usize>>], order: &[usize], idx: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if idx == order.len() {
            out.push(prefix.clone());
            return;
        }
        let slot = &child_perms[order[idx]];
        for alt in slot {
            let before = prefix.len();
            prefix.extend_from_slice(alt);
            go(child_perms, order, idx + 1, prefix, out);
            prefix.truncate(before);
        }
    }
    let mut prefix = Vec::new();
    go(child_perms, order, 0, &mut prefix, out);
}

fn factorial(k: u128) -> u128 {
    (1..=k).product::<u128>().max(1)
}
