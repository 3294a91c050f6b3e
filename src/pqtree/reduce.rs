//! The consecutive-ones reduction (Booth-Lueker shape, simplified to design
//! level): mark full/empty/partial bottom-up, then restructure P- and
//! Q-nodes so every full leaf in the constraint ends up in one contiguous
//! run.

use std::collections::{HashMap, HashSet};

use super::{Mark, PqKey, PqNode, PqNodeKind, PqTree};

/// Bottom-up classification pass. Does not mutate the tree; `reduce_node`
/// relies on these marks staying valid (the set of full leaves never
/// changes, only their arrangement).
pub(super) fn classify(tree: &PqTree, key: PqKey, full: &HashSet<usize>, marks: &mut HashMap<PqKey, Mark>) -> Mark {
    let node = &tree.arena[key];
    let mark = match &node.kind {
        PqNodeKind::Leaf(elem) => {
            if full.contains(elem) {
                Mark::Full
            } else {
                Mark::Empty
            }
        }
        PqNodeKind::P | PqNodeKind::Q => {
            let children = node.children.clone();
            let mut full_count = 0usize;
            let mut partial_count = 0usize;
            for &c in &children {
                match classify(tree, c, full, marks) {
                    Mark::Full => full_count += 1,
                    Mark::Partial => partial_count += 1,
                    Mark::Empty => {}
                }
            }
            if partial_count == 0 && full_count == children.len() {
                Mark::Full
            } else if partial_count == 0 && full_count == 0 {
                Mark::Empty
            } else {
                Mark::Partial
            }
        }
    };
    marks.insert(key, mark);
    mark
}

/// Recursively restructure `key` (post-order: partial children are resolved
/// before their parent). Returns `Err` if the constraint is infeasible.
pub(super) fn reduce_node(tree: &mut PqTree, key: PqKey, marks: &mut HashMap<PqKey, Mark>) -> Result<(), ()> {
    if matches!(tree.arena[key].kind, PqNodeKind::Leaf(_)) {
        return Ok(());
    }
    let children = tree.arena[key].children.clone();
    for &c in &children {
        if matches!(marks.get(&c), Some(Mark::Partial)) {
            reduce_node(tree, c, marks)?;
        }
    }
    match tree.arena[key].kind {
        PqNodeKind::P => reduce_p_node(tree, key, marks),
        PqNodeKind::Q => reduce_q_node(tree, key, marks),
        PqNodeKind::Leaf(_) => unreachable!(),
    }
}

fn reduce_p_node(tree: &mut PqTree, key: PqKey, marks: &mut HashMap<PqKey, Mark>) -> Result<(), ()> {
    let children = tree.arena[key].children.clone();
    let mut empties = Vec::new();
    let mut fulls = Vec::new();
    let mut partials = Vec::new();
    for c in children {
        match marks[&c] {
            Mark::Full => fulls.push(c),
            Mark::Empty => empties.push(c),
            Mark::Partial => partials.push(c),
        }
    }
    if partials.len() > 1 {
        return Err(());
    }

    if partials.is_empty() {
        if fulls.len() > 1 && !empties.is_empty() {
            let group = tree.arena.insert(PqNode {
                kind: PqNodeKind::P,
                children: fulls,
            });
            marks.insert(group, Mark::Full);
            let mut new_children = empties;
            new_children.push(group);
            tree.arena[key].children = new_children;
        }
        Ok(())
    } else {
        let partial = partials[0];
        let (partial_empty, partial_full) = split_partial_children(tree, partial, marks)?;
        let mut q_children = Vec::new();
        q_children.extend(partial_empty);
        q_children.extend(partial_full);
        q_children.extend(fulls);

        if empties.is_empty() {
            tree.arena[key].kind = PqNodeKind::Q;
            tree.arena[key].children = q_children;
        } else {
            let qnode = tree.arena.insert(PqNode {
                kind: PqNodeKind::Q,
                children: q_children,
            });
            marks.insert(qnode, Mark::Partial);
            let mut new_children = empties;
            new_children.push(qnode);
            tree.arena[key].children = new_children;
        }
        Ok(())
    }
}

fn reduce_q_node(tree: &mut PqTree, key: PqKey, marks: &mut HashMap<PqKey, Mark>) -> Result<(), ()> {
    let children = tree.arena[key].children.clone();
    let child_marks: Vec<Mark> = children.iter().map(|c| marks[c]).collect();

    let nonempty: Vec<usize> = child_marks
        .iter()
        .enumerate()
        .filter(|(_, m)| !matches!(m, Mark::Empty))
        .map(|(i, _)| i)
        .collect();
    if nonempty.is_empty() {
        return Ok(());
    }
    let lo = *nonempty.first().unwrap();
    let hi = *nonempty.last().unwrap();
    if hi - lo + 1 != nonempty.len() {
        return Err(());
    }
    for &i in &nonempty[1..nonempty.len() - 1] {
        if matches!(child_marks[i], Mark::Partial) {
            return Err(());
        }
    }

    let mut new_children = Vec::with_capacity(children.len());
    new_children.extend_from_slice(&children[..lo]);
    for i in lo..=hi {
        match child_marks[i] {
            Mark::Full => new_children.push(children[i]),
            Mark::Partial => {
                let (empty_part, full_part) = split_partial_children(tree, children[i], marks)?;
                if i == lo {
                    new_children.extend(empty_part);
                    new_children.extend(full_part);
                } else {
                    new_children.extend(full_part);
                    new_children.extend(empty_part);
                }
            }
            Mark::Empty => unreachable!(),
        }
    }
    new_children.extend_from_slice(&children[hi + 1..]);
    tree.arena[key].children = new_children;
    Ok(())
}

/// Bucket an already-resolved (no `Partial` children) node's direct children
/// into its empty part and full part, in original relative order.
///
/// Fails if the node's full content is "sandwiched" between empty content on
/// both sides: such a node cannot be spliced into an outer full run from
/// either end.
fn split_partial_children(tree: &PqTree, partial: PqKey, marks: &HashMap<PqKey, Mark>) -> Result<(Vec<PqKey>, Vec<PqKey>), ()> {
    let children = &tree.arena[partial].children;
    let is_full: Vec<bool> = children.iter().map(|c| matches!(marks[c], Mark::Full)).collect();
    let leading_empty = is_full.iter().take_while(|&&f| !f).count();
    let trailing_empty = is_full.iter().rev().take_while(|&&f| !f).count();
    if leading_empty > 0 && trailing_empty > 0 {
        return Err(());
    }

    let mut empties = Vec::new();
    let mut fulls = Vec::new();
    for (&c, &full) in children.iter().zip(is_full.iter()) {
        if full {
            fulls.push(c);
        } else {
            empties.push(c);
        }
    }
    Ok((empties, fulls))
}
