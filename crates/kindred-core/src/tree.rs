//! Family tree construction
//!
//! The tree is an arena of nodes addressed by [`Index`]. A member with two
//! resolvable parents is stored once and its index appears in both parents'
//! `children`, so the structure is a DAG with shared nodes rather than a
//! strict tree. Every walk over it tracks visited indices, which also keeps it
//! finite when the parent links contain a cycle.

use crate::diagnostics::{self, Severity};
use crate::error::{Error, Result};
use crate::member::{Member, MemberId};
use chrono::NaiveDate;
use generational_arena::{Arena, Index};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use termtree::Tree;

/// A member together with its resolved adjacency
#[derive(Debug)]
pub struct TreeNode {
    pub member: Member,
    /// Child nodes, ordered by birth date (unknown last)
    pub children: Vec<Index>,
    /// Parent nodes that resolved in the snapshot, in recorded order
    pub parents: Vec<Index>,
}

/// Rooted family hierarchy built from one member snapshot
#[derive(Debug)]
pub struct FamilyTree {
    arena: Arena<TreeNode>,
    by_id: HashMap<MemberId, Index>,
    root: Index,
}

impl FamilyTree {
    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_member(&self) -> &Member {
        &self.arena[self.root].member
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    /// Node for a member id
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.get(idx))
    }

    /// Number of members in the tree, reachable from the root or not
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get(idx).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parents(&self, idx: Index) -> &[Index] {
        self.get(idx).map(|n| n.parents.as_slice()).unwrap_or(&[])
    }

    /// Pre-order walk from the root visiting each reachable node once
    pub fn iter(&self) -> FamilyTreeIter<'_> {
        FamilyTreeIter::new(self)
    }

    /// Levels on the longest downward path from the root.
    ///
    /// Edges leading back to a node already on the current path are ignored.
    /// Only subtrees that never hit such an edge are memoised, since the
    /// depth below a cycle depends on the path taken into it.
    pub fn depth(&self) -> usize {
        let mut on_path = HashSet::new();
        let mut memo = HashMap::new();
        self.depth_from(self.root, &mut on_path, &mut memo).0
    }

    /// Depth below `idx` and whether it is independent of the current path
    fn depth_from(
        &self,
        idx: Index,
        on_path: &mut HashSet<Index>,
        memo: &mut HashMap<Index, usize>,
    ) -> (usize, bool) {
        if let Some(&depth) = memo.get(&idx) {
            return (depth, true);
        }
        on_path.insert(idx);
        let mut deepest = 0;
        let mut settled = true;
        for &child in self.children(idx) {
            if on_path.contains(&child) {
                settled = false;
                continue;
            }
            let (depth, child_settled) = self.depth_from(child, on_path, memo);
            deepest = deepest.max(depth);
            settled &= child_settled;
        }
        on_path.remove(&idx);
        if settled {
            memo.insert(idx, deepest + 1);
        }
        (deepest + 1, settled)
    }

    /// Reachable members with no children, in walk order
    pub fn leaves(&self) -> Vec<&Member> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.member)
            .collect()
    }

    /// Render for terminal display.
    ///
    /// A shared node is expanded at its first occurrence; later occurrences
    /// are single marked lines.
    pub fn to_term_tree(&self) -> Tree<String> {
        let mut expanded = HashSet::new();
        self.term_subtree(self.root, &mut expanded)
    }

    fn term_subtree(&self, idx: Index, expanded: &mut HashSet<Index>) -> Tree<String> {
        let label = node_label(&self.arena[idx].member);
        if !expanded.insert(idx) {
            return Tree::new(format!("{} (↑ shown above)", label));
        }
        let mut tree = Tree::new(label);
        for &child in self.children(idx) {
            let subtree = self.term_subtree(child, expanded);
            tree.push(subtree);
        }
        tree
    }
}

fn node_label(member: &Member) -> String {
    let mut label = if member.name.is_empty() {
        member.id.to_string()
    } else {
        format!("{} ({})", member.name, member.id)
    };
    if let Some(born) = member.birth_date {
        label.push_str(&format!(" b. {}", born));
    }
    label
}

pub struct FamilyTreeIter<'a> {
    tree: &'a FamilyTree,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'a> FamilyTreeIter<'a> {
    fn new(tree: &'a FamilyTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for FamilyTreeIter<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current) {
                continue;
            }
            if let Some(node) = self.tree.get(current) {
                // Reverse so children come out left to right
                for &child in node.children.iter().rev() {
                    if !self.visited.contains(&child) {
                        self.stack.push(child);
                    }
                }
                return Some((current, node));
            }
        }
        None
    }
}

/// Sort key for birth dates: known dates ascending, unknown after all of them
fn birth_key(born: Option<NaiveDate>) -> (bool, Option<NaiveDate>) {
    (born.is_none(), born)
}

/// Root order: generation ascending (unknown counts as 0), then birth date
/// ascending with unknown last. Callers break remaining ties by snapshot
/// position.
fn root_order(a: &Member, b: &Member) -> Ordering {
    a.generation
        .unwrap_or(0)
        .cmp(&b.generation.unwrap_or(0))
        .then_with(|| birth_key(a.birth_date).cmp(&birth_key(b.birth_date)))
}

/// Build the family tree for a snapshot.
///
/// With `root_id` the named member is the root; otherwise the eldest member
/// by generation and birth date is. Returns None for an empty snapshot or a
/// `root_id` that does not resolve. Dangling parent ids are skipped.
pub fn build_family_tree(members: &[Member], root_id: Option<&str>) -> Option<FamilyTree> {
    tracing::debug!(
        "Building family tree: members={}, root={:?}",
        members.len(),
        root_id
    );

    let mut arena: Arena<TreeNode> = Arena::with_capacity(members.len());
    let mut by_id: HashMap<MemberId, Index> = HashMap::with_capacity(members.len());
    let mut order: Vec<Index> = Vec::with_capacity(members.len());

    for member in members {
        if by_id.contains_key(&member.id) {
            tracing::warn!("Duplicate member id {}, keeping first record", member.id);
            continue;
        }
        let idx = arena.insert(TreeNode {
            member: member.clone(),
            children: Vec::new(),
            parents: Vec::new(),
        });
        by_id.insert(member.id.clone(), idx);
        order.push(idx);
    }

    let root = match root_id {
        Some(id) => match by_id.get(id) {
            Some(&idx) => idx,
            None => {
                tracing::debug!("Root {} not found in snapshot", id);
                return None;
            }
        },
        None => order
            .iter()
            .enumerate()
            .min_by(|(pos_a, a), (pos_b, b)| {
                root_order(&arena[**a].member, &arena[**b].member).then(pos_a.cmp(pos_b))
            })
            .map(|(_, &idx)| idx)?,
    };

    // Resolve edges before mutating the arena
    let mut edges: Vec<(Index, Index)> = Vec::new();
    for &idx in &order {
        let member = &arena[idx].member;
        let mut seen: HashSet<Index> = HashSet::new();
        for parent in &member.parents {
            let Some(&parent_idx) = by_id.get(parent) else {
                tracing::trace!("Skipping dangling parent {} of {}", parent, member.id);
                continue;
            };
            if parent_idx == idx {
                tracing::warn!("Member {} lists itself as parent, skipping", member.id);
                continue;
            }
            if seen.insert(parent_idx) {
                edges.push((parent_idx, idx));
            }
        }
    }

    for &(parent_idx, child_idx) in &edges {
        arena[parent_idx].children.push(child_idx);
        arena[child_idx].parents.push(parent_idx);
    }

    for &idx in &order {
        let mut children = std::mem::take(&mut arena[idx].children);
        // Stable: undated children keep encounter order
        children.sort_by_key(|&child| birth_key(arena[child].member.birth_date));
        arena[idx].children = children;
    }

    tracing::debug!(
        "Family tree built: root={}, nodes={}, edges={}",
        arena[root].member.id,
        arena.len(),
        edges.len()
    );

    Some(FamilyTree { arena, by_id, root })
}

/// Strict variant of [`build_family_tree`].
///
/// Fails instead of returning None, and rejects snapshots with
/// error-severity diagnostics (duplicate ids, self or excess parents, cycles).
pub fn try_build_family_tree(members: &[Member], root_id: Option<&str>) -> Result<FamilyTree> {
    if members.is_empty() {
        return Err(Error::EmptySnapshot);
    }
    if let Some(id) = root_id {
        if !members.iter().any(|m| m.id.as_str() == id) {
            return Err(Error::MemberNotFound(id.to_string()));
        }
    }
    if let Some(diagnostic) = diagnostics::validate(members)
        .into_iter()
        .find(|d| d.severity() == Severity::Error)
    {
        return Err(Error::InvalidSnapshot(diagnostic));
    }

    build_family_tree(members, root_id)
        .ok_or_else(|| Error::MemberNotFound(root_id.unwrap_or_default().to_string()))
}
