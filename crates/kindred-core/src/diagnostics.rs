//! Snapshot validation
//!
//! Queries tolerate malformed input. These checks report it, for callers that
//! need to surface problems rather than render around them.

use crate::member::{Member, MemberId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Maximum number of distinct parents a member may reference
pub const MAX_PARENTS: usize = 2;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A problem found in a member snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    DuplicateId { id: MemberId },
    SelfParent { id: MemberId },
    TooManyParents { id: MemberId, count: usize },
    DanglingParent { id: MemberId, parent: MemberId },
    Cycle { members: Vec<MemberId> },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DanglingParent { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "Duplicate member id: {}", id),
            Self::SelfParent { id } => write!(f, "Member {} lists itself as a parent", id),
            Self::TooManyParents { id, count } => write!(
                f,
                "Member {} has {} parents (max {})",
                id, count, MAX_PARENTS
            ),
            Self::DanglingParent { id, parent } => {
                write!(f, "Member {} references unknown parent {}", id, parent)
            }
            Self::Cycle { members } => {
                let ids: Vec<&str> = members.iter().map(MemberId::as_str).collect();
                write!(f, "Parent cycle through: {}", ids.join(", "))
            }
        }
    }
}

/// Check a snapshot for malformed input.
///
/// Per-member findings come first in snapshot order, followed by one entry
/// per parent cycle.
pub fn validate(members: &[Member]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let known: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();

    for member in members {
        if !seen.insert(member.id.as_str()) {
            diagnostics.push(Diagnostic::DuplicateId {
                id: member.id.clone(),
            });
            continue;
        }

        let distinct = distinct_parents(member);
        if distinct.iter().any(|p| *p == &member.id) {
            diagnostics.push(Diagnostic::SelfParent {
                id: member.id.clone(),
            });
        }
        if distinct.len() > MAX_PARENTS {
            diagnostics.push(Diagnostic::TooManyParents {
                id: member.id.clone(),
                count: distinct.len(),
            });
        }
        for parent in distinct {
            if !known.contains(parent.as_str()) {
                diagnostics.push(Diagnostic::DanglingParent {
                    id: member.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    diagnostics.extend(
        find_cycles(members)
            .into_iter()
            .map(|members| Diagnostic::Cycle { members }),
    );

    tracing::debug!(
        "Validated {} members: {} diagnostics",
        members.len(),
        diagnostics.len()
    );
    diagnostics
}

fn distinct_parents(member: &Member) -> Vec<&MemberId> {
    let mut parents: Vec<&MemberId> = Vec::with_capacity(member.parents.len());
    for parent in &member.parents {
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }
    parents
}

/// Find parent cycles of two or more members.
///
/// Each cycle is a strongly connected group of the parent-link graph, listed
/// in snapshot order. Self-parent links are reported by [`validate`] instead.
pub fn find_cycles(members: &[Member]) -> Vec<Vec<MemberId>> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(members.len());
    for (pos, member) in members.iter().enumerate() {
        position.entry(member.id.as_str()).or_insert(pos);
    }

    let edges: Vec<Vec<usize>> = members
        .iter()
        .enumerate()
        .map(|(pos, member)| {
            if position.get(member.id.as_str()) != Some(&pos) {
                // Duplicate record, shadowed by the first one
                return Vec::new();
            }
            distinct_parents(member)
                .into_iter()
                .filter_map(|p| position.get(p.as_str()).copied())
                .filter(|&p| p != pos)
                .collect()
        })
        .collect();

    let mut tarjan = Tarjan::new(&edges);
    for node in 0..members.len() {
        if tarjan.index[node].is_none() {
            tarjan.visit(node);
        }
    }

    let mut cycles: Vec<Vec<usize>> = tarjan
        .components
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    cycles.sort_by_key(|component| component[0]);

    if !cycles.is_empty() {
        tracing::warn!("Found {} parent cycles in snapshot", cycles.len());
    }

    cycles
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|pos| members[pos].id.clone())
                .collect()
        })
        .collect()
}

/// Tarjan's strongly connected components over member positions
struct Tarjan<'a> {
    edges: &'a [Vec<usize>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn new(edges: &'a [Vec<usize>]) -> Self {
        let n = edges.len();
        Self {
            edges,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn visit(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        let edges = self.edges;
        for &next in &edges[node] {
            match self.index[next] {
                None => {
                    self.visit(next);
                    self.lowlink[node] = self.lowlink[node].min(self.lowlink[next]);
                }
                Some(next_index) if self.on_stack[next] => {
                    self.lowlink[node] = self.lowlink[node].min(next_index);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlink[node]) == self.index[node] {
            let mut component = Vec::new();
            while let Some(top) = self.stack.pop() {
                self.on_stack[top] = false;
                component.push(top);
                if top == node {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
