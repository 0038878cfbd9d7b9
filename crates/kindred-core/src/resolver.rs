//! Ancestor and descendant traversal over parent links

use crate::member::{Member, MemberId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Borrowed lookup structure over a member snapshot
///
/// Built once per query by the free functions in this module; callers running
/// many queries against the same snapshot can build it themselves and reuse it.
/// It never outlives the snapshot and never caches across snapshots.
pub struct FamilyIndex<'a> {
    members: &'a [Member],
    by_id: HashMap<&'a str, &'a Member>,
    children: HashMap<&'a str, Vec<&'a Member>>,
}

impl<'a> FamilyIndex<'a> {
    /// Index a snapshot. On duplicate ids the first record wins.
    pub fn new(members: &'a [Member]) -> Self {
        let mut by_id: HashMap<&'a str, &'a Member> = HashMap::with_capacity(members.len());
        let mut children: HashMap<&'a str, Vec<&'a Member>> = HashMap::new();

        for member in members {
            if by_id.contains_key(member.id.as_str()) {
                tracing::warn!("Duplicate member id {}, keeping first record", member.id);
                continue;
            }
            by_id.insert(member.id.as_str(), member);
        }

        for member in members {
            let indexed = by_id.get(member.id.as_str()).copied();
            if !indexed.is_some_and(|first| std::ptr::eq(first, member)) {
                continue;
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for parent in &member.parents {
                if seen.insert(parent.as_str()) {
                    children.entry(parent.as_str()).or_default().push(member);
                }
            }
        }

        Self {
            members,
            by_id,
            children,
        }
    }

    /// The snapshot this index was built from
    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a Member> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Parent ids of `member` that resolve in the snapshot
    pub fn parents<'m>(&self, member: &'m Member) -> Vec<&'m MemberId> {
        let mut parents: Vec<&'m MemberId> = Vec::with_capacity(member.parents.len());
        for parent in &member.parents {
            if self.contains(parent.as_str()) && !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        parents
    }

    /// Members listing `id` among their parents, in snapshot order
    pub fn children_of(&self, id: &str) -> &[&'a Member] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Breadth-first ancestor ids of `id`, including dangling ones.
    ///
    /// Dangling ids appear in the result but are not expanded further. The
    /// start id is never part of the result, even when a cycle leads back to it.
    pub fn ancestor_ids(&self, id: &str) -> Vec<&'a str> {
        let Some(start) = self.get(id) else {
            return Vec::new();
        };

        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut queue: VecDeque<&'a str> = VecDeque::new();
        let mut ancestors = Vec::new();

        visited.insert(start.id.as_str());
        queue.push_back(start.id.as_str());

        while let Some(current) = queue.pop_front() {
            let Some(member) = self.get(current) else {
                continue;
            };
            for parent in &member.parents {
                let parent = parent.as_str();
                if visited.insert(parent) {
                    tracing::trace!("Ancestor walk: {} -> {}", current, parent);
                    ancestors.push(parent);
                    queue.push_back(parent);
                }
            }
        }

        ancestors
    }

    /// Every ancestor member reachable from `id`, breadth-first
    pub fn ancestors(&self, id: &str) -> Vec<&'a Member> {
        let ancestors: Vec<&'a Member> = self
            .ancestor_ids(id)
            .into_iter()
            .filter_map(|ancestor| self.get(ancestor))
            .collect();

        tracing::debug!("Found {} ancestors of {}", ancestors.len(), id);
        ancestors
    }

    /// Every descendant member reachable from `id`, depth-first pre-order
    pub fn descendants(&self, id: &str) -> Vec<&'a Member> {
        let Some(start) = self.get(id) else {
            return Vec::new();
        };

        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut stack: Vec<&'a Member> = Vec::new();
        let mut descendants = Vec::new();

        visited.insert(start.id.as_str());
        // Reverse so the first child in snapshot order is expanded first
        stack.extend(self.children_of(start.id.as_str()).iter().rev());

        while let Some(member) = stack.pop() {
            if !visited.insert(member.id.as_str()) {
                continue;
            }
            tracing::trace!("Descendant walk: reached {}", member.id);
            descendants.push(member);
            for child in self.children_of(member.id.as_str()).iter().rev() {
                if !visited.contains(child.id.as_str()) {
                    stack.push(*child);
                }
            }
        }

        tracing::debug!("Found {} descendants of {}", descendants.len(), id);
        descendants
    }
}

/// Parent ids of `member` with ids absent from `members` removed
pub fn get_parents<'m>(members: &[Member], member: &'m Member) -> Vec<&'m MemberId> {
    FamilyIndex::new(members).parents(member)
}

/// Every ancestor of `id` in breadth-first order; empty for an unknown id
pub fn get_ancestors<'a>(members: &'a [Member], id: &str) -> Vec<&'a Member> {
    FamilyIndex::new(members).ancestors(id)
}

/// Every descendant of `id` in depth-first order; empty for an unknown id
pub fn get_descendants<'a>(members: &'a [Member], id: &str) -> Vec<&'a Member> {
    FamilyIndex::new(members).descendants(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(members: &[&Member]) -> Vec<String> {
        members.iter().map(|m| m.id.to_string()).collect()
    }

    fn create_test_family() -> Vec<Member> {
        // G1   G2
        //  \   /
        //    P      Q (parent: G2, X-dangling)
        //   / \
        //  C1  C2
        //  |
        //  K
        vec![
            Member::new("G1"),
            Member::new("G2"),
            Member::new("P").with_parent("G1").with_parent("G2"),
            Member::new("Q").with_parent("G2").with_parent("X"),
            Member::new("C1").with_parent("P"),
            Member::new("C2").with_parent("P"),
            Member::new("K").with_parent("C1"),
        ]
    }

    #[test]
    fn test_get_parents_drops_dangling() {
        let members = create_test_family();
        let q = &members[3];
        let parents = get_parents(&members, q);

        assert_eq!(parents, vec![&MemberId::from("G2")]);
    }

    #[test]
    fn test_ancestors_breadth_first() {
        let members = create_test_family();
        let ancestors = get_ancestors(&members, "K");

        assert_eq!(ids(&ancestors), vec!["C1", "P", "G1", "G2"]);
    }

    #[test]
    fn test_ancestor_ids_keep_dangling() {
        let members = create_test_family();
        let index = FamilyIndex::new(&members);

        assert_eq!(index.ancestor_ids("Q"), vec!["G2", "X"]);
        assert_eq!(ids(&index.ancestors("Q")), vec!["G2"]);
    }

    #[test]
    fn test_descendants_depth_first() {
        let members = create_test_family();
        let descendants = get_descendants(&members, "G1");

        assert_eq!(ids(&descendants), vec!["P", "C1", "K", "C2"]);
    }

    #[test]
    fn test_unknown_id_yields_empty() {
        let members = create_test_family();

        assert!(get_ancestors(&members, "nobody").is_empty());
        assert!(get_descendants(&members, "nobody").is_empty());
        // Dangling ids are not members either
        assert!(get_descendants(&members, "X").is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let members = vec![
            Member::new("A").with_parent("B"),
            Member::new("B").with_parent("A"),
        ];

        assert_eq!(ids(&get_ancestors(&members, "A")), vec!["B"]);
        assert_eq!(ids(&get_descendants(&members, "A")), vec!["B"]);
    }

    #[test]
    fn test_self_parent_terminates() {
        let members = vec![Member::new("A").with_parent("A")];

        assert!(get_ancestors(&members, "A").is_empty());
        assert!(get_descendants(&members, "A").is_empty());
    }

    #[test]
    fn test_shared_descendant_listed_once() {
        let members = create_test_family();
        let descendants = get_descendants(&members, "G2");

        assert_eq!(ids(&descendants), vec!["P", "C1", "K", "C2", "Q"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let members = vec![
            Member::new("A").with_name("first"),
            Member::new("A").with_name("second"),
        ];
        let index = FamilyIndex::new(&members);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("A").map(|m| m.name.as_str()), Some("first"));
    }

    #[test]
    fn test_duplicate_ids_ignore_shadowed_parent_links() {
        let members = vec![
            Member::new("P"),
            Member::new("Q"),
            Member::new("A").with_name("first").with_parent("P"),
            Member::new("A").with_name("second").with_parent("Q"),
        ];
        let index = FamilyIndex::new(&members);

        assert!(index.children_of("Q").is_empty());
        assert!(index.descendants("Q").is_empty());
        let from_p: Vec<&str> = index.descendants("P").iter().map(|m| m.name.as_str()).collect();
        assert_eq!(from_p, vec!["first"]);
        assert_eq!(ids(&index.ancestors("A")), vec!["P"]);
    }
}
