//! Kinship classification and common-ancestor lookup
//!
//! Classification is shallow on purpose: it looks at immediate parents only,
//! so multi-generation labels (grandparent, cousin) are reported as
//! `Relative`.

use crate::member::{Gender, Member};
use crate::resolver::FamilyIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Coarse relationship of one member to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Both ids name the same member
    #[serde(rename = "self")]
    SamePerson,
    Father,
    Mother,
    /// Parent with no usable gender on record
    Parent,
    Son,
    Daughter,
    /// Child with no usable gender on record
    Child,
    Sibling,
    Relative,
    Unrelated,
}

impl Relationship {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SamePerson => "Self",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Parent => "Parent",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::Child => "Child",
            Self::Sibling => "Sibling",
            Self::Relative => "Relative",
            Self::Unrelated => "Unrelated",
        }
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Father | Self::Mother | Self::Parent)
    }

    pub fn is_child(&self) -> bool {
        matches!(self, Self::Son | Self::Daughter | Self::Child)
    }

    /// Parent or child of the other member
    pub fn is_direct(&self) -> bool {
        self.is_parent() || self.is_child()
    }

    fn parent_of_gender(gender: Option<Gender>) -> Self {
        match gender {
            Some(Gender::Male) => Self::Father,
            Some(Gender::Female) => Self::Mother,
            _ => Self::Parent,
        }
    }

    fn child_of_gender(gender: Option<Gender>) -> Self {
        match gender {
            Some(Gender::Male) => Self::Son,
            Some(Gender::Female) => Self::Daughter,
            _ => Self::Child,
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What `id2` is to `id1`, first match wins:
///
/// 1. same id: `SamePerson`
/// 2. `id2` is a parent of `id1`: `Father` / `Mother` / `Parent`
/// 3. `id1` is a parent of `id2`: `Son` / `Daughter` / `Child`
/// 4. they share a recorded parent id: `Sibling`
/// 5. both have recorded parents: `Relative`
/// 6. otherwise `Unrelated`
///
/// An id missing from the snapshot is `Unrelated` to everything.
pub fn classify(index: &FamilyIndex<'_>, id1: &str, id2: &str) -> Relationship {
    let (Some(first), Some(second)) = (index.get(id1), index.get(id2)) else {
        tracing::debug!("Classify {} / {}: member not in snapshot", id1, id2);
        return Relationship::Unrelated;
    };

    let relationship = if first.id == second.id {
        Relationship::SamePerson
    } else if first.has_parent(second.id.as_str()) {
        Relationship::parent_of_gender(second.gender)
    } else if second.has_parent(first.id.as_str()) {
        Relationship::child_of_gender(second.gender)
    } else if shares_parent(first, second) {
        Relationship::Sibling
    } else if !first.is_founder() && !second.is_founder() {
        Relationship::Relative
    } else {
        Relationship::Unrelated
    };

    tracing::debug!("Classified {} -> {}: {}", id1, id2, relationship);
    relationship
}

fn shares_parent(a: &Member, b: &Member) -> bool {
    let parents: HashSet<&str> = a.parents.iter().map(|p| p.as_str()).collect();
    b.parents.iter().any(|p| parents.contains(p.as_str()))
}

/// Nearest common ancestor of `id1` and `id2`.
///
/// Walks `id1`'s ancestors (the member itself included) breadth-first, then
/// returns `id2` if it is among them, or else the first of `id2`'s
/// breadth-first ancestors that is. Breadth-first order approximates the
/// nearest ancestor; parent links carry no generation guarantee. Ids that do
/// not resolve to members are never returned.
pub fn common_ancestor<'a>(index: &FamilyIndex<'a>, id1: &str, id2: &str) -> Option<&'a Member> {
    let first = index.get(id1)?;
    let second = index.get(id2)?;

    let mut lineage: HashSet<&str> = index.ancestor_ids(id1).into_iter().collect();
    lineage.insert(first.id.as_str());

    if lineage.contains(second.id.as_str()) {
        tracing::debug!("Common ancestor of {} and {}: {} itself", id1, id2, id2);
        return Some(second);
    }

    let found = index
        .ancestor_ids(id2)
        .into_iter()
        .filter(|ancestor| lineage.contains(ancestor))
        .find_map(|ancestor| index.get(ancestor));

    tracing::debug!(
        "Common ancestor of {} and {}: {:?}",
        id1,
        id2,
        found.map(|m| m.id.as_str())
    );
    found
}

/// Classify the relationship of `id2` to `id1` within `members`
pub fn calculate_relationship(members: &[Member], id1: &str, id2: &str) -> Relationship {
    classify(&FamilyIndex::new(members), id1, id2)
}

/// Nearest common ancestor of two members, None when their lines never meet
pub fn find_common_ancestor<'a>(members: &'a [Member], id1: &str, id2: &str) -> Option<&'a Member> {
    common_ancestor(&FamilyIndex::new(members), id1, id2)
}
