//! Kindred Core - Family graph engine
//!
//! This crate turns a flat snapshot of person records linked by parent ids
//! into a navigable family tree, and answers ancestry, descent and kinship
//! queries over it. Every call works on the snapshot it is given; nothing is
//! cached between calls.

pub mod diagnostics;
pub mod error;
pub mod kinship;
pub mod member;
pub mod resolver;
pub mod tree;

pub use diagnostics::{find_cycles, validate, Diagnostic, Severity};
pub use error::{Error, Result};
pub use kinship::{calculate_relationship, find_common_ancestor, Relationship};
pub use member::{parse_snapshot, Gender, Member, MemberId};
pub use resolver::{get_ancestors, get_descendants, get_parents, FamilyIndex};
pub use tree::{build_family_tree, try_build_family_tree, FamilyTree, FamilyTreeIter, TreeNode};

/// Arena handle addressing a node in a [`FamilyTree`]
pub use generational_arena::Index as NodeIndex;
