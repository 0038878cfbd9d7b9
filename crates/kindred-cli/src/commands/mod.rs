//! CLI command implementations

pub mod completions;
pub mod config;
pub mod query;
pub mod relate;
pub mod tree;
pub mod validate;
