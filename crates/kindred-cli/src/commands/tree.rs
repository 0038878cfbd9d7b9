//! Tree command

use std::collections::HashSet;

use clap::Args;
use kindred_core::{build_family_tree, FamilyTree, NodeIndex};
use serde_json::{json, Value};

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct TreeArgs {
    /// Root member (default: eldest by generation, then birth date)
    #[arg(short, long)]
    pub root: Option<String>,
}

pub fn run(args: &TreeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let Some(tree) = build_family_tree(&ctx.members, args.root.as_deref()) else {
        match &args.root {
            Some(root) => println!("Member '{}' not found in {}", root, ctx.source.display()),
            None => println!("No members in {}", ctx.source.display()),
        }
        return Ok(());
    };

    tracing::info!(
        "Built tree rooted at {} (depth {})",
        tree.root_member().id,
        tree.depth()
    );

    match ctx.format {
        OutputFormat::Json => {
            let mut expanded = HashSet::new();
            println!("{}", to_json(&node_json(&tree, tree.root(), &mut expanded)?)?);
        }
        OutputFormat::Table => print!("{}", tree.to_term_tree()),
    }
    Ok(())
}

/// Nested JSON for a subtree. A shared node is expanded once; later
/// occurrences carry only its id and `"shared": true`.
fn node_json(
    tree: &FamilyTree,
    idx: NodeIndex,
    expanded: &mut HashSet<NodeIndex>,
) -> anyhow::Result<Value> {
    let Some(node) = tree.get(idx) else {
        return Ok(Value::Null);
    };
    if !expanded.insert(idx) {
        return Ok(json!({ "id": node.member.id, "shared": true }));
    }

    let children = node
        .children
        .iter()
        .map(|&child| node_json(tree, child, expanded))
        .collect::<anyhow::Result<Vec<Value>>>()?;

    let mut value = serde_json::to_value(&node.member)?;
    if let Value::Object(map) = &mut value {
        map.insert("children".to_string(), Value::Array(children));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::Member;

    #[test]
    fn test_node_json_marks_shared_nodes() {
        let members = vec![
            Member::new("A"),
            Member::new("B").with_parent("A"),
            Member::new("C").with_parent("A"),
            Member::new("D").with_parent("B").with_parent("C"),
        ];
        let tree = build_family_tree(&members, None).unwrap();
        let mut expanded = HashSet::new();
        let value = node_json(&tree, tree.root(), &mut expanded).unwrap();

        assert_eq!(value["id"], "A");
        assert_eq!(value["children"][0]["id"], "B");
        assert_eq!(value["children"][0]["children"][0]["id"], "D");
        assert_eq!(value["children"][1]["children"][0]["shared"], true);
    }
}
