//! Kinship commands

use clap::Args;
use kindred_core::{kinship, FamilyIndex};
use serde_json::json;

use crate::output::{member_row, to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct PairArgs {
    /// First member id
    pub first: String,
    /// Second member id
    pub second: String,
}

/// Check both ids resolve, printing a notice for the first one that does not
fn both_known(index: &FamilyIndex<'_>, args: &PairArgs, ctx: &AppContext) -> bool {
    for id in [&args.first, &args.second] {
        if !index.contains(id) {
            println!("Member '{}' not found in {}", id, ctx.source.display());
            return false;
        }
    }
    true
}

pub fn run_relate(args: &PairArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let index = FamilyIndex::new(&ctx.members);
    if !both_known(&index, args, ctx) {
        return Ok(());
    }

    let relationship = kinship::classify(&index, &args.first, &args.second);
    tracing::info!("{} -> {}: {}", args.first, args.second, relationship);

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&json!({
                "from": args.first,
                "to": args.second,
                "relationship": relationship,
            }))?
        ),
        OutputFormat::Table => println!(
            "Relationship of '{}' to '{}': {}",
            args.second, args.first, relationship
        ),
    }
    Ok(())
}

pub fn run_common_ancestor(args: &PairArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let index = FamilyIndex::new(&ctx.members);
    if !both_known(&index, args, ctx) {
        return Ok(());
    }

    let ancestor = kinship::common_ancestor(&index, &args.first, &args.second);

    match (ctx.format, ancestor) {
        (OutputFormat::Json, found) => println!("{}", to_json(&found)?),
        (OutputFormat::Table, Some(member)) => {
            println!(
                "Nearest common ancestor of '{}' and '{}':",
                args.first, args.second
            );
            println!("{}", member_row(member));
        }
        (OutputFormat::Table, None) => println!(
            "No common ancestor found for '{}' and '{}'",
            args.first, args.second
        ),
    }
    Ok(())
}
