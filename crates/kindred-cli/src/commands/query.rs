//! Ancestor and descendant listing commands

use clap::Args;
use kindred_core::{FamilyIndex, Member};

use crate::output::{member_row, to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct QueryArgs {
    /// Member id
    pub id: String,
}

pub fn run_ancestors(args: &QueryArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let index = FamilyIndex::new(&ctx.members);
    if !index.contains(&args.id) {
        println!("Member '{}' not found in {}", args.id, ctx.source.display());
        return Ok(());
    }

    let ancestors = index.ancestors(&args.id);
    tracing::info!("Found {} ancestors of {}", ancestors.len(), args.id);
    print_members("Ancestors", &args.id, &ancestors, ctx.format)
}

pub fn run_descendants(args: &QueryArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let index = FamilyIndex::new(&ctx.members);
    if !index.contains(&args.id) {
        println!("Member '{}' not found in {}", args.id, ctx.source.display());
        return Ok(());
    }

    let descendants = index.descendants(&args.id);
    tracing::info!("Found {} descendants of {}", descendants.len(), args.id);
    print_members("Descendants", &args.id, &descendants, ctx.format)
}

fn print_members(
    title: &str,
    id: &str,
    members: &[&Member],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(members)?),
        OutputFormat::Table => {
            if members.is_empty() {
                println!("{} of '{}': none", title, id);
            } else {
                println!("{} of '{}' ({} found):", title, id, members.len());
                for member in members {
                    println!("{}", member_row(member));
                }
            }
        }
    }
    Ok(())
}
