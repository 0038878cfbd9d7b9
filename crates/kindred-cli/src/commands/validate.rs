//! Snapshot validation command

use clap::Args;
use kindred_core::{validate, Diagnostic, Severity};
use serde::Serialize;

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct ValidateArgs {
    /// Exit with an error when any error-severity problem is found
    #[arg(long)]
    pub strict: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    severity: Severity,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

pub fn run(args: &ValidateArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let diagnostics = validate(&ctx.members);
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Error)
        .count();
    tracing::info!(
        "Validation found {} problems ({} errors)",
        diagnostics.len(),
        errors
    );

    match ctx.format {
        OutputFormat::Json => {
            let reports: Vec<Report<'_>> = diagnostics
                .iter()
                .map(|diagnostic| Report {
                    severity: diagnostic.severity(),
                    diagnostic,
                })
                .collect();
            println!("{}", to_json(&reports)?);
        }
        OutputFormat::Table => {
            if diagnostics.is_empty() {
                println!(
                    "No problems found in {} ({} members)",
                    ctx.source.display(),
                    ctx.members.len()
                );
            }
            for diagnostic in &diagnostics {
                println!("{}: {}", diagnostic.severity(), diagnostic);
            }
        }
    }

    if args.strict && errors > 0 {
        anyhow::bail!("{} error(s) in {}", errors, ctx.source.display());
    }
    Ok(())
}
