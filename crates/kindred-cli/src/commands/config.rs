//! Settings for locating the members snapshot and choosing output format

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the value queries use for a key, and where it comes from
    Get {
        /// members_file or format
        key: String,
    },
    /// Store a value in the config file
    Set {
        /// members_file or format
        key: String,
        /// New value
        value: String,
    },
    /// Show every setting with its origin
    List,
    /// Show config file path
    Path,
    /// Write a config file
    Init {
        /// Snapshot to use when --file is not given
        #[arg(long)]
        members_file: Option<PathBuf>,
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            Config::check_key(key)?;
            println!("{}", describe(&Config::load()?, key));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("{} = {} (saved to {})", key, value, config_file_path().display());
        }
        ConfigCommands::List => {
            let config = Config::load()?;
            println!("Config file: {}", config_file_path().display());
            for key in Config::keys() {
                println!("{} = {}", key, describe(&config, key));
            }
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::Init {
            members_file,
            force,
        } => init(members_file.clone(), *force)?,
    }
    Ok(())
}

/// "value (origin)", or a hint when nothing supplies the key
fn describe(config: &Config, key: &str) -> String {
    match config.effective(key) {
        Some((value, origin)) => format!("{} ({})", value, origin),
        None => "(not set; pass --file)".to_string(),
    }
}

fn init(members_file: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(file) = &members_file {
        if !file.exists() {
            tracing::warn!("Members file {} does not exist yet", file.display());
        }
    }
    let config = Config {
        members_file,
        format: Some("table".to_string()),
    };
    config.save()?;
    println!("Created config file at {}", path.display());
    Ok(())
}
