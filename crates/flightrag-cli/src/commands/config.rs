//! Config command

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use crate::output;
use anyhow::{bail, Result};
use flightrag_core::Config;
use std::path::Path;

pub fn run(args: ConfigArgs, config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = super::load_config(config_path)?.redacted();
            output::emit(&config, format, |c| {
                c.to_yaml().unwrap_or_else(|e| format!("{}\n", e))
            })?;
        }
        ConfigAction::Path => {
            let path = super::config_path(config_path);
            output::emit(&path, format, |p| format!("{}\n", p.display()))?;
        }
        ConfigAction::Init { from, force } => {
            let path = super::config_path(config_path);
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let config = match from {
                Some(legacy) => Config::from_key_value_file(&legacy)?,
                None => super::load_config(config_path)?,
            };
            config.save_to(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

