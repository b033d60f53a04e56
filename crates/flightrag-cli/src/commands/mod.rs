//! CLI command handlers

pub mod ask;
pub mod check;
pub mod config;
pub mod entities;
pub mod intent;
pub mod models;

use flightrag_core::Config;
use std::path::{Path, PathBuf};

/// Load the config named on the command line, or the default one
pub fn load_config(path: Option<&Path>) -> flightrag_core::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}
