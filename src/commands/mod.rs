pub mod clean;
pub mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::sweeper::Sweeper;

/// Build an orchestrator from CLI override + configuration.
pub(crate) fn build_sweeper(developer_dir: Option<PathBuf>, config: &Config) -> Result<Sweeper> {
    let developer_dir = developer_dir
        .or_else(|| config.developer_dir())
        .context("cannot determine the developer directory")?;

    Ok(Sweeper::new(
        developer_dir,
        config.paths.custom_derived_data.clone(),
        config.paths.custom_archives.clone(),
    )?)
}
