//! CLI command implementations

pub mod list;
pub mod paint;
pub mod spectrum;
pub mod sweep;

use anyhow::{Context, Result};
use fmask_core::Grid;
use fmask_ops::SessionConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::InputArgs;

/// Loads `--config`, or the defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

/// Resolves the input path from a positional path or `--index`.
pub fn resolve_input(args: &InputArgs) -> Result<PathBuf> {
    if let Some(path) = &args.input {
        return Ok(path.clone());
    }
    let index = args.index.context("No input image given")?;
    let path = fmask_io::select_image(&args.dir, index)
        .with_context(|| format!("No image #{} in {}", index, args.dir.display()))?;
    debug!(index, path = %path.display(), "Selected input");
    Ok(path)
}

/// Loads an image as 8-bit luma
pub fn load_image(path: &Path) -> Result<Grid<u8>> {
    fmask_io::load_gray(path).with_context(|| format!("Failed to load: {}", path.display()))
}
