//! List command
//!
//! Prints the images `--index` can pick, numbered from 1.

use crate::ListArgs;
use anyhow::{Context, Result};
use tracing::trace;

pub fn run(args: ListArgs, verbose: u8) -> Result<()> {
    trace!(dir = %args.dir.display(), "list::run");

    let images = fmask_io::list_images(&args.dir)
        .with_context(|| format!("Failed to list: {}", args.dir.display()))?;

    if images.is_empty() {
        println!("No images in {}", args.dir.display());
        return Ok(());
    }
    for (i, path) in images.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if verbose > 0 {
            println!("{:>3}  {}", i + 1, path.display());
        } else {
            println!("{:>3}  {}", i + 1, name);
        }
    }
    Ok(())
}
