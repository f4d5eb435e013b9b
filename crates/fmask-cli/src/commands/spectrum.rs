//! Spectrum command
//!
//! Writes `ln(1 + |F|)` with DC at the center, scaled to 8 bits.

use crate::SpectrumArgs;
use anyhow::{Context, Result};
use tracing::{debug, trace};

pub fn run(args: SpectrumArgs, verbose: u8) -> Result<()> {
    let input = super::resolve_input(&args.input)?;
    trace!(input = %input.display(), output = %args.output.display(), "spectrum::run");

    let image = super::load_image(&input)?;
    let spectrum = fmask_ops::fft::forward(&image)?;
    let view = spectrum.log_magnitude();
    debug!(dims = ?view.dims(), "Log magnitude");

    fmask_io::save_frame(&args.output, &view)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose > 0 {
        let (w, h) = view.dims();
        println!("Wrote {}x{} spectrum to {}", w, h, args.output.display());
    }
    Ok(())
}
