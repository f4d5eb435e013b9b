//! Sweep command
//!
//! Reconstructs the input once per disk radius and writes each frame.

use crate::SweepArgs;
use anyhow::{Context, Result};
use fmask_io::FrameWriter;
use fmask_ops::{Reconstructor, SessionConfig};
use tracing::{info, trace};

pub fn run(args: SweepArgs, verbose: u8, config: SessionConfig) -> Result<()> {
    let input = super::resolve_input(&args.input)?;
    trace!(input = %input.display(), output = %args.output.display(), "sweep::run");

    let mut schedule = config.sweep;
    if let Some(start) = args.start {
        schedule.start = start;
    }
    if let Some(step) = args.step {
        schedule.step = step;
    }
    if let Some(end) = args.end {
        schedule.end = end;
    }
    schedule.validate()?;

    let image = super::load_image(&input)?;
    let rec = Reconstructor::from_image(&image)?;
    info!(
        width = image.width(),
        height = image.height(),
        padded = ?rec.dims(),
        "Spectrum ready"
    );

    if verbose > 0 {
        println!(
            "Sweeping {} radii ({}..{} step {}) over {}",
            schedule.len(),
            schedule.start,
            schedule.end,
            schedule.step,
            input.display()
        );
    }
    if args.step_mode {
        println!("Press Enter for the next frame, q to quit.");
    }

    let mut sink = FrameWriter::new(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    if args.step_mode {
        sink = sink.with_stdin_prompt();
    }

    let report = rec.run_sweep(&schedule, &mut sink)?;

    if verbose > 0 {
        println!(
            "Wrote {} frames to {}{}",
            report.frames,
            args.output.display(),
            if report.quit_early { " (quit early)" } else { "" }
        );
    }
    Ok(())
}
