//! Paint command
//!
//! Replays a pointer event script through the mask editor, writing the
//! reconstruction and the mask after every frame of events.

use crate::PaintArgs;
use anyhow::{Context, Result};
use fmask_io::FrameWriter;
use fmask_ops::mask::BrushProfile;
use fmask_ops::{EventScript, PaintSession, Reconstructor, SessionConfig, StopSignal};
use tracing::{info, trace};

pub fn run(args: PaintArgs, verbose: u8, mut config: SessionConfig) -> Result<()> {
    let input = super::resolve_input(&args.input)?;
    trace!(input = %input.display(), events = %args.events.display(), "paint::run");

    if let Some(radius) = args.brush_radius {
        config.brush.radius = radius;
    }
    if let Some(sigma) = args.sigma {
        config.brush.profile = BrushProfile::Soft { sigma };
    }
    if let Some(spacing) = args.spacing {
        config.brush.spacing = spacing;
    }
    if let Some(ms) = args.interval_ms {
        config.frame_interval_ms = ms;
    }
    config.validate()?;

    let script = EventScript::from_file(&args.events)
        .with_context(|| format!("Failed to load events: {}", args.events.display()))?;
    let image = super::load_image(&input)?;
    let rec = Reconstructor::from_image(&image)?;
    info!(
        brush = config.brush.radius,
        profile = ?config.brush.profile,
        frames = script.frames.len(),
        "Starting paint"
    );

    let mut sink = FrameWriter::new(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    let mut session = PaintSession::new(rec, config.brush, config.frame_interval());
    let report = session.run(&mut script.into_source(), &mut sink, &StopSignal::new())?;

    if verbose > 0 {
        println!(
            "Rendered {} frames from {} events ({:?}), {} files in {}",
            report.frames,
            report.events,
            report.end,
            sink.written().len(),
            args.output.display()
        );
    }
    Ok(())
}
