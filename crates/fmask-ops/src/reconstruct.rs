//! Reconstruction loop: masked spectrum back to a displayable image.
//!
//! A [`Reconstructor`] holds the spectrum of the source image and a cached
//! inverse plan. Two drivers sit on top of it:
//!
//! - [`Reconstructor::run_sweep`] shows one frame per disk radius and blocks
//!   on the sink between frames.
//! - [`PaintSession::run`] alternates between draining pointer events into a
//!   [`MaskEditor`] and showing the current reconstruction, yielding to the
//!   sink for a bounded interval each iteration.
//!
//! Frames go to a [`DisplaySink`]; pointer events come from an
//! [`EventSource`]. Both are traits so tests and the CLI can plug in their
//! own.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use fmask_core::{Grid, Orientation};
use tracing::{debug, info, trace};

use crate::editor::{BrushSettings, MaskEditor, PointerEvent};
use crate::fft::{self, normalize, Fft2d};
use crate::mask::{Mask, SweepSchedule};
use crate::spectrum::Spectrum;
use crate::OpsResult;

/// Single-channel float image in `[0, 1]`.
pub type Frame = Grid<f32>;

/// Label of the reconstructed image window.
pub const LABEL_RECONSTRUCTED: &str = "Reconstructed";

/// Label of the mask window.
pub const LABEL_MASK: &str = "Mask";

/// Answer of [`DisplaySink::wait_advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Show the next frame.
    Continue,
    /// End the loop.
    Quit,
}

/// Where frames are shown.
pub trait DisplaySink {
    /// Presents `frame` under `label`, replacing the previous frame with
    /// the same label.
    fn show(&mut self, label: &str, frame: &Frame) -> OpsResult<()>;

    /// Waits for the user to advance. `None` blocks until they do;
    /// `Some(d)` returns after at most `d`.
    fn wait_advance(&mut self, timeout: Option<Duration>) -> OpsResult<Advance>;
}

/// Result of polling an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Next pending event.
    Event(PointerEvent),
    /// Nothing pending right now.
    Empty,
    /// No more events will ever arrive.
    Closed,
}

/// Non-blocking stream of pointer events.
pub trait EventSource {
    /// Returns the next event without blocking.
    fn poll(&mut self) -> Poll;
}

impl EventSource for Receiver<PointerEvent> {
    fn poll(&mut self) -> Poll {
        match self.try_recv() {
            Ok(event) => Poll::Event(event),
            Err(TryRecvError::Empty) => Poll::Empty,
            Err(TryRecvError::Disconnected) => Poll::Closed,
        }
    }
}

/// Pre-recorded events grouped by loop iteration.
///
/// Each group is delivered in one drain; the source reports
/// [`Poll::Closed`] once every group has been consumed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<VecDeque<PointerEvent>>,
}

impl ScriptedEvents {
    /// Source delivering `frames` one group per drain.
    pub fn new(frames: impl IntoIterator<Item = Vec<PointerEvent>>) -> Self {
        Self {
            frames: frames.into_iter().map(VecDeque::from).collect(),
        }
    }

    /// Groups left, including a partially drained one.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self) -> Poll {
        let Some(front) = self.frames.front_mut() else {
            return Poll::Closed;
        };
        match front.pop_front() {
            Some(event) => Poll::Event(event),
            None => {
                self.frames.pop_front();
                Poll::Empty
            }
        }
    }
}

/// Shared flag that ends a [`PaintSession`] from outside the loop.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop before its next iteration.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`stop`](Self::stop) was called on any clone.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary of a finished sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Frames shown.
    pub frames: usize,
    /// Radius of the last frame shown.
    pub last_radius: Option<u32>,
    /// `true` if the sink asked to quit before the schedule ran out.
    pub quit_early: bool,
}

/// Why a [`PaintSession`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The [`StopSignal`] was raised.
    Stopped,
    /// The sink returned [`Advance::Quit`].
    Quit,
    /// The event source closed.
    SourceClosed,
}

/// Summary of a finished paint session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Loop iterations that rendered.
    pub frames: usize,
    /// Pointer events consumed.
    pub events: usize,
    /// Reason the loop ended.
    pub end: SessionEnd,
}

/// Spectrum of one source image plus the plan that inverts it.
#[derive(Clone)]
pub struct Reconstructor {
    spectrum: Spectrum,
    plan: Fft2d,
}

impl std::fmt::Debug for Reconstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconstructor")
            .field("dims", &self.spectrum.dims())
            .field("source_dims", &self.spectrum.source_dims())
            .finish()
    }
}

impl Reconstructor {
    /// Wraps a spectrum, moving it to [`Orientation::CornerOrigin`] if needed.
    pub fn new(spectrum: Spectrum) -> Self {
        let spectrum = spectrum.reoriented(Orientation::CornerOrigin);
        let (w, h) = spectrum.dims();
        Self {
            spectrum,
            plan: Fft2d::new(w, h),
        }
    }

    /// Transforms `image` and wraps the result.
    ///
    /// # Errors
    ///
    /// See [`fft::forward`].
    pub fn from_image<T: Copy + Into<f32>>(image: &Grid<T>) -> OpsResult<Self> {
        Ok(Self::new(fft::forward(image)?))
    }

    /// Spectrum in [`Orientation::CornerOrigin`].
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Padded size; masks must match it.
    pub fn dims(&self) -> (usize, usize) {
        self.spectrum.dims()
    }

    /// Size of the frames produced.
    pub fn source_dims(&self) -> (usize, usize) {
        self.spectrum.source_dims()
    }

    /// Masks the spectrum, inverts it and rescales the source region to `[0, 1]`.
    ///
    /// The mask may be in either orientation. The result depends only on
    /// the spectrum and the mask.
    ///
    /// # Errors
    ///
    /// [`OpsError::DimensionMismatch`](crate::OpsError::DimensionMismatch)
    /// if the mask is not the padded size.
    pub fn reconstruct(&self, mask: &Mask) -> OpsResult<Frame> {
        let mask = mask.to_orientation(Orientation::CornerOrigin);
        let masked = self.spectrum.apply_mask(&mask)?;
        let image = fft::inverse_with(&self.plan, &masked)?;
        let (w, h) = self.source_dims();
        let cropped = image.crop(0, 0, w, h)?;
        Ok(normalize(&cropped, 0.0, 1.0))
    }

    /// Shows the reconstruction for each radius of `schedule` in turn.
    ///
    /// Each frame uses a fresh disk mask; the sink is asked to advance
    /// (blocking) after every frame and may end the sweep early.
    ///
    /// # Errors
    ///
    /// Invalid schedule, reconstruction or sink failures.
    pub fn run_sweep<S>(&self, schedule: &SweepSchedule, sink: &mut S) -> OpsResult<SweepReport>
    where
        S: DisplaySink + ?Sized,
    {
        schedule.validate()?;
        let (w, h) = self.dims();
        info!(
            start = schedule.start,
            step = schedule.step,
            end = schedule.end,
            frames = schedule.len(),
            "Starting sweep"
        );

        let mut report = SweepReport::default();
        for radius in schedule.radii() {
            let frame = self.reconstruct(&Mask::disk(w, h, radius))?;
            sink.show(LABEL_RECONSTRUCTED, &frame)?;
            report.frames += 1;
            report.last_radius = Some(radius);
            debug!(radius, "Sweep frame");

            if sink.wait_advance(None)? == Advance::Quit {
                report.quit_early = true;
                break;
            }
        }

        info!(frames = report.frames, quit_early = report.quit_early, "Sweep finished");
        Ok(report)
    }
}

/// Interactive painting over a fixed spectrum.
#[derive(Debug, Clone)]
pub struct PaintSession {
    reconstructor: Reconstructor,
    editor: MaskEditor,
    frame_interval: Duration,
}

impl PaintSession {
    /// Session with an empty (all-black) paint buffer.
    pub fn new(reconstructor: Reconstructor, brush: BrushSettings, frame_interval: Duration) -> Self {
        let (w, h) = reconstructor.dims();
        Self {
            editor: MaskEditor::with_brush(w, h, brush),
            reconstructor,
            frame_interval,
        }
    }

    /// The paint state.
    pub fn editor(&self) -> &MaskEditor {
        &self.editor
    }

    /// The paint state, mutable (brush changes between frames).
    pub fn editor_mut(&mut self) -> &mut MaskEditor {
        &mut self.editor
    }

    /// The underlying reconstructor.
    pub fn reconstructor(&self) -> &Reconstructor {
        &self.reconstructor
    }

    /// Feeds every pending event to the editor.
    ///
    /// Returns the number of events consumed and whether the source closed.
    pub fn drain<E: EventSource + ?Sized>(&mut self, events: &mut E) -> (usize, bool) {
        let mut count = 0;
        loop {
            match events.poll() {
                Poll::Event(event) => {
                    self.editor.handle(event);
                    count += 1;
                }
                Poll::Empty => return (count, false),
                Poll::Closed => return (count, true),
            }
        }
    }

    /// Reconstruction from the current paint buffer.
    pub fn render(&self) -> OpsResult<Frame> {
        self.reconstructor.reconstruct(self.editor.mask())
    }

    /// Runs until stopped, told to quit, or out of events.
    ///
    /// Each iteration drains pending events, shows the reconstruction and
    /// the mask, then yields to the sink for the frame interval.
    ///
    /// # Errors
    ///
    /// Reconstruction or sink failures. Pointer events never fail.
    pub fn run<E, S>(&mut self, events: &mut E, sink: &mut S, stop: &StopSignal) -> OpsResult<SessionReport>
    where
        E: EventSource + ?Sized,
        S: DisplaySink + ?Sized,
    {
        info!(
            dims = ?self.reconstructor.dims(),
            interval_ms = self.frame_interval.as_millis() as u64,
            "Starting paint session"
        );

        let mut frames = 0;
        let mut consumed = 0;
        let end = loop {
            if stop.is_stopped() {
                break SessionEnd::Stopped;
            }

            let (count, closed) = self.drain(events);
            consumed += count;
            // Nothing new since the last frame
            if closed && count == 0 && frames > 0 {
                break SessionEnd::SourceClosed;
            }

            let frame = self.render()?;
            sink.show(LABEL_RECONSTRUCTED, &frame)?;
            sink.show(LABEL_MASK, &self.editor.mask().to_frame())?;
            frames += 1;
            trace!(frames, events = count, state = ?self.editor.state(), "Paint frame");

            if closed {
                break SessionEnd::SourceClosed;
            }
            if sink.wait_advance(Some(self.frame_interval))? == Advance::Quit {
                break SessionEnd::Quit;
            }
        };

        info!(frames, events = consumed, ?end, "Paint session finished");
        Ok(SessionReport {
            frames,
            events: consumed,
            end,
        })
    }
}
