//! End-to-end checks of the transform, mask and reconstruction pipeline.

use std::time::Duration;

use approx::assert_abs_diff_eq;
use fmask_core::{Grid, Orientation};
use fmask_ops::editor::BrushSettings;
use fmask_ops::fft::{forward, normalize};
use fmask_ops::mask::{Paint, WHITE};
use fmask_ops::reconstruct::{Advance, DisplaySink, Frame, LABEL_MASK, ScriptedEvents, SessionEnd};
use fmask_ops::{
    EventScript, Mask, OpsError, OpsResult, PaintSession, PointerAction, PointerEvent,
    Reconstructor, StopSignal, SweepSchedule,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(w: usize, h: usize, seed: u64) -> Grid<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::from_fn(w, h, |_, _| rng.gen_range(0..=255u8))
}

fn assert_frames_close(a: &Frame, b: &Frame, eps: f32) {
    assert_eq!(a.dims(), b.dims());
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert_abs_diff_eq!(*x, *y, epsilon = eps);
    }
}

/// Collects frames; never asks to quit.
#[derive(Default)]
struct Collect {
    frames: Vec<(String, Frame)>,
}

impl DisplaySink for Collect {
    fn show(&mut self, label: &str, frame: &Frame) -> OpsResult<()> {
        self.frames.push((label.to_owned(), frame.clone()));
        Ok(())
    }

    fn wait_advance(&mut self, _timeout: Option<Duration>) -> OpsResult<Advance> {
        Ok(Advance::Continue)
    }
}

#[test]
fn all_white_mask_reproduces_image() {
    for (w, h, seed) in [(37, 23, 1), (64, 48, 2), (31, 31, 3)] {
        let image = random_image(w, h, seed);
        let rec = Reconstructor::from_image(&image).unwrap();
        let (pw, ph) = rec.dims();

        let mut mask = Mask::new(pw, ph);
        mask.fill(Paint::White);
        let frame = rec.reconstruct(&mask).unwrap();

        let expected = normalize(&image.map(f32::from), 0.0, 1.0);
        assert_frames_close(&frame, &expected, 1e-3);
    }
}

#[test]
fn odd_padded_size_reconstructs() {
    let image = random_image(25, 15, 11);
    let rec = Reconstructor::from_image(&image).unwrap();
    assert_eq!(rec.dims(), (25, 15));

    let mut white = Mask::new(25, 15);
    white.fill(Paint::White);
    let expected = normalize(&image.map(f32::from), 0.0, 1.0);
    assert_frames_close(&rec.reconstruct(&white).unwrap(), &expected, 1e-3);

    // Only DC survives a centered radius-0 disk
    let dc_only = Mask::disk(25, 15, 0);
    assert_eq!(dc_only.count_nonzero(), 1);
    let spectrum = forward(&image).unwrap().reoriented(Orientation::CornerOrigin);
    let masked = spectrum
        .apply_mask(&dc_only.to_orientation(Orientation::CornerOrigin))
        .unwrap();
    let flat = fmask_ops::fft::inverse(&masked).unwrap();
    let mean = image.as_slice().iter().map(|&v| f32::from(v)).sum::<f32>() / (25.0 * 15.0);
    for &v in flat.as_slice() {
        assert_abs_diff_eq!(v, mean, epsilon = 1e-2);
    }

    let centered = Mask::disk(25, 15, 5);
    let corner = centered.to_orientation(Orientation::CornerOrigin);
    assert_eq!(
        rec.reconstruct(&centered).unwrap(),
        rec.reconstruct(&corner).unwrap()
    );
}

#[test]
fn sweep_past_image_size_is_identity() {
    let image = random_image(21, 17, 7);
    let rec = Reconstructor::from_image(&image).unwrap();
    let schedule = SweepSchedule {
        start: 100,
        step: 5,
        end: 101,
    };
    let mut sink = Collect::default();
    let report = rec.run_sweep(&schedule, &mut sink).unwrap();
    assert_eq!(report.frames, 1);

    let expected = normalize(&image.map(f32::from), 0.0, 1.0);
    assert_frames_close(&sink.frames[0].1, &expected, 1e-3);
}

#[test]
fn mask_orientation_is_handled() {
    let image = random_image(24, 20, 11);
    let rec = Reconstructor::from_image(&image).unwrap();
    let (w, h) = rec.dims();
    let centered = Mask::disk(w, h, 5);
    let corner = centered.to_orientation(Orientation::CornerOrigin);
    assert_eq!(rec.reconstruct(&centered).unwrap(), rec.reconstruct(&corner).unwrap());
}

#[test]
fn mismatched_mask_is_rejected() {
    let image = random_image(512, 512, 5);
    let spectrum = forward(&image).unwrap();
    assert_eq!(spectrum.dims(), (512, 512));

    let mask = Mask::new(511, 511).to_orientation(Orientation::CornerOrigin);
    match spectrum.apply_mask(&mask) {
        Err(OpsError::DimensionMismatch {
            mask_width,
            mask_height,
            spectrum_width,
            spectrum_height,
        }) => {
            assert_eq!((mask_width, mask_height), (511, 511));
            assert_eq!((spectrum_width, spectrum_height), (512, 512));
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
}

#[test]
fn low_pass_smooths() {
    // Checkerboard plus a slow gradient: a small disk keeps only the gradient
    let image = Grid::from_fn(32, 32, |x, y| {
        let check = if (x + y) % 2 == 0 { 60 } else { 0 };
        (check + x * 4) as u8
    });
    let rec = Reconstructor::from_image(&image).unwrap();
    let low = rec.reconstruct(&Mask::disk(32, 32, 3)).unwrap();
    let full = rec.reconstruct(&Mask::disk(32, 32, 64)).unwrap();

    let jitter = |frame: &Frame| -> f32 {
        let row = frame.row(10);
        row.windows(2).map(|p| (p[1] - p[0]).abs()).sum::<f32>() / 31.0
    };
    assert!(jitter(&low) < jitter(&full) * 0.5, "{} vs {}", jitter(&low), jitter(&full));
}

#[test]
fn paint_session_replays_script() {
    let image = random_image(40, 30, 9);
    let rec = Reconstructor::from_image(&image).unwrap();
    let (w, h) = rec.dims();

    let script = EventScript::from_yaml_str(
        "frames:
  - [{action: press-primary, x: 20, y: 15}]
  - [{action: move, x: 25, y: 15}, {action: release-primary, x: 25, y: 15}]
  - [{action: wheel, x: 0, y: 0}]
",
    );
    // Unknown actions are a script error, not an editor event
    assert!(matches!(script, Err(OpsError::Config(_))));

    let script = EventScript::from_yaml_str(
        "frames:
  - [{action: press-primary, x: 20, y: 15}]
  - [{action: move, x: 25, y: 15}, {action: release-primary, x: 25, y: 15}]
  - [{action: other, x: 0, y: 0}]
",
    )
    .unwrap();

    let brush = BrushSettings {
        radius: 4,
        ..BrushSettings::default()
    };
    let mut session = PaintSession::new(rec.clone(), brush, Duration::from_millis(10));
    let mut sink = Collect::default();
    let report = session
        .run(&mut script.into_source(), &mut sink, &StopSignal::new())
        .unwrap();

    assert_eq!(report.end, SessionEnd::SourceClosed);
    assert_eq!(report.frames, 3);
    assert_eq!(report.events, 4);

    let mask = session.editor().mask();
    assert_eq!(mask.dims(), (w, h));
    assert!(mask.passes(20, 15) && mask.passes(25, 15));
    assert!(!mask.passes(0, 0));

    // Last mask frame matches the editor buffer
    let (label, last_mask) = sink.frames.last().unwrap();
    assert_eq!(label, LABEL_MASK);
    assert_eq!(last_mask, &mask.to_frame());

    // Same buffer, same image
    assert_eq!(session.render().unwrap(), rec.reconstruct(mask).unwrap());
}

#[test]
fn paint_session_double_click_fill() {
    let image = random_image(30, 20, 13);
    let rec = Reconstructor::from_image(&image).unwrap();
    let mut session = PaintSession::new(rec, BrushSettings::default(), Duration::ZERO);

    let mut events = ScriptedEvents::new([vec![PointerEvent::new(
        PointerAction::DoubleClickPrimary,
        5,
        5,
    )]]);
    let mut sink = Collect::default();
    session.run(&mut events, &mut sink, &StopSignal::new()).unwrap();

    assert!(session.editor().mask().is_all(WHITE));
    let expected = normalize(&image.map(f32::from), 0.0, 1.0);
    assert_frames_close(&sink.frames[0].1, &expected, 1e-3);
}
