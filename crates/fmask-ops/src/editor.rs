//! Pointer-driven mask painting.
//!
//! [`MaskEditor`] owns the paint buffer and the stroke state. Pointer events
//! are fed in one at a time; pressing starts a stroke, moving paints while a
//! stroke is active, releasing ends it. Double clicks flood the whole mask.
//!
//! ```rust
//! use fmask_ops::editor::{MaskEditor, PointerAction, PointerEvent};
//!
//! let mut editor = MaskEditor::new(64, 64);
//! editor.handle(PointerEvent::new(PointerAction::PressPrimary, 32, 32));
//! editor.handle(PointerEvent::new(PointerAction::Move, 40, 32));
//! editor.handle(PointerEvent::new(PointerAction::ReleasePrimary, 40, 32));
//! assert!(editor.mask().passes(40, 32));
//! assert!(!editor.mask().passes(0, 63));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::mask::{BrushProfile, Mask, Paint};

/// Brush radius used when nothing else is configured.
pub const DEFAULT_BRUSH_RADIUS: u32 = 18;

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerAction {
    /// Primary button down. Starts a white stroke.
    PressPrimary,
    /// Secondary button down. Starts a black stroke.
    PressSecondary,
    /// Pointer moved.
    Move,
    /// Primary button up.
    ReleasePrimary,
    /// Secondary button up.
    ReleaseSecondary,
    /// Fills the mask white.
    DoubleClickPrimary,
    /// Fills the mask black.
    DoubleClickSecondary,
    /// Anything else an input source reports (wheel, middle button...).
    Other,
}

/// Pointer action at image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// What happened.
    pub action: PointerAction,
    /// Column, may lie outside the mask.
    pub x: i32,
    /// Row, may lie outside the mask.
    pub y: i32,
}

impl PointerEvent {
    /// Creates an event.
    pub fn new(action: PointerAction, x: i32, y: i32) -> Self {
        Self { action, x, y }
    }
}

/// Stroke state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// No button held.
    #[default]
    Idle,
    /// Primary stroke in progress.
    DrawingWhite,
    /// Secondary stroke in progress.
    DrawingBlack,
}

/// Brush used for strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Disk radius in pixels.
    pub radius: u32,
    /// Hard disk or Gaussian dot.
    pub profile: BrushProfile,
    /// Minimum distance between stamps along a stroke. `0` stamps on every move.
    pub spacing: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            profile: BrushProfile::Hard,
            spacing: 0.0,
        }
    }
}

/// Paint buffer plus the state machine that edits it.
#[derive(Debug, Clone)]
pub struct MaskEditor {
    mask: Mask,
    state: EditorState,
    brush: BrushSettings,
    last_stamp: Option<(i32, i32)>,
}

impl MaskEditor {
    /// Editor over an all-black `width x height` centered mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_brush(width, height, BrushSettings::default())
    }

    /// Editor with explicit brush settings.
    pub fn with_brush(width: usize, height: usize, brush: BrushSettings) -> Self {
        Self {
            mask: Mask::new(width, height),
            state: EditorState::Idle,
            brush,
            last_stamp: None,
        }
    }

    /// Current paint buffer, centered.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Current stroke state.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Current brush.
    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    /// `true` while a primary stroke is active.
    pub fn drawing_white(&self) -> bool {
        self.state == EditorState::DrawingWhite
    }

    /// `true` while a secondary stroke is active.
    pub fn drawing_black(&self) -> bool {
        self.state == EditorState::DrawingBlack
    }

    /// Changes the stroke radius. Takes effect on the next stamp.
    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush.radius = radius;
    }

    /// Switches between hard and soft strokes.
    pub fn set_brush_profile(&mut self, profile: BrushProfile) {
        self.brush.profile = profile;
    }

    /// Sets the minimum stamp distance along a stroke.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.brush.spacing = spacing.max(0.0);
    }

    /// Applies one pointer event.
    ///
    /// Out-of-range coordinates are clipped by the stamp; no event is an
    /// error.
    pub fn handle(&mut self, event: PointerEvent) {
        let PointerEvent { action, x, y } = event;
        trace!(?action, x, y, state = ?self.state, "MaskEditor::handle");

        match action {
            PointerAction::PressPrimary => self.begin(EditorState::DrawingWhite, x, y),
            PointerAction::PressSecondary => self.begin(EditorState::DrawingBlack, x, y),
            PointerAction::Move => {
                let Some(paint) = self.stroke_paint() else {
                    return;
                };
                if self.within_spacing(x, y) {
                    return;
                }
                self.paint_at(x, y, paint);
            }
            // A release of either button ends whatever stroke is active
            PointerAction::ReleasePrimary | PointerAction::ReleaseSecondary => {
                self.state = EditorState::Idle;
                self.last_stamp = None;
            }
            PointerAction::DoubleClickPrimary => self.flood(Paint::White),
            PointerAction::DoubleClickSecondary => self.flood(Paint::Black),
            PointerAction::Other => {}
        }
    }

    /// Applies events in order.
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = PointerEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    fn begin(&mut self, state: EditorState, x: i32, y: i32) {
        self.state = state;
        if let Some(paint) = self.stroke_paint() {
            self.paint_at(x, y, paint);
        }
    }

    fn stroke_paint(&self) -> Option<Paint> {
        match self.state {
            EditorState::Idle => None,
            EditorState::DrawingWhite => Some(Paint::White),
            EditorState::DrawingBlack => Some(Paint::Black),
        }
    }

    fn within_spacing(&self, x: i32, y: i32) -> bool {
        let spacing = f64::from(self.brush.spacing);
        match self.last_stamp {
            Some((lx, ly)) if spacing > 0.0 => {
                let dx = f64::from(x) - f64::from(lx);
                let dy = f64::from(y) - f64::from(ly);
                dx * dx + dy * dy <= spacing * spacing
            }
            _ => false,
        }
    }

    fn paint_at(&mut self, x: i32, y: i32, paint: Paint) {
        self.mask.stamp(
            i64::from(x),
            i64::from(y),
            self.brush.radius,
            paint,
            self.brush.profile,
        );
        self.last_stamp = Some((x, y));
    }

    // The whole mask, wherever the click landed
    fn flood(&mut self, paint: Paint) {
        debug!(?paint, "Flood fill");
        self.mask.fill(paint);
    }
}
