//! Session configuration and pointer event scripts (YAML).
//!
//! A config file only needs the keys it changes:
//!
//! ```yaml
//! brush:
//!   radius: 24
//!   profile: { kind: soft, sigma: 10.0 }
//!   spacing: 4.5
//! frame_interval_ms: 10
//! sweep: { start: 0, step: 5, end: 4000 }
//! ```
//!
//! An event script groups pointer events by loop iteration:
//!
//! ```yaml
//! frames:
//!   - [{ action: press-primary, x: 10, y: 10 }]
//!   - [{ action: move, x: 20, y: 10 }, { action: release-primary, x: 20, y: 10 }]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::editor::{BrushSettings, PointerEvent};
use crate::mask::SweepSchedule;
use crate::reconstruct::ScriptedEvents;
use crate::{OpsError, OpsResult};

/// Default pause between interactive frames.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 10;

/// Tunables for sweep and paint sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stroke brush.
    pub brush: BrushSettings,
    /// Bounded wait between interactive frames.
    pub frame_interval_ms: u64,
    /// Radii visited in sweep mode.
    pub sweep: SweepSchedule,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            sweep: SweepSchedule::default(),
        }
    }
}

impl SessionConfig {
    /// Loads a config file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        let content = read(path)?;
        let config = Self::from_yaml_str(&content)
            .map_err(|e| OpsError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    /// Parses YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| OpsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> OpsResult<String> {
        serde_yaml::to_string(self).map_err(|e| OpsError::Config(e.to_string()))
    }

    /// Rejects values no session can run with.
    pub fn validate(&self) -> OpsResult<()> {
        self.sweep.validate()?;
        if !self.brush.spacing.is_finite() || self.brush.spacing < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "brush spacing must be >= 0, got {}",
                self.brush.spacing
            )));
        }
        Ok(())
    }

    /// [`frame_interval_ms`](Self::frame_interval_ms) as a duration.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Recorded pointer input for a paint session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    /// One group of events per loop iteration.
    #[serde(default)]
    pub frames: Vec<Vec<PointerEvent>>,
}

impl EventScript {
    /// Loads a script file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        let content = read(path)?;
        let script = Self::from_yaml_str(&content)
            .map_err(|e| OpsError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(
            path = %path.display(),
            frames = script.frames.len(),
            events = script.event_count(),
            "Loaded event script"
        );
        Ok(script)
    }

    /// Parses a YAML script.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| OpsError::Config(e.to_string()))
    }

    /// Total events over all frames.
    pub fn event_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    /// Event source replaying this script.
    pub fn into_source(self) -> ScriptedEvents {
        ScriptedEvents::new(self.frames)
    }
}

fn read(path: &Path) -> OpsResult<String> {
    std::fs::read_to_string(path).map_err(|e| OpsError::Config(format!("{}: {}", path.display(), e)))
}
