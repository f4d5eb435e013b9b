//! Display sink that writes numbered PNG frames.
//!
//! Every [`show`](DisplaySink::show) call writes `<label>_<n>.png` into the
//! output directory, where `<label>` is the lowercased label and `n` counts
//! frames per label from zero. Advancing is either automatic or waits for a
//! line on an input stream (stdin in the CLI); a line starting with `q`, or
//! end of input, quits. Bounded waits sleep for the requested interval in
//! either mode.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fmask_ops::reconstruct::{Advance, DisplaySink, Frame};
use fmask_ops::{OpsError, OpsResult};
use tracing::{debug, info};

use crate::convert::frame_to_gray;
use crate::{IoResult, png};

/// How [`FrameWriter`] answers [`DisplaySink::wait_advance`].
enum AdvanceMode {
    Auto,
    Prompt(Box<dyn BufRead>),
}

/// [`DisplaySink`] writing 8-bit PNG frames to a directory.
pub struct FrameWriter {
    dir: PathBuf,
    counters: HashMap<String, usize>,
    written: Vec<PathBuf>,
    mode: AdvanceMode,
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("dir", &self.dir)
            .field("written", &self.written.len())
            .field("prompt", &matches!(self.mode, AdvanceMode::Prompt(_)))
            .finish()
    }
}

impl FrameWriter {
    /// Writer that never waits for input. Creates `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> IoResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "Writing frames");
        Ok(Self {
            dir,
            counters: HashMap::new(),
            written: Vec::new(),
            mode: AdvanceMode::Auto,
        })
    }

    /// Blocking advances read one line from `input`.
    pub fn with_prompt(mut self, input: impl BufRead + 'static) -> Self {
        self.mode = AdvanceMode::Prompt(Box::new(input));
        self
    }

    /// Blocking advances wait for Enter on stdin.
    pub fn with_stdin_prompt(self) -> Self {
        self.with_prompt(std::io::stdin().lock())
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every file written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path the next frame for `label` would be written to.
    pub fn next_path(&self, label: &str) -> PathBuf {
        let stem = file_stem(label);
        let n = self.counters.get(&stem).copied().unwrap_or(0);
        self.dir.join(format!("{}_{:05}.png", stem, n))
    }

    fn write_frame(&mut self, label: &str, frame: &Frame) -> IoResult<PathBuf> {
        let path = self.next_path(label);
        png::write_gray(&path, &frame_to_gray(frame))?;
        *self.counters.entry(file_stem(label)).or_insert(0) += 1;
        self.written.push(path.clone());
        Ok(path)
    }
}

fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() { "frame".into() } else { stem }
}

impl DisplaySink for FrameWriter {
    fn show(&mut self, label: &str, frame: &Frame) -> OpsResult<()> {
        let path = self
            .write_frame(label, frame)
            .map_err(|e| OpsError::Sink(e.to_string()))?;
        debug!(label, path = %path.display(), "Frame written");
        Ok(())
    }

    fn wait_advance(&mut self, timeout: Option<Duration>) -> OpsResult<Advance> {
        // A line reader cannot be polled, so bounded waits only sleep
        if let Some(interval) = timeout {
            std::thread::sleep(interval);
            return Ok(Advance::Continue);
        }
        let AdvanceMode::Prompt(input) = &mut self.mode else {
            return Ok(Advance::Continue);
        };

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| OpsError::Sink(e.to_string()))?;
        if read == 0 || line.trim_start().starts_with(['q', 'Q']) {
            return Ok(Advance::Quit);
        }
        Ok(Advance::Continue)
    }
}
