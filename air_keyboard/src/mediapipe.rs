//! MediaPipe hand landmarker driven as a Python subprocess.
//!
//! # Protocol
//!
//! The child prints `READY` once its model is loaded.  Then, per frame:
//!
//! * **stdin** ← `width: u32 LE`, `height: u32 LE`, `channels: u32 LE` (always 3),
//!   followed by `width * height * 3` bytes of packed RGB;
//! * **stdout** → one JSON line:
//!   `{"hands": [{"handedness": "Right", "score": 0.98, "landmarks": [{"x":..,"y":..,"z":..}, ...]}], "error": null}`.
//!
//! Tracker settings are passed as command-line arguments:
//! `--static-image-mode`, `--max-num-hands`, `--min-detection-confidence`,
//! `--min-tracking-confidence`.
//!
//! # Setup
//!
//! ```text
//! python3 -m venv .venv && .venv/bin/pip install mediapipe numpy
//! ```
//!
//! and place the landmark script at `./hand_detect.py`.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::frame::Frame;
use crate::hand::{landmarks, HandDetector, HandLandmarks, Landmark, TrackerConfig};

pub const DEFAULT_PYTHON: &str = ".venv/bin/python";
pub const DEFAULT_SCRIPT: &str = "hand_detect.py";

// ── JSON wire format ──────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default)]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// MediaPipeDetector
// ════════════════════════════════════════════════════════════════════════════

pub struct MediaPipeDetector {
    process:   Child,
    stdin:     ChildStdin,
    stdout:    BufReader<ChildStdout>,
    max_hands: usize,
}

impl MediaPipeDetector {
    /// Start the detector using the default interpreter and script paths,
    /// relative to the working directory.
    pub fn spawn_default(cfg: &TrackerConfig) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::spawn(&cwd.join(DEFAULT_PYTHON), &cwd.join(DEFAULT_SCRIPT), cfg)
    }

    pub fn spawn(python: &Path, script: &Path, cfg: &TrackerConfig) -> Result<Self> {
        if !script.exists() {
            bail!("hand detection script not found at {:?}", script);
        }
        if !python.exists() {
            bail!(
                "Python interpreter not found at {:?}. Run: python3 -m venv .venv && .venv/bin/pip install mediapipe numpy",
                python
            );
        }

        log::info!("Starting MediaPipe hand detector subprocess...");

        let mut process = Command::new(python)
            .arg(script)
            .arg("--static-image-mode").arg(cfg.static_image_mode.to_string())
            .arg("--max-num-hands").arg(cfg.max_num_hands.to_string())
            .arg("--min-detection-confidence").arg(cfg.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence").arg(cfg.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to start hand detector subprocess")?;

        let stdin  = process.stdin.take().context("detector stdin unavailable")?;
        let stdout = process.stdout.take().context("detector stdout unavailable")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready).context("detector exited before signalling ready")?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            bail!("detector did not signal ready, got: {:?}", ready.trim());
        }

        log::info!("MediaPipe hand detector ready");

        Ok(MediaPipeDetector { process, stdin, stdout, max_hands: cfg.max_num_hands })
    }
}

/// Convert one JSON response into hands, dropping malformed entries.
fn parse_response(line: &str, max_hands: usize) -> Result<Vec<HandLandmarks>> {
    let result: DetectionResult = serde_json::from_str(line)
        .with_context(|| format!("failed to parse detector response: {}", line.trim()))?;

    if let Some(error) = result.error {
        log::warn!("hand detector reported: {}", error);
        return Ok(Vec::new());
    }

    let mut hands = Vec::new();
    for hand in result.hands {
        if hand.landmarks.len() != landmarks::COUNT {
            log::warn!("expected {} landmarks, got {}", landmarks::COUNT, hand.landmarks.len());
            continue;
        }
        let mut points = [Landmark::default(); landmarks::COUNT];
        for (slot, lm) in points.iter_mut().zip(&hand.landmarks) {
            *slot = Landmark { x: lm.x, y: lm.y, z: lm.z };
        }
        log::debug!(
            "hand: {} ({:.2}) index_tip=({:.3},{:.3})",
            hand.handedness, hand.score,
            points[landmarks::INDEX_FINGER_TIP].x, points[landmarks::INDEX_FINGER_TIP].y
        );
        hands.push(HandLandmarks { points, score: hand.score, handedness: hand.handedness });
        if hands.len() == max_hands {
            break;
        }
    }
    Ok(hands)
}

impl HandDetector for MediaPipeDetector {
    fn infer(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let header = [frame.width() as u32, frame.height() as u32, 3u32];
        for v in header {
            self.stdin.write_all(&v.to_le_bytes())?;
        }
        self.stdin.write_all(&frame.to_rgb())?;
        self.stdin.flush().context("failed to send frame to detector")?;

        let mut line = String::new();
        let n = self.stdout.read_line(&mut line)?;
        if n == 0 {
            bail!("hand detector subprocess closed its output");
        }
        parse_response(&line, self.max_hands)
    }
}

impl Drop for MediaPipeDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
