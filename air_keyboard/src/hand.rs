//! Hand landmarks and the detector seam.
//!
//! A detector turns a (mirrored) camera frame into zero or more
//! [`HandLandmarks`], each the standard 21-point hand model in normalized
//! image coordinates.  Only the index finger's PIP joint (6) and tip (8) feed
//! the keyboard; the full set is drawn as a skeleton for feedback.
//!
//! Two detectors exist:
//!
//! * [`SimHandDetector`] (always available): synthesizes a hand from the
//!   window's mouse pointer; holding the left button curls the finger.
//! * `MediaPipeDetector` (feature `mediapipe`): see [`crate::mediapipe`].

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use air_keys::HandSample;

use crate::frame::Frame;

/// Hand landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

/// Bones of the 21-point hand, as landmark index pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

/// A single landmark; `x`, `y` are 0.0–1.0 fractions of the image size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist; unused by the keyboard.
    pub z: f32,
}

/// One detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    pub points:     [Landmark; landmarks::COUNT],
    pub score:      f32,
    pub handedness: String,
}

impl HandLandmarks {
    /// Index fingertip in pixel coordinates, truncated toward zero.
    pub fn index_fingertip(&self, width: usize, height: usize) -> (i32, i32) {
        let tip = &self.points[landmarks::INDEX_FINGER_TIP];
        ((tip.x * width as f32) as i32, (tip.y * height as f32) as i32)
    }

    /// True when the index tip is lower on screen than its PIP joint.
    pub fn is_index_curled(&self, height: usize) -> bool {
        let h = height as f32;
        self.points[landmarks::INDEX_FINGER_TIP].y * h > self.points[landmarks::INDEX_FINGER_PIP].y * h
    }

    pub fn sample(&self, width: usize, height: usize) -> HandSample {
        HandSample {
            fingertip: self.index_fingertip(width, height),
            pinched:   self.is_index_curled(height),
        }
    }

    /// All landmarks in pixel coordinates, for drawing.
    pub fn pixel_points(&self, width: usize, height: usize) -> Vec<(i32, i32)> {
        self.points.iter()
            .map(|p| ((p.x * width as f32) as i32, (p.y * height as f32) as i32))
            .collect()
    }

    /// A plausible right hand whose index tip sits at (`tip_x`, `tip_y`)
    /// (normalized).  When `curled`, the index PIP is placed above the tip.
    pub fn synthetic(tip_x: f32, tip_y: f32, curled: bool) -> Self {
        let mut points = [Landmark::default(); landmarks::COUNT];
        let at = |x: f32, y: f32| Landmark { x, y, z: 0.0 };

        // Index finger, MCP → tip.
        let index = if curled {
            [at(tip_x - 0.010, tip_y - 0.030),
             at(tip_x - 0.005, tip_y - 0.060),
             at(tip_x + 0.010, tip_y - 0.030),
             at(tip_x,         tip_y)]
        } else {
            [at(tip_x, tip_y + 0.150),
             at(tip_x, tip_y + 0.100),
             at(tip_x, tip_y + 0.050),
             at(tip_x, tip_y)]
        };
        let mcp_y = index[0].y;
        points[landmarks::INDEX_FINGER_MCP..=landmarks::INDEX_FINGER_TIP].copy_from_slice(&index);

        points[landmarks::WRIST] = at(tip_x + 0.020, mcp_y + 0.160);

        // Thumb fans out to the side.
        for j in 0..4 {
            let k = (j + 1) as f32;
            points[landmarks::THUMB_CMC + j] = at(tip_x - 0.030 - 0.020 * k, mcp_y + 0.120 - 0.025 * k);
        }

        // Middle, ring and pinky: loosely curled next to the index.
        for (f, base) in [landmarks::MIDDLE_FINGER_MCP, landmarks::RING_FINGER_MCP, landmarks::PINKY_MCP]
            .into_iter()
            .enumerate()
        {
            let x = tip_x + 0.030 * (f + 1) as f32;
            points[base]     = at(x, mcp_y + 0.005 * f as f32);
            points[base + 1] = at(x, mcp_y + 0.030);
            points[base + 2] = at(x, mcp_y + 0.055);
            points[base + 3] = at(x, mcp_y + 0.045);
        }

        HandLandmarks { points, score: 1.0, handedness: "Right".to_string() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Settings handed to the landmark model.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// `false` = video mode: track between frames instead of re-detecting.
    pub static_image_mode:        bool,
    pub max_num_hands:            usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            static_image_mode:        false,
            max_num_hands:            1,
            min_detection_confidence: 0.7,
            min_tracking_confidence:  0.7,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandDetector trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can find hands in a frame.
pub trait HandDetector {
    /// Detect hands in `frame`.  An empty vector means no hand; an error is
    /// fatal to the session.
    fn infer(&mut self, frame: &Frame) -> anyhow::Result<Vec<HandLandmarks>>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandDetector: mouse pointer as the index finger
// ════════════════════════════════════════════════════════════════════════════

/// Raw pointer event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer inside the window, in frame pixels; `pressed` = left button.
    Pointer { x: f32, y: f32, pressed: bool },
    /// Pointer left the window.
    PointerLost,
}

/// Detector driven by [`SimInput`] events from the visualizer window.
///
/// The window and the detector are decoupled by a channel so the frame loop
/// never needs to know which detector it is talking to.
pub struct SimHandDetector {
    rx:      Receiver<SimInput>,
    pointer: Option<(f32, f32, bool)>,
}

impl SimHandDetector {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandDetector { rx, pointer: None }
    }

    /// A detector plus the sender the window should feed.
    pub fn channel() -> (Sender<SimInput>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, SimHandDetector::new(rx))
    }

    /// Keep only the most recent pointer state.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer { x, y, pressed }) => self.pointer = Some((x, y, pressed)),
                Ok(SimInput::PointerLost)               => self.pointer = None,
                Err(TryRecvError::Empty)                => break,
                Err(TryRecvError::Disconnected)         => { self.pointer = None; break; }
            }
        }
    }
}

impl HandDetector for SimHandDetector {
    fn infer(&mut self, frame: &Frame) -> anyhow::Result<Vec<HandLandmarks>> {
        self.drain();
        let Some((x, y, pressed)) = self.pointer else { return Ok(Vec::new()) };
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }
        // Aim at the pixel centre so the round trip back to pixels is exact.
        let nx = (x.floor() + 0.5) / frame.width() as f32;
        let ny = (y.floor() + 0.5) / frame.height() as f32;
        Ok(vec![HandLandmarks::synthetic(nx, ny, pressed)])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingertip_scales_and_truncates() {
        let hand = HandLandmarks::synthetic(0.5, 0.25, false);
        assert_eq!(hand.index_fingertip(1280, 720), (640, 180));
        let hand = HandLandmarks::synthetic(0.0999, 0.0, false);
        assert_eq!(hand.index_fingertip(100, 100).0, 9);
    }

    #[test]
    fn curl_compares_tip_to_pip() {
        assert!(HandLandmarks::synthetic(0.5, 0.5, true).is_index_curled(720));
        assert!(!HandLandmarks::synthetic(0.5, 0.5, false).is_index_curled(720));

        let mut hand = HandLandmarks::synthetic(0.5, 0.5, false);
        hand.points[landmarks::INDEX_FINGER_PIP].y = 0.5;
        assert!(!hand.is_index_curled(720), "level joints are not a curl");
    }

    #[test]
    fn sample_combines_tip_and_curl() {
        let s = HandLandmarks::synthetic(0.25, 0.5, true).sample(1280, 720);
        assert_eq!(s, HandSample { fingertip: (320, 360), pinched: true });
    }

    #[test]
    fn synthetic_hand_is_on_screen() {
        for &(x, y) in &[(0.1, 0.1), (0.5, 0.8), (0.9, 0.5)] {
            let hand = HandLandmarks::synthetic(x, y, true);
            assert_eq!(hand.pixel_points(100, 100).len(), landmarks::COUNT);
            assert!(hand.points.iter().all(|p| p.x > -0.2 && p.x < 1.2));
        }
    }

    #[test]
    fn sim_detector_follows_pointer() {
        let (tx, mut det) = SimHandDetector::channel();
        let frame = Frame::new(1280, 720, 0);

        assert!(det.infer(&frame).unwrap().is_empty());

        tx.send(SimInput::Pointer { x: 10.0, y: 10.0, pressed: false }).unwrap();
        tx.send(SimInput::Pointer { x: 80.0, y: 380.0, pressed: true }).unwrap();
        let hands = det.infer(&frame).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(
            hands[0].sample(1280, 720),
            HandSample { fingertip: (80, 380), pinched: true }
        );

        // State persists until the next event.
        assert_eq!(det.infer(&frame).unwrap().len(), 1);

        tx.send(SimInput::PointerLost).unwrap();
        assert!(det.infer(&frame).unwrap().is_empty());
    }

    #[test]
    fn sim_detector_clears_when_window_gone() {
        let (tx, mut det) = SimHandDetector::channel();
        tx.send(SimInput::Pointer { x: 1.0, y: 1.0, pressed: false }).unwrap();
        drop(tx);
        assert!(det.infer(&Frame::new(10, 10, 0)).unwrap().is_empty());
    }
}
