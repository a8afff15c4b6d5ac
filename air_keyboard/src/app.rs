//! Top-level frame loop.
//!
//! `AppState` owns the [`Keyboard`] and renders the overlay; `run_session`
//! drives it one camera frame at a time with whatever collaborators it is
//! handed; `run` wires up the real ones.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use air_keys::{
    Activation, KeyInjector, Keyboard, Layout, LayoutError, LayoutGeometry, TextBuffer,
    DEFAULT_CLICK_DELAY, DEFAULT_MAX_DISPLAY_CHARS,
};

use crate::camera::{open_camera, Camera, CameraConfig, CameraGuard};
use crate::frame::Frame;
use crate::hand::{HandDetector, HandLandmarks, TrackerConfig};
use crate::injector::open_injector;
use crate::overlay;
use crate::visualizer::{Screen, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub camera:            CameraConfig,
    pub tracker:           TrackerConfig,
    pub geometry:          LayoutGeometry,
    /// Minimum time between repeats of the same key while held.
    pub click_delay:       Duration,
    /// Characters kept in the typed-text buffer.
    pub max_display_chars: usize,
    /// Physical key that ends the session.
    pub quit_key:          char,
    /// Window update interval; also paces the loop.
    pub poll_interval:     Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            camera:            CameraConfig::default(),
            tracker:           TrackerConfig::default(),
            geometry:          LayoutGeometry::default(),
            click_delay:       DEFAULT_CLICK_DELAY,
            max_display_chars: DEFAULT_MAX_DISPLAY_CHARS,
            quit_key:          'q',
            poll_interval:     Duration::from_millis(1),
        }
    }
}

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The camera could not deliver another frame.
    StreamEnded,
    /// The physical quit key was pressed.
    QuitKey,
    /// The on-screen EXIT key was activated.
    ExitKey,
    WindowClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub end:         SessionEnd,
    pub typed:       String,
    pub activations: usize,
}

// ════════════════════════════════════════════════════════════════════════════
// Clock
// ════════════════════════════════════════════════════════════════════════════

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// What one frame did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub activation: Option<Activation>,
    pub exit:       bool,
}

pub struct AppState {
    keyboard: Keyboard,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, LayoutError> {
        let layout   = Layout::qwerty(cfg.geometry)?;
        let keyboard = Keyboard::new(layout, TextBuffer::new(cfg.max_display_chars))
            .with_click_delay(cfg.click_delay);
        Ok(AppState { keyboard })
    }

    pub fn keyboard(&self) -> &Keyboard { &self.keyboard }

    /// Annotate `frame` and advance the keyboard with the first detected hand.
    ///
    /// Text and keys are drawn before the hand is fed, so the highlight shows
    /// the key latched as of the previous frame.
    pub fn process_frame(
        &mut self,
        frame:    &mut Frame,
        hands:    &[HandLandmarks],
        now:      Instant,
        injector: &mut dyn KeyInjector,
    ) -> Result<FrameReport> {
        overlay::draw_typed_text(frame, self.keyboard.buffer());
        overlay::draw_keyboard(frame, self.keyboard.layout(), self.keyboard.latched_key());

        let mut report = FrameReport::default();

        if let Some(hand) = hands.first() {
            let sample = hand.sample(frame.width(), frame.height());
            overlay::draw_hand(frame, hand);
            overlay::draw_fingertip(frame, sample.fingertip);

            let activation = self.keyboard
                .feed(Some(sample), now, injector)
                .context("key injection failed")?;

            if let Some(act) = activation {
                println!("Pressed: {}", act.label);
                log::debug!("{:?} -> {:?}, buffer {:?}", act.label, act.outcome, self.keyboard.buffer().renderable_text());
                report.exit = act.outcome.is_exit();
                report.activation = Some(act);
            }
        }

        overlay::draw_instructions(frame);
        Ok(report)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame loop
// ════════════════════════════════════════════════════════════════════════════

/// Everything the loop talks to.
pub struct Collaborators {
    pub camera:   Box<dyn Camera>,
    pub detector: Box<dyn HandDetector>,
    pub injector: Box<dyn KeyInjector>,
    pub screen:   Box<dyn Screen>,
    pub clock:    Box<dyn Clock>,
}

/// Run frames until the stream ends, EXIT fires, the quit key is pressed or
/// the window closes.  The camera is released on every path out, including
/// errors.
pub fn run_session(cfg: &AppConfig, parts: Collaborators) -> Result<SessionSummary> {
    let Collaborators { camera, mut detector, mut injector, mut screen, clock } = parts;
    let mut camera = CameraGuard::new(camera);
    let mut state  = AppState::new(cfg).context("invalid keyboard layout")?;
    let mut activations = 0;

    let end = loop {
        let mut frame = match camera.read_frame() {
            Ok(f)  => f,
            Err(e) => {
                log::warn!("{}; ending session", e);
                break SessionEnd::StreamEnded;
            }
        };
        frame.mirror_horizontal();

        let hands = detector.infer(&frame).context("hand detection failed")?;
        let now   = clock.now();

        let report = state.process_frame(&mut frame, &hands, now, injector.as_mut())?;
        if report.activation.is_some() {
            activations += 1;
        }

        screen.present(&frame)?;

        let mut quit = false;
        while let Some(c) = screen.poll_key() {
            quit |= c.eq_ignore_ascii_case(&cfg.quit_key);
        }

        if report.exit       { break SessionEnd::ExitKey; }
        if quit              { break SessionEnd::QuitKey; }
        if !screen.is_open() { break SessionEnd::WindowClosed; }
    };

    camera.release();
    log::info!("session ended: {:?} after {} key presses", end, activations);

    Ok(SessionSummary {
        end,
        typed: state.keyboard().buffer().renderable_text().to_string(),
        activations,
    })
}

/// Open the window, detector, injector and camera, then run one session.
pub fn run(cfg: AppConfig) -> Result<SessionSummary> {
    let (w, h) = (cfg.camera.width as usize, cfg.camera.height as usize);

    #[cfg(feature = "mediapipe")]
    let (screen, detector): (Visualizer, Box<dyn HandDetector>) = {
        let screen   = Visualizer::new(w, h, cfg.poll_interval)?;
        let detector = crate::mediapipe::MediaPipeDetector::spawn_default(&cfg.tracker)?;
        (screen, Box::new(detector))
    };

    #[cfg(not(feature = "mediapipe"))]
    let (screen, detector): (Visualizer, Box<dyn HandDetector>) = {
        let (tx, detector) = crate::hand::SimHandDetector::channel();
        let screen = Visualizer::new(w, h, cfg.poll_interval)?.with_sim_input(tx);
        (screen, Box::new(detector))
    };

    let injector = open_injector();
    let camera   = open_camera(&cfg.camera)?;

    run_session(&cfg, Collaborators {
        camera,
        detector,
        injector,
        screen: Box::new(screen),
        clock:  Box::new(SystemClock),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
