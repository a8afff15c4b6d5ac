//! Frame sources.
//!
//! [`Camera`] is the capture seam; [`CameraGuard`] owns one for the length of
//! a session and releases it exactly once, on whichever path the session
//! ends.

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::frame::{blend, Frame};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera stream ended")]
    EndOfStream,

    #[error("camera device error: {0}")]
    Device(String),
}

/// Which device to open and the resolution to ask it for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraConfig {
    pub index:  u32,
    pub width:  u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { index: 0, width: 1280, height: 720 }
    }
}

/// A blocking source of frames.
pub trait Camera {
    /// Block until the next frame is available.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Stop capturing and give the device back.
    fn release(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// CameraGuard
// ════════════════════════════════════════════════════════════════════════════

/// Scoped ownership of a camera: released on drop if not released earlier.
pub struct CameraGuard {
    camera:   Box<dyn Camera>,
    released: bool,
}

impl CameraGuard {
    pub fn new(camera: Box<dyn Camera>) -> Self {
        CameraGuard { camera, released: false }
    }

    pub fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if self.released {
            return Err(CameraError::Device("camera already released".into()));
        }
        self.camera.read_frame()
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.camera.release();
            log::info!("camera released");
        }
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) { self.release(); }
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera: synthetic frames (always available)
// ════════════════════════════════════════════════════════════════════════════

const SIM_TOP:    u32 = 0xFF1A1A2E;
const SIM_BOTTOM: u32 = 0xFF0F3460;

/// Produces a fixed backdrop at a steady rate, standing in for a webcam.
pub struct SimCamera {
    backdrop:   Frame,
    interval:   Duration,
    next_due:   Option<Instant>,
    frames:     u64,
    max_frames: Option<u64>,
}

impl SimCamera {
    /// A camera delivering `cfg.width × cfg.height` frames at ~30 fps.
    pub fn new(cfg: &CameraConfig) -> Self {
        let (w, h) = (cfg.width as usize, cfg.height as usize);
        let mut backdrop = Frame::new(w, h, SIM_TOP);
        for y in 0..h {
            let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
            backdrop.fill_rect(0, y as i32, w as i32, 1, blend(SIM_TOP, SIM_BOTTOM, t));
        }
        SimCamera {
            backdrop,
            interval:   Duration::from_millis(33),
            next_due:   None,
            frames:     0,
            max_frames: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// End the stream after `n` frames.
    pub fn with_max_frames(mut self, n: u64) -> Self {
        self.max_frames = Some(n);
        self
    }
}

impl Camera for SimCamera {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if self.max_frames.is_some_and(|max| self.frames >= max) {
            return Err(CameraError::EndOfStream);
        }

        let now = Instant::now();
        if let Some(due) = self.next_due {
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.next_due = Some(Instant::now() + self.interval);
        self.frames += 1;

        Ok(self.backdrop.clone())
    }

    fn release(&mut self) {
        log::debug!("simulated camera stopped after {} frames", self.frames);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Webcam: real device (feature = "webcam")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "webcam")]
pub struct Webcam {
    inner: nokhwa::Camera,
}

#[cfg(feature = "webcam")]
impl Webcam {
    pub fn open(cfg: &CameraConfig) -> anyhow::Result<Self> {
        use anyhow::Context;
        use nokhwa::pixel_format::RgbFormat;
        use nokhwa::utils::{
            CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
        };

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(cfg.width, cfg.height), FrameFormat::MJPEG, 30),
        ));
        let mut inner = nokhwa::Camera::new(CameraIndex::Index(cfg.index), requested)
            .with_context(|| format!("failed to open camera {}", cfg.index))?;
        inner.open_stream().context("failed to start camera stream")?;

        let res = inner.resolution();
        log::info!(
            "camera {} opened at {}x{} (requested {}x{})",
            cfg.index, res.width(), res.height(), cfg.width, cfg.height
        );
        Ok(Webcam { inner })
    }
}

#[cfg(feature = "webcam")]
impl Camera for Webcam {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        use nokhwa::pixel_format::RgbFormat;

        let buffer = self.inner.frame().map_err(|e| CameraError::Device(e.to_string()))?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::Device(e.to_string()))?;
        Frame::from_rgb(image.width() as usize, image.height() as usize, image.as_raw())
            .ok_or_else(|| CameraError::Device("decoded frame has the wrong size".into()))
    }

    fn release(&mut self) {
        if let Err(e) = self.inner.stop_stream() {
            log::warn!("failed to stop camera stream: {}", e);
        }
    }
}

/// Open the configured camera: the real device with `webcam`, otherwise the
/// synthetic source.
pub fn open_camera(cfg: &CameraConfig) -> anyhow::Result<Box<dyn Camera>> {
    #[cfg(feature = "webcam")]
    {
        Ok(Box::new(Webcam::open(cfg)?))
    }
    #[cfg(not(feature = "webcam"))]
    {
        log::info!("using simulated camera ({}x{})", cfg.width, cfg.height);
        Ok(Box::new(SimCamera::new(cfg)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        releases: Rc<Cell<u32>>,
    }

    impl Camera for Counting {
        fn read_frame(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame::new(2, 2, 0))
        }
        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    #[test]
    fn guard_releases_once_on_drop() {
        let releases = Rc::new(Cell::new(0));
        {
            let mut g = CameraGuard::new(Box::new(Counting { releases: releases.clone() }));
            assert!(g.read_frame().is_ok());
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn explicit_release_is_not_repeated() {
        let releases = Rc::new(Cell::new(0));
        let mut g = CameraGuard::new(Box::new(Counting { releases: releases.clone() }));
        g.release();
        g.release();
        assert!(g.read_frame().is_err());
        drop(g);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn sim_camera_size_and_end() {
        let cfg = CameraConfig { index: 0, width: 64, height: 48 };
        let mut cam = SimCamera::new(&cfg)
            .with_interval(Duration::ZERO)
            .with_max_frames(2);
        let f = cam.read_frame().unwrap();
        assert_eq!((f.width(), f.height()), (64, 48));
        assert_eq!(f.pixel(0, 0), Some(SIM_TOP));
        assert_eq!(f.pixel(0, 47), Some(SIM_BOTTOM));
        assert!(cam.read_frame().is_ok());
        assert_eq!(cam.read_frame(), Err(CameraError::EndOfStream));
    }

    #[test]
    fn default_config_matches_capture_request() {
        assert_eq!(CameraConfig::default(), CameraConfig { index: 0, width: 1280, height: 720 });
    }
}
