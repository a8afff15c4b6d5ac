//! # air_keyboard
//!
//! Camera-driven virtual keyboard.  Each frame is mirrored, searched for a
//! hand, annotated with the keyboard and typed text, and shown in a window.
//! Curling the index finger over a key presses it.
//!
//! ## Frame loop
//!
//! | Step | Module |
//! |---|---|
//! | Acquire and mirror a frame | [`camera`], [`frame`] |
//! | Find hand landmarks | [`hand`] (plus `mediapipe` with the feature) |
//! | Draw text band and keys | [`overlay`] |
//! | Fingertip → hit test → click state → dispatch | `air_keys` |
//! | Present and poll the quit key | [`visualizer`] |
//!
//! ## Feature flags
//!
//! * (default) **Simulation mode**: synthetic camera; the mouse pointer is
//!   the fingertip and holding the left button curls the finger.  Keystrokes
//!   are logged, not sent.
//! * `webcam`: capture from a real camera via `nokhwa`.
//! * `mediapipe`: MediaPipe hand landmarker as a Python subprocess.
//! * `inject`: send keystrokes to the OS via `enigo`.
//! * `hardware`: all three.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `Q` (physical) | Quit |
//! | `EXIT` (on screen) | Quit |

pub mod font;
pub mod frame;
pub mod hand;
#[cfg(feature = "mediapipe")]
pub mod mediapipe;
pub mod camera;
pub mod injector;
pub mod overlay;
pub mod visualizer;
pub mod app;
