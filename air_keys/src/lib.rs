//! # air_keys
//!
//! Interaction core of a camera-driven on-screen keyboard: the user points
//! with an index finger and curls it over a key to "press" it.
//!
//! Everything here is pure and synchronous; camera capture, hand-landmark
//! inference, OS key injection and drawing live in `air_keyboard`.
//!
//! | Module | Role |
//! |---|---|
//! | [`layout`] | key table, pixel rectangles, point → key hit test |
//! | [`click`] | `Idle`/`Latched` debounce state machine |
//! | [`text_buffer`] | bounded typed-text preview |
//! | [`dispatch`] | key → keystroke + buffer edit, or exit |
//! | [`keyboard`] | per-frame glue over the four above |
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use air_keys::{HandSample, Keyboard, Layout, LayoutGeometry, NullInjector, TextBuffer};
//!
//! let layout = Layout::qwerty(LayoutGeometry::default()).unwrap();
//! let mut kb = Keyboard::new(layout, TextBuffer::default());
//!
//! // Fingertip curled over "Q" (top-left key).
//! let sample = HandSample { fingertip: (80, 380), pinched: true };
//! let act = kb.feed(Some(sample), Instant::now(), &mut NullInjector).unwrap();
//! assert_eq!(act.unwrap().label, "Q");
//! assert_eq!(kb.buffer().renderable_text(), "Q");
//! ```

pub mod layout;
pub mod click;
pub mod text_buffer;
pub mod dispatch;
pub mod keyboard;

pub use layout::{Hit, KeyAction, KeyDefinition, KeyId, Layout, LayoutError, LayoutGeometry, Rect};
pub use click::{ClickState, Step, DEFAULT_CLICK_DELAY};
pub use text_buffer::{TextBuffer, DEFAULT_MAX_DISPLAY_CHARS};
pub use dispatch::{dispatch, stroke_for, InjectError, KeyInjector, KeyStroke, NullInjector, Outcome};
pub use keyboard::{Activation, HandSample, Keyboard};
