//! Key dispatch: turn an activated key into an injected keystroke plus a
//! text-buffer edit, or an exit request.
//!
//! | Key | Keystroke | Buffer |
//! |---|---|---|
//! | SPACE | `space` | append `' '` |
//! | ENTER | `enter` | append `'\n'` |
//! | BACK | `backspace` | remove last char |
//! | EXIT | none | unchanged |
//! | other | lower-cased label | append label |

use std::fmt;

use thiserror::Error;

use crate::layout::KeyAction;
use crate::text_buffer::TextBuffer;

// ════════════════════════════════════════════════════════════════════════════
// KeyStroke
// ════════════════════════════════════════════════════════════════════════════

/// A key press handed to the OS input backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyStroke {
    Space,
    Enter,
    Backspace,
    /// A single lower-case character.
    Char(char),
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStroke::Space     => f.write_str("space"),
            KeyStroke::Enter     => f.write_str("enter"),
            KeyStroke::Backspace => f.write_str("backspace"),
            KeyStroke::Char(c)   => write!(f, "{}", c),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyInjector: the OS input seam
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("key injection backend unavailable: {0}")]
    Unavailable(String),

    #[error("failed to press {key}: {reason}")]
    Failed { key: String, reason: String },
}

/// Anything that can press a key on behalf of the user.
pub trait KeyInjector {
    fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError>;
}

impl<T: KeyInjector + ?Sized> KeyInjector for Box<T> {
    fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError> {
        (**self).press(stroke)
    }
}

/// Discards every key press.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullInjector;

impl KeyInjector for NullInjector {
    fn press(&mut self, _stroke: KeyStroke) -> Result<(), InjectError> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// dispatch
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A keystroke was injected and the buffer updated.
    Typed(KeyStroke),
    /// EXIT was activated; nothing was injected.
    Exit,
}

impl Outcome {
    pub fn is_exit(&self) -> bool { matches!(self, Outcome::Exit) }
}

/// Keystroke for a key action, or `None` for EXIT.
pub fn stroke_for(action: KeyAction) -> Option<KeyStroke> {
    match action {
        KeyAction::Space   => Some(KeyStroke::Space),
        KeyAction::Enter   => Some(KeyStroke::Enter),
        KeyAction::Back    => Some(KeyStroke::Backspace),
        KeyAction::Exit    => None,
        KeyAction::Char(c) => Some(KeyStroke::Char(c.to_lowercase().next().unwrap_or(c))),
    }
}

/// Dispatch one activation.
///
/// The keystroke is injected before the buffer is touched; if injection fails
/// the buffer is left unchanged and the error is returned.
pub fn dispatch(
    action:   KeyAction,
    injector: &mut dyn KeyInjector,
    buffer:   &mut TextBuffer,
) -> Result<Outcome, InjectError> {
    let stroke = match stroke_for(action) {
        Some(s) => s,
        None    => return Ok(Outcome::Exit),
    };

    injector.press(stroke)?;

    match action {
        KeyAction::Space   => buffer.append(" "),
        KeyAction::Enter   => buffer.append("\n"),
        KeyAction::Back    => buffer.backspace(),
        KeyAction::Char(c) => buffer.append(c.encode_utf8(&mut [0u8; 4])),
        KeyAction::Exit    => {}
    }

    log::debug!("dispatched {} -> {:?}", stroke, buffer.renderable_text());
    Ok(Outcome::Typed(stroke))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
