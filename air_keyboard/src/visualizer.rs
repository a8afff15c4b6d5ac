//! Output window using `minifb`.
//!
//! The window shows the annotated frame, reports physical key presses to the
//! frame loop and, in simulation mode, forwards the mouse pointer to the
//! [`SimHandDetector`](crate::hand::SimHandDetector).

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::frame::Frame;
use crate::hand::SimInput;

pub const WINDOW_TITLE: &str = "Virtual Keyboard";

/// Where finished frames go, and where the quit key comes from.
pub trait Screen {
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// A physical key pressed since the last poll, lowercased.
    fn poll_key(&mut self) -> Option<char>;

    /// False once the user has closed the window.
    fn is_open(&self) -> bool;
}

pub struct Visualizer {
    window:  Window,
    sim_tx:  Option<Sender<SimInput>>,
    pending: Vec<char>,
    pointer: bool,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, poll_interval: Duration) -> Result<Self> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("failed to open window: {}", e))?;

        window.limit_update_rate(Some(poll_interval));

        Ok(Visualizer { window, sim_tx: None, pending: Vec::new(), pointer: false })
    }

    /// Forward mouse state to a simulated detector after every frame.
    pub fn with_sim_input(mut self, tx: Sender<SimInput>) -> Self {
        self.sim_tx = Some(tx);
        self
    }

    fn forward_pointer(&mut self) {
        let Some(tx) = &self.sim_tx else { return };
        match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) => {
                let pressed = self.window.get_mouse_down(MouseButton::Left);
                let _ = tx.send(SimInput::Pointer { x, y, pressed });
                self.pointer = true;
            }
            None if self.pointer => {
                let _ = tx.send(SimInput::PointerLost);
                self.pointer = false;
            }
            None => {}
        }
    }
}

impl Screen for Visualizer {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.window
            .update_with_buffer(frame.pixels(), frame.width(), frame.height())
            .map_err(|e| anyhow!("failed to present frame: {}", e))?;

        self.pending.extend(
            self.window.get_keys_pressed(KeyRepeat::No).into_iter().filter_map(key_char),
        );
        self.forward_pointer();
        Ok(())
    }

    fn poll_key(&mut self) -> Option<char> {
        if self.pending.is_empty() { None } else { Some(self.pending.remove(0)) }
    }

    fn is_open(&self) -> bool { self.window.is_open() }
}

fn key_char(key: Key) -> Option<char> {
    let c = match key {
        Key::A => 'a', Key::B => 'b', Key::C => 'c', Key::D => 'd', Key::E => 'e',
        Key::F => 'f', Key::G => 'g', Key::H => 'h', Key::I => 'i', Key::J => 'j',
        Key::K => 'k', Key::L => 'l', Key::M => 'm', Key::N => 'n', Key::O => 'o',
        Key::P => 'p', Key::Q => 'q', Key::R => 'r', Key::S => 's', Key::T => 't',
        Key::U => 'u', Key::V => 'v', Key::W => 'w', Key::X => 'x', Key::Y => 'y',
        Key::Z => 'z',
        Key::Escape => '\u{1b}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_lowercase() {
        assert_eq!(key_char(Key::Q), Some('q'));
        assert_eq!(key_char(Key::Z), Some('z'));
        assert_eq!(key_char(Key::Escape), Some('\u{1b}'));
        assert_eq!(key_char(Key::F1), None);
    }
}
