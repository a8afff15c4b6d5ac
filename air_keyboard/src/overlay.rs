//! Everything drawn on top of the camera image.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ instructions                                                  │
//! │ Typed: HELLO                                  (dark band)     │
//! ├───────────────────────────────────────────────────────────────┤
//! │                                                               │
//! │        [Q][W][E][R][T][Y][U][I][O][P]                          │
//! │        [A][S][D][F][G][H][J][K][L][;]       ◉ fingertip        │
//! │        [Z][X][C][V][B][N][M][,][.][/]                          │
//! │        [   SPACE   ][ENTER][BACK ][EXIT ]                      │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use air_keys::{KeyId, Layout, TextBuffer};

use crate::frame::Frame;
use crate::hand::{HandLandmarks, HAND_CONNECTIONS};

pub const INSTRUCTIONS: &str = "Virtual Keyboard - Point & close finger to type";

pub const BAND_HEIGHT:  i32 = 80;
const BAND_ALPHA:       f32 = 0.7;
const TEXT_SCALE:       i32 = 4;
const HINT_SCALE:       i32 = 2;

const BLACK:            u32 = 0xFF000000;
const WHITE:            u32 = 0xFFFFFFFF;
const KEY_FILL:         u32 = 0xFFC8C8C8;  // light grey
const KEY_LATCHED:      u32 = 0xFF00FF00;
const HINT_COLOR:       u32 = 0xFFFFFF00;  // yellow
const TIP_COLOR:        u32 = 0xFFFF00FF;  // magenta
const JOINT_COLOR:      u32 = 0xFFFF0000;
const BONE_COLOR:       u32 = 0xFFFFFFFF;

/// Darken the top band and print the buffer in it.
pub fn draw_typed_text(frame: &mut Frame, buffer: &TextBuffer) {
    frame.blend_rect(0, 0, frame.width() as i32, BAND_HEIGHT, BLACK, BAND_ALPHA);
    let text = format!("Typed: {}", buffer.renderable_text());
    frame.draw_label(&text, 20, 30, TEXT_SCALE, WHITE);
}

pub fn draw_instructions(frame: &mut Frame) {
    frame.draw_label(INSTRUCTIONS, 10, 10, HINT_SCALE, HINT_COLOR);
}

/// Draw every key; `latched` is highlighted.
pub fn draw_keyboard(frame: &mut Frame, layout: &Layout, latched: Option<KeyId>) {
    for (id, key, r) in layout.iter() {
        let fill = if latched == Some(id) { KEY_LATCHED } else { KEY_FILL };
        frame.fill_rect(r.x, r.y, r.width, r.height, fill);
        frame.draw_border(r.x, r.y, r.width, r.height, 2, BLACK);
        frame.draw_label(&key.label, r.x + 10, r.y + 20, TEXT_SCALE, BLACK);
    }
}

pub fn draw_fingertip(frame: &mut Frame, (x, y): (i32, i32)) {
    frame.fill_circle(x, y, 10, TIP_COLOR);
    frame.draw_ring(x, y, 15, 2, WHITE);
}

/// Bones as 2 px lines, joints as dots.
pub fn draw_hand(frame: &mut Frame, hand: &HandLandmarks) {
    let pts = hand.pixel_points(frame.width(), frame.height());
    for &(a, b) in HAND_CONNECTIONS.iter() {
        let ((x0, y0), (x1, y1)) = (pts[a], pts[b]);
        frame.draw_line(x0, y0, x1, y1, BONE_COLOR);
        frame.draw_line(x0 + 1, y0, x1 + 1, y1, BONE_COLOR);
    }
    for &(x, y) in &pts {
        frame.fill_circle(x, y, 3, JOINT_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
