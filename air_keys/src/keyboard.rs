//! Per-frame interaction core: hit test → click state → dispatch.

use std::time::{Duration, Instant};

use crate::click::{ClickState, DEFAULT_CLICK_DELAY};
use crate::dispatch::{dispatch, InjectError, KeyInjector, Outcome};
use crate::layout::{KeyId, Layout};
use crate::text_buffer::TextBuffer;

/// One frame's observation of the tracked finger, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandSample {
    pub fingertip: (i32, i32),
    pub pinched:   bool,
}

/// A fresh key activation produced by [`Keyboard::feed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    pub key:     KeyId,
    pub label:   String,
    pub outcome: Outcome,
}

/// Layout, click state and text buffer for one typing session.
#[derive(Clone, Debug)]
pub struct Keyboard {
    layout:      Layout,
    click:       ClickState,
    buffer:      TextBuffer,
    click_delay: Duration,
}

impl Keyboard {
    pub fn new(layout: Layout, buffer: TextBuffer) -> Self {
        Keyboard {
            layout,
            click: ClickState::Idle,
            buffer,
            click_delay: DEFAULT_CLICK_DELAY,
        }
    }

    pub fn with_click_delay(mut self, delay: Duration) -> Self {
        self.click_delay = delay;
        self
    }

    /// Process one frame.  `None` means no hand was detected this frame, which
    /// leaves the click state untouched.
    ///
    /// Returns the activation, if the frame produced one.  An injection error
    /// is returned as-is; the click state has already advanced by then.
    pub fn feed(
        &mut self,
        sample:   Option<HandSample>,
        now:      Instant,
        injector: &mut dyn KeyInjector,
    ) -> Result<Option<Activation>, InjectError> {
        let Some(sample) = sample else { return Ok(None) };

        let (px, py) = sample.fingertip;
        let hit = self.layout.key_at(px, py).map(|h| h.id);

        let step = self.click.step(hit, sample.pinched, now, self.click_delay);
        self.click = step.state;

        let Some(key) = step.activated else { return Ok(None) };
        let def = self.layout.key(key);
        let outcome = dispatch(def.action, injector, &mut self.buffer)?;

        Ok(Some(Activation { key, label: def.label.clone(), outcome }))
    }

    pub fn layout(&self)      -> &Layout      { &self.layout }
    pub fn click(&self)       -> ClickState   { self.click }
    pub fn buffer(&self)      -> &TextBuffer  { &self.buffer }
    pub fn click_delay(&self) -> Duration     { self.click_delay }

    /// Key currently held latched, for highlighting.
    pub fn latched_key(&self) -> Option<KeyId> { self.click.active_key() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::KeyStroke;
    use crate::layout::{KeyDefinition, LayoutGeometry};

    #[derive(Default)]
    struct Recorder(Vec<KeyStroke>);

    impl KeyInjector for Recorder {
        fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError> {
            self.0.push(stroke);
            Ok(())
        }
    }

    /// "A" at (50,350)-(110,410); SPACE and EXIT on the row below.
    fn scenario_keyboard() -> Keyboard {
        let layout = Layout::new(LayoutGeometry::default(), vec![
            KeyDefinition::new("A",     0, 0, 1).unwrap(),
            KeyDefinition::new("SPACE", 1, 0, 4).unwrap(),
            KeyDefinition::new("EXIT",  1, 4, 2).unwrap(),
        ]).unwrap();
        Keyboard::new(layout, TextBuffer::default())
    }

    fn pinch(x: i32, y: i32) -> Option<HandSample> {
        Some(HandSample { fingertip: (x, y), pinched: true })
    }

    fn at(t0: Instant, secs: f64) -> Instant { t0 + Duration::from_secs_f64(secs) }

    #[test]
    fn type_hold_then_switch() {
        let mut kb = scenario_keyboard();
        let mut inj = Recorder::default();
        let t0 = Instant::now();

        let a = kb.feed(pinch(60, 360), at(t0, 0.0), &mut inj).unwrap().unwrap();
        assert_eq!(a.label, "A");
        assert_eq!(inj.0, [KeyStroke::Char('a')]);
        // Buffer keeps the label case.
        assert_eq!(kb.buffer().renderable_text(), "A");

        assert_eq!(kb.feed(pinch(60, 360), at(t0, 0.5), &mut inj).unwrap(), None);
        assert_eq!(kb.buffer().renderable_text(), "A");

        // SPACE spans (50,415)-(290,475).
        let sp = kb.feed(pinch(100, 430), at(t0, 0.6), &mut inj).unwrap().unwrap();
        assert_eq!(sp.label, "SPACE");
        assert_eq!(kb.buffer().renderable_text(), "A ");
        assert_eq!(inj.0, [KeyStroke::Char('a'), KeyStroke::Space]);
    }

    #[test]
    fn exit_leaves_buffer() {
        let mut kb = scenario_keyboard();
        let mut inj = Recorder::default();
        let t0 = Instant::now();
        kb.feed(pinch(60, 360), t0, &mut inj).unwrap();
        let exit = kb.layout().rect(kb.layout().find("EXIT").unwrap()).center();
        let act = kb.feed(pinch(exit.0, exit.1), t0, &mut inj).unwrap().unwrap();
        assert!(act.outcome.is_exit());
        assert_eq!(kb.buffer().renderable_text(), "A");
        assert_eq!(inj.0.len(), 1);
    }

    #[test]
    fn missing_hand_keeps_latch() {
        let mut kb = scenario_keyboard();
        let mut inj = Recorder::default();
        let t0 = Instant::now();
        kb.feed(pinch(60, 360), t0, &mut inj).unwrap();
        kb.feed(None, at(t0, 0.1), &mut inj).unwrap();
        assert_eq!(kb.latched_key(), kb.layout().find("A"));
        // Still within the delay on return: no repeat.
        assert_eq!(kb.feed(pinch(60, 360), at(t0, 0.2), &mut inj).unwrap(), None);
    }

    #[test]
    fn open_finger_or_empty_space_unlatches() {
        let mut kb = scenario_keyboard();
        let mut inj = Recorder::default();
        let t0 = Instant::now();
        kb.feed(pinch(60, 360), t0, &mut inj).unwrap();
        kb.feed(Some(HandSample { fingertip: (60, 360), pinched: false }), t0, &mut inj).unwrap();
        assert_eq!(kb.latched_key(), None);
        kb.feed(pinch(60, 360), t0, &mut inj).unwrap();
        kb.feed(pinch(1000, 100), t0, &mut inj).unwrap();
        assert_eq!(kb.latched_key(), None);
        assert_eq!(inj.0.len(), 2);
    }
}
