//! OS key-injection backends for [`air_keys::KeyInjector`].
//!
//! Real injection needs the `inject` feature (enigo).  Without it, or when the
//! platform refuses to give us an input handle, keystrokes are only logged.

use air_keys::{InjectError, KeyInjector, KeyStroke};

/// Logs every keystroke instead of sending it to the OS.
#[derive(Default)]
pub struct LogInjector {
    pressed: usize,
}

impl LogInjector {
    pub fn pressed(&self) -> usize { self.pressed }
}

impl KeyInjector for LogInjector {
    fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError> {
        self.pressed += 1;
        log::info!("[inject] {}", stroke);
        Ok(())
    }
}

// ── enigo backend ─────────────────────────────────────────────────────────

#[cfg(feature = "inject")]
pub struct EnigoInjector {
    enigo: enigo::Enigo,
}

#[cfg(feature = "inject")]
impl EnigoInjector {
    pub fn new() -> Result<Self, InjectError> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| InjectError::Unavailable(e.to_string()))?;
        Ok(EnigoInjector { enigo })
    }
}

#[cfg(feature = "inject")]
impl KeyInjector for EnigoInjector {
    fn press(&mut self, stroke: KeyStroke) -> Result<(), InjectError> {
        use enigo::{Direction, Key, Keyboard as _};

        let key = match stroke {
            KeyStroke::Space     => Key::Space,
            KeyStroke::Enter     => Key::Return,
            KeyStroke::Backspace => Key::Backspace,
            KeyStroke::Char(c)   => Key::Unicode(c),
        };
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| InjectError::Failed { key: stroke.to_string(), reason: e.to_string() })
    }
}

/// Best available injector: enigo when compiled in and usable, otherwise a
/// [`LogInjector`] with a warning.
pub fn open_injector() -> Box<dyn KeyInjector> {
    #[cfg(feature = "inject")]
    {
        match EnigoInjector::new() {
            Ok(inj) => {
                log::info!("key injection via enigo");
                return Box::new(inj);
            }
            Err(e) => log::warn!("{}; keystrokes will only be logged", e),
        }
    }
    #[cfg(not(feature = "inject"))]
    log::warn!("built without `inject`; keystrokes will only be logged");

    Box::new(LogInjector::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_injector_counts() {
        let mut inj = LogInjector::default();
        inj.press(KeyStroke::Char('a')).unwrap();
        inj.press(KeyStroke::Backspace).unwrap();
        assert_eq!(inj.pressed(), 2);
    }

    #[cfg(not(feature = "inject"))]
    #[test]
    fn fallback_injector_accepts_strokes() {
        let mut inj = open_injector();
        assert!(inj.press(KeyStroke::Enter).is_ok());
    }
}
