//! Pinch-click debouncing.
//!
//! [`ClickState`] is a two-state machine fed once per frame with the key under
//! the fingertip, whether the finger is pinched, and the frame time:
//!
//! ```text
//!            pinched over K
//!   ┌──────┐ ────────────────▶ ┌─────────────┐
//!   │ Idle │                   │ Latched(K)  │──┐ pinched over K, within delay:
//!   └──────┘ ◀──────────────── └─────────────┘◀─┘ no activation
//!        no key / not pinched        │  ▲
//!                                    └──┘ pinched over K' ≠ K, or delay elapsed:
//!                                         activate
//! ```
//!
//! Every transition into `Latched` (including re-latching) fires exactly one
//! activation.

use std::time::{Duration, Instant};

use crate::layout::KeyId;

/// Minimum time between two activations of the same key while continuously
/// pinched over it.
pub const DEFAULT_CLICK_DELAY: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickState {
    #[default]
    Idle,
    Latched {
        key: KeyId,
        /// Time of the activation that latched `key`.
        at:  Instant,
    },
}

/// Outcome of feeding one frame into a [`ClickState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub state:     ClickState,
    /// Set when this frame produced a fresh activation.
    pub activated: Option<KeyId>,
}

impl ClickState {
    pub fn active_key(&self) -> Option<KeyId> {
        match self {
            ClickState::Idle              => None,
            ClickState::Latched { key, .. } => Some(*key),
        }
    }

    pub fn is_latched(&self) -> bool { self.active_key().is_some() }

    /// Advance by one frame.
    ///
    /// The state is `Idle` afterwards unless the finger is pinched over a key.
    /// Elapsed time must be *strictly* greater than `delay` for the same key
    /// to fire again.
    pub fn step(self, hit: Option<KeyId>, pinched: bool, now: Instant, delay: Duration) -> Step {
        let key = match (hit, pinched) {
            (Some(k), true) => k,
            _ => return Step { state: ClickState::Idle, activated: None },
        };

        let fire = match self {
            ClickState::Idle => true,
            ClickState::Latched { key: active, at } => {
                active != key || now.saturating_duration_since(at) > delay
            }
        };

        if fire {
            Step { state: ClickState::Latched { key, at: now }, activated: Some(key) }
        } else {
            Step { state: self, activated: None }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
