//! Mobile autoplay unlock.
//!
//! Gesture-gated platforms only grant unmuted autoplay after a real user
//! gesture has successfully started some media. The heuristics live behind
//! a strategy trait so the phase/timing logic can run with a trivial
//! always-unlocked implementation outside a browser.

use serde::{Deserialize, Serialize};

/// What the first qualifying gesture may land on. Only interactive controls
/// qualify; a tap on empty screen does not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTarget {
    StartButton,
    MusicToggle,
    VolumeSlider,
    ShareButton,
    ReplayButton,
    /// The manual "tap to play" control shown after autoplay failed twice.
    FallbackPlay,
    Elsewhere,
}

impl GestureTarget {
    pub fn is_interactive(self) -> bool {
        !matches!(self, GestureTarget::Elsewhere)
    }
}

/// Viewport width at or below which a device counts as mobile.
const MOBILE_VIEWPORT_MAX: u32 = 768;

const MOBILE_AGENT_MARKERS: [&str; 8] = [
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Pure device-class predicate over user agent and viewport width. The
/// result is cached in the session and chooses the stricter unlock path.
pub fn detect_mobile(user_agent: &str, viewport_width: u32) -> bool {
    MOBILE_AGENT_MARKERS.iter().any(|m| user_agent.contains(m))
        || viewport_width <= MOBILE_VIEWPORT_MAX
}

/// Decides which gestures should trigger the one-shot unlock probe.
/// The coordinator performs the probe itself; the strategy only arms and
/// disarms.
pub trait AudioUnlockStrategy {
    /// Whether the strategy still wants gestures. One-shot: disarmed after
    /// a successful probe.
    fn armed(&self) -> bool;

    /// Whether this gesture qualifies for an unlock attempt.
    fn qualifies(&self, target: GestureTarget) -> bool;

    /// Remove the listeners; must not re-trigger afterwards.
    fn disarm(&mut self);

    /// Re-arm for a fresh session (restart).
    fn rearm(&mut self);
}

/// The mobile strategy: armed until the first qualifying interaction
/// unlocks playback.
#[derive(Debug)]
pub struct MobileUnlock {
    armed: bool,
}

impl MobileUnlock {
    pub fn new() -> Self {
        Self { armed: true }
    }
}

impl Default for MobileUnlock {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioUnlockStrategy for MobileUnlock {
    fn armed(&self) -> bool {
        self.armed
    }

    fn qualifies(&self, target: GestureTarget) -> bool {
        target.is_interactive()
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn rearm(&mut self) {
        self.armed = true;
    }
}

/// Trivial strategy for environments without autoplay restrictions
/// (desktop browsers, tests, the CLI). Never arms; audio starts unlocked.
#[derive(Debug, Default)]
pub struct AlwaysUnlocked;

impl AudioUnlockStrategy for AlwaysUnlocked {
    fn armed(&self) -> bool {
        false
    }

    fn qualifies(&self, _target: GestureTarget) -> bool {
        false
    }

    fn disarm(&mut self) {}

    fn rearm(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_markers_detect_mobile() {
        assert!(detect_mobile(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            1920
        ));
        assert!(detect_mobile("Mozilla/5.0 (Linux; Android 14)", 1920));
        assert!(!detect_mobile(
            "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0",
            1920
        ));
    }

    #[test]
    fn narrow_viewport_counts_as_mobile() {
        assert!(detect_mobile("Mozilla/5.0 (X11; Linux x86_64)", 768));
        assert!(!detect_mobile("Mozilla/5.0 (X11; Linux x86_64)", 769));
    }

    #[test]
    fn mobile_strategy_only_takes_interactive_targets() {
        let strategy = MobileUnlock::new();
        assert!(strategy.qualifies(GestureTarget::StartButton));
        assert!(strategy.qualifies(GestureTarget::MusicToggle));
        assert!(!strategy.qualifies(GestureTarget::Elsewhere));
    }

    #[test]
    fn disarm_is_sticky_until_rearm() {
        let mut strategy = MobileUnlock::new();
        assert!(strategy.armed());
        strategy.disarm();
        assert!(!strategy.armed());
        strategy.rearm();
        assert!(strategy.armed());
    }
}
