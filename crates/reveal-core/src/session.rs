//! Per-session flags.
//!
//! One session lives from page load to reload; nothing persists across it.

use serde::{Deserialize, Serialize};

/// Transient record of one experience session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceSession {
    /// Engine clock at the Start gesture, once it happened.
    pub started_at_ms: Option<u64>,
    /// Flips false -> true exactly once; a second Start gesture is a no-op.
    pub has_started: bool,
    pub is_mobile: bool,
    /// Whether a no-gesture play has succeeded at least once this session.
    pub audio_unlocked: bool,
    /// Whether the gesture-synchronous pre-authorization ran.
    pub pre_authorized: bool,
}

impl ExperienceSession {
    pub fn new(is_mobile: bool) -> Self {
        Self {
            is_mobile,
            ..Self::default()
        }
    }

    /// Mark the session started. Returns false when it already was, so the
    /// caller can ignore the duplicate gesture.
    pub fn begin(&mut self, now_ms: u64) -> bool {
        if self.has_started {
            return false;
        }
        self.has_started = true;
        self.started_at_ms = Some(now_ms);
        true
    }

    /// Reset every flag ahead of a full restart.
    pub fn reset(&mut self) {
        let is_mobile = self.is_mobile;
        *self = Self::new(is_mobile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_one_shot() {
        let mut s = ExperienceSession::new(false);
        assert!(s.begin(100));
        assert!(!s.begin(200));
        assert_eq!(s.started_at_ms, Some(100));
    }

    #[test]
    fn reset_keeps_device_class() {
        let mut s = ExperienceSession::new(true);
        s.begin(1);
        s.audio_unlocked = true;
        s.reset();
        assert!(s.is_mobile);
        assert!(!s.has_started);
        assert!(!s.audio_unlocked);
    }
}
