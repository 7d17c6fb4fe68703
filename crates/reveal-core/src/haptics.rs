//! Haptic feedback.
//!
//! Vibration patterns are fire-and-forget on/off millisecond lists. They are
//! only issued on detected mobile devices; a missing capability is silently
//! ignored, never an error.

/// The fixed vibration vocabulary of the experience.
pub mod patterns {
    /// One short pulse per countdown second.
    pub const TICK: &[u64] = &[50];
    /// Start gesture / duel loading.
    pub const START: &[u64] = &[100, 50, 100];
    /// Buildup sub-countdown and first duel advantage.
    pub const INTENSE: &[u64] = &[200, 100, 200];
    /// Dramatic duel reversal.
    pub const REVERSAL: &[u64] = &[100, 50, 100, 50, 300, 150, 300];
    /// Winner locked in.
    pub const VICTORY: &[u64] = &[300, 100, 300, 100, 500, 200, 500];
    /// Mid lock-in announcement beat.
    pub const ANNOUNCEMENT: &[u64] = &[500, 200, 500, 200, 800];
    /// Reveal celebration burst.
    pub const CELEBRATION: &[u64] = &[200, 100, 200, 100, 400];
    /// Share button acknowledgement.
    pub const SHARE: &[u64] = &[100, 100, 100];
    /// Music toggle acknowledgement.
    pub const TOGGLE: &[u64] = &[100];
    /// Restart confirmation, felt just before the reload.
    pub const RESTART: &[u64] = &[100, 50, 100, 50, 200];
}

/// Where vibration requests go. Real hardware access is a platform concern;
/// this crate only ever talks to the seam.
pub trait HapticSink {
    fn vibrate(&mut self, pattern: &[u64]);
}

/// Discards every request (desktop, or no vibration capability).
#[derive(Debug, Default)]
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn vibrate(&mut self, _pattern: &[u64]) {}
}

/// Records every request; used by the simulation harness and tests.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    pub pulses: Vec<Vec<u64>>,
}

impl HapticSink for RecordingHaptics {
    fn vibrate(&mut self, pattern: &[u64]) {
        self.pulses.push(pattern.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingHaptics::default();
        sink.vibrate(patterns::TICK);
        sink.vibrate(patterns::VICTORY);
        assert_eq!(sink.pulses.len(), 2);
        assert_eq!(sink.pulses[0], vec![50]);
    }
}
