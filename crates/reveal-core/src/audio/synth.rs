//! Synthetic tone engine.
//!
//! Models the shared audio-processing context: a lifecycle that mobile
//! platforms can silently drop back to Suspended, a set of active tone
//! handles that can be force-stopped, and the repeating heartbeat loop.
//! Waveform math is a black box; the engine only describes tones
//! (frequency, duration, waveform, peak gain) for whatever renders them.

use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AudioError;

/// Context lifecycle. New contexts start Suspended on gesture-gated
/// platforms and need a resume before any scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextState {
    Uninitialized,
    Suspended,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One scheduled tone burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub waveform: Waveform,
    pub peak_gain: f32,
}

#[derive(Debug, Clone)]
struct ActiveTone {
    tone: Tone,
    ends_at_ms: u64,
}

/// Heartbeat period, roughly a resting pulse.
pub const HEARTBEAT_PERIOD_MS: u64 = 1200;

#[derive(Debug)]
pub struct ToneEngine {
    state: ContextState,
    active: Vec<ActiveTone>,
    heartbeat_active: bool,
    next_beat_at_ms: Option<u64>,
    /// Simulates platforms that refuse to resume without a fresh gesture.
    resume_blocked: bool,
    rng: Pcg64,
    /// Tones scheduled over the engine's lifetime, for observability.
    scheduled_count: u64,
}

impl ToneEngine {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Seeded constructor for reproducible sparkle jitter.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: ContextState::Uninitialized,
            active: Vec::new(),
            heartbeat_active: false,
            next_beat_at_ms: None,
            resume_blocked: false,
            rng: Pcg64::new(seed as u128, 0xa02b_dbf7_bb3c_0a7a_c28f_a16a_63f2_07e5),
            scheduled_count: 0,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Create the context. New contexts come up Suspended until resumed.
    pub fn initialize(&mut self) {
        if self.state == ContextState::Uninitialized {
            self.state = ContextState::Suspended;
            debug!("tone context initialized (suspended)");
        }
    }

    pub fn resume(&mut self) -> Result<(), AudioError> {
        match self.state {
            ContextState::Uninitialized => Err(AudioError::ContextUninitialized),
            ContextState::Running => Ok(()),
            ContextState::Suspended => {
                if self.resume_blocked {
                    warn!("tone context resume refused");
                    Err(AudioError::ContextSuspended)
                } else {
                    self.state = ContextState::Running;
                    debug!("tone context resumed");
                    Ok(())
                }
            }
        }
    }

    /// Drop back to Suspended, as mobile platforms do after backgrounding.
    pub fn suspend(&mut self) {
        if self.state == ContextState::Running {
            self.state = ContextState::Suspended;
        }
    }

    /// Refuse resume attempts until re-enabled. Simulation/test seam.
    pub fn block_resume(&mut self, blocked: bool) {
        self.resume_blocked = blocked;
    }

    /// Initialize if needed, then resume if suspended.
    pub fn ensure_running(&mut self) -> Result<(), AudioError> {
        self.initialize();
        self.resume()
    }

    // ── Cues ─────────────────────────────────────────────────────────

    /// One heartbeat: the low "lub" followed 150ms later by a softer "dub".
    pub fn heartbeat(&mut self, now_ms: u64) -> Result<(), AudioError> {
        self.ensure_running()?;
        self.schedule(
            now_ms,
            Tone {
                frequency_hz: 80.0,
                duration_ms: 100,
                waveform: Waveform::Sawtooth,
                peak_gain: 0.2,
            },
        );
        self.schedule(
            now_ms + 150,
            Tone {
                frequency_hz: 60.0,
                duration_ms: 80,
                waveform: Waveform::Sawtooth,
                peak_gain: 0.2,
            },
        );
        Ok(())
    }

    /// Five low, descending-envelope suspense tones half a second apart.
    pub fn suspense_cue(&mut self, now_ms: u64) -> Result<(), AudioError> {
        self.ensure_running()?;
        for i in 0..5u64 {
            self.schedule(
                now_ms + i * 500,
                Tone {
                    frequency_hz: 40.0 + (i as f32) * 5.0,
                    duration_ms: 800,
                    waveform: Waveform::Triangle,
                    peak_gain: 0.15,
                },
            );
        }
        Ok(())
    }

    /// A bright C-E-G-C chord followed by ten random sparkles.
    pub fn celebration_cue(&mut self, now_ms: u64) -> Result<(), AudioError> {
        self.ensure_running()?;
        for (i, freq) in [261.63f32, 329.63, 392.0, 523.25].iter().enumerate() {
            self.schedule(
                now_ms + (i as u64) * 100,
                Tone {
                    frequency_hz: *freq,
                    duration_ms: 500,
                    waveform: Waveform::Sine,
                    peak_gain: 0.2,
                },
            );
        }
        for i in 0..10u64 {
            let jitter: f32 = self.rng.gen_range(0.0..400.0);
            self.schedule(
                now_ms + 1000 + i * 100,
                Tone {
                    frequency_hz: 800.0 + jitter,
                    duration_ms: 100,
                    waveform: Waveform::Sine,
                    peak_gain: 0.08,
                },
            );
        }
        Ok(())
    }

    // ── Heartbeat loop ───────────────────────────────────────────────

    /// Begin the repeating heartbeat. The first beat fires immediately.
    pub fn start_heartbeat(&mut self, now_ms: u64) -> Result<(), AudioError> {
        self.ensure_running()?;
        if self.heartbeat_active {
            return Ok(());
        }
        self.heartbeat_active = true;
        self.next_beat_at_ms = Some(now_ms);
        Ok(())
    }

    pub fn stop_heartbeat(&mut self) {
        self.heartbeat_active = false;
        self.next_beat_at_ms = None;
    }

    pub fn is_heartbeat_active(&self) -> bool {
        self.heartbeat_active
    }

    // ── Bookkeeping ──────────────────────────────────────────────────

    /// Advance the engine: fire due heartbeats and drop finished handles.
    pub fn tick(&mut self, now_ms: u64) {
        if self.heartbeat_active {
            while let Some(beat_at) = self.next_beat_at_ms {
                if beat_at > now_ms {
                    break;
                }
                if self.heartbeat(beat_at).is_err() {
                    // Context fell back to suspended; the loop stays armed
                    // and the coordinator drives the resume retry.
                    break;
                }
                self.next_beat_at_ms = Some(beat_at + HEARTBEAT_PERIOD_MS);
            }
        }
        self.active.retain(|t| t.ends_at_ms > now_ms);
    }

    /// Immediately halt every active tone handle, whatever the loop state.
    pub fn force_stop_all(&mut self) {
        self.active.clear();
    }

    /// Heartbeat loop off plus every handle halted.
    pub fn stop_all(&mut self) {
        self.stop_heartbeat();
        self.force_stop_all();
    }

    /// Number of currently sounding tone handles.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn scheduled_count(&self) -> u64 {
        self.scheduled_count
    }

    fn schedule(&mut self, starts_at_ms: u64, tone: Tone) {
        let ends_at_ms = starts_at_ms + tone.duration_ms;
        self.active.push(ActiveTone { tone, ends_at_ms });
        self.scheduled_count += 1;
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_engine() -> ToneEngine {
        let mut e = ToneEngine::new();
        e.ensure_running().unwrap();
        e
    }

    #[test]
    fn context_starts_uninitialized() {
        let mut e = ToneEngine::new();
        assert_eq!(e.state(), ContextState::Uninitialized);
        assert_eq!(e.resume(), Err(AudioError::ContextUninitialized));
        e.initialize();
        assert_eq!(e.state(), ContextState::Suspended);
        e.resume().unwrap();
        assert_eq!(e.state(), ContextState::Running);
    }

    #[test]
    fn blocked_resume_fails_until_unblocked() {
        let mut e = ToneEngine::new();
        e.initialize();
        e.block_resume(true);
        assert_eq!(e.resume(), Err(AudioError::ContextSuspended));
        e.block_resume(false);
        assert!(e.resume().is_ok());
    }

    #[test]
    fn heartbeat_loop_beats_on_period() {
        let mut e = running_engine();
        e.start_heartbeat(0).unwrap();
        e.tick(0);
        let after_first = e.scheduled_count();
        assert_eq!(after_first, 2); // lub + dub
        e.tick(HEARTBEAT_PERIOD_MS);
        assert_eq!(e.scheduled_count(), 4);
    }

    #[test]
    fn finished_tones_are_pruned() {
        let mut e = running_engine();
        e.heartbeat(0).unwrap();
        assert_eq!(e.active_count(), 2);
        e.tick(1000);
        assert_eq!(e.active_count(), 0);
    }

    #[test]
    fn force_stop_halts_everything_at_once() {
        let mut e = running_engine();
        e.celebration_cue(0).unwrap();
        assert!(e.active_count() > 0);
        e.force_stop_all();
        assert_eq!(e.active_count(), 0);
    }

    #[test]
    fn celebration_sparkles_stay_in_band() {
        let mut e = running_engine();
        e.celebration_cue(0).unwrap();
        // 4 chord notes + 10 sparkles.
        assert_eq!(e.scheduled_count(), 14);
        for t in &e.active {
            assert!(t.tone.frequency_hz >= 40.0 && t.tone.frequency_hz < 1200.0);
        }
    }

    #[test]
    fn suspended_context_skips_cues() {
        let mut e = ToneEngine::new();
        e.initialize();
        e.block_resume(true);
        assert!(e.suspense_cue(0).is_err());
        assert_eq!(e.active_count(), 0);
    }
}
