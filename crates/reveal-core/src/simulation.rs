//! Deterministic virtual-clock runs of the whole experience.
//!
//! No wall-clock sleeps: the harness advances a millisecond counter in fixed
//! quanta and feeds it to [`Experience::tick_at`], so a full twenty-minute
//! run completes in microseconds and produces the same event stream every
//! time. The CLI `simulate` command and the end-to-end tests both sit on
//! top of this.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::audio::{AlwaysUnlocked, GestureTarget, MobileUnlock, ScriptedBackend, TrackId};
use crate::config::RevealConfig;
use crate::events::Event;
use crate::experience::{Experience, ExperienceDeps};
use crate::haptics::HapticSink;
use crate::phase::Phase;
use crate::share::ClipboardOnlyTarget;

/// Knobs for a simulated run.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Virtual tick quantum in milliseconds.
    pub tick_ms: u64,
    /// Run as a mobile session: armed unlock strategy, haptics delivered.
    pub mobile: bool,
    /// Script this many policy rejections on the celebration track to
    /// exercise the retry-then-fallback path.
    pub reject_celebration: u32,
    /// Press the manual-play control as soon as it appears.
    pub press_fallback: bool,
    /// Extra virtual time to run after the last timeline deadline, so
    /// fades and retries settle.
    pub settle_ms: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            mobile: false,
            reject_celebration: 0,
            press_fallback: false,
            settle_ms: 5_000,
        }
    }
}

/// Everything observable from a finished run.
#[derive(Debug)]
pub struct SimulationRun {
    pub events: Vec<Event>,
    pub final_phase: Phase,
    pub duration_ms: u64,
    pub haptic_pulses: Vec<Vec<u64>>,
    pub celebration_playing: bool,
    pub fallback_shown: bool,
}

impl SimulationRun {
    pub fn event_kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind()).collect()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Haptic sink whose recording outlives the experience that owns it.
#[derive(Debug, Clone, Default)]
struct SharedHaptics(Arc<Mutex<Vec<Vec<u64>>>>);

impl HapticSink for SharedHaptics {
    fn vibrate(&mut self, pattern: &[u64]) {
        self.0.lock().unwrap().push(pattern.to_vec());
    }
}

/// Run the full experience on a virtual clock and return the trace.
pub fn simulate(config: RevealConfig, opts: SimulationOptions) -> SimulationRun {
    let mut backend = ScriptedBackend::new();
    if opts.reject_celebration > 0 {
        backend.reject_next_plays(TrackId::Celebration, opts.reject_celebration);
    }
    let haptics = SharedHaptics::default();
    let haptic_log = Arc::clone(&haptics.0);

    let mut exp = Experience::new(
        config.clone(),
        ExperienceDeps {
            backend: Box::new(backend),
            unlock: if opts.mobile {
                Box::new(MobileUnlock::new())
            } else {
                Box::new(AlwaysUnlocked)
            },
            haptics: Box::new(haptics),
            share: Box::new(ClipboardOnlyTarget::new()),
            is_mobile: opts.mobile,
        },
    );

    let horizon = config.timing.total_until_celebration_ms()
        + config.timing.celebration_settle_ms
        + opts.settle_ms;

    if opts.mobile {
        // A run always begins with a tap somewhere on the landing screen.
        exp.gesture(GestureTarget::Elsewhere, 0);
    }
    exp.start(0);

    let mut events = Vec::new();
    let mut fallback_shown = false;
    let mut now = 0u64;
    while now < horizon {
        now += opts.tick_ms;
        exp.tick_at(now);
        if exp.fallback_control().is_some() {
            fallback_shown = true;
            if opts.press_fallback {
                exp.manual_play(now);
            }
        }
        events.extend(exp.drain_events());
    }

    let final_phase = exp.phase();
    info!(%final_phase, events = events.len(), "simulation finished");

    let haptic_pulses = haptic_log.lock().unwrap().clone();
    SimulationRun {
        events,
        final_phase,
        duration_ms: now,
        haptic_pulses,
        celebration_playing: exp.is_track_playing(TrackId::Celebration),
        fallback_shown,
    }
}
