//! Audio coordinator implementation.
//!
//! All sound goes through here: the two pre-loaded music tracks and the
//! synthetic tone engine. The coordinator is the single writer of playback
//! state; the phase controller only sends [`AudioIntent`]s. Phase timers
//! never wait on anything in this module -- every failure here degrades to
//! silence plus, at worst, a visible manual-play control.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::backend::{MediaBackend, PlayRejection};
use super::synth::ToneEngine;
use super::track::{AudioTrack, TrackId};
use super::unlock::{AudioUnlockStrategy, GestureTarget};
use crate::config::{AudioConfig, SoundConfig};
use crate::events::Event;

/// Command interface between the phase controller and the coordinator.
/// Keeping playback mechanics behind messages is what makes the
/// single-writer invariant hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioIntent {
    StartTrack(TrackId),
    StopTrack(TrackId),
    StopAllExcept(Option<TrackId>),
    StartHeartbeat,
    StopHeartbeat,
    SuspenseCue,
    CelebrationCue,
    ForceStopAll,
}

/// Volume fade-in toward a target, stepped from `tick_at`.
#[derive(Debug, Clone)]
struct FadeRamp {
    track: TrackId,
    target: f32,
    next_step_at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
enum PendingState {
    /// Waiting for the media element to buffer, bounded by the ready
    /// timeout.
    WaitingReady { since_ms: u64 },
    /// One automatic retry scheduled after a policy rejection.
    RetryAt { at_ms: u64 },
}

#[derive(Debug, Clone, Copy)]
struct PendingPlay {
    track: TrackId,
    attempts: u32,
    state: PendingState,
}

/// Delay before retrying a heartbeat start on a suspended context.
const HEARTBEAT_RESUME_RETRY_MS: u64 = 1000;

/// Mediates all sound subject to autoplay policy, and guarantees
/// phase-appropriate exclusivity at the checkpoints the controller sets.
pub struct AudioCoordinator {
    backend: Box<dyn MediaBackend>,
    unlock: Box<dyn AudioUnlockStrategy>,
    climax: AudioTrack,
    celebration: AudioTrack,
    engine: ToneEngine,
    cfg: AudioConfig,
    sounds: SoundConfig,
    is_mobile: bool,
    audio_unlocked: bool,
    pre_authorized: bool,
    ramps: Vec<FadeRamp>,
    pending: Vec<PendingPlay>,
    /// Track whose manual "tap to play" control is currently visible.
    fallback: Option<TrackId>,
    heartbeat_wanted: bool,
    heartbeat_retry_at_ms: Option<u64>,
    events: Vec<Event>,
}

impl AudioCoordinator {
    pub fn new(
        cfg: AudioConfig,
        sounds: SoundConfig,
        is_mobile: bool,
        mut backend: Box<dyn MediaBackend>,
        unlock: Box<dyn AudioUnlockStrategy>,
    ) -> Self {
        let climax = AudioTrack::new(TrackId::Climax, cfg.climax_source.clone());
        let celebration = AudioTrack::new(TrackId::Celebration, cfg.celebration_source.clone());
        backend.load(TrackId::Climax, &climax.source);
        backend.load(TrackId::Celebration, &celebration.source);
        let audio_unlocked = !unlock.armed();
        Self {
            backend,
            unlock,
            climax,
            celebration,
            engine: ToneEngine::new(),
            cfg,
            sounds,
            is_mobile,
            audio_unlocked,
            pre_authorized: false,
            ramps: Vec::new(),
            pending: Vec::new(),
            fallback: None,
            heartbeat_wanted: false,
            heartbeat_retry_at_ms: None,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn track(&self, id: TrackId) -> &AudioTrack {
        match id {
            TrackId::Climax => &self.climax,
            TrackId::Celebration => &self.celebration,
        }
    }

    pub fn is_playing(&self, id: TrackId) -> bool {
        self.track(id).playing
    }

    pub fn audio_unlocked(&self) -> bool {
        self.audio_unlocked
    }

    pub fn pre_authorized(&self) -> bool {
        self.pre_authorized
    }

    pub fn heartbeat_active(&self) -> bool {
        self.engine.is_heartbeat_active()
    }

    /// Track whose manual-play fallback control is visible, if any.
    pub fn fallback_control(&self) -> Option<TrackId> {
        self.fallback
    }

    /// Whether any sound source other than `except` is audibly active.
    /// The controller checks this at phase-entry checkpoints only.
    pub fn anything_audible_except(&self, except: Option<TrackId>) -> bool {
        let track_audible = TrackId::ALL
            .iter()
            .any(|&id| Some(id) != except && self.track(id).playing);
        track_audible || self.engine.is_heartbeat_active() || self.engine.active_count() > 0
    }

    pub fn engine(&self) -> &ToneEngine {
        &self.engine
    }

    /// Simulation/test seam into the tone context.
    pub fn engine_mut(&mut self) -> &mut ToneEngine {
        &mut self.engine
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn handle(&mut self, intent: AudioIntent, now_ms: u64) {
        debug!(?intent, "audio intent");
        match intent {
            AudioIntent::StartTrack(id) => self.play_track(id, now_ms, false),
            AudioIntent::StopTrack(id) => self.stop_track(id),
            AudioIntent::StopAllExcept(except) => self.stop_all_except(except),
            AudioIntent::StartHeartbeat => self.start_heartbeat(now_ms),
            AudioIntent::StopHeartbeat => self.stop_heartbeat(),
            AudioIntent::SuspenseCue => self.suspense_cue(now_ms),
            AudioIntent::CelebrationCue => self.celebration_cue(now_ms),
            AudioIntent::ForceStopAll => self.engine.force_stop_all(),
        }
    }

    // ── Unlock / pre-authorization ───────────────────────────────────

    /// Feed a user gesture to the one-shot unlock strategy. On the first
    /// qualifying interaction a muted play->pause round-trip runs on each
    /// track and the synthetic context is resumed.
    pub fn handle_gesture(&mut self, target: GestureTarget, _now_ms: u64) {
        if !self.unlock.armed() || !self.unlock.qualifies(target) {
            return;
        }
        info!(?target, "attempting mobile audio unlock");

        if let Err(e) = self.engine.ensure_running() {
            warn!(error = %e, "tone context did not resume during unlock");
        }

        let mut any_success = false;
        for id in TrackId::ALL {
            self.backend.set_muted(id, true);
            self.backend.set_volume(id, 0.0);
            match self.backend.play(id, true) {
                Ok(()) => {
                    self.backend.pause(id);
                    self.backend.rewind(id);
                    self.backend.set_muted(id, false);
                    self.track_mut(id).unlocked = true;
                    any_success = true;
                }
                Err(e) => {
                    self.backend.set_muted(id, false);
                    debug!(track = %id, ?e, "unlock probe failed");
                }
            }
        }

        if any_success {
            self.audio_unlocked = true;
            self.unlock.disarm();
            self.events.push(Event::AudioUnlocked { at: Utc::now() });
        }
    }

    /// Gesture-synchronous preparation chained from the Start activation:
    /// initialize and resume the tone context, then silently probe both
    /// tracks. Idempotent; failures are logged and the session continues in
    /// a degraded mode where only button-triggered playback works.
    pub fn pre_authorize(&mut self, _now_ms: u64) {
        if self.pre_authorized {
            return;
        }
        self.pre_authorized = true;

        let context_ok = match self.engine.ensure_running() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "tone context unavailable during pre-authorization");
                false
            }
        };

        let mut probes_ok = 0u32;
        for id in TrackId::ALL {
            self.backend.set_volume(id, 0.0);
            match self.backend.play(id, true) {
                Ok(()) => {
                    self.backend.pause(id);
                    self.backend.rewind(id);
                    self.track_mut(id).unlocked = true;
                    probes_ok += 1;
                }
                Err(e) => debug!(track = %id, ?e, "silent probe failed"),
            }
        }
        if probes_ok > 0 {
            self.audio_unlocked = true;
            self.unlock.disarm();
        }

        let degraded = !context_ok || probes_ok == 0;
        if degraded {
            warn!("audio pre-authorization degraded; manual playback only");
        }
        self.events.push(Event::PreAuthorized {
            degraded,
            at: Utc::now(),
        });
    }

    // ── Track playback ───────────────────────────────────────────────

    /// Stop, rewind, and start `id` from silence, fading in toward its
    /// configured target volume. Automated attempts get one retry after a
    /// policy rejection before the manual fallback control appears.
    pub fn play_track(&mut self, id: TrackId, now_ms: u64, gesture: bool) {
        self.clear_pending(id);
        self.backend.pause(id);
        self.backend.rewind(id);
        self.backend.set_volume(id, 0.0);
        {
            let track = self.track_mut(id);
            track.playing = false;
            track.volume = 0.0;
        }

        if !self.backend.is_ready(id) {
            debug!(track = %id, "waiting for media readiness");
            self.pending.push(PendingPlay {
                track: id,
                attempts: 0,
                state: PendingState::WaitingReady { since_ms: now_ms },
            });
            return;
        }

        self.attempt_play(id, now_ms, 0, gesture);
    }

    /// Activation of the visible manual-play control. Runs in a gesture
    /// context, which platforms always permit.
    pub fn manual_play(&mut self, id: TrackId, now_ms: u64) {
        self.fallback = None;
        self.play_track(id, now_ms, true);
    }

    /// Pause + rewind. Safe on an already-stopped track.
    pub fn stop_track(&mut self, id: TrackId) {
        self.clear_pending(id);
        self.backend.pause(id);
        self.backend.rewind(id);
        let was_playing = self.track(id).playing;
        self.track_mut(id).playing = false;
        if was_playing {
            self.events.push(Event::TrackStopped {
                track: id,
                at: Utc::now(),
            });
        }
    }

    /// Stop every managed track and the heartbeat loop except the one
    /// named. The exclusivity checkpoint at Celebration entry.
    pub fn stop_all_except(&mut self, except: Option<TrackId>) {
        for id in TrackId::ALL {
            if Some(id) != except {
                self.stop_track(id);
            }
        }
        self.stop_heartbeat();
    }

    // ── Synthetic cues ───────────────────────────────────────────────

    pub fn start_heartbeat(&mut self, now_ms: u64) {
        if !self.sounds.heartbeat {
            return;
        }
        self.heartbeat_wanted = true;
        match self.engine.start_heartbeat(now_ms) {
            Ok(()) => {
                self.heartbeat_retry_at_ms = None;
                self.events.push(Event::HeartbeatStarted { at: Utc::now() });
            }
            Err(e) => {
                // Mobile contexts fall back to suspended after
                // backgrounding; try once more after a resume delay.
                warn!(error = %e, "heartbeat start deferred, context not running");
                self.heartbeat_retry_at_ms = Some(now_ms + HEARTBEAT_RESUME_RETRY_MS);
            }
        }
    }

    pub fn stop_heartbeat(&mut self) {
        self.heartbeat_wanted = false;
        self.heartbeat_retry_at_ms = None;
        if self.engine.is_heartbeat_active() {
            self.engine.stop_heartbeat();
            self.events.push(Event::HeartbeatStopped { at: Utc::now() });
        }
    }

    pub fn suspense_cue(&mut self, now_ms: u64) {
        if !self.sounds.suspense {
            return;
        }
        if let Err(e) = self.engine.suspense_cue(now_ms) {
            warn!(error = %e, "suspense cue skipped");
            self.events.push(Event::CueSkipped {
                cue: "suspense".into(),
                at: Utc::now(),
            });
        }
    }

    pub fn celebration_cue(&mut self, now_ms: u64) {
        if !self.sounds.celebration {
            return;
        }
        if let Err(e) = self.engine.celebration_cue(now_ms) {
            warn!(error = %e, "celebration cue skipped");
            self.events.push(Event::CueSkipped {
                cue: "celebration".into(),
                at: Utc::now(),
            });
        }
    }

    // ── Celebration-screen controls ──────────────────────────────────

    /// Music toggle button. Pausing keeps the position; resuming is a
    /// gesture, so it plays unconditionally at the configured volume.
    pub fn toggle_music(&mut self, _now_ms: u64) -> bool {
        let id = TrackId::Celebration;
        let playing = if self.track(id).playing {
            self.backend.pause(id);
            self.track_mut(id).playing = false;
            false
        } else {
            match self.backend.play(id, true) {
                Ok(()) => {
                    let target = self.cfg.track_volume(id, self.is_mobile);
                    self.backend.set_volume(id, target);
                    let track = self.track_mut(id);
                    track.playing = true;
                    track.volume = target;
                    track.unlocked = true;
                    true
                }
                Err(e) => {
                    warn!(?e, "manual music toggle failed");
                    false
                }
            }
        };
        self.events.push(Event::MusicToggled {
            playing,
            at: Utc::now(),
        });
        playing
    }

    /// Volume slider, 0-100.
    pub fn set_volume_pct(&mut self, pct: u8) {
        let volume = f32::from(pct.min(100)) / 100.0;
        self.backend.set_volume(TrackId::Celebration, volume);
        self.track_mut(TrackId::Celebration).volume = volume;
        self.events.push(Event::VolumeChanged {
            volume,
            at: Utc::now(),
        });
    }

    // ── Progress ─────────────────────────────────────────────────────

    /// Advance fades, pending plays, the heartbeat loop, and handle
    /// housekeeping. Non-blocking; call on every engine tick.
    pub fn tick_at(&mut self, now_ms: u64) {
        self.engine.tick(now_ms);

        if let Some(retry_at) = self.heartbeat_retry_at_ms {
            if now_ms >= retry_at && self.heartbeat_wanted {
                self.heartbeat_retry_at_ms = None;
                match self.engine.start_heartbeat(now_ms) {
                    Ok(()) => self.events.push(Event::HeartbeatStarted { at: Utc::now() }),
                    Err(e) => {
                        warn!(error = %e, "heartbeat retry failed, giving up");
                        self.heartbeat_wanted = false;
                        self.events.push(Event::CueSkipped {
                            cue: "heartbeat".into(),
                            at: Utc::now(),
                        });
                    }
                }
            }
        }

        self.step_ramps(now_ms);
        self.step_pending(now_ms);
    }

    /// Reset ahead of a restart: silence everything and re-arm the unlock
    /// listeners.
    pub fn reset(&mut self) {
        self.stop_all_except(None);
        self.engine.stop_all();
        self.ramps.clear();
        self.pending.clear();
        self.fallback = None;
        self.pre_authorized = false;
        self.unlock.rearm();
        self.audio_unlocked = !self.unlock.armed();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn track_mut(&mut self, id: TrackId) -> &mut AudioTrack {
        match id {
            TrackId::Climax => &mut self.climax,
            TrackId::Celebration => &mut self.celebration,
        }
    }

    fn clear_pending(&mut self, id: TrackId) {
        self.pending.retain(|p| p.track != id);
        self.ramps.retain(|r| r.track != id);
    }

    fn attempt_play(&mut self, id: TrackId, now_ms: u64, attempts: u32, gesture: bool) {
        match self.backend.play(id, gesture) {
            Ok(()) => {
                let target = self.cfg.track_volume(id, self.is_mobile);
                let track = self.track_mut(id);
                track.playing = true;
                track.unlocked = true;
                info!(track = %id, target, "track playing, fading in");
                self.ramps.push(FadeRamp {
                    track: id,
                    target,
                    next_step_at_ms: now_ms + self.cfg.fade_step_ms,
                });
                self.events.push(Event::TrackStarted {
                    track: id,
                    target_volume: target,
                    at: Utc::now(),
                });
            }
            Err(PlayRejection::NotReady) => {
                self.pending.push(PendingPlay {
                    track: id,
                    attempts,
                    state: PendingState::WaitingReady { since_ms: now_ms },
                });
            }
            Err(PlayRejection::PolicyRejected) => {
                self.escalate_block(id, now_ms, attempts);
            }
        }
    }

    /// Automated playback gets two attempts; then control is handed to an
    /// explicit user action, which platforms always permit.
    fn escalate_block(&mut self, id: TrackId, now_ms: u64, attempts: u32) {
        let attempt = attempts + 1;
        self.events.push(Event::PlaybackBlocked {
            track: id,
            attempt,
            at: Utc::now(),
        });
        if attempt == 1 {
            debug!(track = %id, "playback blocked, retrying once");
            self.pending.push(PendingPlay {
                track: id,
                attempts: attempt,
                state: PendingState::RetryAt {
                    at_ms: now_ms + self.cfg.retry_delay_ms,
                },
            });
        } else {
            warn!(track = %id, "playback blocked twice, showing manual control");
            self.fallback = Some(id);
            self.events.push(Event::FallbackShown {
                track: id,
                at: Utc::now(),
            });
        }
    }

    fn step_ramps(&mut self, now_ms: u64) {
        let step = self.cfg.fade_step;
        let step_ms = self.cfg.fade_step_ms;
        let ramps = std::mem::take(&mut self.ramps);
        for mut ramp in ramps {
            let mut due = 0u32;
            while now_ms >= ramp.next_step_at_ms {
                ramp.next_step_at_ms += step_ms;
                due += 1;
            }
            if due == 0 {
                self.ramps.push(ramp);
                continue;
            }
            let volume = {
                let t = self.track_mut(ramp.track);
                t.volume = (t.volume + step * due as f32).min(ramp.target);
                t.volume
            };
            self.backend.set_volume(ramp.track, volume);
            if volume >= ramp.target {
                self.events.push(Event::TrackFadeCompleted {
                    track: ramp.track,
                    volume,
                    at: Utc::now(),
                });
            } else {
                self.ramps.push(ramp);
            }
        }
    }

    fn step_pending(&mut self, now_ms: u64) {
        let ready_timeout = self.cfg.ready_timeout_ms;
        let pending = std::mem::take(&mut self.pending);
        for p in pending {
            match p.state {
                PendingState::WaitingReady { since_ms } => {
                    if self.backend.is_ready(p.track) {
                        self.track_mut(p.track).ready = true;
                        self.attempt_play(p.track, now_ms, p.attempts, false);
                    } else if now_ms.saturating_sub(since_ms) >= ready_timeout {
                        // Not ready in time counts as a playback failure and
                        // feeds the same escalation path.
                        warn!(track = %p.track, waited_ms = now_ms - since_ms, "ready wait elapsed");
                        self.escalate_block(p.track, now_ms, p.attempts);
                    } else {
                        self.pending.push(p);
                    }
                }
                PendingState::RetryAt { at_ms } => {
                    if now_ms >= at_ms {
                        self.attempt_play(p.track, now_ms, p.attempts, false);
                    } else {
                        self.pending.push(p);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for AudioCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioCoordinator")
            .field("climax", &self.climax)
            .field("celebration", &self.celebration)
            .field("audio_unlocked", &self.audio_unlocked)
            .field("pre_authorized", &self.pre_authorized)
            .field("fallback", &self.fallback)
            .field("heartbeat_wanted", &self.heartbeat_wanted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::ScriptedBackend;
    use crate::audio::unlock::{AlwaysUnlocked, MobileUnlock};

    fn coordinator(backend: ScriptedBackend) -> AudioCoordinator {
        AudioCoordinator::new(
            AudioConfig::default(),
            SoundConfig::default(),
            false,
            Box::new(backend),
            Box::new(AlwaysUnlocked),
        )
    }

    fn kinds(events: &[Event]) -> Vec<&'static str> {
        events.iter().map(|e| e.kind()).collect()
    }

    #[test]
    fn play_starts_silent_and_fades_to_target() {
        let mut c = coordinator(ScriptedBackend::new());
        c.play_track(TrackId::Climax, 0, false);
        assert!(c.is_playing(TrackId::Climax));
        assert_eq!(c.track(TrackId::Climax).volume, 0.0);

        // 0.8 target at 0.05 per 100ms needs 16 steps.
        c.tick_at(1600);
        assert!((c.track(TrackId::Climax).volume - 0.8).abs() < f32::EPSILON);
        assert!(kinds(&c.drain_events()).contains(&"TrackFadeCompleted"));
    }

    #[test]
    fn one_rejection_retries_automatically() {
        let mut backend = ScriptedBackend::new();
        backend.reject_next_plays(TrackId::Celebration, 1);
        let mut c = coordinator(backend);
        c.play_track(TrackId::Celebration, 0, false);
        assert!(!c.is_playing(TrackId::Celebration));
        assert!(c.fallback_control().is_none());

        c.tick_at(500); // retry delay elapsed
        assert!(c.is_playing(TrackId::Celebration));
    }

    #[test]
    fn two_rejections_surface_the_manual_control() {
        let mut backend = ScriptedBackend::new();
        backend.reject_next_plays(TrackId::Celebration, 2);
        let mut c = coordinator(backend);
        c.play_track(TrackId::Celebration, 0, false);
        c.tick_at(500);
        assert_eq!(c.fallback_control(), Some(TrackId::Celebration));

        c.manual_play(TrackId::Celebration, 600);
        assert!(c.is_playing(TrackId::Celebration));
        assert!(c.fallback_control().is_none());
    }

    #[test]
    fn ready_timeout_feeds_the_same_escalation() {
        let mut backend = ScriptedBackend::new();
        backend.buffer_for_checks(TrackId::Climax, u32::MAX);
        let mut c = coordinator(backend);
        c.play_track(TrackId::Climax, 0, false);
        assert!(!c.is_playing(TrackId::Climax));

        c.tick_at(5000);
        let events = c.drain_events();
        assert!(kinds(&events).contains(&"PlaybackBlocked"));
    }

    #[test]
    fn stop_on_stopped_track_is_a_no_op() {
        let mut c = coordinator(ScriptedBackend::new());
        c.stop_track(TrackId::Climax);
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn stop_all_except_spares_only_the_named_track() {
        let mut c = coordinator(ScriptedBackend::new());
        c.play_track(TrackId::Climax, 0, false);
        c.play_track(TrackId::Celebration, 0, false);
        c.start_heartbeat(0);
        c.stop_all_except(Some(TrackId::Celebration));
        assert!(!c.is_playing(TrackId::Climax));
        assert!(c.is_playing(TrackId::Celebration));
        assert!(!c.heartbeat_active());
    }

    #[test]
    fn mobile_unlock_is_one_shot_and_gesture_gated() {
        let mut c = AudioCoordinator::new(
            AudioConfig::default(),
            SoundConfig::default(),
            true,
            Box::new(ScriptedBackend::new()),
            Box::new(MobileUnlock::new()),
        );
        assert!(!c.audio_unlocked());

        c.handle_gesture(GestureTarget::Elsewhere, 0);
        assert!(!c.audio_unlocked());

        c.handle_gesture(GestureTarget::StartButton, 10);
        assert!(c.audio_unlocked());
        let unlocks = c
            .drain_events()
            .iter()
            .filter(|e| e.kind() == "AudioUnlocked")
            .count();
        assert_eq!(unlocks, 1);

        // Disarmed: a later gesture does not emit again.
        c.handle_gesture(GestureTarget::ShareButton, 20);
        assert!(c.drain_events().iter().all(|e| e.kind() != "AudioUnlocked"));
    }

    #[test]
    fn pre_authorize_is_idempotent() {
        let mut c = coordinator(ScriptedBackend::new());
        c.pre_authorize(0);
        c.pre_authorize(1);
        let count = c
            .drain_events()
            .iter()
            .filter(|e| e.kind() == "PreAuthorized")
            .count();
        assert_eq!(count, 1);
        assert!(c.pre_authorized());
    }

    #[test]
    fn heartbeat_respects_sound_switch() {
        let mut c = AudioCoordinator::new(
            AudioConfig::default(),
            SoundConfig {
                heartbeat: false,
                ..SoundConfig::default()
            },
            false,
            Box::new(ScriptedBackend::new()),
            Box::new(AlwaysUnlocked),
        );
        c.start_heartbeat(0);
        assert!(!c.heartbeat_active());
    }

    #[test]
    fn heartbeat_retries_resume_then_gives_up() {
        let mut c = coordinator(ScriptedBackend::new());
        c.engine_mut().initialize();
        c.engine_mut().block_resume(true);
        c.start_heartbeat(0);
        assert!(!c.heartbeat_active());

        // Retry still blocked: the cue is skipped for good.
        c.tick_at(1000);
        assert!(!c.heartbeat_active());
        assert!(kinds(&c.drain_events()).contains(&"CueSkipped"));

        // A later start with a resumable context works.
        c.engine_mut().block_resume(false);
        c.start_heartbeat(2000);
        assert!(c.heartbeat_active());
    }
}
