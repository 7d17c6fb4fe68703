//! Phase controller implementation.
//!
//! The controller is a wall-clock-based state machine in the same mold as a
//! tick-driven timer engine: it holds no threads and schedules no callbacks.
//! The caller invokes [`PhaseController::tick_at`] periodically; due timeline
//! deadlines are drained and fanned out as [`Effect`]s.
//!
//! ## State transitions
//!
//! ```text
//! Landing -> Countdown -> Mystery -> Buildup -> Duel -> Reveal -> Celebration
//! ```
//!
//! Strictly forward. Only the initial Start gesture and timer expiry move
//! the machine; audio outcomes never do. Celebration is terminal until a
//! full restart.

use chrono::Utc;
use tracing::debug;

use super::content::PhaseContent;
use super::duel::{DuelScript, DuelStage};
use super::timeline::{Timeline, TimelineAction};
use super::Phase;
use crate::audio::{AudioIntent, TrackId};
use crate::config::{PhaseTimingConfig, Winner};
use crate::events::Event;
use crate::haptics::patterns;
use crate::session::ExperienceSession;

/// A side-effect request fanned out by the controller. All of these are
/// fire-and-forget: a failed audio or haptic request never blocks or
/// reverses a phase transition.
#[derive(Debug, Clone)]
pub enum Effect {
    Audio(AudioIntent),
    Haptic(&'static [u64]),
    Render(PhaseContent),
    Event(Event),
}

/// Drives the linear phase sequence and fans out side-effect requests.
///
/// Owns the session record and the declarative timeline; never touches
/// playback state directly.
#[derive(Debug)]
pub struct PhaseController {
    timing: PhaseTimingConfig,
    duel: DuelScript,
    phase: Phase,
    session: ExperienceSession,
    timeline: Timeline,
    duel_stage: Option<DuelStage>,
    countdown_remaining: u32,
    buildup_remaining: u32,
}

impl PhaseController {
    pub fn new(timing: PhaseTimingConfig, winner: Winner, is_mobile: bool) -> Self {
        let countdown_remaining = timing.countdown;
        Self {
            timing,
            duel: DuelScript::new(winner),
            phase: Phase::Landing,
            session: ExperienceSession::new(is_mobile),
            timeline: Timeline::default(),
            duel_stage: None,
            countdown_remaining,
            buildup_remaining: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn duel_stage(&self) -> Option<DuelStage> {
        self.duel_stage
    }

    /// (girl%, boy%) for the current duel stage, if the duel is running.
    pub fn duel_powers(&self) -> Option<(u8, u8)> {
        self.duel_stage.map(|s| self.duel.powers(s))
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn buildup_remaining(&self) -> u32 {
        self.buildup_remaining
    }

    pub fn session(&self) -> &ExperienceSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ExperienceSession {
        &mut self.session
    }

    /// Deadline of the next pending timeline action.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timeline.next_deadline_ms()
    }

    /// Whether every timeline deadline has fired.
    pub fn timeline_drained(&self) -> bool {
        self.timeline.is_empty()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the experience. Idempotent: a second gesture before restart is
    /// acknowledged with a `StartIgnored` event and nothing else.
    pub fn start(&mut self, now_ms: u64) -> Vec<Effect> {
        if !self.session.begin(now_ms) {
            debug!("start gesture ignored, session already running");
            return vec![Effect::Event(Event::StartIgnored { at: Utc::now() })];
        }

        self.timeline = Timeline::for_experience(now_ms, &self.timing);
        self.phase = Phase::Countdown;
        self.countdown_remaining = self.timing.countdown;
        debug!(pending = self.timeline.pending(), "timeline resolved");

        vec![
            // Guarantee silence before anything else plays.
            Effect::Audio(AudioIntent::StopAllExcept(None)),
            Effect::Audio(AudioIntent::ForceStopAll),
            Effect::Haptic(patterns::START),
            Effect::Event(Event::ExperienceStarted {
                is_mobile: self.session.is_mobile,
                at: Utc::now(),
            }),
            Effect::Event(Event::PhaseEntered {
                phase: Phase::Countdown,
                at: Utc::now(),
            }),
        ]
    }

    /// Drain due timeline deadlines. Call periodically; a tick that arrives
    /// late fires everything that became due in the meantime, in order.
    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        for action in self.timeline.poll(now_ms) {
            self.apply(action, &mut effects);
        }
        effects
    }

    /// Tear down the run: clears every pending deadline atomically and
    /// resets the session flags. The caller is responsible for the actual
    /// reload handoff.
    pub fn restart(&mut self) -> Vec<Effect> {
        self.timeline.clear();
        self.session.reset();
        self.phase = Phase::Landing;
        self.duel_stage = None;
        self.countdown_remaining = self.timing.countdown;
        self.buildup_remaining = 0;
        vec![
            Effect::Audio(AudioIntent::StopAllExcept(None)),
            Effect::Audio(AudioIntent::ForceStopAll),
            Effect::Haptic(patterns::RESTART),
            Effect::Event(Event::Restarted { at: Utc::now() }),
        ]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, action: TimelineAction, effects: &mut Vec<Effect>) {
        debug!(?action, phase = %self.phase, "timeline action due");
        match action {
            TimelineAction::BeginCountdown => {
                self.render(effects);
                effects.push(Effect::Event(Event::CountdownTick {
                    remaining: self.countdown_remaining,
                    at: Utc::now(),
                }));
            }
            TimelineAction::CountdownTick { remaining } => {
                self.countdown_remaining = remaining;
                effects.push(Effect::Event(Event::CountdownTick {
                    remaining,
                    at: Utc::now(),
                }));
                effects.push(Effect::Haptic(patterns::TICK));
            }
            TimelineAction::EnterMystery => {
                self.enter(Phase::Mystery, effects);
                // Climax audio is never appropriate here; stop any residue.
                effects.push(Effect::Audio(AudioIntent::StopTrack(TrackId::Climax)));
                effects.push(Effect::Audio(AudioIntent::StartHeartbeat));
            }
            TimelineAction::EnterBuildup => {
                self.enter(Phase::Buildup, effects);
                self.buildup_remaining = self.timing.buildup_count;
                effects.push(Effect::Audio(AudioIntent::StopHeartbeat));
                effects.push(Effect::Audio(AudioIntent::StartTrack(TrackId::Climax)));
                effects.push(Effect::Event(Event::BuildupTick {
                    remaining: self.buildup_remaining,
                    at: Utc::now(),
                }));
            }
            TimelineAction::BuildupTick { remaining } => {
                self.buildup_remaining = remaining;
                effects.push(Effect::Event(Event::BuildupTick {
                    remaining,
                    at: Utc::now(),
                }));
                effects.push(Effect::Haptic(patterns::INTENSE));
            }
            TimelineAction::EnterDuel => {
                self.enter(Phase::Duel, effects);
                self.duel_stage = Some(DuelStage::Loading);
                effects.push(Effect::Audio(AudioIntent::StopTrack(TrackId::Climax)));
                self.emit_duel_stage(DuelStage::Loading, effects);
                effects.push(Effect::Haptic(patterns::START));
            }
            TimelineAction::DuelLoadingCue => {
                effects.push(Effect::Audio(AudioIntent::SuspenseCue));
            }
            TimelineAction::DuelStage(stage) => {
                self.duel_stage = Some(stage);
                self.emit_duel_stage(stage, effects);
                match stage {
                    DuelStage::Loading => {}
                    DuelStage::FirstFavored => effects.push(Effect::Haptic(patterns::INTENSE)),
                    DuelStage::Reversal => effects.push(Effect::Haptic(patterns::REVERSAL)),
                    DuelStage::WinnerLockedIn => {
                        effects.push(Effect::Haptic(patterns::VICTORY));
                        effects.push(Effect::Audio(AudioIntent::SuspenseCue));
                    }
                }
            }
            TimelineAction::DuelAnnouncement => {
                effects.push(Effect::Event(Event::WinnerAnnounced {
                    winner: self.duel.winner,
                    at: Utc::now(),
                }));
                effects.push(Effect::Haptic(patterns::ANNOUNCEMENT));
                effects.push(Effect::Audio(AudioIntent::SuspenseCue));
            }
            TimelineAction::EnterReveal => {
                self.enter(Phase::Reveal, effects);
                effects.push(Effect::Audio(AudioIntent::CelebrationCue));
                effects.push(Effect::Haptic(patterns::CELEBRATION));
            }
            TimelineAction::EnterCelebration => {
                self.enter(Phase::Celebration, effects);
                // Exclusivity checkpoint: nothing but the (not yet started)
                // celebration track may survive this point.
                effects.push(Effect::Audio(AudioIntent::StopAllExcept(None)));
                effects.push(Effect::Audio(AudioIntent::ForceStopAll));
            }
            TimelineAction::CelebrationMusic => {
                effects.push(Effect::Audio(AudioIntent::StartTrack(TrackId::Celebration)));
            }
        }
    }

    fn enter(&mut self, phase: Phase, effects: &mut Vec<Effect>) {
        debug_assert!(phase > self.phase, "phase transitions are forward-only");
        self.phase = phase;
        effects.push(Effect::Event(Event::PhaseEntered {
            phase,
            at: Utc::now(),
        }));
        self.render(effects);
    }

    fn render(&self, effects: &mut Vec<Effect>) {
        effects.push(Effect::Render(PhaseContent::for_phase(
            self.phase,
            self.duel.winner,
        )));
    }

    fn emit_duel_stage(&self, stage: DuelStage, effects: &mut Vec<Effect>) {
        let (girl_power, boy_power) = self.duel.powers(stage);
        effects.push(Effect::Event(Event::DuelStageChanged {
            stage,
            girl_power,
            boy_power,
            at: Utc::now(),
        }));
    }
}
