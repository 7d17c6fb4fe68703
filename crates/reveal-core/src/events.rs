use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::TrackId;
use crate::config::Winner;
use crate::phase::{DuelStage, Phase};

/// Every observable state change in the experience produces an Event.
/// The renderer polls for events; the CLI streams them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ExperienceStarted {
        is_mobile: bool,
        at: DateTime<Utc>,
    },
    /// A second Start gesture arrived before reload; ignored.
    StartIgnored {
        at: DateTime<Utc>,
    },
    PhaseEntered {
        phase: Phase,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining: u32,
        at: DateTime<Utc>,
    },
    BuildupTick {
        remaining: u32,
        at: DateTime<Utc>,
    },
    DuelStageChanged {
        stage: DuelStage,
        girl_power: u8,
        boy_power: u8,
        at: DateTime<Utc>,
    },
    /// Mid lock-in announcement beat of the scripted duel.
    WinnerAnnounced {
        winner: Winner,
        at: DateTime<Utc>,
    },
    TrackStarted {
        track: TrackId,
        target_volume: f32,
        at: DateTime<Utc>,
    },
    TrackStopped {
        track: TrackId,
        at: DateTime<Utc>,
    },
    TrackFadeCompleted {
        track: TrackId,
        volume: f32,
        at: DateTime<Utc>,
    },
    /// Autoplay policy rejected a play attempt (or the bounded ready wait
    /// elapsed, which is treated the same way).
    PlaybackBlocked {
        track: TrackId,
        attempt: u32,
        at: DateTime<Utc>,
    },
    /// Automated playback failed twice; the manual "tap to play" control is
    /// now visible.
    FallbackShown {
        track: TrackId,
        at: DateTime<Utc>,
    },
    HeartbeatStarted {
        at: DateTime<Utc>,
    },
    HeartbeatStopped {
        at: DateTime<Utc>,
    },
    /// A synthetic cue could not run (context suspended, resume failed);
    /// the visual phase proceeds without it.
    CueSkipped {
        cue: String,
        at: DateTime<Utc>,
    },
    AudioUnlocked {
        at: DateTime<Utc>,
    },
    PreAuthorized {
        /// True when the silent probes failed and only manual playback will
        /// work for the rest of the session.
        degraded: bool,
        at: DateTime<Utc>,
    },
    MusicToggled {
        playing: bool,
        at: DateTime<Utc>,
    },
    VolumeChanged {
        volume: f32,
        at: DateTime<Utc>,
    },
    Shared {
        method: String,
        at: DateTime<Utc>,
    },
    Restarted {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Event kind tag, handy for filtering logs in tests and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ExperienceStarted { .. } => "ExperienceStarted",
            Event::StartIgnored { .. } => "StartIgnored",
            Event::PhaseEntered { .. } => "PhaseEntered",
            Event::CountdownTick { .. } => "CountdownTick",
            Event::BuildupTick { .. } => "BuildupTick",
            Event::DuelStageChanged { .. } => "DuelStageChanged",
            Event::WinnerAnnounced { .. } => "WinnerAnnounced",
            Event::TrackStarted { .. } => "TrackStarted",
            Event::TrackStopped { .. } => "TrackStopped",
            Event::TrackFadeCompleted { .. } => "TrackFadeCompleted",
            Event::PlaybackBlocked { .. } => "PlaybackBlocked",
            Event::FallbackShown { .. } => "FallbackShown",
            Event::HeartbeatStarted { .. } => "HeartbeatStarted",
            Event::HeartbeatStopped { .. } => "HeartbeatStopped",
            Event::CueSkipped { .. } => "CueSkipped",
            Event::AudioUnlocked { .. } => "AudioUnlocked",
            Event::PreAuthorized { .. } => "PreAuthorized",
            Event::MusicToggled { .. } => "MusicToggled",
            Event::VolumeChanged { .. } => "VolumeChanged",
            Event::Shared { .. } => "Shared",
            Event::Restarted { .. } => "Restarted",
        }
    }
}
