//! Media element seam.
//!
//! Every track operation the coordinator performs goes through this trait,
//! so the phase/timing logic runs identically against a real media stack,
//! the no-op backend the CLI uses, or a scripted backend that simulates
//! autoplay policy rejections and slow buffering.

use std::collections::HashMap;

use super::track::TrackId;

/// Why a play request did not resolve audible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRejection {
    /// The platform blocked autoplay; a qualifying user gesture would be
    /// accepted.
    PolicyRejected,
    /// The element has not buffered enough yet.
    NotReady,
}

/// Playback operations on one media element.
pub trait MediaBackend {
    /// Register a track source. Called once per track at startup.
    fn load(&mut self, id: TrackId, source: &str);

    /// Whether the element has buffered enough to start playing. Polled
    /// while a play request waits for readiness.
    fn is_ready(&mut self, id: TrackId) -> bool;

    /// Attempt playback. `gesture` is true when the attempt runs inside a
    /// user-gesture context, which platforms always permit.
    fn play(&mut self, id: TrackId, gesture: bool) -> Result<(), PlayRejection>;

    fn pause(&mut self, id: TrackId);

    /// Rewind to time zero.
    fn rewind(&mut self, id: TrackId);

    fn set_volume(&mut self, id: TrackId, volume: f32);

    fn set_muted(&mut self, id: TrackId, muted: bool);
}

/// Backend that always succeeds. Used by the CLI and anywhere playback
/// mechanics are irrelevant.
#[derive(Debug, Default)]
pub struct NullBackend;

impl MediaBackend for NullBackend {
    fn load(&mut self, _id: TrackId, _source: &str) {}

    fn is_ready(&mut self, _id: TrackId) -> bool {
        true
    }

    fn play(&mut self, _id: TrackId, _gesture: bool) -> Result<(), PlayRejection> {
        Ok(())
    }

    fn pause(&mut self, _id: TrackId) {}

    fn rewind(&mut self, _id: TrackId) {}

    fn set_volume(&mut self, _id: TrackId, _volume: f32) {}

    fn set_muted(&mut self, _id: TrackId, _muted: bool) {}
}

#[derive(Debug, Default, Clone)]
struct ScriptedTrack {
    source: String,
    /// Remaining gestureless play attempts to reject with a policy error.
    reject_plays: u32,
    /// Element reports not-ready for this many readiness checks.
    not_ready_checks: u32,
    playing: bool,
    volume: f32,
    muted: bool,
    at_start: bool,
}

/// Deterministic scripted backend for simulations and tests.
///
/// Rejections only apply to gestureless plays; a gesture-context play always
/// succeeds, matching platform autoplay policies.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    tracks: HashMap<TrackId, ScriptedTrack>,
    play_attempts: Vec<(TrackId, bool)>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `count` gestureless play attempts on `id`.
    pub fn reject_next_plays(&mut self, id: TrackId, count: u32) {
        self.entry(id).reject_plays = count;
    }

    /// Report not-ready for the next `count` readiness checks on `id`.
    pub fn buffer_for_checks(&mut self, id: TrackId, count: u32) {
        self.entry(id).not_ready_checks = count;
    }

    pub fn is_playing(&self, id: TrackId) -> bool {
        self.tracks.get(&id).map(|t| t.playing).unwrap_or(false)
    }

    pub fn volume(&self, id: TrackId) -> f32 {
        self.tracks.get(&id).map(|t| t.volume).unwrap_or(0.0)
    }

    pub fn is_at_start(&self, id: TrackId) -> bool {
        self.tracks.get(&id).map(|t| t.at_start).unwrap_or(true)
    }

    pub fn is_muted(&self, id: TrackId) -> bool {
        self.tracks.get(&id).map(|t| t.muted).unwrap_or(false)
    }

    /// Source registered via `load`, if any.
    pub fn source(&self, id: TrackId) -> Option<&str> {
        self.tracks.get(&id).map(|t| t.source.as_str())
    }

    /// Every play attempt seen, with its gesture flag.
    pub fn play_attempts(&self) -> &[(TrackId, bool)] {
        &self.play_attempts
    }

    fn entry(&mut self, id: TrackId) -> &mut ScriptedTrack {
        self.tracks.entry(id).or_default()
    }
}

impl MediaBackend for ScriptedBackend {
    fn load(&mut self, id: TrackId, source: &str) {
        self.entry(id).source = source.to_string();
    }

    fn is_ready(&mut self, id: TrackId) -> bool {
        let track = self.entry(id);
        if track.not_ready_checks > 0 {
            track.not_ready_checks -= 1;
            return false;
        }
        true
    }

    fn play(&mut self, id: TrackId, gesture: bool) -> Result<(), PlayRejection> {
        self.play_attempts.push((id, gesture));
        let track = self.entry(id);
        if track.not_ready_checks > 0 {
            return Err(PlayRejection::NotReady);
        }
        if !gesture && track.reject_plays > 0 {
            track.reject_plays -= 1;
            return Err(PlayRejection::PolicyRejected);
        }
        track.playing = true;
        track.at_start = false;
        Ok(())
    }

    fn pause(&mut self, id: TrackId) {
        self.entry(id).playing = false;
    }

    fn rewind(&mut self, id: TrackId) {
        self.entry(id).at_start = true;
    }

    fn set_volume(&mut self, id: TrackId, volume: f32) {
        self.entry(id).volume = volume;
    }

    fn set_muted(&mut self, id: TrackId, muted: bool) {
        self.entry(id).muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rejections_count_down() {
        let mut b = ScriptedBackend::new();
        b.reject_next_plays(TrackId::Climax, 2);
        assert_eq!(
            b.play(TrackId::Climax, false),
            Err(PlayRejection::PolicyRejected)
        );
        assert_eq!(
            b.play(TrackId::Climax, false),
            Err(PlayRejection::PolicyRejected)
        );
        assert_eq!(b.play(TrackId::Climax, false), Ok(()));
    }

    #[test]
    fn gesture_play_bypasses_policy() {
        let mut b = ScriptedBackend::new();
        b.reject_next_plays(TrackId::Celebration, 99);
        assert_eq!(b.play(TrackId::Celebration, true), Ok(()));
        assert!(b.is_playing(TrackId::Celebration));
    }

    #[test]
    fn rewind_and_mute_are_observable() {
        let mut b = ScriptedBackend::new();
        b.load(TrackId::Climax, "audio/climax.mp3");
        assert_eq!(b.source(TrackId::Climax), Some("audio/climax.mp3"));
        b.play(TrackId::Climax, true).unwrap();
        assert!(!b.is_at_start(TrackId::Climax));
        b.rewind(TrackId::Climax);
        assert!(b.is_at_start(TrackId::Climax));

        b.set_muted(TrackId::Climax, true);
        assert!(b.is_muted(TrackId::Climax));
    }

    #[test]
    fn buffering_clears_after_scripted_checks() {
        let mut b = ScriptedBackend::new();
        b.buffer_for_checks(TrackId::Climax, 2);
        assert!(!b.is_ready(TrackId::Climax));
        assert!(!b.is_ready(TrackId::Climax));
        assert!(b.is_ready(TrackId::Climax));
        assert_eq!(b.play(TrackId::Climax, false), Ok(()));
    }
}
