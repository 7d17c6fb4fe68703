use serde::{Deserialize, Serialize};

/// The two pre-recorded music assets the experience ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackId {
    /// Suspense cue played during the buildup phase.
    Climax,
    /// Celebration music played on the final screen.
    Celebration,
}

impl TrackId {
    pub const ALL: [TrackId; 2] = [TrackId::Climax, TrackId::Celebration];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackId::Climax => "climax",
            TrackId::Celebration => "celebration",
        }
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loadable/playable media asset.
///
/// Created once at startup and mutated for the whole session. Owned
/// exclusively by the [`AudioCoordinator`](super::AudioCoordinator); nothing
/// else touches playback state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: TrackId,
    /// Source locator for the asset (static path).
    pub source: String,
    /// Current volume in [0, 1].
    pub volume: f32,
    pub playing: bool,
    /// Whether the media element has buffered enough to start.
    pub ready: bool,
    /// Whether a no-gesture play has succeeded at least once.
    pub unlocked: bool,
}

impl AudioTrack {
    pub fn new(id: TrackId, source: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
            volume: 0.0,
            playing: false,
            ready: false,
            unlocked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_starts_silent_and_stopped() {
        let t = AudioTrack::new(TrackId::Climax, "audio/climax.mp3");
        assert_eq!(t.volume, 0.0);
        assert!(!t.playing);
        assert!(!t.unlocked);
    }

    #[test]
    fn track_id_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrackId::Celebration).unwrap(),
            "\"celebration\""
        );
    }
}
