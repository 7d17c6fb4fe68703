//! TOML-based experience configuration.
//!
//! Stores the rigged reveal outcome and every tunable duration:
//! - Countdown length and per-phase durations
//! - Synthetic sound switches
//! - Track volumes, fade-in steps and retry/ready timeouts
//! - Share payload text
//!
//! Configuration is stored at `~/.config/reveal/config.toml`
//! (`~/.config/reveal-dev/` when `REVEAL_ENV=dev`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::phase::DuelScript;

/// The pre-configured reveal outcome. The duel is cosmetic suspense; this
/// side always wins sub-stage 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    #[serde(alias = "menina")]
    Girl,
    #[serde(alias = "menino")]
    Boy,
}

impl Winner {
    /// Side label shown on the duel power indicators.
    pub fn label(self) -> &'static str {
        match self {
            Winner::Girl => "menina",
            Winner::Boy => "menino",
        }
    }

    pub fn other(self) -> Winner {
        match self {
            Winner::Girl => Winner::Boy,
            Winner::Boy => Winner::Girl,
        }
    }
}

/// Phase durations. Fixed at startup, read-only afterwards.
///
/// The countdown is a count of seconds; buildup is expressed as its
/// sub-countdown (`buildup_count` ticks of `buildup_tick_ms`) since the
/// tick reaching zero is what moves the machine to the duel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTimingConfig {
    /// Delay between the Start gesture and the first countdown second.
    #[serde(default = "default_prepare_ms")]
    pub prepare_ms: u64,
    /// Countdown length in seconds.
    #[serde(default = "default_countdown")]
    pub countdown: u32,
    #[serde(default = "default_mystery_ms")]
    pub mystery_ms: u64,
    #[serde(default = "default_buildup_count")]
    pub buildup_count: u32,
    #[serde(default = "default_buildup_tick_ms")]
    pub buildup_tick_ms: u64,
    #[serde(default = "default_duel_ms")]
    pub duel_ms: u64,
    #[serde(default = "default_reveal_ms")]
    pub reveal_ms: u64,
    /// Settle delay between entering Celebration (all audio stopped) and
    /// starting the celebration music, so nothing overlaps the fade-in.
    #[serde(default = "default_celebration_settle_ms")]
    pub celebration_settle_ms: u64,
}

impl PhaseTimingConfig {
    /// Effective buildup duration.
    pub fn buildup_ms(&self) -> u64 {
        u64::from(self.buildup_count).saturating_mul(self.buildup_tick_ms)
    }

    pub fn countdown_ms(&self) -> u64 {
        u64::from(self.countdown).saturating_mul(1000)
    }

    /// Offset from the Start gesture to Celebration entry.
    pub fn total_until_celebration_ms(&self) -> u64 {
        self.prepare_ms
            + self.countdown_ms()
            + self.mystery_ms
            + self.buildup_ms()
            + self.duel_ms
            + self.reveal_ms
    }
}

/// Synthetic sound switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub heartbeat: bool,
    #[serde(default = "default_true")]
    pub suspense: bool,
    #[serde(default = "default_true")]
    pub celebration: bool,
}

/// Track playback tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_climax_volume")]
    pub climax_volume: f32,
    /// Mobile plays the climax slightly louder (small speakers).
    #[serde(default = "default_climax_volume_mobile")]
    pub climax_volume_mobile: f32,
    #[serde(default = "default_celebration_volume")]
    pub celebration_volume: f32,
    /// Fade-in ramps in fixed steps of this size...
    #[serde(default = "default_fade_step")]
    pub fade_step: f32,
    /// ...spaced this far apart.
    #[serde(default = "default_fade_step_ms")]
    pub fade_step_ms: u64,
    /// Delay before the single automatic retry after a policy rejection.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Bounded wait for a buffering track before it counts as a failure.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    #[serde(default = "default_climax_source")]
    pub climax_source: String,
    #[serde(default = "default_celebration_source")]
    pub celebration_source: String,
}

impl AudioConfig {
    pub fn track_volume(&self, track: crate::audio::TrackId, mobile: bool) -> f32 {
        match track {
            crate::audio::TrackId::Climax => {
                if mobile {
                    self.climax_volume_mobile
                } else {
                    self.climax_volume
                }
            }
            crate::audio::TrackId::Celebration => self.celebration_volume,
        }
    }
}

/// Fixed share payload text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_share_url")]
    pub url: String,
}

/// Experience configuration.
///
/// Serialized to/from TOML at `~/.config/reveal/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_winner")]
    pub winner: Winner,
    #[serde(default)]
    pub timing: PhaseTimingConfig,
    #[serde(default)]
    pub sounds: SoundConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

// Default functions
fn default_prepare_ms() -> u64 {
    1000
}
fn default_countdown() -> u32 {
    10
}
fn default_mystery_ms() -> u64 {
    14_000
}
fn default_buildup_count() -> u32 {
    5
}
fn default_buildup_tick_ms() -> u64 {
    1200
}
fn default_duel_ms() -> u64 {
    20_000
}
fn default_reveal_ms() -> u64 {
    8000
}
fn default_celebration_settle_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}
fn default_climax_volume() -> f32 {
    0.8
}
fn default_climax_volume_mobile() -> f32 {
    0.9
}
fn default_celebration_volume() -> f32 {
    0.7
}
fn default_fade_step() -> f32 {
    0.05
}
fn default_fade_step_ms() -> u64 {
    100
}
fn default_retry_delay_ms() -> u64 {
    500
}
fn default_ready_timeout_ms() -> u64 {
    5000
}
fn default_climax_source() -> String {
    "audio/climax.mp3".into()
}
fn default_celebration_source() -> String {
    "audio/celebration.mp3".into()
}
fn default_share_url() -> String {
    "https://reveal.example/".into()
}
fn default_winner() -> Winner {
    Winner::Girl
}

impl Default for PhaseTimingConfig {
    fn default() -> Self {
        Self {
            prepare_ms: default_prepare_ms(),
            countdown: default_countdown(),
            mystery_ms: default_mystery_ms(),
            buildup_count: default_buildup_count(),
            buildup_tick_ms: default_buildup_tick_ms(),
            duel_ms: default_duel_ms(),
            reveal_ms: default_reveal_ms(),
            celebration_settle_ms: default_celebration_settle_ms(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            heartbeat: true,
            suspense: true,
            celebration: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            climax_volume: default_climax_volume(),
            climax_volume_mobile: default_climax_volume_mobile(),
            celebration_volume: default_celebration_volume(),
            fade_step: default_fade_step(),
            fade_step_ms: default_fade_step_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            ready_timeout_ms: default_ready_timeout_ms(),
            climax_source: default_climax_source(),
            celebration_source: default_celebration_source(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            url: default_share_url(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            winner: default_winner(),
            timing: PhaseTimingConfig::default(),
            sounds: SoundConfig::default(),
            audio: AudioConfig::default(),
            share: ShareConfig::default(),
        }
    }
}

/// Returns `~/.config/reveal[-dev]/` based on REVEAL_ENV.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REVEAL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("reveal-dev")
    } else {
        base_dir.join("reveal")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl RevealConfig {
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.countdown == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.countdown".into(),
                message: "must be at least 1 second".into(),
            });
        }
        if self.timing.duel_ms < DuelScript::MIN_TOTAL_MS {
            return Err(ConfigError::InvalidValue {
                key: "timing.duel_ms".into(),
                message: format!(
                    "must be at least {}ms to fit the scripted sub-stages",
                    DuelScript::MIN_TOTAL_MS
                ),
            });
        }
        for (key, vol) in [
            ("audio.climax_volume", self.audio.climax_volume),
            ("audio.climax_volume_mobile", self.audio.climax_volume_mobile),
            ("audio.celebration_volume", self.audio.celebration_volume),
        ] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "volume must be in [0, 1]".into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_timing() {
        let c = RevealConfig::default();
        assert_eq!(c.timing.countdown, 10);
        assert_eq!(c.timing.mystery_ms, 14_000);
        assert_eq!(c.timing.buildup_ms(), 6000);
        assert_eq!(c.timing.duel_ms, 20_000);
        assert_eq!(c.timing.reveal_ms, 8000);
    }

    #[test]
    fn total_until_celebration_sums_every_phase() {
        let c = PhaseTimingConfig::default();
        assert_eq!(
            c.total_until_celebration_ms(),
            1000 + 10_000 + 14_000 + 6000 + 20_000 + 8000
        );
    }

    #[test]
    fn winner_accepts_original_labels() {
        let w: Winner = serde_json::from_str("\"menina\"").unwrap();
        assert_eq!(w, Winner::Girl);
        assert_eq!(w.label(), "menina");
        assert_eq!(w.other().label(), "menino");
    }

    #[test]
    fn short_duel_is_rejected() {
        let mut c = RevealConfig::default();
        c.timing.duel_ms = 5000;
        assert!(c.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let c = RevealConfig::default();
        let raw = toml::to_string_pretty(&c).unwrap();
        let back: RevealConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back.winner, c.winner);
        assert_eq!(back.timing.duel_ms, c.timing.duel_ms);
    }

    // The only test that touches HOME; keep it that way.
    #[test]
    fn save_then_load_round_trips_through_disk() {
        let home = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", home.path());
        std::env::set_var("REVEAL_ENV", "dev");

        let mut c = RevealConfig::default();
        c.winner = Winner::Boy;
        c.save().unwrap();

        let loaded = RevealConfig::load().unwrap();
        assert_eq!(loaded.winner, Winner::Boy);
    }
}
