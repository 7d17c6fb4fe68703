//! The scripted duel choreography.
//!
//! The duel is cosmetic suspense: whatever the mid-stage bars show, the
//! configured winner locks in at 100%/0% for the final stretch. Stage
//! lengths for the first three stages are fixed; lock-in absorbs whatever
//! remains of the configured duel total.

use serde::{Deserialize, Serialize};

use crate::config::Winner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelStage {
    /// Neutral "calculating destiny" state, both bars at 50%.
    Loading,
    /// The eventual winner pulls ahead first.
    FirstFavored,
    /// Dramatic reversal: the other side takes over.
    Reversal,
    /// Final state, winner at 100%. Lasts until the duel total elapses.
    WinnerLockedIn,
}

/// Loading-bar color thresholds used by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingColor {
    Red,
    Amber,
    Blue,
    Green,
}

/// Stage schedule and power levels for one duel run.
#[derive(Debug, Clone, Copy)]
pub struct DuelScript {
    pub winner: Winner,
}

impl DuelScript {
    pub const LOADING_MS: u64 = 3000;
    pub const FIRST_FAVORED_MS: u64 = 3000;
    pub const REVERSAL_MS: u64 = 4000;
    /// Duel totals shorter than this cannot fit the scripted stages.
    pub const MIN_TOTAL_MS: u64 =
        Self::LOADING_MS + Self::FIRST_FAVORED_MS + Self::REVERSAL_MS;

    pub fn new(winner: Winner) -> Self {
        Self { winner }
    }

    /// Offset of each non-initial stage from duel entry.
    pub fn stage_offset_ms(stage: DuelStage) -> u64 {
        match stage {
            DuelStage::Loading => 0,
            DuelStage::FirstFavored => Self::LOADING_MS,
            DuelStage::Reversal => Self::LOADING_MS + Self::FIRST_FAVORED_MS,
            DuelStage::WinnerLockedIn => Self::MIN_TOTAL_MS,
        }
    }

    /// Offset of the mid-lock-in announcement beat, given the duel total.
    pub fn announcement_offset_ms(duel_total_ms: u64) -> u64 {
        let lock_in = duel_total_ms.saturating_sub(Self::MIN_TOTAL_MS);
        Self::MIN_TOTAL_MS + lock_in / 2
    }

    /// (winner%, loser%) power indicator levels for a stage.
    fn levels(stage: DuelStage) -> (u8, u8) {
        match stage {
            DuelStage::Loading => (50, 50),
            DuelStage::FirstFavored => (85, 15),
            DuelStage::Reversal => (25, 75),
            DuelStage::WinnerLockedIn => (100, 0),
        }
    }

    /// (girl%, boy%) power levels for a stage.
    pub fn powers(&self, stage: DuelStage) -> (u8, u8) {
        let (winner_pct, loser_pct) = Self::levels(stage);
        match self.winner {
            Winner::Girl => (winner_pct, loser_pct),
            Winner::Boy => (loser_pct, winner_pct),
        }
    }

    /// Loading-bar percentage and color for a point within the Loading
    /// stage.
    pub fn loading_progress(elapsed_ms: u64) -> (u8, LoadingColor) {
        let pct = ((elapsed_ms.min(Self::LOADING_MS) * 100) / Self::LOADING_MS) as u8;
        let color = if pct < 30 {
            LoadingColor::Red
        } else if pct < 70 {
            LoadingColor::Amber
        } else if pct < 100 {
            LoadingColor::Blue
        } else {
            LoadingColor::Green
        };
        (pct, color)
    }
}
