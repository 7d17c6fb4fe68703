mod content;
mod controller;
mod duel;
mod timeline;

pub use content::PhaseContent;
pub use controller::{Effect, PhaseController};
pub use duel::{DuelScript, DuelStage, LoadingColor};
pub use timeline::{Timeline, TimelineAction};

use serde::{Deserialize, Serialize};

/// The seven visual phases, in order. Transitions are strictly forward and
/// driven only by timer expiry (plus the initial Start gesture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Landing,
    Countdown,
    Mystery,
    Buildup,
    Duel,
    Reveal,
    Celebration,
}

impl Phase {
    /// Position in the fixed sequence; used to assert monotonicity.
    pub fn index(self) -> usize {
        match self {
            Phase::Landing => 0,
            Phase::Countdown => 1,
            Phase::Mystery => 2,
            Phase::Buildup => 3,
            Phase::Duel => 4,
            Phase::Reveal => 5,
            Phase::Celebration => 6,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Landing => "landing",
            Phase::Countdown => "countdown",
            Phase::Mystery => "mystery",
            Phase::Buildup => "buildup",
            Phase::Duel => "duel",
            Phase::Reveal => "reveal",
            Phase::Celebration => "celebration",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_is_total() {
        assert!(Phase::Landing < Phase::Countdown);
        assert!(Phase::Countdown < Phase::Mystery);
        assert!(Phase::Duel < Phase::Reveal);
        assert!(Phase::Reveal < Phase::Celebration);
    }
}
