//! Per-phase render payloads.
//!
//! Rendering itself is a collaborator's concern; the controller only hands
//! out a full replacement of headline copy and palette per phase, the way
//! the original replaced the content container wholesale.

use serde::Serialize;

use super::Phase;
use crate::config::Winner;

/// Full replacement content for the visual container of one phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseContent {
    pub phase: Phase,
    pub headline: String,
    pub subtitle: String,
    /// Background gradient stops.
    pub palette: Vec<&'static str>,
}

impl PhaseContent {
    pub fn for_phase(phase: Phase, winner: Winner) -> Self {
        let (headline, subtitle) = copy(phase, winner);
        Self {
            phase,
            headline,
            subtitle,
            palette: palette(phase).to_vec(),
        }
    }
}

fn copy(phase: Phase, winner: Winner) -> (String, String) {
    match phase {
        Phase::Landing => (
            "Uma surpresa especial".into(),
            "Toque para começar".into(),
        ),
        Phase::Countdown => ("Preparando...".into(), String::new()),
        Phase::Mystery => (
            "O mistério começa".into(),
            "Escute... um coração batendo".into(),
        ),
        Phase::Buildup => (
            "O momento chegou!".into(),
            "Nosso pequeno tesouro é...".into(),
        ),
        Phase::Duel => (
            format!("{} vs {}", Winner::Girl.label(), Winner::Boy.label()),
            "Calculando destino...".into(),
        ),
        Phase::Reveal => match winner {
            Winner::Girl => ("É MENINA!".into(), "Nossa princesinha está chegando!".into()),
            Winner::Boy => ("É MENINO!".into(), "Nosso principezinho está chegando!".into()),
        },
        Phase::Celebration => (
            "Bem-vindo ao mundo!".into(),
            "Uma nova estrela nasceu em nossos corações".into(),
        ),
    }
}

fn palette(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Landing | Phase::Countdown => &["#1e1e2e", "#2d1b69"],
        Phase::Mystery => &["#1e1e2e", "#2d1b69", "#11047a"],
        Phase::Buildup => &["#ff6b6b", "#ee5a24", "#f9ca24"],
        Phase::Duel => &["#8b5cf6", "#3b82f6", "#ec4899", "#10b981"],
        Phase::Reveal => &["#ff69b4", "#ff1493", "#ffc0cb", "#ffb6c1"],
        Phase::Celebration => &["#ff69b4", "#87ceeb", "#98fb98", "#dda0dd"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_copy_follows_winner() {
        let girl = PhaseContent::for_phase(Phase::Reveal, Winner::Girl);
        assert!(girl.headline.contains("MENINA"));
        let boy = PhaseContent::for_phase(Phase::Reveal, Winner::Boy);
        assert!(boy.headline.contains("MENINO"));
    }

    #[test]
    fn every_phase_has_a_palette() {
        for phase in [
            Phase::Landing,
            Phase::Countdown,
            Phase::Mystery,
            Phase::Buildup,
            Phase::Duel,
            Phase::Reveal,
            Phase::Celebration,
        ] {
            assert!(!PhaseContent::for_phase(phase, Winner::Girl).palette.is_empty());
        }
    }
}
