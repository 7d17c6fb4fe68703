//! End-to-end runs of the full experience on a virtual clock.

use proptest::prelude::*;

use reveal_core::audio::{AlwaysUnlocked, ScriptedBackend};
use reveal_core::config::RevealConfig;
use reveal_core::events::Event;
use reveal_core::haptics::NullHaptics;
use reveal_core::phase::Phase;
use reveal_core::share::ClipboardOnlyTarget;
use reveal_core::simulation::{simulate, SimulationOptions, SimulationRun};
use reveal_core::{Experience, ExperienceDeps, TrackId, Winner};

fn desktop_experience(config: RevealConfig) -> Experience {
    Experience::new(
        config,
        ExperienceDeps {
            backend: Box::new(ScriptedBackend::new()),
            unlock: Box::new(AlwaysUnlocked),
            haptics: Box::new(NullHaptics),
            share: Box::new(ClipboardOnlyTarget::new()),
            is_mobile: false,
        },
    )
}

fn phases_entered(run: &SimulationRun) -> Vec<Phase> {
    run.events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseEntered { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect()
}

#[test]
fn celebration_entry_lands_exactly_on_the_configured_total() {
    let config = RevealConfig::default();
    let total = config.timing.total_until_celebration_ms();
    // 1000 + 10*1000 + 14000 + 5*1200 + 20000 + 8000
    assert_eq!(total, 59_000);

    let mut exp = desktop_experience(config.clone());
    exp.start(0);
    exp.tick_at(total - 1);
    assert_eq!(exp.phase(), Phase::Reveal);
    exp.tick_at(total);
    assert_eq!(exp.phase(), Phase::Celebration);

    // Music starts only after the settle delay.
    assert!(!exp.is_track_playing(TrackId::Celebration));
    exp.tick_at(total + config.timing.celebration_settle_ms);
    assert!(exp.is_track_playing(TrackId::Celebration));
}

#[test]
fn every_phase_is_entered_once_in_order() {
    let run = simulate(RevealConfig::default(), SimulationOptions::default());
    assert_eq!(
        phases_entered(&run),
        vec![
            Phase::Countdown,
            Phase::Mystery,
            Phase::Buildup,
            Phase::Duel,
            Phase::Reveal,
            Phase::Celebration,
        ]
    );
    assert_eq!(run.count("ExperienceStarted"), 1);
}

#[test]
fn a_second_start_gesture_changes_nothing() {
    let mut exp = desktop_experience(RevealConfig::default());
    exp.start(0);
    let deadline = exp.next_deadline_ms();
    exp.drain_events();

    exp.start(250);
    let kinds: Vec<_> = exp.drain_events().iter().map(|e| e.kind()).collect();
    assert!(kinds.contains(&"StartIgnored"));
    assert!(!kinds.contains(&"ExperienceStarted"));
    assert_eq!(exp.next_deadline_ms(), deadline);
    assert_eq!(exp.phase(), Phase::Countdown);
}

#[test]
fn nothing_else_is_audible_when_celebration_begins() {
    let config = RevealConfig::default();
    let total = config.timing.total_until_celebration_ms();
    let mut exp = desktop_experience(config);
    exp.start(0);

    let mut now = 0;
    while now < total {
        now += 50;
        exp.tick_at(now);
        if exp.phase() == Phase::Celebration {
            break;
        }
    }
    assert_eq!(exp.phase(), Phase::Celebration);
    assert!(!exp.anything_audible_except(Some(TrackId::Celebration)));
}

#[test]
fn the_duel_always_ends_on_the_configured_winner() {
    for winner in [Winner::Girl, Winner::Boy] {
        let config = RevealConfig {
            winner,
            ..RevealConfig::default()
        };
        let run = simulate(config, SimulationOptions::default());
        let announced: Vec<_> = run
            .events
            .iter()
            .filter_map(|e| match e {
                Event::WinnerAnnounced { winner, .. } => Some(*winner),
                _ => None,
            })
            .collect();
        assert_eq!(announced, vec![winner]);

        let final_powers = run
            .events
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::DuelStageChanged {
                    girl_power,
                    boy_power,
                    ..
                } => Some((*girl_power, *boy_power)),
                _ => None,
            })
            .unwrap();
        match winner {
            Winner::Girl => assert_eq!(final_powers, (100, 0)),
            Winner::Boy => assert_eq!(final_powers, (0, 100)),
        }
    }
}

#[test]
fn blocked_celebration_playback_escalates_to_the_manual_control() {
    let run = simulate(
        RevealConfig::default(),
        SimulationOptions {
            reject_celebration: 2,
            ..SimulationOptions::default()
        },
    );
    assert!(run.fallback_shown);
    assert_eq!(run.count("PlaybackBlocked"), 2);
    assert_eq!(run.count("FallbackShown"), 1);
    assert!(!run.celebration_playing);

    // Pressing the control recovers playback.
    let recovered = simulate(
        RevealConfig::default(),
        SimulationOptions {
            reject_celebration: 2,
            press_fallback: true,
            ..SimulationOptions::default()
        },
    );
    assert!(recovered.celebration_playing);
}

#[test]
fn a_single_block_recovers_without_user_help() {
    let run = simulate(
        RevealConfig::default(),
        SimulationOptions {
            reject_celebration: 1,
            ..SimulationOptions::default()
        },
    );
    assert!(!run.fallback_shown);
    assert!(run.celebration_playing);
    assert_eq!(run.count("PlaybackBlocked"), 1);
}

#[test]
fn restart_cancels_every_pending_deadline() {
    let mut exp = desktop_experience(RevealConfig::default());
    exp.start(0);
    exp.tick_at(12_000);
    assert_eq!(exp.phase(), Phase::Mystery);

    exp.restart(12_500);
    assert_eq!(exp.phase(), Phase::Landing);
    assert!(exp.timeline_drained());
    assert!(!exp.anything_audible_except(None));

    // No stale timer fires, no matter how far the clock advances.
    exp.drain_events();
    exp.tick_at(u64::MAX);
    assert!(exp
        .drain_events()
        .iter()
        .all(|e| e.kind() != "PhaseEntered"));
    assert_eq!(exp.phase(), Phase::Landing);
}

proptest! {
    // Phase progress must be monotonic under any tick cadence, including
    // wildly irregular ones (tab throttling, busy main thread).
    #[test]
    fn phases_never_move_backward(quanta in prop::collection::vec(1u64..4_000, 1..120)) {
        let mut exp = desktop_experience(RevealConfig::default());
        exp.start(0);
        let mut now = 0u64;
        let mut last = exp.phase().index();
        for q in quanta {
            now += q;
            exp.tick_at(now);
            let idx = exp.phase().index();
            prop_assert!(idx >= last);
            last = idx;
        }
    }

    // However late ticks arrive, once past the total the run is complete
    // and every phase was visited in order.
    #[test]
    fn late_ticks_still_visit_every_phase(quantum in 1u64..10_000) {
        let config = RevealConfig::default();
        let total = config.timing.total_until_celebration_ms();
        let mut exp = desktop_experience(config);
        exp.start(0);

        let mut seen = Vec::new();
        let mut now = 0u64;
        while now <= total + quantum {
            now += quantum;
            exp.tick_at(now);
            for event in exp.drain_events() {
                if let Event::PhaseEntered { phase, .. } = event {
                    seen.push(phase);
                }
            }
        }
        prop_assert_eq!(seen, vec![
            Phase::Countdown,
            Phase::Mystery,
            Phase::Buildup,
            Phase::Duel,
            Phase::Reveal,
            Phase::Celebration,
        ]);
    }
}
