//! Declarative phase timeline.
//!
//! Instead of nested delayed callbacks each holding their own handle, the
//! whole run is resolved up front into a list of (absolute deadline, action)
//! pairs polled by one scheduler. Restart cancels everything atomically with
//! [`Timeline::clear`].

use serde::{Deserialize, Serialize};

use super::duel::{DuelScript, DuelStage};
use crate::config::PhaseTimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineAction {
    BeginCountdown,
    CountdownTick { remaining: u32 },
    EnterMystery,
    EnterBuildup,
    BuildupTick { remaining: u32 },
    EnterDuel,
    /// Suspense cue shortly into the duel loading stage.
    DuelLoadingCue,
    DuelStage(DuelStage),
    /// Mid lock-in announcement beat.
    DuelAnnouncement,
    EnterReveal,
    EnterCelebration,
    /// Celebration music start, one settle delay after the exclusivity
    /// checkpoint at Celebration entry.
    CelebrationMusic,
}

#[derive(Debug, Clone)]
struct Entry {
    at_ms: u64,
    action: TimelineAction,
}

/// All pending deadlines for one run. Deadlines are set once at Start and
/// never rescheduled; they are authoritative over audio state.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    /// Resolve the full experience into absolute deadlines from `start_ms`.
    pub fn for_experience(start_ms: u64, timing: &PhaseTimingConfig) -> Self {
        let mut entries = Vec::new();
        let mut push = |at_ms: u64, action: TimelineAction| entries.push(Entry { at_ms, action });

        let t0 = start_ms + timing.prepare_ms;
        push(t0, TimelineAction::BeginCountdown);
        for i in 1..=timing.countdown {
            push(
                t0 + u64::from(i) * 1000,
                TimelineAction::CountdownTick {
                    remaining: timing.countdown - i,
                },
            );
        }

        let t_mystery = t0 + timing.countdown_ms();
        push(t_mystery, TimelineAction::EnterMystery);

        let t_buildup = t_mystery + timing.mystery_ms;
        push(t_buildup, TimelineAction::EnterBuildup);
        for i in 1..=timing.buildup_count {
            push(
                t_buildup + u64::from(i) * timing.buildup_tick_ms,
                TimelineAction::BuildupTick {
                    remaining: timing.buildup_count - i,
                },
            );
        }

        let t_duel = t_buildup + timing.buildup_ms();
        push(t_duel, TimelineAction::EnterDuel);
        push(t_duel + 500, TimelineAction::DuelLoadingCue);
        for stage in [
            DuelStage::FirstFavored,
            DuelStage::Reversal,
            DuelStage::WinnerLockedIn,
        ] {
            push(
                t_duel + DuelScript::stage_offset_ms(stage),
                TimelineAction::DuelStage(stage),
            );
        }
        push(
            t_duel + DuelScript::announcement_offset_ms(timing.duel_ms),
            TimelineAction::DuelAnnouncement,
        );

        let t_reveal = t_duel + timing.duel_ms;
        push(t_reveal, TimelineAction::EnterReveal);

        let t_celebration = t_reveal + timing.reveal_ms;
        push(t_celebration, TimelineAction::EnterCelebration);
        push(
            t_celebration + timing.celebration_settle_ms,
            TimelineAction::CelebrationMusic,
        );

        let mut timeline = Self { entries };
        // Stable by deadline so same-instant actions keep insertion order
        // (a CountdownTick{0} fires before the EnterMystery it triggers).
        timeline.entries.sort_by_key(|e| e.at_ms);
        timeline
    }

    /// Remove and return every action due at `now_ms`, in deadline order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<TimelineAction> {
        let mut due = Vec::new();
        self.entries.retain(|e| {
            if e.at_ms <= now_ms {
                due.push(e.action);
                false
            } else {
                true
            }
        });
        due
    }

    /// Cancel every pending deadline. The only cancellation event is a full
    /// restart; partial cancellation is not supported.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Deadline of the next pending action, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.entries.first().map(|e| e.at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseTimingConfig;

    fn timing() -> PhaseTimingConfig {
        PhaseTimingConfig::default()
    }

    #[test]
    fn poll_returns_due_actions_once() {
        let mut tl = Timeline::for_experience(0, &timing());
        let due = tl.poll(1000);
        assert_eq!(due, vec![TimelineAction::BeginCountdown]);
        assert!(tl.poll(1000).is_empty());
    }

    #[test]
    fn countdown_zero_precedes_mystery_at_same_instant() {
        let mut tl = Timeline::for_experience(0, &timing());
        // prepare (1s) + 10s countdown: tick{0} and EnterMystery both at 11s.
        let due = tl.poll(11_000);
        let last_two: Vec<_> = due.iter().rev().take(2).rev().collect();
        assert_eq!(
            last_two,
            vec![
                &TimelineAction::CountdownTick { remaining: 0 },
                &TimelineAction::EnterMystery
            ]
        );
    }

    #[test]
    fn celebration_music_waits_for_settle_delay() {
        let t = timing();
        let mut tl = Timeline::for_experience(0, &t);
        let total = t.total_until_celebration_ms();
        let due = tl.poll(total);
        assert!(due.contains(&TimelineAction::EnterCelebration));
        assert!(!due.contains(&TimelineAction::CelebrationMusic));
        let due = tl.poll(total + t.celebration_settle_ms);
        assert_eq!(due, vec![TimelineAction::CelebrationMusic]);
        assert!(tl.is_empty());
    }

    #[test]
    fn clear_cancels_everything() {
        let mut tl = Timeline::for_experience(0, &timing());
        assert!(!tl.is_empty());
        tl.clear();
        assert!(tl.poll(u64::MAX).is_empty());
    }
}
