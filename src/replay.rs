//! Deterministic derivation of `UserState` from an event history.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

use crate::config::ScoringRules;
use crate::event::Event;
use crate::state::user_state::UserState;
use crate::types::enums::EventType;
use crate::types::id::EventId;

/// Pure reducer over event histories.
///
/// # Invariants
/// - No I/O, no clock, no randomness
/// - Events are folded in `(timestamp, id)` order on both paths
/// - `derive(h, None) == derive(h, Some(&derive(prefix, None)))` for any
///   prefix of `h` in that order
#[derive(Clone, Debug, Default)]
pub struct StateDeriver {
    rules: ScoringRules,
}

impl StateDeriver {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn initial_state(&self) -> UserState {
        UserState::empty(self.rules.level_width())
    }

    /// Folds `history` into a state.
    ///
    /// When `prior` is given and its high-water mark appears in `history`,
    /// only the events after the mark are folded into a copy of `prior`.
    /// Otherwise the whole history is replayed from the initial state.
    pub fn derive(&self, history: &[Event], prior: Option<&UserState>) -> UserState {
        let mut ordered: Vec<&Event> = history.iter().collect();
        ordered.sort_by_key(|e| e.replay_key());

        if let Some(prior) = prior {
            if let Some(mark) = prior.last_processed_event_id {
                if let Some(pos) = ordered.iter().position(|e| e.id == mark) {
                    let mut state = prior.clone();
                    for event in &ordered[pos + 1..] {
                        self.apply(&mut state, event);
                    }
                    return state;
                }
            }
        }

        let mut state = self.initial_state();
        for event in ordered {
            self.apply(&mut state, event);
        }
        state
    }

    /// Folds a single event. Unrecognized event types only advance the mark.
    pub fn apply(&self, state: &mut UserState, event: &Event) {
        match &event.event_type {
            EventType::QuizAttempt => {
                if event.payload.correct.unwrap_or(false) {
                    let score = event.payload.score_awarded.unwrap_or(self.rules.quiz_base_score);
                    state.xp = state.xp.saturating_add(u64::from(score));
                    state.streak = state.streak.saturating_add(1);
                    if let Some(node) = event.node_id() {
                        state.completed_nodes.insert(node.clone());
                    }
                } else {
                    state.streak = 0;
                    if let Some(node) = event.node_id() {
                        state.attempted_nodes.insert(node.clone());
                    }
                }
            }
            EventType::VideoComplete => {
                state.xp = state.xp.saturating_add(u64::from(self.rules.video_xp));
                if let Some(node) = event.node_id() {
                    state.completed_nodes.insert(node.clone());
                }
            }
            EventType::Other(_) => {}
        }

        state.last_processed_event_id = Some(event.id);
        state.refresh_level(self.rules.level_width());
    }

    /// Cache freshness: true only when `state` has folded exactly up to
    /// `latest`, the newest event id of the history it was derived from.
    pub fn is_fresh(state: &UserState, latest: Option<EventId>) -> bool {
        state.last_processed_event_id == latest
    }
}
