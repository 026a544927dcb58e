// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Scoring configuration.

use serde::{Deserialize, Serialize};

/// Base score for a correct quiz answer when the event does not carry one.
pub const DEFAULT_QUIZ_SCORE: u32 = 10;

/// Fixed reward for finishing a video.
pub const DEFAULT_VIDEO_XP: u32 = 5;

/// Deduction per hint used on a quiz attempt.
pub const DEFAULT_HINT_PENALTY: u32 = 2;

/// XP width of one level.
pub const DEFAULT_XP_PER_LEVEL: u32 = 100;

/// Product tuning values. None of them are invariants of the log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub quiz_base_score: u32,
    pub video_xp: u32,
    pub hint_penalty: u32,
    /// Floor for a correct answer after hint penalties. Always at least 1.
    pub min_correct_score: u32,
    pub xp_per_level: u32,
    /// Used by numeric questions that do not declare their own tolerance.
    pub numeric_tolerance: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            quiz_base_score: DEFAULT_QUIZ_SCORE,
            video_xp: DEFAULT_VIDEO_XP,
            hint_penalty: DEFAULT_HINT_PENALTY,
            min_correct_score: 1,
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            numeric_tolerance: 0.001,
        }
    }
}

impl ScoringRules {
    /// Score awarded for an attempt.
    ///
    /// Incorrect answers score zero. Correct answers lose `hint_penalty` per
    /// hint but never drop below `min_correct_score` (clamped to 1).
    pub fn attempt_score(&self, correct: bool, hints_used: u32) -> u32 {
        if !correct {
            return 0;
        }
        let penalty = self.hint_penalty.saturating_mul(hints_used);
        self.quiz_base_score
            .saturating_sub(penalty)
            .max(self.min_correct_score.max(1))
    }

    /// Level width, treating a misconfigured zero as the default.
    pub fn level_width(&self) -> u32 {
        if self.xp_per_level == 0 {
            DEFAULT_XP_PER_LEVEL
        } else {
            self.xp_per_level
        }
    }
}
