// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Closed tag sets shared by events, the skill graph and the access policy.

use serde::{Deserialize, Serialize};

/// Event type tag.
///
/// Tags written by newer clients deserialize into `Other` and are ignored by
/// derivation until a fold rule exists for them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    QuizAttempt,
    VideoComplete,
    #[serde(untagged)]
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::QuizAttempt => "quiz-attempt",
            EventType::VideoComplete => "video-complete",
            EventType::Other(tag) => tag,
        }
    }
}

/// Kind of content a skill node represents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Quiz,
    Video,
    Reading,
    Project,
    #[serde(untagged)]
    Other(String),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Quiz
    }
}

/// Question format attached to a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    Numeric,
    Text,
    #[serde(untagged)]
    Other(String),
}

/// Why an access decision came out the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessReason {
    Override,
    NotFound,
    PrereqsMet,
    PrereqMissing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

/// UI status of a node relative to one user's progress.
///
/// Variants are declared in lifecycle order; for a single user a node only
/// ever moves forward through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualState {
    LockedFar,
    LockedNear,
    UnlockedNew,
    InProgress,
    Completed,
}
