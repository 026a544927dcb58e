// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Session Orchestrator
//!
//! The single entry point for "user submitted an attempt". Nothing else
//! chains the recorder, deriver and policy together.
//!
//! # Protocol
//! ```text
//! Attempt Input
//! ↓
//! 1. Duplicate submission check
//! ↓
//! 2. Node lookup, access gate, answer validation
//! ↓
//! 3. Record event (durable)
//! ↓
//! 4. Re-derive user state
//! ↓
//! 5. Next available node + celebration
//! ```
//!
//! Steps 1-2 fail without recording anything. A storage failure in 3 is
//! returned as-is. A submission counts as processed exactly when the log
//! holds an event carrying its id, so a backup restore that drops an event
//! also frees its submission id.

use serde::{Deserialize, Serialize};
use skillpath_kernel::answer::check_answer;
use skillpath_kernel::event::EventPayload;
use skillpath_kernel::graph::AnswerValue;
use skillpath_kernel::policy::{AccessPolicy, PolicyOptions};
use skillpath_kernel::replay::StateDeriver;
use skillpath_kernel::state::UserState;
use skillpath_kernel::types::enums::{AccessDecision, EventType, NodeKind, VisualState};
use skillpath_kernel::types::id::{EventId, NodeId, UserId};

use crate::celebration::{Celebration, CelebrationPolicy};
use crate::errors::SessionError;
use crate::events::recorder::EventRecorder;
use crate::events::state_cache::StateCache;
use crate::storage::KeyValueStore;

pub type Result<T> = std::result::Result<T, SessionError>;

/// What the UI submits for one attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptInput {
    pub answer: AnswerValue,
    #[serde(default)]
    pub time_spent_ms: u64,
    #[serde(default)]
    pub hints_used: u32,
    /// Client-generated; the same id is only ever processed once.
    pub submission_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub is_correct: bool,
    pub message: String,
    pub celebration_trigger: Option<Celebration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    /// Whether the attempt completed the node.
    pub success: bool,
    pub event_id: EventId,
    /// `None` when nothing accessible is left to complete.
    pub next_node: Option<NodeId>,
    pub progress_update: UserState,
    pub feedback: Feedback,
}

pub struct SessionOrchestrator<S: KeyValueStore> {
    recorder: EventRecorder<S>,
    deriver: StateDeriver,
    policy: AccessPolicy,
    celebrations: Box<dyn CelebrationPolicy + Send + Sync>,
    cache: StateCache,
}

impl<S: KeyValueStore> SessionOrchestrator<S> {
    pub fn new(
        recorder: EventRecorder<S>,
        deriver: StateDeriver,
        policy: AccessPolicy,
        celebrations: Box<dyn CelebrationPolicy + Send + Sync>,
    ) -> Self {
        Self {
            recorder,
            deriver,
            policy,
            celebrations,
            cache: StateCache::new(),
        }
    }

    pub fn complete_attempt(&mut self, user_id: &UserId, node_id: &NodeId, input: AttemptInput) -> Result<CompletionResult> {
        metrics::counter!("skillpath_attempts_total", 1);

        // 1. Idempotency
        let submission = input.submission_id.trim().to_string();
        if submission.is_empty() {
            return Err(SessionError::InvalidAttempt("submission id is required".into()));
        }
        let history = self.recorder.history(user_id)?;
        let already_recorded = history
            .iter()
            .any(|e| e.payload.submission_id.as_deref() == Some(submission.as_str()));
        if already_recorded {
            tracing::warn!(user = %user_id, submission = %submission, "Duplicate submission rejected");
            return Err(SessionError::DuplicateSubmission(submission));
        }

        // 2. Validation
        let node = self
            .policy
            .graph()
            .get(node_id)
            .ok_or_else(|| SessionError::NodeNotFound(node_id.to_string()))?
            .clone();

        let before = self.cache.refresh(&self.deriver, user_id, &history);
        if !self.policy.can_access(node_id, &before).allowed {
            return Err(SessionError::NodeLocked(node_id.to_string()));
        }

        let rules = self.deriver.rules();
        let (event_type, correct, score) = match (&node.question, &node.kind) {
            (Some(question), _) => {
                let correct = check_answer(question, &input.answer, rules)?;
                (EventType::QuizAttempt, correct, rules.attempt_score(correct, input.hints_used))
            }
            (None, NodeKind::Video) => (EventType::VideoComplete, true, rules.video_xp),
            (None, _) => return Err(SessionError::MissingQuestion(node_id.to_string())),
        };

        // 3. Record
        let payload = EventPayload {
            node_id: Some(node_id.clone()),
            correct: Some(correct),
            score_awarded: Some(score),
            submission_id: Some(submission),
            time_spent_ms: Some(input.time_spent_ms),
            hints_used: Some(input.hints_used),
            ..Default::default()
        };
        let event_id = self.recorder.record(user_id, event_type, payload)?;

        // 4. Derive
        let history = self.recorder.history(user_id)?;
        let after = self.cache.refresh(&self.deriver, user_id, &history);

        // 5. Next node and feedback
        let next_node = self.policy.next_node(&after).map(|n| n.id.clone());
        let celebration_trigger = self.celebrations.detect(&before, &after, &self.policy);
        let message = if correct {
            format!("Correct! +{} XP", score)
        } else {
            "Not quite. Give it another try.".to_string()
        };

        tracing::info!(
            user = %user_id,
            node = %node_id,
            correct,
            score,
            xp = after.xp,
            streak = after.streak,
            "Attempt completed"
        );

        Ok(CompletionResult {
            success: correct,
            event_id,
            next_node,
            progress_update: after,
            feedback: Feedback {
                is_correct: correct,
                message,
                celebration_trigger,
            },
        })
    }

    /// Current derived state, reusing the cache when it is fresh.
    pub fn user_state(&mut self, user_id: &UserId) -> Result<UserState> {
        let history = self.recorder.history(user_id)?;
        Ok(self.cache.refresh(&self.deriver, user_id, &history))
    }

    pub fn can_access(&mut self, user_id: &UserId, node_id: &NodeId) -> Result<AccessDecision> {
        let state = self.user_state(user_id)?;
        Ok(self.policy.can_access(node_id, &state))
    }

    pub fn visual_state(&mut self, user_id: &UserId, node_id: &NodeId) -> Result<VisualState> {
        let state = self.user_state(user_id)?;
        Ok(self.policy.visual_state(node_id, &state))
    }

    /// Visual state of every node, in graph order.
    pub fn skill_map(&mut self, user_id: &UserId) -> Result<Vec<(NodeId, VisualState)>> {
        let state = self.user_state(user_id)?;
        Ok(self
            .policy
            .graph()
            .iter()
            .map(|n| (n.id.clone(), self.policy.visual_state(&n.id, &state)))
            .collect())
    }

    pub fn set_override_mode(&mut self, override_mode: bool) {
        self.policy.configure(PolicyOptions { override_mode });
        tracing::info!(override_mode, "Override mode updated");
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn recorder_mut(&mut self) -> &mut EventRecorder<S> {
        &mut self.recorder
    }
}
