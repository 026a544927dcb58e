// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use common::{course, FaultyStore};
use skillpath_kernel::graph::AnswerValue;
use skillpath_kernel::types::enums::{AccessReason, EventType, VisualState};
use skillpath_kernel::types::id::{NodeId, UserId};
use skillpath_node::celebration::Celebration;
use skillpath_node::clock::ManualClock;
use skillpath_node::config::NodeConfig;
use skillpath_node::engine::build_session;
use skillpath_node::errors::SessionError;
use skillpath_node::events::event_log::StoreError;
use skillpath_node::session::{AttemptInput, SessionOrchestrator};
use skillpath_node::storage::{FileStore, KeyValueStore, MemoryStore};
use tempfile::tempdir;

fn attempt(answer: impl Into<AnswerValue>, submission: &str) -> AttemptInput {
    AttemptInput {
        answer: answer.into(),
        time_spent_ms: 1_500,
        hints_used: 0,
        submission_id: submission.to_string(),
    }
}

fn session<S: KeyValueStore>(store: S) -> SessionOrchestrator<S> {
    build_session(&NodeConfig::default(), store, course(), Box::new(ManualClock::new(1_700_000_000_000)))
}

fn learner() -> UserId {
    UserId::new("learner")
}

fn node(id: &str) -> NodeId {
    NodeId::new(id)
}

#[test]
fn test_correct_attempt_completes_node() {
    let mut s = session(MemoryStore::new());
    let result = s.complete_attempt(&learner(), &node("intro"), attempt("B", "sub-1")).unwrap();

    assert!(result.success);
    assert!(result.feedback.is_correct);
    assert_eq!(result.feedback.message, "Correct! +10 XP");
    assert_eq!(result.feedback.celebration_trigger, None);
    assert_eq!(result.progress_update.xp, 10);
    assert_eq!(result.progress_update.streak, 1);
    assert!(result.progress_update.has_completed(&node("intro")));
    assert_eq!(result.progress_update.last_processed_event_id, Some(result.event_id));
    assert_eq!(result.next_node, Some(node("numbers")));
}

#[test]
fn test_incorrect_attempt_resets_streak() {
    let mut s = session(MemoryStore::new());
    s.complete_attempt(&learner(), &node("clip"), attempt("", "v-1")).unwrap();
    s.complete_attempt(&learner(), &node("intro"), attempt("B", "sub-1")).unwrap();

    let result = s.complete_attempt(&learner(), &node("numbers"), attempt(7.0, "sub-2")).unwrap();
    assert!(!result.success);
    assert_eq!(result.feedback.message, "Not quite. Give it another try.");
    assert_eq!(result.progress_update.streak, 0);
    assert_eq!(result.progress_update.xp, 15);
    assert!(result.progress_update.has_attempted(&node("numbers")));
    assert!(!result.progress_update.has_completed(&node("numbers")));
    assert_eq!(result.next_node, Some(node("numbers")));
}

#[test]
fn test_answer_kinds() {
    let mut s = session(MemoryStore::new());
    let user = learner();
    s.complete_attempt(&user, &node("intro"), attempt("B", "a")).unwrap();

    let numeric = s.complete_attempt(&user, &node("numbers"), attempt(42.0005, "b")).unwrap();
    assert!(numeric.success);

    // Numeric answers typed as text still parse
    let mut s2 = session(MemoryStore::new());
    s2.complete_attempt(&user, &node("intro"), attempt("B", "a")).unwrap();
    assert!(s2.complete_attempt(&user, &node("numbers"), attempt("42", "b")).unwrap().success);

    let text = s.complete_attempt(&user, &node("words"), attempt("  borrow ", "c")).unwrap();
    assert!(text.success);
    assert_eq!(text.next_node, Some(node("capstone")));
}

#[test]
fn test_hint_penalty_reduces_score() {
    let mut s = session(MemoryStore::new());
    let input = AttemptInput { hints_used: 3, ..attempt("B", "h-1") };
    let result = s.complete_attempt(&learner(), &node("intro"), input).unwrap();

    assert_eq!(result.progress_update.xp, 4);
    assert_eq!(result.feedback.message, "Correct! +4 XP");

    let many = AttemptInput { hints_used: 50, ..attempt("B", "h-2") };
    let result = s.complete_attempt(&learner(), &node("intro"), many).unwrap();
    assert_eq!(result.progress_update.xp, 5, "a correct answer is worth at least 1");
}

#[test]
fn test_duplicate_submission_records_once() {
    let mut s = session(MemoryStore::new());
    let user = learner();
    s.complete_attempt(&user, &node("intro"), attempt("B", "dup")).unwrap();

    let err = s.complete_attempt(&user, &node("intro"), attempt("B", "dup")).unwrap_err();
    assert!(matches!(err, SessionError::DuplicateSubmission(ref id) if id == "dup"));

    assert_eq!(s.recorder_mut().history(&user).unwrap().len(), 1);
    assert_eq!(s.user_state(&user).unwrap().xp, 10);

    // Submission ids are scoped per user
    let other = UserId::new("someone-else");
    s.complete_attempt(&other, &node("intro"), attempt("B", "dup")).unwrap();
}

#[test]
fn test_blank_submission_id_rejected() {
    let mut s = session(MemoryStore::new());
    let err = s.complete_attempt(&learner(), &node("intro"), attempt("B", "  ")).unwrap_err();
    assert!(matches!(err, SessionError::InvalidAttempt(_)));
    assert!(s.recorder_mut().log_mut().is_empty().unwrap());
}

#[test]
fn test_validation_errors_record_nothing() {
    let mut s = session(MemoryStore::new());
    let user = learner();

    let err = s.complete_attempt(&user, &node("missing"), attempt("B", "1")).unwrap_err();
    assert!(matches!(err, SessionError::NodeNotFound(_)));

    let err = s.complete_attempt(&user, &node("capstone"), attempt("done", "2")).unwrap_err();
    assert!(matches!(err, SessionError::NodeLocked(_)));

    let err = s.complete_attempt(&user, &node("essay"), attempt("prose", "3")).unwrap_err();
    assert!(matches!(err, SessionError::UnknownQuestionType(ref kind) if kind == "essay"));

    let err = s.complete_attempt(&user, &node("notes"), attempt("", "4")).unwrap_err();
    assert!(matches!(err, SessionError::MissingQuestion(_)));

    assert!(s.recorder_mut().log_mut().is_empty().unwrap());

    // Failed validation does not consume the submission id
    s.complete_attempt(&user, &node("intro"), attempt("B", "1")).unwrap();
}

#[test]
fn test_video_node_records_completion() {
    let mut s = session(MemoryStore::new());
    let user = learner();
    let result = s.complete_attempt(&user, &node("clip"), attempt("", "v")).unwrap();

    assert!(result.success);
    assert_eq!(result.progress_update.xp, 5);
    assert_eq!(result.progress_update.streak, 0);

    let history = s.recorder_mut().history(&user).unwrap();
    assert_eq!(history[0].event_type, EventType::VideoComplete);
    assert_eq!(history[0].node_id(), Some(&node("clip")));
}

#[test]
fn test_override_mode_unlocks_everything() {
    let mut s = session(MemoryStore::new());
    let user = learner();

    let decision = s.can_access(&user, &node("capstone")).unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, AccessReason::PrereqMissing);

    s.set_override_mode(true);
    let decision = s.can_access(&user, &node("capstone")).unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, AccessReason::Override);
    assert_eq!(s.visual_state(&user, &node("capstone")).unwrap(), VisualState::LockedFar);

    let result = s.complete_attempt(&user, &node("capstone"), attempt("Done", "o-1")).unwrap();
    assert!(result.success);

    s.set_override_mode(false);
    assert_eq!(s.visual_state(&user, &node("capstone")).unwrap(), VisualState::Completed);
}

#[test]
fn test_override_mode_from_config() {
    let cfg = NodeConfig {
        override_mode: true,
        ..Default::default()
    };
    let mut s = build_session(&cfg, MemoryStore::new(), course(), Box::new(ManualClock::new(1)));
    assert!(s.policy().override_mode());
    assert!(s.complete_attempt(&learner(), &node("words"), attempt("borrow", "x")).unwrap().success);
}

#[test]
fn test_skill_map_progression() {
    let mut s = session(MemoryStore::new());
    let user = learner();

    let map: Vec<_> = s.skill_map(&user).unwrap();
    assert_eq!(map[0], (node("intro"), VisualState::UnlockedNew));
    assert_eq!(map[1], (node("numbers"), VisualState::LockedNear));
    assert_eq!(map[3], (node("capstone"), VisualState::LockedFar));

    s.complete_attempt(&user, &node("intro"), attempt("B", "1")).unwrap();
    s.complete_attempt(&user, &node("numbers"), attempt(0.0, "2")).unwrap();

    let map = s.skill_map(&user).unwrap();
    assert_eq!(map[0].1, VisualState::Completed);
    assert_eq!(map[1].1, VisualState::InProgress);
    assert_eq!(map[2].1, VisualState::UnlockedNew);
    assert_eq!(map[3].1, VisualState::LockedFar);
}

#[test]
fn test_storage_failure_propagates_and_can_retry() {
    let mut s = session(FaultyStore::new());
    let user = learner();
    s.complete_attempt(&user, &node("intro"), attempt("B", "1")).unwrap();

    s.recorder_mut().log_mut().storage_mut().fail_put("skillpath:staging");
    let err = s.complete_attempt(&user, &node("numbers"), attempt(42.0, "2")).unwrap_err();
    assert!(
        matches!(err.store_error(), Some(StoreError::WriteError { restored: true, .. })),
        "{err:?}"
    );

    // Nothing changed, and the submission id was not consumed
    let state = s.user_state(&user).unwrap();
    assert_eq!(state.xp, 10);
    assert!(!state.has_completed(&node("numbers")));

    let retry = s.complete_attempt(&user, &node("numbers"), attempt(42.0, "2")).unwrap();
    assert!(retry.success);
    assert_eq!(retry.progress_update.xp, 20);
}

#[test]
fn test_restart_rejects_duplicate_and_keeps_progress() {
    let dir = tempdir().unwrap();
    let user = learner();

    {
        let mut s = session(FileStore::open(dir.path()).unwrap());
        s.complete_attempt(&user, &node("intro"), attempt("B", "before-restart")).unwrap();
        s.complete_attempt(&user, &node("words"), attempt("borrow", "w")).unwrap();
    }

    let mut s = session(FileStore::open(dir.path()).unwrap());
    let err = s
        .complete_attempt(&user, &node("intro"), attempt("B", "before-restart"))
        .unwrap_err();
    assert!(matches!(err, SessionError::DuplicateSubmission(_)));

    let state = s.user_state(&user).unwrap();
    assert_eq!(state.xp, 20);
    assert_eq!(state.streak, 2);
    assert_eq!(s.recorder_mut().history(&user).unwrap().len(), 2);
}

#[test]
fn test_submission_lost_to_backup_restore_can_be_resubmitted() {
    let mut s = session(MemoryStore::new());
    let user = learner();
    s.complete_attempt(&user, &node("intro"), attempt("A", "s1")).unwrap();
    s.complete_attempt(&user, &node("intro"), attempt("B", "s2")).unwrap();

    // 1. Corrupt the committed checksum; the backup holds only s1
    s.recorder_mut()
        .log_mut()
        .storage_mut()
        .put("skillpath:checksum", "0000000000000000")
        .unwrap();

    // 2. The healed log no longer has s2
    let state = s.user_state(&user).unwrap();
    assert!(!state.has_completed(&node("intro")));
    assert_eq!(s.recorder_mut().history(&user).unwrap().len(), 1);

    // 3. s2 is accepted again, s1 is still a duplicate
    let retry = s.complete_attempt(&user, &node("intro"), attempt("B", "s2")).unwrap();
    assert!(retry.success);
    assert_eq!(retry.progress_update.xp, 10);

    let err = s.complete_attempt(&user, &node("intro"), attempt("A", "s1")).unwrap_err();
    assert!(matches!(err, SessionError::DuplicateSubmission(_)));
    assert_eq!(s.recorder_mut().history(&user).unwrap().len(), 2);
}

#[test]
fn test_milestone_celebration() {
    let cfg = NodeConfig {
        celebrations: true,
        streak_milestones: vec![2],
        ..Default::default()
    };
    let mut s = build_session(&cfg, MemoryStore::new(), course(), Box::new(ManualClock::new(1)));
    let user = learner();

    let first = s.complete_attempt(&user, &node("intro"), attempt("B", "1")).unwrap();
    assert_eq!(first.feedback.celebration_trigger, None);

    let second = s.complete_attempt(&user, &node("words"), attempt("borrow", "2")).unwrap();
    assert_eq!(
        second.feedback.celebration_trigger,
        Some(Celebration::StreakMilestone { streak: 2 })
    );
}

#[test]
fn test_users_are_isolated() {
    let mut s = session(MemoryStore::new());
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    s.complete_attempt(&alice, &node("intro"), attempt("B", "1")).unwrap();
    assert_eq!(s.user_state(&bob).unwrap().xp, 0);
    assert!(!s.can_access(&bob, &node("numbers")).unwrap().allowed);
    assert!(s.can_access(&alice, &node("numbers")).unwrap().allowed);
}
