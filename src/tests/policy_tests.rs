// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::policy::{AccessPolicy, PolicyOptions};
use crate::replay::StateDeriver;
use crate::tests::determinism_tests::generate_history;
use crate::tests::fixtures::{quiz, sample_graph};
use crate::types::enums::{AccessReason, VisualState};
use crate::types::id::NodeId;
use crate::state::user_state::UserState;

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

#[test]
fn test_root_node_is_accessible() {
    let policy = AccessPolicy::new(sample_graph());
    let decision = policy.can_access(&id("basics"), &UserState::default());
    assert!(decision.allowed);
    assert_eq!(decision.reason, AccessReason::PrereqsMet);
}

#[test]
fn test_missing_prerequisite_denies() {
    let policy = AccessPolicy::new(sample_graph());
    let decision = policy.can_access(&id("loops"), &UserState::default());
    assert!(!decision.allowed);
    assert_eq!(decision.reason, AccessReason::PrereqMissing);
}

#[test]
fn test_unknown_node_not_found() {
    let policy = AccessPolicy::new(sample_graph());
    let decision = policy.can_access(&id("nope"), &UserState::default());
    assert!(!decision.allowed);
    assert_eq!(decision.reason, AccessReason::NotFound);
    assert_eq!(policy.visual_state(&id("nope"), &UserState::default()), VisualState::LockedFar);
}

#[test]
fn test_override_allows_everything() {
    let mut policy = AccessPolicy::new(sample_graph());
    policy.configure(PolicyOptions { override_mode: true });

    for node in ["basics", "traits", "does-not-exist"] {
        let decision = policy.can_access(&id(node), &UserState::default());
        assert!(decision.allowed, "{node}");
        assert_eq!(decision.reason, AccessReason::Override);
    }

    policy.configure(PolicyOptions { override_mode: false });
    assert!(!policy.can_access(&id("traits"), &UserState::default()).allowed);
}

#[test]
fn test_locked_near_then_unlocked() {
    let policy = AccessPolicy::new(sample_graph());
    let deriver = StateDeriver::default();

    let empty = deriver.derive(&[], None);
    assert_eq!(policy.visual_state(&id("loops"), &empty), VisualState::LockedNear);
    assert_eq!(policy.visual_state(&id("traits"), &empty), VisualState::LockedFar);

    let after = deriver.derive(&[quiz(1, "basics", true, Some(10))], None);
    assert_eq!(policy.visual_state(&id("loops"), &after), VisualState::UnlockedNew);
    assert_eq!(policy.visual_state(&id("basics"), &after), VisualState::Completed);
}

#[test]
fn test_in_progress_after_wrong_answer() {
    let policy = AccessPolicy::new(sample_graph());
    let state = StateDeriver::default().derive(&[quiz(1, "basics", false, Some(0))], None);
    assert_eq!(policy.visual_state(&id("basics"), &state), VisualState::InProgress);
}

#[test]
fn test_two_unmet_prerequisites_then_one() {
    let policy = AccessPolicy::new(sample_graph());
    let deriver = StateDeriver::default();
    let history = vec![quiz(1, "basics", true, None), quiz(2, "loops", true, None)];

    let state = deriver.derive(&history[..1], None);
    assert_eq!(policy.visual_state(&id("traits"), &state), VisualState::LockedFar);
    let state = deriver.derive(&history, None);
    assert_eq!(policy.visual_state(&id("traits"), &state), VisualState::LockedNear);
}

#[test]
fn test_next_node_in_graph_order() {
    let policy = AccessPolicy::new(sample_graph());
    let deriver = StateDeriver::default();

    let state = deriver.derive(&[], None);
    assert_eq!(policy.next_node(&state).map(|n| n.id.as_str()), Some("basics"));

    let state = deriver.derive(&[quiz(1, "basics", true, None)], None);
    let available: Vec<_> = policy.available_nodes(&state).iter().map(|n| n.id.as_str()).collect();
    assert_eq!(available, vec!["loops", "types", "intro-video"]);
    assert_eq!(policy.next_node(&state).map(|n| n.id.as_str()), Some("loops"));
}

#[test]
fn test_all_complete_has_no_next_node() {
    let policy = AccessPolicy::new(sample_graph());
    let history: Vec<_> = ["basics", "loops", "types", "traits", "intro-video"]
        .iter()
        .enumerate()
        .map(|(i, n)| quiz(i as u64, n, true, None))
        .collect();
    let state = StateDeriver::default().derive(&history, None);
    assert!(policy.next_node(&state).is_none());
    assert!(policy.available_nodes(&state).is_empty());
}

#[test]
fn test_visual_state_never_regresses() {
    let policy = AccessPolicy::new(sample_graph());
    let deriver = StateDeriver::default();

    for seed in [3u64, 11, 2024] {
        let history = generate_history(seed, 40);
        for node in policy.graph().iter() {
            let mut previous = VisualState::LockedFar;
            for k in 0..=history.len() {
                let state = deriver.derive(&history[..k], None);
                let current = policy.visual_state(&node.id, &state);
                assert!(current >= previous, "{} regressed from {:?} to {:?}", node.id, previous, current);
                previous = current;
            }
        }
    }
}
