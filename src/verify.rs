//! Deterministic hashing of derived state.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::state::user_state::UserState;

/// Computes the BLAKE3 fingerprint of a `UserState`.
///
/// Covers every field, including the high-water mark, so two states hash
/// equal only when full and incremental derivation agree bit for bit.
/// Strings are length-prefixed; sets are hashed in their sorted order.
pub fn user_state_hash(state: &UserState) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&state.xp.to_le_bytes());
    hasher.update(&state.streak.to_le_bytes());
    hasher.update(&state.level.to_le_bytes());
    hasher.update(&state.xp_to_next_level.to_le_bytes());

    for set in [&state.completed_nodes, &state.attempted_nodes] {
        hasher.update(&(set.len() as u64).to_le_bytes());
        for node in set.iter() {
            hasher.update(&(node.0.len() as u64).to_le_bytes());
            hasher.update(node.0.as_bytes());
        }
    }

    match state.last_processed_event_id {
        Some(id) => {
            hasher.update(&[1]);
            hasher.update(&id.millis.to_le_bytes());
            hasher.update(&id.seq.to_le_bytes());
            hasher.update(&id.salt.to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }

    *hasher.finalize().as_bytes()
}

/// Lowercase hex rendering of a fingerprint.
pub fn hex_fingerprint(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

impl UserState {
    pub fn fingerprint(&self) -> [u8; 32] {
        user_state_hash(self)
    }
}
