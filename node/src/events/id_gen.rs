// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Monotonic event id generation.

use rand::Rng;
use skillpath_kernel::types::id::EventId;

/// Issues strictly increasing `EventId`s.
///
/// Time is clamped so it never runs behind the last issued id; ids sharing a
/// millisecond are ordered by `seq`. A random `salt` keeps ids unique across
/// clients writing the same millisecond.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    last: Option<EventId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure later ids sort after `id` (used when reopening a log).
    pub fn observe(&mut self, id: EventId) {
        if self.last.map_or(true, |last| id > last) {
            self.last = Some(id);
        }
    }

    pub fn next(&mut self, now_millis: u64) -> EventId {
        let (millis, seq) = match self.last {
            Some(last) if now_millis <= last.millis => match last.seq.checked_add(1) {
                Some(seq) => (last.millis, seq),
                None => (last.millis + 1, 0),
            },
            _ => (now_millis, 0),
        };
        let id = EventId::new(millis, seq, rand::thread_rng().gen());
        self.last = Some(id);
        id
    }
}
