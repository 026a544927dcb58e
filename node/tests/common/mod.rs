// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::collections::HashMap;

use skillpath_kernel::graph::{AnswerValue, Question, SkillGraph, SkillNode};
use skillpath_kernel::types::enums::{NodeKind, QuestionType};
use skillpath_node::storage::{KeyValueStore, MemoryStore, StorageError};

/// MemoryStore wrapper that fails the next N writes to chosen keys.
#[derive(Debug, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_puts: HashMap<String, usize>,
    pub fail_removes: HashMap<String, usize>,
}

fn trip(failures: &mut HashMap<String, usize>, key: &str) -> bool {
    match failures.get_mut(key) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next put to `key` fails.
    pub fn fail_put(&mut self, key: &str) {
        self.fail_put_times(key, 1);
    }

    pub fn fail_put_times(&mut self, key: &str, times: usize) {
        self.fail_puts.insert(key.to_string(), times);
    }

    pub fn fail_remove(&mut self, key: &str) {
        self.fail_removes.insert(key.to_string(), 1);
    }

    pub fn heal(&mut self) {
        self.fail_puts.clear();
        self.fail_removes.clear();
    }
}

impl KeyValueStore for FaultyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if trip(&mut self.fail_puts, key) {
            return Err(StorageError::Unavailable(format!("injected put failure on {key}")));
        }
        self.inner.put(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if trip(&mut self.fail_removes, key) {
            return Err(StorageError::Unavailable(format!("injected remove failure on {key}")));
        }
        self.inner.remove(key)
    }
}

fn q(kind: QuestionType, answer: AnswerValue) -> Question {
    Question {
        question_type: kind,
        correct_answer: answer,
        options: None,
        tolerance: None,
        case_sensitive: false,
    }
}

/// intro(mc) -> {numbers(numeric), words(text)} -> capstone ; clip(video) ; essay(unknown type) ; notes(reading, no question)
pub fn course() -> SkillGraph {
    SkillGraph::new(vec![
        SkillNode::new("intro", "Intro", NodeKind::Quiz).with_question(Question {
            options: Some(vec!["A".into(), "B".into(), "C".into()]),
            ..q(QuestionType::MultipleChoice, "B".into())
        }),
        SkillNode::new("numbers", "Numbers", NodeKind::Quiz)
            .with_prerequisites(&["intro"])
            .with_question(q(QuestionType::Numeric, AnswerValue::Number(42.0))),
        SkillNode::new("words", "Words", NodeKind::Quiz)
            .with_prerequisites(&["intro"])
            .with_question(q(QuestionType::Text, "Borrow".into())),
        SkillNode::new("capstone", "Capstone", NodeKind::Project)
            .with_prerequisites(&["numbers", "words"])
            .with_question(q(QuestionType::Text, "done".into())),
        SkillNode::new("clip", "Clip", NodeKind::Video),
        SkillNode::new("essay", "Essay", NodeKind::Quiz)
            .with_question(q(QuestionType::Other("essay".into()), "anything".into())),
        SkillNode::new("notes", "Notes", NodeKind::Reading),
    ])
    .unwrap()
}
