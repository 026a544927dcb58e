//! Skill node definition.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::enums::{NodeKind, QuestionType};
use crate::types::id::NodeId;

/// A submitted or expected answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl AnswerValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub correct_answer: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Absolute tolerance for numeric questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Text questions compare case-insensitively unless set.
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Static content-graph vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: NodeId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub prerequisites: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

impl SkillNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(id),
            title: title.into(),
            kind,
            prerequisites: Vec::new(),
            question: None,
        }
    }

    pub fn with_prerequisites(mut self, prereqs: &[&str]) -> Self {
        self.prerequisites = prereqs.iter().map(|p| NodeId::new(*p)).collect();
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.question = Some(question);
        self
    }
}
