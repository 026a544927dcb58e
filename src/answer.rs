// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Answer validation against a node's question definition.

use crate::config::ScoringRules;
use crate::error::{KernelError, Result};
use crate::graph::node::{AnswerValue, Question};
use crate::types::enums::QuestionType;

/// Returns whether `answer` satisfies `question`.
///
/// - multiple choice: exact text match, or numeric equality when either side is a number
/// - numeric: `|answer - expected| <= tolerance`; unparsable answers are wrong
/// - text: whitespace-trimmed compare, case-insensitive unless `case_sensitive`
///
/// Fails only when the question itself cannot be evaluated.
pub fn check_answer(question: &Question, answer: &AnswerValue, rules: &ScoringRules) -> Result<bool> {
    match &question.question_type {
        QuestionType::MultipleChoice => Ok(match (&question.correct_answer, answer) {
            (AnswerValue::Text(expected), AnswerValue::Text(given)) => expected == given,
            // A numeric side compares by value, never by its rendering.
            (expected, given) => match (expected.as_f64(), given.as_f64()) {
                (Some(expected), Some(given)) => expected == given,
                _ => false,
            },
        }),
        QuestionType::Numeric => {
            let expected = question.correct_answer.as_f64().ok_or_else(|| {
                KernelError::InvalidAnswer(format!(
                    "numeric question expects a number, found {:?}",
                    question.correct_answer
                ))
            })?;
            let tolerance = question.tolerance.unwrap_or(rules.numeric_tolerance).abs();
            Ok(match answer.as_f64() {
                Some(given) if given.is_finite() => (given - expected).abs() <= tolerance,
                _ => false,
            })
        }
        QuestionType::Text => {
            let expected = question.correct_answer.to_string();
            let given = answer.to_string();
            let (expected, given) = (expected.trim(), given.trim());
            Ok(if question.case_sensitive {
                expected == given
            } else {
                expected.to_lowercase() == given.to_lowercase()
            })
        }
        QuestionType::Other(kind) => Err(KernelError::UnknownQuestionType(kind.clone())),
    }
}
