// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Content graph failed structural validation.
    #[error("invalid skill graph: {0}")]
    InvalidGraph(String),
    /// Node id is not part of the skill graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// Question type has no validator.
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),
    /// Node has no question to validate against.
    #[error("node {0} has no question")]
    MissingQuestion(String),
    /// Answer or question definition cannot be compared.
    #[error("invalid answer: {0}")]
    InvalidAnswer(String),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
