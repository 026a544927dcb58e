// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::PathBuf;

use skillpath_kernel::error::KernelError;
use thiserror::Error;

use crate::events::event_log::StoreError;
use crate::events::recorder::RecordError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Submission {0} was already processed")]
    DuplicateSubmission(String),

    #[error("Invalid attempt: {0}")]
    InvalidAttempt(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node {0} is locked")]
    NodeLocked(String),

    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("Node {0} has no question")]
    MissingQuestion(String),

    #[error("Kernel error: {0}")]
    Kernel(KernelError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl From<KernelError> for SessionError {
    fn from(e: KernelError) -> Self {
        match e {
            KernelError::NodeNotFound(id) => SessionError::NodeNotFound(id),
            KernelError::UnknownQuestionType(kind) => SessionError::UnknownQuestionType(kind),
            KernelError::MissingQuestion(id) => SessionError::MissingQuestion(id),
            other => SessionError::Kernel(other),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        SessionError::Record(RecordError::Store(e))
    }
}

impl SessionError {
    /// The log store error underneath, if this came from storage.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SessionError::Record(RecordError::Store(e)) => Some(e),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
