// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Core value types.

pub mod enums;
pub mod id;

pub use enums::{AccessDecision, AccessReason, EventType, NodeKind, QuestionType, VisualState};
pub use id::{EventId, NodeId, UserId};
