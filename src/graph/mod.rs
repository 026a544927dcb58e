// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Static skill graph.

pub mod node;
pub mod pool;

pub use node::{AnswerValue, Question, SkillNode};
pub use pool::SkillGraph;
