// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Derived state.

pub mod user_state;

pub use user_state::UserState;
