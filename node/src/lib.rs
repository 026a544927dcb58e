// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod celebration;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod session;
pub mod storage;
pub mod telemetry;
