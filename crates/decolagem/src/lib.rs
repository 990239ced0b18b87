//! Dignômetro engine for the Decolagem family-mentoring program.
//!
//! The [`dignometro`] module holds the scoring, vulnerability diffing, and goal
//! recommendation rules together with the service and HTTP router built on top
//! of them. [`config`], [`error`], and [`telemetry`] carry the process wiring
//! shared with the API binary.

pub mod config;
pub mod dignometro;
pub mod error;
pub mod telemetry;
