#![forbid(unsafe_code)]

//! Core domain model and business logic for the circuit training system.
//!
//! This crate provides:
//! - Domain types (spaces, stations, circuits, sessions)
//! - Route planning and transition estimation
//! - Tick-driven session scheduling
//! - Training statistics and achievement progress
//! - Content catalogs (exercises, programs, achievements)
//! - Persistence (history log, CSV archive, library state)

pub mod achievements;
pub mod catalog;
pub mod config;
pub mod csv_rollup;
pub mod error;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod planner;
pub mod programs;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use achievements::{
    build_default_achievements, get_default_achievements, update_achievement_progress,
    Achievement, AchievementCategory, AchievementRequirement,
};
pub use catalog::{
    build_default_catalog, get_default_catalog, Exercise, ExerciseCatalog, ExerciseDifficulty,
    MuscleGroup,
};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::Position;
pub use history::{load_history, JsonlSink, SessionSink};
pub use planner::{circuit_from_route, connect_route, estimate_transition_time, plan_route};
pub use programs::{get_default_programs, materialize_template, TrainingProgram};
pub use scheduler::{CircuitScheduler, Phase, DEFAULT_REST_SECONDS, DEFAULT_WORK_SECONDS};
pub use state::LibraryState;
pub use stats::TrainingStatistics;
pub use types::*;
