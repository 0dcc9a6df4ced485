//! Achievement definitions and progress tracking.
//!
//! The built-in achievement table is fixed, read-only reference data, cached
//! the same way the exercise catalog is. Progress is recomputed from scratch
//! on every pass over the session history; the unlock flag and timestamp are
//! the only sticky pieces of state.

use crate::stats::TrainingStatistics;
use crate::types::TrainingSession;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grouping used by the achievements display
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Consistency,
    Performance,
    Exploration,
    Mastery,
    Social,
}

/// What has to happen for an achievement to unlock.
///
/// A tagged union matched exhaustively in [`update_achievement_progress`];
/// adding a variant forces every consumer to decide how to handle it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementRequirement {
    /// Total sessions started, completed or not
    Sessions { count: u32 },
    /// Rounds finished across completed sessions
    Rounds { count: u32 },
    /// Consecutive training days
    Streak { days: u32 },
    /// Complete one specific circuit
    CircuitCompletion { circuit_id: Uuid },
    /// Hours spent in completed sessions
    TimeSpent { hours: f64 },
    SpacesCreated { count: u32 },
    CircuitsCreated { count: u32 },
    /// Finish a session with every phase on schedule
    PerfectSession,
}

impl AchievementRequirement {
    pub fn describe(&self) -> String {
        match self {
            AchievementRequirement::Sessions { count } => {
                format!("Complete {count} training sessions")
            }
            AchievementRequirement::Rounds { count } => format!("Complete {count} total rounds"),
            AchievementRequirement::Streak { days } => format!("Train for {days} days in a row"),
            AchievementRequirement::CircuitCompletion { .. } => "Complete the circuit".into(),
            AchievementRequirement::TimeSpent { hours } => {
                format!("Spend {} hours training", *hours as u32)
            }
            AchievementRequirement::SpacesCreated { count } => {
                format!("Create {count} training spaces")
            }
            AchievementRequirement::CircuitsCreated { count } => format!("Create {count} circuits"),
            AchievementRequirement::PerfectSession => {
                "Complete a session with perfect timing".into()
            }
        }
    }
}

/// One unlockable achievement with its current progress
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub requirement: AchievementRequirement,
    pub is_unlocked: bool,
    /// Set the first time the requirement is met; never overwritten
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Fraction of the requirement met, 0.0..=1.0
    pub progress: f64,
}

impl Achievement {
    fn locked(
        id: &str,
        title: &str,
        description: &str,
        category: AchievementCategory,
        requirement: AchievementRequirement,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category,
            requirement,
            is_unlocked: false,
            unlocked_at: None,
            progress: 0.0,
        }
    }
}

/// Cached default achievement table - built once and reused
static DEFAULT_ACHIEVEMENTS: Lazy<Vec<Achievement>> = Lazy::new(build_default_achievements);

/// Get a reference to the cached default achievement table
pub fn get_default_achievements() -> &'static [Achievement] {
    &DEFAULT_ACHIEVEMENTS
}

/// Builds the default achievement table.
///
/// **Note**: For production use, prefer `get_default_achievements()` which
/// returns a cached reference. This function is retained for tests and for
/// seeding fresh library state.
pub fn build_default_achievements() -> Vec<Achievement> {
    vec![
        // Consistency
        Achievement::locked(
            "first_steps",
            "First Steps",
            "Complete your first training session",
            AchievementCategory::Consistency,
            AchievementRequirement::Sessions { count: 1 },
        ),
        Achievement::locked(
            "week_warrior",
            "Week Warrior",
            "Train for 7 days in a row",
            AchievementCategory::Consistency,
            AchievementRequirement::Streak { days: 7 },
        ),
        Achievement::locked(
            "month_master",
            "Month Master",
            "Train for 30 days in a row",
            AchievementCategory::Consistency,
            AchievementRequirement::Streak { days: 30 },
        ),
        Achievement::locked(
            "century_club",
            "Century Club",
            "Complete 100 training sessions",
            AchievementCategory::Consistency,
            AchievementRequirement::Sessions { count: 100 },
        ),
        // Performance
        Achievement::locked(
            "round_master",
            "Round Master",
            "Complete 50 total rounds",
            AchievementCategory::Performance,
            AchievementRequirement::Rounds { count: 50 },
        ),
        Achievement::locked(
            "perfect_timing",
            "Perfect Timing",
            "Complete a session with perfect timing",
            AchievementCategory::Performance,
            AchievementRequirement::PerfectSession,
        ),
        Achievement::locked(
            "time_champion",
            "Time Champion",
            "Spend 10 hours training",
            AchievementCategory::Performance,
            AchievementRequirement::TimeSpent { hours: 10.0 },
        ),
        // Exploration
        Achievement::locked(
            "space_creator",
            "Space Creator",
            "Create your first training space",
            AchievementCategory::Exploration,
            AchievementRequirement::SpacesCreated { count: 1 },
        ),
        Achievement::locked(
            "circuit_designer",
            "Circuit Designer",
            "Create 5 different circuits",
            AchievementCategory::Exploration,
            AchievementRequirement::CircuitsCreated { count: 5 },
        ),
        Achievement::locked(
            "architect",
            "Architect",
            "Create 10 training spaces",
            AchievementCategory::Exploration,
            AchievementRequirement::SpacesCreated { count: 10 },
        ),
        // Mastery
        Achievement::locked(
            "circuit_master",
            "Circuit Master",
            "Complete all circuits in a program",
            AchievementCategory::Mastery,
            AchievementRequirement::CircuitsCreated { count: 1 },
        ),
    ]
}

/// Recompute progress and unlock state for every achievement.
///
/// Progress is `min(1.0, actual / threshold)` per requirement kind, derived
/// from the statistics snapshot plus the supplied creation counts. Meeting a
/// threshold unlocks the achievement and stamps the current time; an
/// achievement never re-locks and its unlock timestamp is never overwritten
/// by later passes.
///
/// `CircuitCompletion` and `PerfectSession` need per-session detail no
/// snapshot carries, so this pass leaves them untouched for the caller.
pub fn update_achievement_progress(
    achievements: &mut [Achievement],
    sessions: &[TrainingSession],
    spaces_created: usize,
    circuits_created: usize,
) {
    let stats = TrainingStatistics::calculate(sessions);

    for achievement in achievements.iter_mut() {
        let (actual, threshold) = match &achievement.requirement {
            AchievementRequirement::Sessions { count } => {
                (stats.total_sessions as f64, f64::from(*count))
            }
            AchievementRequirement::Rounds { count } => {
                (f64::from(stats.total_rounds), f64::from(*count))
            }
            AchievementRequirement::Streak { days } => {
                (f64::from(stats.current_streak), f64::from(*days))
            }
            AchievementRequirement::TimeSpent { hours } => {
                (stats.total_duration_seconds as f64 / 3600.0, *hours)
            }
            AchievementRequirement::SpacesCreated { count } => {
                (spaces_created as f64, f64::from(*count))
            }
            AchievementRequirement::CircuitsCreated { count } => {
                (circuits_created as f64, f64::from(*count))
            }
            AchievementRequirement::CircuitCompletion { .. }
            | AchievementRequirement::PerfectSession => continue,
        };

        achievement.progress = (actual / threshold).min(1.0);
        if actual >= threshold && !achievement.is_unlocked {
            achievement.is_unlocked = true;
            achievement.unlocked_at = Some(Utc::now());
            tracing::info!("Achievement unlocked: {}", achievement.title);
        }
    }
}
