//! Built-in exercise library.
//!
//! A fixed, read-only reference dataset: circuit authoring pulls default
//! exercises from here per station type, and the CLI shows it for browsing.
//! Held in insertion order so "the first exercise for a type" is stable.

use crate::types::StationType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// How demanding an exercise is
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Primary muscle groups an exercise targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    Cardio,
    FullBody,
}

/// An exercise performable at one kind of station
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub station_type: StationType,
    pub difficulty: ExerciseDifficulty,
    pub muscle_groups: Vec<MuscleGroup>,
    pub default_reps: Option<u32>,
    pub default_duration_seconds: Option<u32>,
    pub default_rest_seconds: u32,
    pub tips: Vec<String>,
}

/// The complete built-in exercise library
#[derive(Clone, Debug)]
pub struct ExerciseCatalog {
    pub exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Exercises performable at the given station type, in library order
    pub fn for_station_type(&self, station_type: StationType) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.station_type == station_type)
            .collect()
    }

    /// Exercises targeting the given muscle group, in library order
    pub fn for_muscle_group(&self, group: MuscleGroup) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.muscle_groups.contains(&group))
            .collect()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_ids = std::collections::HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            }
            if !seen_ids.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.default_reps.is_none() && exercise.default_duration_seconds.is_none() {
                errors.push(format!(
                    "Exercise '{}' has neither default reps nor duration",
                    exercise.id
                ));
            }
            if exercise.default_rest_seconds == 0 {
                errors.push(format!("Exercise '{}' has zero default rest", exercise.id));
            }
        }

        // Every station type needs at least one exercise, or circuit
        // authoring has nothing to offer for it.
        for station_type in StationType::ALL {
            if !self
                .exercises
                .iter()
                .any(|e| e.station_type == station_type)
            {
                errors.push(format!("No exercises for station type {station_type}"));
            }
        }

        errors
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default exercise catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> ExerciseCatalog {
    fn exercise(
        id: &str,
        name: &str,
        description: &str,
        station_type: StationType,
        difficulty: ExerciseDifficulty,
        muscle_groups: &[MuscleGroup],
        default_reps: Option<u32>,
        default_duration_seconds: Option<u32>,
        default_rest_seconds: u32,
        tips: &[&str],
    ) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            station_type,
            difficulty,
            muscle_groups: muscle_groups.to_vec(),
            default_reps,
            default_duration_seconds,
            default_rest_seconds,
            tips: tips.iter().map(|t| (*t).into()).collect(),
        }
    }

    let exercises = vec![
        // Kettlebell
        exercise(
            "kb_swing",
            "Kettlebell Swing",
            "Explosive hip-hinge movement that targets the posterior chain",
            StationType::Kettlebell,
            ExerciseDifficulty::Intermediate,
            &[MuscleGroup::Legs, MuscleGroup::Core, MuscleGroup::Back],
            Some(20),
            None,
            60,
            &[
                "Keep your back straight",
                "Drive with your hips",
                "Let the bell float to chest height",
            ],
        ),
        exercise(
            "goblet_squat",
            "Kettlebell Goblet Squat",
            "Front-loaded squat holding the kettlebell at chest level",
            StationType::Kettlebell,
            ExerciseDifficulty::Beginner,
            &[MuscleGroup::Legs, MuscleGroup::Core],
            Some(15),
            None,
            60,
            &[
                "Keep your chest up",
                "Sit back into your heels",
                "Full depth if possible",
            ],
        ),
        exercise(
            "turkish_getup",
            "Turkish Get-Up",
            "Complex movement from lying to standing while holding a kettlebell",
            StationType::Kettlebell,
            ExerciseDifficulty::Advanced,
            &[MuscleGroup::FullBody, MuscleGroup::Core],
            None,
            Some(60),
            90,
            &[
                "Move slowly and controlled",
                "Keep your eyes on the bell",
                "Practice without weight first",
            ],
        ),
        // Pull-up bar
        exercise(
            "pullup",
            "Pull-Ups",
            "Upper body pulling exercise targeting back and arms",
            StationType::PullUpBar,
            ExerciseDifficulty::Intermediate,
            &[MuscleGroup::Back, MuscleGroup::Arms],
            Some(10),
            None,
            90,
            &[
                "Full range of motion",
                "Control the descent",
                "Engage your core",
            ],
        ),
        exercise(
            "hanging_leg_raise",
            "Hanging Leg Raises",
            "Core exercise performed while hanging from a pull-up bar",
            StationType::PullUpBar,
            ExerciseDifficulty::Intermediate,
            &[MuscleGroup::Core],
            Some(12),
            None,
            60,
            &[
                "Control the movement",
                "Avoid swinging",
                "Breathe out as you raise",
            ],
        ),
        exercise(
            "chinup",
            "Chin-Ups",
            "Pull-up variation with palms facing you",
            StationType::PullUpBar,
            ExerciseDifficulty::Beginner,
            &[MuscleGroup::Back, MuscleGroup::Arms],
            Some(8),
            None,
            90,
            &[
                "Easier than pull-ups",
                "Focus on biceps",
                "Full extension at bottom",
            ],
        ),
        // Mat
        exercise(
            "burpee",
            "Burpees",
            "Full-body exercise combining squat, plank, and jump",
            StationType::Mat,
            ExerciseDifficulty::Intermediate,
            &[MuscleGroup::FullBody, MuscleGroup::Cardio],
            Some(10),
            None,
            60,
            &["Maintain good form", "Land softly", "Keep core engaged"],
        ),
        exercise(
            "pushup",
            "Push-Ups",
            "Classic upper body pushing exercise",
            StationType::Mat,
            ExerciseDifficulty::Beginner,
            &[MuscleGroup::Chest, MuscleGroup::Arms, MuscleGroup::Shoulders],
            Some(15),
            None,
            60,
            &[
                "Keep body straight",
                "Full range of motion",
                "Control the movement",
            ],
        ),
        exercise(
            "plank",
            "Plank",
            "Isometric core strengthening exercise",
            StationType::Mat,
            ExerciseDifficulty::Beginner,
            &[MuscleGroup::Core],
            None,
            Some(60),
            30,
            &[
                "Keep body straight",
                "Don't let hips sag",
                "Breathe normally",
            ],
        ),
        // Box
        exercise(
            "box_jump",
            "Box Jumps",
            "Plyometric exercise jumping onto a box",
            StationType::Box,
            ExerciseDifficulty::Intermediate,
            &[MuscleGroup::Legs, MuscleGroup::Cardio],
            Some(12),
            None,
            90,
            &[
                "Land softly",
                "Full extension on jump",
                "Step down, don't jump down",
            ],
        ),
        exercise(
            "stepup",
            "Step-Ups",
            "Single-leg stepping exercise onto a box",
            StationType::Box,
            ExerciseDifficulty::Beginner,
            &[MuscleGroup::Legs],
            Some(10),
            None,
            60,
            &["Drive through the heel", "Keep chest up", "Alternate legs"],
        ),
        // Rope
        exercise(
            "battle_rope",
            "Battle Ropes",
            "High-intensity exercise using heavy ropes",
            StationType::Rope,
            ExerciseDifficulty::Advanced,
            &[MuscleGroup::FullBody, MuscleGroup::Cardio],
            None,
            Some(30),
            90,
            &[
                "Maintain good posture",
                "Use your whole body",
                "Control the waves",
            ],
        ),
        exercise(
            "rope_climb",
            "Rope Climbing",
            "Upper body and core exercise climbing a rope",
            StationType::Rope,
            ExerciseDifficulty::Advanced,
            &[MuscleGroup::Back, MuscleGroup::Arms, MuscleGroup::Core],
            Some(3),
            None,
            120,
            &["Use your legs too", "Grip tightly", "Control the descent"],
        ),
    ];

    ExerciseCatalog { exercises }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 13);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_every_station_type_has_exercises() {
        let catalog = build_default_catalog();
        for station_type in StationType::ALL {
            assert!(
                !catalog.for_station_type(station_type).is_empty(),
                "No exercises for {station_type}"
            );
        }
    }

    #[test]
    fn test_station_type_lookup_preserves_library_order() {
        let catalog = build_default_catalog();
        let kettlebell = catalog.for_station_type(StationType::Kettlebell);
        assert_eq!(kettlebell[0].id, "kb_swing");
    }

    #[test]
    fn test_muscle_group_lookup() {
        let catalog = build_default_catalog();
        let core = catalog.for_muscle_group(MuscleGroup::Core);
        assert!(core.iter().any(|e| e.id == "plank"));
        assert!(core.iter().all(|e| e.muscle_groups.contains(&MuscleGroup::Core)));
    }

    #[test]
    fn test_get_by_id() {
        let catalog = build_default_catalog();
        assert!(catalog.get("burpee").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn test_validate_flags_duplicate_ids() {
        let mut catalog = build_default_catalog();
        let copy = catalog.exercises[0].clone();
        catalog.exercises.push(copy);

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate")));
    }
}
