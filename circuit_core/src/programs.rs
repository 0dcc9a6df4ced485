//! Built-in training program templates.
//!
//! A program is a multi-week plan of circuit templates. Templates name
//! station types, not concrete stations, so they can be materialized against
//! any space that has the right equipment.

use crate::planner::connect_route;
use crate::types::{Station, StationExercise, StationType, TrainingCircuit, TrainingSpace};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// How a circuit gets harder week over week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionType {
    None,
    IncreaseReps,
    IncreaseTime,
    DecreaseRest,
    AddRounds,
}

/// What a program is trying to achieve
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgramGoal {
    Strength,
    Endurance,
    WeightLoss,
    MuscleGain,
    GeneralFitness,
    Flexibility,
}

/// One station slot in a circuit template, identified by equipment type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateStation {
    pub station_type: StationType,
    pub exercise_name: String,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rest_after_seconds: u32,
}

/// A reusable circuit blueprint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitTemplate {
    pub name: String,
    pub stations: Vec<TemplateStation>,
    pub rounds: u32,
    pub rest_between_rounds_seconds: u32,
}

/// A template scheduled into a specific week of a program
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramCircuit {
    pub week: u32,
    pub template: CircuitTemplate,
    pub progression: ProgressionType,
}

/// A multi-week training plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: crate::catalog::ExerciseDifficulty,
    pub duration_weeks: u32,
    pub frequency_per_week: u32,
    pub circuits: Vec<ProgramCircuit>,
    pub goals: Vec<ProgramGoal>,
}

/// Resolve a circuit template against a concrete space.
///
/// Each template slot claims the first not-yet-used station of its equipment
/// type; slots with no matching station are skipped with a warning. Stations
/// are visited in template order and connected with planner estimates. The
/// result may be empty if the space has none of the required equipment; the
/// scheduler will refuse such a circuit at start.
pub fn materialize_template(template: &CircuitTemplate, space: &TrainingSpace) -> TrainingCircuit {
    let mut used: Vec<bool> = vec![false; space.stations.len()];
    let mut route: Vec<Station> = Vec::new();
    let mut exercises: Vec<StationExercise> = Vec::new();

    for slot in &template.stations {
        let found = space
            .stations
            .iter()
            .enumerate()
            .find(|(index, station)| !used[*index] && station.station_type == slot.station_type);

        match found {
            Some((index, station)) => {
                used[index] = true;
                let mut exercise =
                    StationExercise::new(station.id, slot.exercise_name.clone(), slot.rest_after_seconds);
                exercise.reps = slot.reps;
                exercise.duration_seconds = slot.duration_seconds;
                exercises.push(exercise);
                route.push(station.clone());
            }
            None => {
                tracing::warn!(
                    "Space '{}' has no free {} station for '{}', skipping",
                    space.name,
                    slot.station_type,
                    slot.exercise_name
                );
            }
        }
    }

    let connections = connect_route(&route);
    TrainingCircuit::new(template.name.clone(), exercises, connections, template.rounds)
}

fn template_station(
    station_type: StationType,
    exercise_name: &str,
    reps: Option<u32>,
    duration_seconds: Option<u32>,
) -> TemplateStation {
    TemplateStation {
        station_type,
        exercise_name: exercise_name.into(),
        reps,
        duration_seconds,
        rest_after_seconds: 60,
    }
}

/// Cached default program library
static DEFAULT_PROGRAMS: Lazy<Vec<TrainingProgram>> = Lazy::new(build_default_programs);

/// Get a reference to the cached default program library
pub fn get_default_programs() -> &'static [TrainingProgram] {
    &DEFAULT_PROGRAMS
}

/// Builds the default library of training programs
pub fn build_default_programs() -> Vec<TrainingProgram> {
    use crate::catalog::ExerciseDifficulty;

    vec![
        TrainingProgram {
            id: "beginner_full_body".into(),
            name: "Beginner Full Body".into(),
            description: "Perfect for those just starting their fitness journey".into(),
            difficulty: ExerciseDifficulty::Beginner,
            duration_weeks: 4,
            frequency_per_week: 3,
            circuits: vec![ProgramCircuit {
                week: 1,
                template: CircuitTemplate {
                    name: "Full Body Circuit".into(),
                    stations: vec![
                        template_station(StationType::Mat, "Push-Ups", Some(10), None),
                        template_station(StationType::Mat, "Bodyweight Squats", Some(15), None),
                        template_station(StationType::Mat, "Plank", None, Some(30)),
                        template_station(StationType::Mat, "Jumping Jacks", Some(20), None),
                    ],
                    rounds: 3,
                    rest_between_rounds_seconds: 120,
                },
                progression: ProgressionType::IncreaseReps,
            }],
            goals: vec![ProgramGoal::GeneralFitness, ProgramGoal::Strength],
        },
        TrainingProgram {
            id: "strength_builder".into(),
            name: "Strength Builder".into(),
            description: "Build functional strength with compound movements".into(),
            difficulty: ExerciseDifficulty::Intermediate,
            duration_weeks: 6,
            frequency_per_week: 4,
            circuits: vec![ProgramCircuit {
                week: 1,
                template: CircuitTemplate {
                    name: "Strength Circuit".into(),
                    stations: vec![
                        template_station(StationType::Kettlebell, "Kettlebell Swing", Some(20), None),
                        template_station(StationType::PullUpBar, "Pull-Ups", Some(8), None),
                        template_station(StationType::Box, "Box Jumps", Some(12), None),
                        template_station(StationType::Kettlebell, "Goblet Squat", Some(15), None),
                    ],
                    rounds: 4,
                    rest_between_rounds_seconds: 120,
                },
                progression: ProgressionType::IncreaseReps,
            }],
            goals: vec![ProgramGoal::Strength, ProgramGoal::MuscleGain],
        },
        TrainingProgram {
            id: "cardio_blast".into(),
            name: "Cardio Blast".into(),
            description: "High-intensity cardio workout for fat burning".into(),
            difficulty: ExerciseDifficulty::Intermediate,
            duration_weeks: 4,
            frequency_per_week: 5,
            circuits: vec![ProgramCircuit {
                week: 1,
                template: CircuitTemplate {
                    name: "Cardio Circuit".into(),
                    stations: vec![
                        template_station(StationType::Mat, "Burpees", Some(10), None),
                        template_station(StationType::Rope, "Battle Ropes", None, Some(30)),
                        template_station(StationType::Box, "Box Jumps", Some(15), None),
                        template_station(StationType::Mat, "Mountain Climbers", Some(20), None),
                    ],
                    rounds: 5,
                    rest_between_rounds_seconds: 120,
                },
                progression: ProgressionType::DecreaseRest,
            }],
            goals: vec![ProgramGoal::WeightLoss, ProgramGoal::Endurance],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn space_with(types: &[StationType]) -> TrainingSpace {
        let mut space = TrainingSpace::new("Test Space");
        space.stations = types
            .iter()
            .enumerate()
            .map(|(i, ty)| Station::new(*ty, Position::new(0.1 * i as f64, 0.2)))
            .collect();
        space
    }

    #[test]
    fn test_default_programs_load() {
        let programs = build_default_programs();
        assert_eq!(programs.len(), 3);
        assert!(programs.iter().all(|p| !p.circuits.is_empty()));
    }

    #[test]
    fn test_materialize_matches_station_types() {
        let programs = build_default_programs();
        let strength = &programs[1].circuits[0].template;

        let space = space_with(&[
            StationType::Kettlebell,
            StationType::Kettlebell,
            StationType::PullUpBar,
            StationType::Box,
        ]);

        let circuit = materialize_template(strength, &space);

        // All four slots found equipment: two kettlebell slots claim the two
        // kettlebell stations.
        assert_eq!(circuit.stations.len(), 4);
        assert_eq!(circuit.connections.len(), 3);
        assert_eq!(circuit.rounds, 4);
        assert_eq!(circuit.stations[0].station_id, space.stations[0].id);
        assert_eq!(circuit.stations[3].station_id, space.stations[1].id);
    }

    #[test]
    fn test_materialize_skips_missing_equipment() {
        let programs = build_default_programs();
        let cardio = &programs[2].circuits[0].template;

        // No rope in this space: Battle Ropes is dropped, the rest survive.
        let space = space_with(&[StationType::Mat, StationType::Mat, StationType::Box]);

        let circuit = materialize_template(cardio, &space);
        assert_eq!(circuit.stations.len(), 3);
        assert!(circuit
            .stations
            .iter()
            .all(|s| s.exercise_name != "Battle Ropes"));
    }

    #[test]
    fn test_materialize_empty_space_yields_empty_circuit() {
        let programs = build_default_programs();
        let template = &programs[0].circuits[0].template;
        let space = space_with(&[]);

        let circuit = materialize_template(template, &space);
        assert!(circuit.stations.is_empty());
        assert!(circuit.connections.is_empty());
    }

    #[test]
    fn test_materialize_carries_template_timing() {
        let programs = build_default_programs();
        let template = &programs[0].circuits[0].template;
        let space = space_with(&[StationType::Mat; 4]);

        let circuit = materialize_template(template, &space);

        let plank = circuit
            .stations
            .iter()
            .find(|s| s.exercise_name == "Plank")
            .unwrap();
        assert_eq!(plank.duration_seconds, Some(30));
        assert_eq!(plank.rest_after_seconds, 60);
    }
}
