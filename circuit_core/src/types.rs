//! Core domain types for the circuit training system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Stations and the spaces that contain them
//! - Circuits (ordered station exercises plus transitions)
//! - Recorded training sessions

use crate::geometry::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Station Types
// ============================================================================

/// Kind of equipment a station provides
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    Kettlebell,
    PullUpBar,
    Mat,
    Box,
    Rope,
}

impl StationType {
    /// All station types, in display order
    pub const ALL: [StationType; 5] = [
        StationType::Kettlebell,
        StationType::PullUpBar,
        StationType::Mat,
        StationType::Box,
        StationType::Rope,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            StationType::Kettlebell => "Kettlebell",
            StationType::PullUpBar => "Pull-up Bar",
            StationType::Mat => "Mat",
            StationType::Box => "Box",
            StationType::Rope => "Rope",
        }
    }
}

impl std::fmt::Display for StationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A positioned piece of equipment inside a training space
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Station {
    pub id: Uuid,
    pub station_type: StationType,
    pub position: Position,
    pub custom_name: Option<String>,
}

impl Station {
    pub fn new(station_type: StationType, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_type,
            position,
            custom_name: None,
        }
    }

    /// Custom name if set, otherwise the equipment display name
    pub fn label(&self) -> &str {
        self.custom_name
            .as_deref()
            .unwrap_or_else(|| self.station_type.display_name())
    }
}

/// Floor-plan geometry the host renders around; opaque to planner and
/// scheduler
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: Uuid,
    pub outline: Vec<Position>,
}

// ============================================================================
// Circuit Types
// ============================================================================

/// One station's slot in a circuit: which exercise to perform there and for
/// how long
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StationExercise {
    pub id: Uuid,
    pub station_id: Uuid,
    pub exercise_name: String,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rest_after_seconds: u32,
}

impl StationExercise {
    pub fn new(
        station_id: Uuid,
        exercise_name: impl Into<String>,
        rest_after_seconds: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id,
            exercise_name: exercise_name.into(),
            reps: None,
            duration_seconds: None,
            rest_after_seconds,
        }
    }
}

/// Directed movement edge between two stations with an estimated duration.
///
/// Always derived from station positions and equipment types; never authored
/// independently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitConnection {
    pub id: Uuid,
    pub from_station_id: Uuid,
    pub to_station_id: Uuid,
    pub estimated_seconds: f64,
}

impl CircuitConnection {
    pub fn new(from_station_id: Uuid, to_station_id: Uuid, estimated_seconds: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_station_id,
            to_station_id,
            estimated_seconds,
        }
    }
}

/// An ordered, timed sequence of exercises across stations, repeated for a
/// round count
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingCircuit {
    pub id: Uuid,
    pub name: String,
    pub stations: Vec<StationExercise>,
    pub connections: Vec<CircuitConnection>,
    pub rounds: u32,
}

impl TrainingCircuit {
    pub fn new(
        name: impl Into<String>,
        stations: Vec<StationExercise>,
        connections: Vec<CircuitConnection>,
        rounds: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stations,
            connections,
            rounds,
        }
    }

    /// Station ids referenced by exercises or connections but absent from the
    /// given station set.
    ///
    /// Intended for circuit authoring time; a stale reference found later is a
    /// display concern only, and the scheduler tolerates it by omitting the
    /// affected measurement.
    pub fn dangling_station_ids(&self, stations: &[Station]) -> Vec<Uuid> {
        let known: std::collections::HashSet<Uuid> = stations.iter().map(|s| s.id).collect();
        let mut dangling = Vec::new();
        let mut seen = std::collections::HashSet::new();

        let referenced = self
            .stations
            .iter()
            .map(|e| e.station_id)
            .chain(
                self.connections
                    .iter()
                    .flat_map(|c| [c.from_station_id, c.to_station_id]),
            );

        for id in referenced {
            if !known.contains(&id) && seen.insert(id) {
                dangling.push(id);
            }
        }

        dangling
    }
}

/// A named room layout: stations, opaque obstacle geometry, and the circuits
/// authored against it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingSpace {
    pub id: Uuid,
    pub name: String,
    pub stations: Vec<Station>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub circuits: Vec<TrainingCircuit>,
}

impl TrainingSpace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stations: Vec::new(),
            obstacles: Vec::new(),
            circuits: Vec::new(),
        }
    }

    pub fn station(&self, id: Uuid) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn circuit_by_name(&self, name: &str) -> Option<&TrainingCircuit> {
        self.circuits.iter().find(|c| c.name == name)
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// One recorded execution attempt of a circuit.
///
/// Created when execution starts, persisted once execution stops, immutable
/// thereafter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: Uuid,
    pub circuit_id: Uuid,
    pub circuit_name: String,
    pub space_id: Uuid,
    pub space_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed_rounds: u32,
    pub total_rounds: u32,
    /// Measured work-phase seconds, keyed by station id
    pub station_seconds: HashMap<Uuid, u32>,
    /// Measured movement seconds, keyed by connection id
    pub transition_seconds: HashMap<Uuid, u32>,
    pub notes: Option<String>,
    /// 1-5 stars
    pub rating: Option<u8>,
}

impl TrainingSession {
    pub fn new(
        circuit_id: Uuid,
        circuit_name: impl Into<String>,
        space_id: Uuid,
        space_name: impl Into<String>,
        started_at: DateTime<Utc>,
        total_rounds: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            circuit_id,
            circuit_name: circuit_name.into(),
            space_id,
            space_name: space_name.into(),
            started_at,
            ended_at: None,
            completed_rounds: 0,
            total_rounds,
            station_seconds: HashMap::new(),
            transition_seconds: HashMap::new(),
            notes: None,
            rating: None,
        }
    }

    /// Wall-clock duration in seconds, if the session has ended
    pub fn duration_seconds(&self) -> Option<i64> {
        self.ended_at
            .map(|end| end.signed_duration_since(self.started_at).num_seconds())
    }

    /// A session counts as completed once every planned round has been
    /// finished
    pub fn is_completed(&self) -> bool {
        self.completed_rounds >= self.total_rounds
    }
}
