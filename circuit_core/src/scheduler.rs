//! Timed execution of a circuit as an externally ticked state machine.
//!
//! The scheduler owns no timer. A host drives it by calling [`CircuitScheduler::tick`]
//! once per second; everything else (pause, skip, stop) is an explicit call.
//! That keeps phase transitions strictly serialized and makes the whole
//! machine testable without wall-clock waits.
//!
//! Lifecycle: a non-empty circuit starts in a work phase at station 0,
//! round 0. Each work phase is followed by that station's rest phase; each
//! rest phase ends by advancing to the next station, wrapping into the next
//! round at the end of the sequence. Finishing the last rest of the last
//! round completes the session. Stopping at any point yields a best-effort
//! session record covering only fully-elapsed phases.

use crate::error::{Error, Result};
use crate::types::{StationExercise, TrainingCircuit, TrainingSession, TrainingSpace};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Work-phase length when an exercise carries no planned duration
pub const DEFAULT_WORK_SECONDS: u32 = 60;

/// Rest-phase length used by circuit authoring when nothing better is known
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// What the scheduler is currently doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Exercising at the current station
    Working,
    /// Resting after the current station, about to move on
    Resting,
    /// Every planned round finished; terminal
    Completed,
    /// Execution halted by the user; terminal
    Stopped,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Stopped)
    }
}

/// Drives one execution attempt of one circuit.
///
/// Single-owner: exactly one caller may hold and mutate a scheduler; all
/// accessors take `&self` and all mutation goes through `&mut self` methods,
/// so the borrow checker enforces the serialization the design requires.
pub struct CircuitScheduler {
    circuit: TrainingCircuit,
    space_id: Uuid,
    space_name: String,

    phase: Phase,
    station_index: usize,
    /// Rounds fully finished so far; also the 0-based index of the round in
    /// progress while running
    rounds_completed: u32,
    remaining_seconds: u32,
    /// Processed ticks in the current phase; paused ticks do not count
    phase_elapsed: u32,
    paused: bool,

    started_at: DateTime<Utc>,
    station_seconds: HashMap<Uuid, u32>,
    transition_seconds: HashMap<Uuid, u32>,
}

impl CircuitScheduler {
    /// Start executing `circuit` within `space`.
    ///
    /// Returns [`Error::EmptyCircuit`] for a circuit with no stations; a
    /// scheduler that cannot run is never constructed.
    pub fn new(circuit: TrainingCircuit, space: &TrainingSpace) -> Result<Self> {
        if circuit.stations.is_empty() {
            return Err(Error::EmptyCircuit(circuit.name));
        }

        let first_work = work_duration(&circuit.stations[0]);
        tracing::info!(
            "Starting circuit '{}': {} stations, {} rounds",
            circuit.name,
            circuit.stations.len(),
            circuit.rounds
        );

        Ok(Self {
            circuit,
            space_id: space.id,
            space_name: space.name.clone(),
            phase: Phase::Working,
            station_index: 0,
            rounds_completed: 0,
            remaining_seconds: first_work,
            phase_elapsed: 0,
            paused: false,
            started_at: Utc::now(),
            station_seconds: HashMap::new(),
            transition_seconds: HashMap::new(),
        })
    }

    /// Advance the clock by one second.
    ///
    /// No-op while paused or after a terminal phase. A single tick crosses at
    /// most one phase boundary; remaining time never goes below zero.
    pub fn tick(&mut self) {
        if self.phase.is_terminal() || self.paused {
            return;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            self.phase_elapsed += 1;
        }

        if self.remaining_seconds == 0 {
            self.advance_phase();
        }
    }

    /// Suspend tick processing. The phase, its remaining time, and all
    /// recorded measurements are left untouched.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume tick processing after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// User-driven "Done": finish the current phase immediately, exactly as
    /// if its countdown had expired, regardless of remaining time.
    pub fn complete_current_phase(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.advance_phase();
    }

    /// Halt execution and produce the session record.
    ///
    /// Safe to call in any state. From a running phase this transitions to
    /// [`Phase::Stopped`]; from a terminal phase it just rebuilds the record.
    /// The record's maps cover only phases that fully elapsed before the
    /// call.
    pub fn stop(&mut self) -> TrainingSession {
        if !self.phase.is_terminal() {
            tracing::info!(
                "Stopping circuit '{}' after {} completed rounds",
                self.circuit.name,
                self.rounds_completed
            );
            self.phase = Phase::Stopped;
        }
        self.session_record()
    }

    fn advance_phase(&mut self) {
        match self.phase {
            Phase::Working => {
                let station_id = self.circuit.stations[self.station_index].station_id;
                self.station_seconds.insert(station_id, self.phase_elapsed);
                tracing::debug!(
                    "Work phase done at station {} ({}s)",
                    station_id,
                    self.phase_elapsed
                );

                self.phase = Phase::Resting;
                self.remaining_seconds =
                    self.circuit.stations[self.station_index].rest_after_seconds;
                self.phase_elapsed = 0;
            }
            Phase::Resting => {
                self.record_transition();

                self.station_index += 1;
                if self.station_index >= self.circuit.stations.len() {
                    self.station_index = 0;
                    self.rounds_completed += 1;
                    if self.rounds_completed >= self.circuit.rounds {
                        tracing::info!(
                            "Circuit '{}' completed: {} rounds",
                            self.circuit.name,
                            self.rounds_completed
                        );
                        self.phase = Phase::Completed;
                        return;
                    }
                }

                self.phase = Phase::Working;
                self.remaining_seconds = work_duration(&self.circuit.stations[self.station_index]);
                self.phase_elapsed = 0;
            }
            Phase::Completed | Phase::Stopped => {}
        }
    }

    /// The rest phase doubles as the movement away from the current station.
    /// Its elapsed time is recorded against the connection whose destination
    /// is the station being left; a circuit without such an edge simply gets
    /// no entry.
    fn record_transition(&mut self) {
        let leaving = self.circuit.stations[self.station_index].station_id;
        if let Some(connection) = self
            .circuit
            .connections
            .iter()
            .find(|c| c.to_station_id == leaving)
        {
            self.transition_seconds
                .insert(connection.id, self.phase_elapsed);
        }
    }

    fn session_record(&self) -> TrainingSession {
        let mut session = TrainingSession::new(
            self.circuit.id,
            self.circuit.name.clone(),
            self.space_id,
            self.space_name.clone(),
            self.started_at,
            self.circuit.rounds,
        );
        session.ended_at = Some(Utc::now());
        session.completed_rounds = self.rounds_completed.min(self.circuit.rounds);
        session.station_seconds = self.station_seconds.clone();
        session.transition_seconds = self.transition_seconds.clone();
        session
    }

    // ------------------------------------------------------------------
    // Read-only state accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Rounds fully finished so far (never the round in progress)
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed.min(self.circuit.rounds)
    }

    /// 1-based round number for display
    pub fn current_round(&self) -> u32 {
        if self.phase.is_terminal() {
            self.rounds_completed()
        } else {
            self.rounds_completed + 1
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Station the scheduler is working or resting at, if still running
    pub fn current_station_id(&self) -> Option<Uuid> {
        if self.phase.is_terminal() {
            return None;
        }
        Some(self.circuit.stations[self.station_index].station_id)
    }

    /// Station the scheduler will move to next: the following slot in this
    /// round, or the first slot again if another round remains
    pub fn next_station_id(&self) -> Option<Uuid> {
        if self.phase.is_terminal() {
            return None;
        }
        let next_index = self.station_index + 1;
        if next_index < self.circuit.stations.len() {
            Some(self.circuit.stations[next_index].station_id)
        } else if self.rounds_completed + 1 < self.circuit.rounds {
            self.circuit.stations.first().map(|s| s.station_id)
        } else {
            None
        }
    }

    pub fn current_exercise(&self) -> Option<&StationExercise> {
        if self.phase.is_terminal() {
            return None;
        }
        self.circuit.stations.get(self.station_index)
    }
}

fn work_duration(exercise: &StationExercise) -> u32 {
    exercise.duration_seconds.unwrap_or(DEFAULT_WORK_SECONDS)
}
