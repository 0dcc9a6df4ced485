//! Route planning across the stations of a training space.
//!
//! This module orders stations into a traversable loop and estimates how
//! long the movement between consecutive stations takes, so that circuit
//! authoring can start from a sensible default ordering instead of the order
//! stations happened to be placed in.

use crate::catalog::get_default_catalog;
use crate::types::{CircuitConnection, Station, StationExercise, StationType, TrainingCircuit};
use uuid::Uuid;

/// Assumed real-world scale of the normalized floor plan
const METERS_PER_UNIT: f64 = 10.0;

/// Walking pace of roughly 1.4 m/s
const SECONDS_PER_METER: f64 = 0.7;

/// Even adjacent stations need a moment to switch over
const MIN_TRANSITION_SECONDS: f64 = 5.0;

/// Order stations into a route by greedy nearest-neighbor traversal.
///
/// Starting from `start_id`, repeatedly walks to the closest not-yet-visited
/// station. Distance ties keep the earlier candidate in input order. The
/// result is a permutation of the input beginning with the start station.
///
/// This is a heuristic, not an optimal tour; for the handful of stations a
/// real space holds it produces routes people actually follow. Obstacles are
/// a rendering concern and never influence the ordering.
///
/// If `start_id` does not name a station in the set, the input is returned
/// in its given order, unchanged.
pub fn plan_route(stations: &[Station], start_id: Uuid) -> Vec<Station> {
    let Some(start) = stations.iter().find(|s| s.id == start_id) else {
        tracing::warn!("Route start {} not in station set, keeping input order", start_id);
        return stations.to_vec();
    };

    let mut remaining: Vec<&Station> = stations.iter().filter(|s| s.id != start_id).collect();
    let mut route = vec![start.clone()];
    let mut current = start.position;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = current.distance_to(remaining[0].position);
        for (index, candidate) in remaining.iter().enumerate().skip(1) {
            let distance = current.distance_to(candidate.position);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        let next = remaining.remove(best);
        current = next.position;
        route.push(next.clone());
    }

    tracing::debug!("Planned route over {} stations", route.len());
    route
}

/// Estimate the seconds needed to move between two stations.
///
/// `distance` is in normalized floor-plan units (0..~1.4 across the
/// diagonal). The estimate is walking time at a normal pace plus a penalty
/// for putting down and picking up equipment, floored at
/// [`MIN_TRANSITION_SECONDS`].
pub fn estimate_transition_time(from: StationType, to: StationType, distance: f64) -> f64 {
    let equipment_penalty = match (from, to) {
        // Carrying between kettlebells: pick up, carry, set down
        (StationType::Kettlebell, StationType::Kettlebell) => 8.0,
        (StationType::Kettlebell, _) | (_, StationType::Kettlebell) => 5.0,
        (StationType::Box, StationType::Box) => 6.0,
        (StationType::Rope, StationType::Rope) => 3.0,
        (StationType::Mat, StationType::Mat) => 2.0,
        // Nothing to move, just walking
        (StationType::PullUpBar, StationType::PullUpBar) => 1.0,
        _ => 2.0,
    };

    let walking_time = distance * METERS_PER_UNIT * SECONDS_PER_METER;
    (walking_time + equipment_penalty).max(MIN_TRANSITION_SECONDS)
}

/// Derive the directed transition edges along an already-ordered route.
///
/// One connection per consecutive pair, with the estimated duration computed
/// from positions and equipment types.
pub fn connect_route(route: &[Station]) -> Vec<CircuitConnection> {
    route
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let distance = from.position.distance_to(to.position);
            CircuitConnection::new(
                from.id,
                to.id,
                estimate_transition_time(from.station_type, to.station_type, distance),
            )
        })
        .collect()
}

/// Materialize a planned route into an editable circuit definition.
///
/// Each station gets a default exercise drawn from the built-in catalog for
/// its equipment type; the caller is expected to let the user edit the
/// result before running it.
pub fn circuit_from_route(
    name: impl Into<String>,
    route: &[Station],
    rounds: u32,
    rest_after_seconds: u32,
) -> TrainingCircuit {
    let catalog = get_default_catalog();

    let stations = route
        .iter()
        .map(|station| {
            let mut exercise = StationExercise::new(station.id, "Exercise", rest_after_seconds);
            if let Some(default) = catalog.for_station_type(station.station_type).first() {
                exercise.exercise_name = default.name.clone();
                exercise.reps = default.default_reps;
                exercise.duration_seconds = default.default_duration_seconds;
            }
            exercise
        })
        .collect();

    TrainingCircuit::new(name, stations, connect_route(route), rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn station_at(station_type: StationType, x: f64, y: f64) -> Station {
        Station::new(station_type, Position::new(x, y))
    }

    #[test]
    fn test_plan_route_is_permutation_starting_at_start() {
        let stations = vec![
            station_at(StationType::Mat, 0.9, 0.9),
            station_at(StationType::Kettlebell, 0.1, 0.1),
            station_at(StationType::Box, 0.5, 0.5),
            station_at(StationType::Rope, 0.2, 0.8),
        ];
        let start_id = stations[1].id;

        let route = plan_route(&stations, start_id);

        assert_eq!(route.len(), stations.len());
        assert_eq!(route[0].id, start_id);

        let mut input_ids: Vec<Uuid> = stations.iter().map(|s| s.id).collect();
        let mut route_ids: Vec<Uuid> = route.iter().map(|s| s.id).collect();
        input_ids.sort();
        route_ids.sort();
        assert_eq!(input_ids, route_ids);
    }

    #[test]
    fn test_plan_route_walks_to_nearest_neighbor() {
        let near = station_at(StationType::Mat, 0.2, 0.0);
        let far = station_at(StationType::Mat, 0.9, 0.0);
        let start = station_at(StationType::Kettlebell, 0.0, 0.0);
        let start_id = start.id;
        let (near_id, far_id) = (near.id, far.id);

        let route = plan_route(&[far, near, start], start_id);

        assert_eq!(route[0].id, start_id);
        assert_eq!(route[1].id, near_id);
        assert_eq!(route[2].id, far_id);
    }

    #[test]
    fn test_plan_route_breaks_distance_ties_by_input_order() {
        let start = station_at(StationType::Mat, 0.5, 0.5);
        let left = station_at(StationType::Box, 0.25, 0.5);
        let right = station_at(StationType::Rope, 0.75, 0.5);
        let start_id = start.id;
        let left_id = left.id;

        // Both candidates are exactly 0.25 away; the first in input order wins.
        let route = plan_route(&[start, left, right], start_id);
        assert_eq!(route[1].id, left_id);
    }

    #[test]
    fn test_plan_route_with_unknown_start_keeps_input_order() {
        let stations = vec![
            station_at(StationType::Mat, 0.9, 0.9),
            station_at(StationType::Box, 0.1, 0.1),
        ];

        let route = plan_route(&stations, Uuid::new_v4());

        let input_ids: Vec<Uuid> = stations.iter().map(|s| s.id).collect();
        let route_ids: Vec<Uuid> = route.iter().map(|s| s.id).collect();
        assert_eq!(input_ids, route_ids);
    }

    #[test]
    fn test_plan_route_single_station() {
        let stations = vec![station_at(StationType::Mat, 0.5, 0.5)];
        let route = plan_route(&stations, stations[0].id);
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_transition_time_floor() {
        // Zero distance and the lightest pairing still takes 5 seconds.
        let estimate = estimate_transition_time(StationType::PullUpBar, StationType::PullUpBar, 0.0);
        assert_eq!(estimate, 5.0);
    }

    #[test]
    fn test_transition_time_monotonic_in_distance() {
        let mut previous = 0.0;
        for step in 0..15 {
            let distance = step as f64 * 0.1;
            let estimate = estimate_transition_time(StationType::Mat, StationType::Box, distance);
            assert!(estimate >= previous, "estimate shrank at distance {distance}");
            assert!(estimate >= 5.0);
            previous = estimate;
        }
    }

    #[test]
    fn test_transition_time_equipment_penalties() {
        // At a fixed distance the heavy pairings cost more than the light ones.
        let d = 0.5;
        let kb_kb = estimate_transition_time(StationType::Kettlebell, StationType::Kettlebell, d);
        let kb_mat = estimate_transition_time(StationType::Kettlebell, StationType::Mat, d);
        let mat_box = estimate_transition_time(StationType::Mat, StationType::Box, d);
        let bar_bar = estimate_transition_time(StationType::PullUpBar, StationType::PullUpBar, d);

        assert!(kb_kb > kb_mat);
        assert!(kb_mat > mat_box);
        assert!(mat_box > bar_bar);

        // Walking component: 0.5 units * 10 m/unit * 0.7 s/m = 3.5 s.
        assert!((kb_kb - 11.5).abs() < 1e-9);
        assert!((kb_mat - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_transition_penalty_is_symmetric_for_kettlebell() {
        let d = 0.3;
        let to_kb = estimate_transition_time(StationType::Rope, StationType::Kettlebell, d);
        let from_kb = estimate_transition_time(StationType::Kettlebell, StationType::Rope, d);
        assert_eq!(to_kb, from_kb);
    }

    #[test]
    fn test_connect_route_links_consecutive_stations() {
        let a = station_at(StationType::Kettlebell, 0.0, 0.0);
        let b = station_at(StationType::Mat, 0.5, 0.0);
        let c = station_at(StationType::Box, 1.0, 0.0);
        let route = vec![a.clone(), b.clone(), c.clone()];

        let connections = connect_route(&route);

        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].from_station_id, a.id);
        assert_eq!(connections[0].to_station_id, b.id);
        assert_eq!(connections[1].from_station_id, b.id);
        assert_eq!(connections[1].to_station_id, c.id);
        assert!(connections.iter().all(|c| c.estimated_seconds >= 5.0));
    }

    #[test]
    fn test_circuit_from_route_uses_catalog_defaults() {
        let route = vec![
            station_at(StationType::Kettlebell, 0.1, 0.1),
            station_at(StationType::Mat, 0.9, 0.1),
        ];

        let circuit = circuit_from_route("Morning Loop", &route, 3, 45);

        assert_eq!(circuit.rounds, 3);
        assert_eq!(circuit.stations.len(), 2);
        assert_eq!(circuit.connections.len(), 1);
        assert_eq!(circuit.stations[0].station_id, route[0].id);
        assert_eq!(circuit.stations[0].rest_after_seconds, 45);
        // Catalog covers every station type, so the placeholder never survives.
        assert_ne!(circuit.stations[0].exercise_name, "Exercise");
    }
}
