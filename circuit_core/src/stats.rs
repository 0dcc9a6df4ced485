//! Aggregate statistics over recorded training sessions.
//!
//! Everything here is a pure function of the session list: nothing is
//! cached or persisted, and calling it twice on the same input yields the
//! same snapshot. Duration-based aggregates only count completed sessions;
//! an abandoned attempt still shows up in the raw session total.

use crate::types::TrainingSession;
use chrono::{NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Snapshot of everything the analytics surface displays
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingStatistics {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// Summed wall-clock seconds of completed sessions
    pub total_duration_seconds: i64,
    /// Mean wall-clock seconds per completed session
    pub average_duration_seconds: f64,
    /// Rounds finished across completed sessions
    pub total_rounds: u32,
    /// Circuit with the most completed sessions; ties keep the circuit
    /// encountered first
    pub favorite_circuit: Option<String>,
    /// Most consecutive calendar days with at least one completed session
    pub longest_streak: u32,
    /// Running streak as of the most recent session. Deliberately not
    /// anchored to today: a streak that ended long ago still reads as
    /// "current" until a later session breaks the chain.
    pub current_streak: u32,
    /// Completed sessions per ISO week, keyed by the week's Monday
    pub sessions_by_week: BTreeMap<NaiveDate, u32>,
    /// Mean completed-session seconds per ISO week, keyed by the week's
    /// Monday
    pub weekly_average_seconds: BTreeMap<NaiveDate, f64>,
}

impl TrainingStatistics {
    /// Compute the full snapshot from a session history.
    ///
    /// Input order only matters for favorite-circuit tie-breaking; streaks
    /// sort internally.
    pub fn calculate(sessions: &[TrainingSession]) -> Self {
        let completed: Vec<&TrainingSession> =
            sessions.iter().filter(|s| s.is_completed()).collect();

        let total_duration_seconds: i64 = completed
            .iter()
            .filter_map(|s| s.duration_seconds())
            .sum();
        let average_duration_seconds = if completed.is_empty() {
            0.0
        } else {
            total_duration_seconds as f64 / completed.len() as f64
        };

        let total_rounds = completed.iter().map(|s| s.completed_rounds).sum();
        let (longest_streak, current_streak) = day_streaks(&completed);
        let favorite_circuit = favorite_circuit(&completed);
        let (sessions_by_week, weekly_average_seconds) = weekly_buckets(&completed);

        TrainingStatistics {
            total_sessions: sessions.len(),
            completed_sessions: completed.len(),
            total_duration_seconds,
            average_duration_seconds,
            total_rounds,
            favorite_circuit,
            longest_streak,
            current_streak,
            sessions_by_week,
            weekly_average_seconds,
        }
    }
}

/// Walk completed-session days in ascending order. A gap of exactly one day
/// extends the running streak; a larger gap commits it to the longest and
/// restarts at 1; repeats within a day change nothing.
fn day_streaks(completed: &[&TrainingSession]) -> (u32, u32) {
    let mut days: Vec<NaiveDate> = completed.iter().map(|s| s.started_at.date_naive()).collect();
    days.sort();
    days.dedup();

    let mut longest = 0u32;
    let mut current = 0u32;
    let mut last: Option<NaiveDate> = None;

    for day in days {
        match last {
            None => current = 1,
            Some(previous) => {
                let gap = day.signed_duration_since(previous).num_days();
                if gap == 1 {
                    current += 1;
                } else {
                    longest = longest.max(current);
                    current = 1;
                }
            }
        }
        last = Some(day);
    }

    longest = longest.max(current);
    (longest, current)
}

fn favorite_circuit(completed: &[&TrainingSession]) -> Option<String> {
    // Counts keyed in first-seen order so ties resolve deterministically.
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for session in completed {
        match counts
            .iter_mut()
            .find(|(name, _)| *name == session.circuit_name)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((session.circuit_name.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (name, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

fn weekly_buckets(
    completed: &[&TrainingSession],
) -> (BTreeMap<NaiveDate, u32>, BTreeMap<NaiveDate, f64>) {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut duration_sums: BTreeMap<NaiveDate, (i64, u32)> = BTreeMap::new();

    for session in completed {
        let week = session
            .started_at
            .date_naive()
            .week(Weekday::Mon)
            .first_day();
        *counts.entry(week).or_insert(0) += 1;

        if let Some(duration) = session.duration_seconds() {
            let entry = duration_sums.entry(week).or_insert((0, 0));
            entry.0 += duration;
            entry.1 += 1;
        }
    }

    let averages = duration_sums
        .into_iter()
        .map(|(week, (sum, n))| (week, sum as f64 / f64::from(n)))
        .collect();

    (counts, averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn session(
        circuit_name: &str,
        started_at: DateTime<Utc>,
        duration_seconds: i64,
        completed: bool,
    ) -> TrainingSession {
        let mut s = crate::types::TrainingSession::new(
            Uuid::new_v4(),
            circuit_name,
            Uuid::new_v4(),
            "Garage",
            started_at,
            3,
        );
        s.ended_at = Some(started_at + Duration::seconds(duration_seconds));
        s.completed_rounds = if completed { 3 } else { 1 };
        s
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let stats = TrainingStatistics::calculate(&[]);

        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.completed_sessions, 0);
        assert_eq!(stats.total_duration_seconds, 0);
        assert_eq!(stats.average_duration_seconds, 0.0);
        assert_eq!(stats.total_rounds, 0);
        assert_eq!(stats.favorite_circuit, None);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.current_streak, 0);
        assert!(stats.sessions_by_week.is_empty());
        assert!(stats.weekly_average_seconds.is_empty());
    }

    #[test]
    fn test_duration_aggregates_skip_incomplete_sessions() {
        let sessions = vec![
            session("Loop", at(2026, 3, 2, 9), 600, true),
            session("Loop", at(2026, 3, 3, 9), 1200, true),
            session("Loop", at(2026, 3, 4, 9), 9999, false),
        ];

        let stats = TrainingStatistics::calculate(&sessions);

        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.total_duration_seconds, 1800);
        assert_eq!(stats.average_duration_seconds, 900.0);
        assert_eq!(stats.total_rounds, 6);
    }

    #[test]
    fn test_streak_extends_and_restarts() {
        // Days 1, 2, 3 consecutive, then a gap to day 5.
        let sessions = vec![
            session("Loop", at(2026, 3, 1, 7), 600, true),
            session("Loop", at(2026, 3, 2, 7), 600, true),
            session("Loop", at(2026, 3, 3, 7), 600, true),
            session("Loop", at(2026, 3, 5, 7), 600, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_streak_ignores_repeats_within_a_day() {
        let sessions = vec![
            session("Loop", at(2026, 3, 1, 7), 600, true),
            session("Loop", at(2026, 3, 1, 19), 600, true),
            session("Loop", at(2026, 3, 2, 7), 600, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_streak_skips_incomplete_days() {
        let sessions = vec![
            session("Loop", at(2026, 3, 1, 7), 600, true),
            session("Loop", at(2026, 3, 2, 7), 600, false),
            session("Loop", at(2026, 3, 3, 7), 600, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        // The abandoned day 2 attempt breaks the chain.
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_streak_input_order_does_not_matter() {
        let mut sessions = vec![
            session("Loop", at(2026, 3, 3, 7), 600, true),
            session("Loop", at(2026, 3, 1, 7), 600, true),
            session("Loop", at(2026, 3, 2, 7), 600, true),
        ];

        assert_eq!(TrainingStatistics::calculate(&sessions).longest_streak, 3);
        sessions.reverse();
        assert_eq!(TrainingStatistics::calculate(&sessions).longest_streak, 3);
    }

    #[test]
    fn test_current_streak_is_not_anchored_to_today() {
        // Training stopped years ago; the last run of days still reports as
        // the current streak. Intentional, if arguable, behavior.
        let sessions = vec![
            session("Loop", at(2020, 6, 1, 7), 600, true),
            session("Loop", at(2020, 6, 2, 7), 600, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_favorite_circuit_by_completed_count() {
        let sessions = vec![
            session("Sprints", at(2026, 3, 1, 7), 600, true),
            session("Strength", at(2026, 3, 2, 7), 600, true),
            session("Strength", at(2026, 3, 3, 7), 600, true),
            // Incomplete sessions never vote.
            session("Sprints", at(2026, 3, 4, 7), 600, false),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        assert_eq!(stats.favorite_circuit.as_deref(), Some("Strength"));
    }

    #[test]
    fn test_favorite_circuit_tie_keeps_first_encountered() {
        let sessions = vec![
            session("Sprints", at(2026, 3, 1, 7), 600, true),
            session("Strength", at(2026, 3, 2, 7), 600, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);
        assert_eq!(stats.favorite_circuit.as_deref(), Some("Sprints"));
    }

    #[test]
    fn test_weekly_buckets_key_on_monday() {
        // 2026-03-02 is a Monday; 2026-03-04 the Wednesday after; 2026-03-09
        // the following Monday.
        let sessions = vec![
            session("Loop", at(2026, 3, 2, 7), 600, true),
            session("Loop", at(2026, 3, 4, 7), 1200, true),
            session("Loop", at(2026, 3, 9, 7), 300, true),
        ];

        let stats = TrainingStatistics::calculate(&sessions);

        let week1 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let week2 = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(stats.sessions_by_week.get(&week1), Some(&2));
        assert_eq!(stats.sessions_by_week.get(&week2), Some(&1));
        assert_eq!(stats.weekly_average_seconds.get(&week1), Some(&900.0));
        assert_eq!(stats.weekly_average_seconds.get(&week2), Some(&300.0));
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let sessions = vec![
            session("Loop", at(2026, 3, 1, 7), 600, true),
            session("Sprints", at(2026, 3, 2, 7), 900, false),
            session("Loop", at(2026, 3, 3, 7), 1200, true),
        ];

        let first = TrainingStatistics::calculate(&sessions);
        let second = TrainingStatistics::calculate(&sessions);
        assert_eq!(first, second);
    }
}
