use circuit_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "weaver")]
#[command(about = "Circuit training planner and session runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a sample space with a planned circuit
    Demo,

    /// Plan a route through a space's stations
    Plan {
        /// Space to plan in
        #[arg(long)]
        space: String,

        /// Station to start from (custom or equipment name); defaults to the
        /// first station
        #[arg(long)]
        start: Option<String>,
    },

    /// Execute a circuit and record the session
    Run {
        /// Space the circuit belongs to
        #[arg(long)]
        space: String,

        /// Circuit to execute
        #[arg(long)]
        circuit: String,

        /// Tick as fast as possible instead of once per second
        #[arg(long)]
        fast: bool,

        /// Stop after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,

        /// 1-5 star rating to record on the session
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Show training statistics
    Stats,

    /// Show achievement progress
    Achievements,

    /// Roll the session log into the CSV archive
    Rollup {
        /// Remove retired log files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

struct DataPaths {
    state: PathBuf,
    log: PathBuf,
    log_dir: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let log_dir = data_dir.join("log");
        Self {
            state: data_dir.join("state.json"),
            log: log_dir.join("sessions.log"),
            log_dir,
            csv: data_dir.join("sessions.csv"),
        }
    }
}

fn main() -> Result<()> {
    circuit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Demo => cmd_demo(&paths, &config),
        Commands::Plan { space, start } => cmd_plan(&paths, &space, start.as_deref()),
        Commands::Run {
            space,
            circuit,
            fast,
            max_ticks,
            rating,
        } => cmd_run(&paths, &space, &circuit, fast, max_ticks, rating),
        Commands::Stats => cmd_stats(&paths),
        Commands::Achievements => cmd_achievements(&paths),
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

const DEMO_SPACE: &str = "Demo Gym";

fn cmd_demo(paths: &DataPaths, config: &Config) -> Result<()> {
    let errors = get_default_catalog().validate();
    if !errors.is_empty() {
        eprintln!("Exercise catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid exercise catalog".into()));
    }

    let mut state = LibraryState::load(&paths.state)?;
    state.spaces.retain(|s| s.name != DEMO_SPACE);

    let mut space = TrainingSpace::new(DEMO_SPACE);
    space.stations = vec![
        Station::new(StationType::Kettlebell, Position::new(0.15, 0.2)),
        Station::new(StationType::PullUpBar, Position::new(0.85, 0.25)),
        Station::new(StationType::Mat, Position::new(0.5, 0.5)),
        Station::new(StationType::Box, Position::new(0.2, 0.8)),
        Station::new(StationType::Rope, Position::new(0.8, 0.75)),
    ];

    let route = plan_route(&space.stations, space.stations[0].id);
    let circuit = circuit_from_route(
        "Demo Loop",
        &route,
        config.circuit.default_rounds,
        config.circuit.default_rest_seconds,
    );

    println!("Created space '{}' with {} stations", space.name, space.stations.len());
    println!(
        "Planned circuit '{}': {} stations, {} rounds",
        circuit.name,
        circuit.stations.len(),
        circuit.rounds
    );

    space.circuits.push(circuit);
    state.spaces.push(space);
    state.save(&paths.state)?;

    println!("\n✓ Demo space saved");
    println!("  Try: weaver run --space '{DEMO_SPACE}' --circuit 'Demo Loop' --fast");
    Ok(())
}

fn cmd_plan(paths: &DataPaths, space_name: &str, start: Option<&str>) -> Result<()> {
    let state = LibraryState::load(&paths.state)?;
    let space = state
        .space_by_name(space_name)
        .ok_or_else(|| Error::Other(format!("No space named '{space_name}'")))?;

    if space.stations.is_empty() {
        return Err(Error::Other(format!("Space '{space_name}' has no stations")));
    }

    let start_id = match start {
        Some(wanted) => space
            .stations
            .iter()
            .find(|s| s.label().eq_ignore_ascii_case(wanted))
            .map(|s| s.id)
            .ok_or_else(|| Error::Other(format!("No station named '{wanted}' in '{space_name}'")))?,
        None => space.stations[0].id,
    };

    let route = plan_route(&space.stations, start_id);

    println!("\nRoute through '{}':", space.name);
    for (index, station) in route.iter().enumerate() {
        println!("  {}. {}", index + 1, station.label());
        if let Some(next) = route.get(index + 1) {
            let distance = station.position.distance_to(next.position);
            let estimate =
                estimate_transition_time(station.station_type, next.station_type, distance);
            println!("     ↓ ~{estimate:.0}s transition");
        }
    }
    println!();
    Ok(())
}

fn cmd_run(
    paths: &DataPaths,
    space_name: &str,
    circuit_name: &str,
    fast: bool,
    max_ticks: Option<u64>,
    rating: Option<u8>,
) -> Result<()> {
    let mut state = LibraryState::load(&paths.state)?;
    let space = state
        .space_by_name(space_name)
        .ok_or_else(|| Error::Other(format!("No space named '{space_name}'")))?;
    let circuit = space
        .circuit_by_name(circuit_name)
        .ok_or_else(|| Error::Other(format!("No circuit named '{circuit_name}' in '{space_name}'")))?
        .clone();

    let dangling = circuit.dangling_station_ids(&space.stations);
    if !dangling.is_empty() {
        eprintln!(
            "Warning: circuit references {} stations no longer in the space; their measurements will be skipped",
            dangling.len()
        );
    }

    let mut scheduler = CircuitScheduler::new(circuit, space)?;
    tracing::info!("Running '{}' in '{}'", circuit_name, space_name);

    println!("\nRunning '{circuit_name}' ({space_name})\n");
    print_phase(&scheduler, space);

    let mut ticks = 0u64;
    let mut previous = (scheduler.phase(), scheduler.current_station_id());

    while !scheduler.phase().is_terminal() {
        if !fast {
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
        scheduler.tick();
        ticks += 1;

        let now = (scheduler.phase(), scheduler.current_station_id());
        if now != previous {
            print_phase(&scheduler, space);
            previous = now;
        }

        if max_ticks.is_some_and(|limit| ticks >= limit) {
            println!("  (tick limit reached, stopping)");
            break;
        }
    }

    let mut session = scheduler.stop();
    match rating {
        Some(stars @ 1..=5) => session.rating = Some(stars),
        Some(stars) => eprintln!("Ignoring out-of-range rating {stars} (expected 1-5)"),
        None => {}
    }

    let mut sink = JsonlSink::new(&paths.log);
    sink.append(&session)?;

    // Refresh achievement progress against the full history.
    let history = load_history(&paths.log, &paths.csv)?;
    let unlocked_before: Vec<String> = state
        .achievements
        .iter()
        .filter(|a| a.is_unlocked)
        .map(|a| a.id.clone())
        .collect();
    let spaces_created = state.spaces.len();
    let circuits_created = state.total_circuits();
    update_achievement_progress(
        &mut state.achievements,
        &history,
        spaces_created,
        circuits_created,
    );
    let newly_unlocked: Vec<String> = state
        .achievements
        .iter()
        .filter(|a| a.is_unlocked && !unlocked_before.contains(&a.id))
        .map(|a| a.title.clone())
        .collect();
    state.save(&paths.state)?;

    let wall_seconds = chrono::Utc::now()
        .signed_duration_since(session.started_at)
        .num_seconds();

    println!("\n✓ Session logged!");
    println!(
        "  Rounds: {}/{}  ({})",
        session.completed_rounds,
        session.total_rounds,
        if session.is_completed() { "completed" } else { "stopped early" }
    );
    println!("  Wall clock: {wall_seconds}s over {ticks} ticks");
    for title in newly_unlocked {
        println!("  ★ Achievement unlocked: {title}");
    }

    Ok(())
}

fn print_phase(scheduler: &CircuitScheduler, space: &TrainingSpace) {
    match scheduler.phase() {
        Phase::Working => {
            if let Some(exercise) = scheduler.current_exercise() {
                let station = scheduler
                    .current_station_id()
                    .and_then(|id| space.station(id))
                    .map(|s| s.label().to_string())
                    .unwrap_or_else(|| "?".into());
                println!(
                    "  Round {} · {} @ {} ({}s work)",
                    scheduler.current_round(),
                    exercise.exercise_name,
                    station,
                    scheduler.remaining_seconds()
                );
            }
        }
        Phase::Resting => {
            println!("    rest {}s", scheduler.remaining_seconds());
        }
        Phase::Completed => println!("\n  All rounds complete!"),
        Phase::Stopped => {}
    }
}

fn cmd_stats(paths: &DataPaths) -> Result<()> {
    let history = load_history(&paths.log, &paths.csv)?;
    let stats = TrainingStatistics::calculate(&history);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TRAINING STATISTICS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Sessions: {} total, {} completed",
        stats.total_sessions, stats.completed_sessions
    );
    println!("  Rounds completed: {}", stats.total_rounds);
    println!(
        "  Time training: {} min (avg {:.1} min/session)",
        stats.total_duration_seconds / 60,
        stats.average_duration_seconds / 60.0
    );
    println!(
        "  Streak: {} days now, {} days best",
        stats.current_streak, stats.longest_streak
    );
    if let Some(ref favorite) = stats.favorite_circuit {
        println!("  Favorite circuit: {favorite}");
    }

    if !stats.sessions_by_week.is_empty() {
        println!();
        println!("  Sessions by week:");
        for (week, count) in &stats.sessions_by_week {
            let avg = stats
                .weekly_average_seconds
                .get(week)
                .map(|s| format!(", avg {:.0} min", s / 60.0))
                .unwrap_or_default();
            println!("    {week}: {count}{avg}");
        }
    }
    println!();
    Ok(())
}

fn cmd_achievements(paths: &DataPaths) -> Result<()> {
    let mut state = LibraryState::load(&paths.state)?;
    let history = load_history(&paths.log, &paths.csv)?;

    let spaces_created = state.spaces.len();
    let circuits_created = state.total_circuits();
    update_achievement_progress(
        &mut state.achievements,
        &history,
        spaces_created,
        circuits_created,
    );
    state.save(&paths.state)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  ACHIEVEMENTS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    for achievement in &state.achievements {
        let marker = if achievement.is_unlocked { "★" } else { " " };
        println!(
            "  [{}] {} - {} ({:.0}%)",
            marker,
            achievement.title,
            achievement.description,
            achievement.progress * 100.0
        );
    }
    println!();
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.log.exists() {
        println!("No session log found - nothing to roll up.");
        return Ok(());
    }

    let count = circuit_core::csv_rollup::log_to_csv_and_archive(&paths.log, &paths.csv)?;

    println!("✓ Rolled up {} sessions to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = circuit_core::csv_rollup::cleanup_processed_logs(&paths.log_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed log files", cleaned);
        }
    }

    Ok(())
}
