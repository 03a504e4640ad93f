//! Rocket Lander CLI - Run headless evolution from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rocket_lander::{BestEverRecord, GenerationController, LanderConfig, schema::ConfigError};

/// Errors surfaced by the command-line driver.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Error reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Error parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] ConfigError),
    #[error("Error writing {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Parsed command line.
struct Args {
    config_path: PathBuf,
    generations: usize,
    export: Option<PathBuf>,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();

    if argv.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let Some(args) = parse_args(&argv[1..]) else {
        let program = argv.first().map(String::as_str).unwrap_or("rocket-lander");
        eprintln!("Usage: {program} <config.json> [generations] [--export best.json]");
        eprintln!();
        eprintln!("Evolve lander thrust programs from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration file");
        eprintln!("  generations  Number of generations to run (default: 50)");
        eprintln!("  --export     Write the best-ever flight to a JSON file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    };

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut positional = Vec::new();
    let mut export = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--export" {
            export = Some(PathBuf::from(iter.next()?));
        } else {
            positional.push(arg);
        }
    }

    let config_path = PathBuf::from(positional.first()?);
    let generations = match positional.get(1) {
        Some(s) => s.parse().ok()?,
        None => 50,
    };
    Some(Args {
        config_path,
        generations,
        export,
    })
}

fn load_config(path: &Path) -> Result<LanderConfig, CliError> {
    let config_str = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: LanderConfig = serde_json::from_str(&config_str)?;
    if let Err(e) = config.validate() {
        log::warn!("Rejected configuration {}: {e}", path.display());
        return Err(e.into());
    }
    Ok(config)
}

fn export_best(path: &Path, record: &BestEverRecord) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(&args.config_path)?;

    println!("Rocket Lander Evolution");
    println!("=======================");
    println!(
        "Arena: {}x{}, pad at x={}, obstacle at x={} (width {})",
        config.environment.width,
        config.environment.height,
        config.environment.landing_x,
        config.environment.obstacle_x,
        config.environment.obstacle_size
    );
    println!("Population: {}", config.population_size);
    println!("Lifetime: {} steps", config.lifetime);
    println!("Wind: {}", config.environment.wind_force);
    println!("Generations: {}", args.generations);
    println!();

    let mut controller = GenerationController::new(config);
    controller.start();

    let start = Instant::now();
    while controller.generation() < args.generations {
        if let Some(stats) = controller.tick_default() {
            println!(
                "  Gen {:>4}: landed={:>3} crashed={:>3} timed out={:>3}  best error={}",
                stats.generation,
                stats.landed,
                stats.crashed,
                stats.timed_out,
                stats
                    .best_error()
                    .map_or_else(|| "-".to_string(), |e| format!("{e:.2}"))
            );
        }
    }
    let elapsed = start.elapsed();

    println!();
    match controller.best_ever() {
        Some(best) => println!(
            "Best fitness: {:.4} (generation {}, {} frames)",
            best.fitness,
            best.generation,
            best.trajectory.len()
        ),
        None => println!("No best flight recorded"),
    }
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        args.generations as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );

    if let (Some(path), Some(best)) = (&args.export, controller.best_ever()) {
        export_best(path, best)?;
        println!("Best flight written to {}", path.display());
    }

    Ok(())
}

fn print_example_config() {
    let config = LanderConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&strings(&["run.json", "12", "--export", "best.json"])).unwrap();
        assert_eq!(args.config_path, PathBuf::from("run.json"));
        assert_eq!(args.generations, 12);
        assert_eq!(args.export, Some(PathBuf::from("best.json")));

        let defaults = parse_args(&strings(&["run.json"])).unwrap();
        assert_eq!(defaults.generations, 50);
        assert!(defaults.export.is_none());

        assert!(parse_args(&[]).is_none());
        assert!(parse_args(&strings(&["run.json", "--export"])).is_none());
        assert!(parse_args(&strings(&["run.json", "many"])).is_none());
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"population_size": 0}"#).unwrap();

        assert!(matches!(
            load_config(&path),
            Err(CliError::Invalid(ConfigError::EmptyPopulation))
        ));
        assert!(matches!(
            load_config(&dir.path().join("missing.json")),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn test_run_exports_best_flight() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("run.json");
        let export = dir.path().join("best.json");
        fs::write(
            &config_path,
            r#"{"population_size": 6, "lifetime": 30, "sim_speed": 5, "random_seed": 3}"#,
        )
        .unwrap();

        let args = Args {
            config_path,
            generations: 2,
            export: Some(export.clone()),
        };
        run(&args).unwrap();

        let record: BestEverRecord =
            serde_json::from_str(&fs::read_to_string(export).unwrap()).unwrap();
        assert_eq!(record.genome.len(), 30);
        assert!(!record.trajectory.is_empty());
    }
}
