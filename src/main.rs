use std::process::ExitCode;

use clap::{Parser, Subcommand};
use leo_channel::config::Scenario;
use leo_channel::link::{ImpairmentSample, LinkBudgetModel};
use leo_channel::tracker::Tracker;

#[derive(Parser)]
#[command(name = "leo-channel")]
#[command(about = "LEO satellite link channel emulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate { scenario: String },
    /// List passes inside the observation window
    Passes {
        scenario: String,
        /// Coarse scan step
        #[arg(long, default_value = "60s", value_parser = humantime::parse_duration)]
        step: std::time::Duration,
    },
    /// Print the link budget at every tracker step
    Budget {
        scenario: String,
        /// JSON lines instead of CSV
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario } => validate(&scenario),
        Commands::Passes { scenario, step } => passes(&scenario, step),
        Commands::Budget { scenario, json } => budget(&scenario, json),
    }
}

fn load(path: &str) -> Option<(Scenario, Tracker)> {
    let scenario = match Scenario::from_file(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading scenario: {}", e);
            return None;
        }
    };
    match Tracker::new(&scenario.tracker) {
        Ok(tracker) => Some((scenario, tracker)),
        Err(e) => {
            eprintln!("Invalid scenario: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some((scenario, tracker)) = load(path) else {
        return ExitCode::FAILURE;
    };
    let window = tracker.window();
    let link = tracker.link();

    println!("Scenario is valid ({} steps)", tracker.steps());
    println!("  satellite: {}", tracker.name());
    println!("  window:    {} .. {}", window.start, window.end);
    println!(
        "  link:      {} at {:.3} MHz, {} Hz sample rate",
        link.direction,
        link.frequency_hz / 1e6,
        scenario.channel.sample_rate_hz
    );
    println!(
        "  antennas:  satellite {} ({:.2} dBi), ground {} ({:.2} dBi)",
        tracker.satellite_antenna().kind().family(),
        tracker.satellite_antenna().peak_gain_dbi(),
        tracker.ground_antenna().kind().family(),
        tracker.ground_antenna().peak_gain_dbi()
    );
    ExitCode::SUCCESS
}

fn passes(path: &str, step: std::time::Duration) -> ExitCode {
    let Some((_, tracker)) = load(path) else {
        return ExitCode::FAILURE;
    };
    let step = match chrono::Duration::from_std(step) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid step: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tracker.passes(step) {
        Ok(passes) => {
            for pass in &passes {
                match serde_json::to_string(pass) {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        eprintln!("Serialization error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Pass prediction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn budget(path: &str, json: bool) -> ExitCode {
    let Some((scenario, tracker)) = load(path) else {
        return ExitCode::FAILURE;
    };
    let model = match LinkBudgetModel::for_tracker(&tracker, &scenario.impairments) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Invalid impairments: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !json {
        println!("{}", ImpairmentSample::csv_header());
    }
    for point in tracker.track() {
        let point = match point {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Propagation failed: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let sample = model.evaluate(&point);
        if json {
            match serde_json::to_string(&sample) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    eprintln!("Serialization error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", sample.to_csv_row());
        }
    }
    ExitCode::SUCCESS
}
