use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use skirmish_app::audio::{AudioLibrary, LogBackend};
use skirmish_app::runner::{self, RunOptions};
use skirmish_app::services::Services;
use skirmish_app::settings::SettingsStore;
use skirmish_app::{logging, AppError};

/// Top-down arena shooter, headless.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in level (training, arena, gauntlet) or a level JSON file
    #[arg(default_value = "training")]
    level: String,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 18_000)]
    ticks: u64,

    /// Settings file; created on first change
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Run at wall-clock speed instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Leave the player idle instead of letting the autopilot play
    #[arg(long)]
    no_autopilot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<(), AppError> {
    let settings = SettingsStore::open(&args.settings)?;
    let mut services = Services::new(settings, LogBackend, AudioLibrary::standard());
    let options = RunOptions {
        scene: args.level,
        seed: args.seed,
        max_ticks: args.ticks,
        realtime: args.realtime,
        autopilot: !args.no_autopilot,
    };
    let summary = runner::run(&options, &mut services)?;
    println!(
        "{} | {:?} at tick {} | waves cleared {} | kills {}/{} | shots {} | damage taken {} | pickups {}",
        summary.level.as_deref().unwrap_or("-"),
        summary.phase,
        summary.ticks,
        summary.waves_cleared,
        summary.kills,
        summary.enemies_spawned,
        summary.shots_fired,
        summary.damage_taken,
        summary.pickups_collected,
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
