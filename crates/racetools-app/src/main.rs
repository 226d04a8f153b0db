//! RaceTools command line
//!
//! Thin shell over `racetools-core`: every computation lives in the library,
//! this binary only parses arguments, loads settings and prints results.
//!
//! # Usage
//!
//! ```bash
//! # Gear set and speed table for the default car
//! racetools gears
//!
//! # Six-speed box, saved for later comparison
//! racetools save "Six speed" --gears 6 --spread 0.9
//!
//! # Compare two saved configurations
//! racetools compare <id> <id>
//!
//! # Reaction-time trainer (Enter to start, Enter to react)
//! racetools tree --username me
//!
//! # Copy a community suspension tune and export it
//! racetools tune copy 2
//! racetools tune export "Drift King Setup (Copy)" --out .
//! ```

mod tree;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use racetools_core::bracket::{judge_run, single_elimination_rounds};
use racetools_core::calculator::{recompute, CalculatorInputs, Derived, ExportData};
use racetools_core::configs::{
    compare, ComparisonSelection, ConfigStore, JsonConfigStore, SavedConfiguration,
};
use racetools_core::gearing::shift_points;
use racetools_core::performance::RaceDistance;
use racetools_core::reaction::TreeTiming;
use racetools_core::settings::AppSettings;
use racetools_core::tuning::{
    AxlePair, Tune, TuneLibrary, TuneSettings, COMMUNITY_TUNES, TUNES_FILE_NAME,
};
use racetools_core::vehicle::{is_known_model, CAR_MODELS, DEFAULT_CAR};

#[derive(Parser)]
#[command(name = "racetools")]
#[command(version = env!("RACETOOLS_BUILD_ID"))]
#[command(about = "Gear ratio calculator, performance estimator and reaction-time trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory holding saved configurations
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a gear set and show speeds, shift points and estimates
    Gears {
        #[command(flatten)]
        calc: CalcArgs,

        /// Write the export document to this file or directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Save the current calculator state under a name
    Save {
        name: String,

        #[command(flatten)]
        calc: CalcArgs,
    },

    /// List saved configurations
    List,

    /// Load a saved configuration back into the calculator, hand edits included
    Show {
        id: String,

        /// Write the export document to this file or directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Delete a saved configuration
    Delete { id: String },

    /// Compare up to four saved configurations side by side
    Compare {
        /// Configuration ids, in column order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Christmas-tree reaction trainer
    Tree {
        /// Three ambers then green instead of the full staging sequence
        #[arg(long)]
        simple: bool,

        /// Name used for leaderboard submissions
        #[arg(long)]
        username: Option<String>,
    },

    /// Show the known car models
    Cars,

    /// Bracket racing helpers
    Bracket {
        #[command(subcommand)]
        command: BracketCommand,
    },

    /// Suspension tunes and community presets
    Tune {
        #[command(subcommand)]
        command: TuneCommand,
    },
}

#[derive(Subcommand)]
enum TuneCommand {
    /// List community presets
    Community,

    /// Copy a community preset into my tunes
    Copy { id: u32 },

    /// Save a tune under a name (replaces a tune with the same name)
    Save {
        name: String,

        #[command(flatten)]
        settings: TuneArgs,
    },

    /// List my tunes
    List,

    /// Write a tune as `<car>-tune.json`
    Export {
        name: String,

        /// Target directory (prints to stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Tune values; unset ones keep the default setup
#[derive(Args)]
struct TuneArgs {
    #[arg(long, default_value = DEFAULT_CAR)]
    car: String,

    /// Front spring stiffness (1-10)
    #[arg(long, allow_hyphen_values = true)]
    front_suspension: Option<f64>,

    /// Rear spring stiffness (1-10)
    #[arg(long, allow_hyphen_values = true)]
    rear_suspension: Option<f64>,

    /// Front camber in degrees (-5 to 2)
    #[arg(long, allow_hyphen_values = true)]
    front_camber: Option<f64>,

    /// Rear camber in degrees (-5 to 2)
    #[arg(long, allow_hyphen_values = true)]
    rear_camber: Option<f64>,
}

impl TuneArgs {
    fn to_tune(&self, name: &str) -> Tune {
        let defaults = TuneSettings::default();
        let settings = TuneSettings {
            suspension: AxlePair::new(
                self.front_suspension.unwrap_or(defaults.suspension.front),
                self.rear_suspension.unwrap_or(defaults.suspension.rear),
            ),
            camber: AxlePair::new(
                self.front_camber.unwrap_or(defaults.camber.front),
                self.rear_camber.unwrap_or(defaults.camber.rear),
            ),
        };
        let clamped = settings.clamped();
        if clamped != settings {
            tracing::warn!("Tune values clamped to the allowed ranges");
        }
        Tune {
            name: name.to_string(),
            car: self.car.clone(),
            settings: clamped,
        }
    }
}

#[derive(Subcommand)]
enum BracketCommand {
    /// Judge a pass against a dial-in
    Judge {
        /// Declared dial-in (seconds)
        #[arg(long)]
        dial_in: f64,

        /// Elapsed time (seconds)
        #[arg(long)]
        et: f64,
    },

    /// Lay out a single-elimination bracket
    Draw {
        #[arg(required = true)]
        racers: Vec<String>,
    },
}

/// Calculator overrides on top of the configured defaults
#[derive(Args)]
struct CalcArgs {
    /// Car model (applies its default weight, power and torque)
    #[arg(long)]
    car: Option<String>,

    #[arg(long)]
    first_gear: Option<f64>,

    /// Number of gears
    #[arg(long)]
    gears: Option<usize>,

    #[arg(long)]
    spread: Option<f64>,

    #[arg(long)]
    final_drive: Option<f64>,

    /// RPM ceiling
    #[arg(long)]
    rpm: Option<u32>,

    /// Tire diameter (inches)
    #[arg(long)]
    tire: Option<f64>,

    /// Weight (lb)
    #[arg(long)]
    weight: Option<f64>,

    /// Power (hp)
    #[arg(long)]
    power: Option<f64>,

    /// Torque (lb-ft)
    #[arg(long)]
    torque: Option<f64>,
}

impl CalcArgs {
    fn apply(&self, mut inputs: CalculatorInputs) -> Result<CalculatorInputs> {
        if let Some(car) = &self.car {
            if !is_known_model(car) {
                tracing::warn!("Unknown car model '{}', using generic defaults", car);
            }
            inputs.select_car(car);
        }
        if let Some(v) = self.first_gear {
            if v <= 0.0 {
                bail!("first gear must be positive");
            }
            inputs.parameters.first_gear = v;
        }
        if let Some(v) = self.gears {
            if v < 2 {
                bail!("a gear set needs at least two gears");
            }
            inputs.parameters.gear_count = v;
        }
        if let Some(v) = self.spread {
            inputs.parameters.spread_factor = v;
        }
        if let Some(v) = self.final_drive {
            inputs.drivetrain.final_drive = v;
        }
        if let Some(v) = self.rpm {
            inputs.drivetrain.max_rpm = v;
        }
        if let Some(v) = self.tire {
            inputs.drivetrain.tire_diameter_inches = v;
        }
        if let Some(v) = self.weight {
            inputs.vehicle.weight_lb = v;
        }
        if let Some(v) = self.power {
            inputs.vehicle.power_hp = v;
        }
        if let Some(v) = self.torque {
            inputs.vehicle.torque_lb_ft = v;
        }
        Ok(inputs)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings_path = match &cli.settings {
        Some(path) => path.clone(),
        None => AppSettings::settings_path()?,
    };
    let settings = AppSettings::load_or_default(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?;
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => settings.resolved_data_dir()?,
    };
    let mut store = JsonConfigStore::in_dir(&data_dir);

    match cli.command {
        Commands::Gears { calc, export } => {
            cmd_gears(calc.apply(settings.calculator.clone())?, export, cli.json)
        }
        Commands::Save { name, calc } => {
            cmd_save(&mut store, &name, calc.apply(settings.calculator.clone())?)
        }
        Commands::List => cmd_list(&store, cli.json),
        Commands::Show { id, export } => {
            let configs = store.load_all()?;
            let config = configs
                .iter()
                .find(|c| c.id == id)
                .with_context(|| format!("no saved configuration with id {id}"))?;
            let (inputs, derived) = config.restore();
            print_calculation(&inputs, &derived, export, cli.json)
        }
        Commands::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {id}");
            Ok(())
        }
        Commands::Compare { ids } => cmd_compare(&store, &ids, cli.json),
        Commands::Tree { simple, username } => {
            let timing = if simple {
                TreeTiming::Simple
            } else {
                settings.tree_timing
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(tree::run(timing, username, settings.leaderboard_limit))
        }
        Commands::Cars => {
            for car in CAR_MODELS {
                println!("{car}");
            }
            Ok(())
        }
        Commands::Bracket { command } => cmd_bracket(command),
        Commands::Tune { command } => {
            cmd_tune(command, &data_dir.join(TUNES_FILE_NAME), cli.json)
        }
    }
}

fn cmd_gears(inputs: CalculatorInputs, export: Option<PathBuf>, json: bool) -> Result<()> {
    let derived = recompute(&inputs);
    print_calculation(&inputs, &derived, export, json)
}

fn print_calculation(
    inputs: &CalculatorInputs,
    derived: &Derived,
    export: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let data = ExportData::new(inputs, derived);

    if let Some(target) = export {
        let path = if target.is_dir() {
            target.join(data.file_name())
        } else {
            target
        };
        std::fs::write(&path, data.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Exported to {}", path.display());
    }

    if json {
        println!("{}", data.to_json()?);
        return Ok(());
    }

    println!(
        "{} (final drive {:.2}, {} rpm, {:.1}\" tire)",
        inputs.car,
        inputs.drivetrain.final_drive,
        inputs.drivetrain.max_rpm,
        inputs.drivetrain.tire_diameter_inches
    );
    println!();
    println!(
        "{:<6} {:>8} {:>10} {:>10} {:>8}",
        "Gear", "Ratio", "Overall", "Max mph", "Drop"
    );
    for entry in &derived.speed_table {
        let drop = entry
            .rpm_drop_to_next_gear
            .map(|d| format!("{d:.1}%"))
            .unwrap_or_default();
        println!(
            "{:<6} {:>8.3} {:>10.2} {:>10.1} {:>8}",
            entry.gear_index + 1,
            entry.ratio,
            entry.combined_ratio,
            entry.speed_at_max_rpm,
            drop
        );
    }

    println!();
    for shift in shift_points(&derived.gears, &inputs.drivetrain) {
        println!(
            "{}-{} shift at {:.1} mph lands at {:.0} rpm",
            shift.from_gear + 1,
            shift.from_gear + 2,
            shift.speed_mph,
            shift.rpm_after_shift
        );
    }

    println!();
    println!(
        "{:.0} lb, {:.0} hp ({:.4} hp/lb), {:.0} lb-ft ({:.4} lb-ft/lb)",
        inputs.vehicle.weight_lb,
        inputs.vehicle.power_hp,
        inputs.vehicle.power_to_weight(),
        inputs.vehicle.torque_lb_ft,
        inputs.vehicle.torque_to_weight()
    );
    for distance in [RaceDistance::QuarterMile, RaceDistance::HalfMile] {
        let (time, speed) = derived.performance.at(distance);
        println!("{}: {:.2}s @ {:.1} mph", distance.label(), time, speed);
    }
    Ok(())
}

fn cmd_save(store: &mut JsonConfigStore, name: &str, inputs: CalculatorInputs) -> Result<()> {
    let existing = store.load_all()?;
    let derived = recompute(&inputs);
    let config = SavedConfiguration::capture(name, &inputs, &derived, &existing)?;
    let id = store.save(config)?;
    println!("{id}");
    Ok(())
}

fn cmd_list(store: &JsonConfigStore, json: bool) -> Result<()> {
    let configs = store.load_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&configs)?);
        return Ok(());
    }
    if configs.is_empty() {
        println!("No saved configurations in {}", store.path().display());
        return Ok(());
    }
    for config in &configs {
        println!(
            "{}  {:<24} {:<36} {}",
            config.id,
            config.name,
            config.car,
            config.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_compare(store: &JsonConfigStore, ids: &[String], json: bool) -> Result<()> {
    let configs = store.load_all()?;
    let mut selection = ComparisonSelection::new();
    for id in ids {
        if !configs.iter().any(|c| &c.id == id) {
            bail!("no saved configuration with id {id}");
        }
        if !selection.select(id) {
            tracing::warn!("Comparison is full, skipping {}", id);
        }
    }

    let table = compare(&selection.resolve(&configs));
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let width = 22;
    print!("{:<12}", "");
    for column in &table.columns {
        print!("{:>width$}", column.name);
    }
    println!();
    for row in table.rows() {
        print!("{:<12}", row.label);
        for cell in &row.cells {
            print!("{cell:>width$}");
        }
        println!();
    }
    Ok(())
}

fn cmd_tune(command: TuneCommand, library_path: &Path, json: bool) -> Result<()> {
    let mut library = TuneLibrary::load_or_default(library_path)
        .with_context(|| format!("loading {}", library_path.display()))?;

    match command {
        TuneCommand::Community => {
            if json {
                println!("{}", serde_json::to_string_pretty(COMMUNITY_TUNES)?);
                return Ok(());
            }
            for preset in COMMUNITY_TUNES {
                println!(
                    "#{} {:<24} {:<30} by {:<12} {:>4} likes {:>5} downloads",
                    preset.id,
                    preset.title,
                    preset.car,
                    preset.author,
                    preset.likes,
                    preset.downloads
                );
            }
        }
        TuneCommand::Copy { id } => {
            let name = library.copy_community(id)?.name.clone();
            library.write(library_path)?;
            println!("{name}");
        }
        TuneCommand::Save { name, settings } => {
            library.save(settings.to_tune(&name))?;
            library.write(library_path)?;
            println!("{name}");
        }
        TuneCommand::List => {
            if json {
                println!("{}", serde_json::to_string_pretty(library.tunes())?);
                return Ok(());
            }
            for tune in library.tunes() {
                let s = tune.settings;
                println!(
                    "{:<28} {:<30} susp {:.1}/{:.1} camber {:.1}/{:.1}",
                    tune.name,
                    tune.car,
                    s.suspension.front,
                    s.suspension.rear,
                    s.camber.front,
                    s.camber.rear
                );
            }
        }
        TuneCommand::Export { name, out } => {
            let tune = library
                .get(&name)
                .with_context(|| format!("no tune named '{name}'"))?;
            match out {
                Some(dir) => println!("{}", tune.export_to(dir)?.display()),
                None => println!("{}", tune.to_json()?),
            }
        }
    }
    Ok(())
}

fn cmd_bracket(command: BracketCommand) -> Result<()> {
    match command {
        BracketCommand::Judge { dial_in, et } => {
            println!("{}", judge_run(et, dial_in));
        }
        BracketCommand::Draw { racers } => {
            let rounds = single_elimination_rounds(&racers);
            if rounds.is_empty() {
                bail!("a bracket needs at least two racers");
            }
            for (i, round) in rounds.iter().enumerate() {
                println!("Round {}", i + 1);
                for m in round {
                    println!("  {} vs {}", m.left, m.right);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_overrides_then_explicit_values() {
        let cli = Cli::try_parse_from([
            "racetools",
            "gears",
            "--car",
            "2004 Chevrolet Corvette Z06",
            "--power",
            "450",
            "--gears",
            "6",
        ])
        .unwrap();
        let Commands::Gears { calc, .. } = cli.command else {
            panic!("expected gears");
        };
        let inputs = calc.apply(CalculatorInputs::default()).unwrap();

        assert_eq!(inputs.car, "2004 Chevrolet Corvette Z06");
        assert_eq!(inputs.vehicle.weight_lb, 3200.0);
        assert_eq!(inputs.vehicle.power_hp, 450.0);
        assert_eq!(inputs.parameters.gear_count, 6);
    }

    #[test]
    fn test_rejects_single_gear() {
        let cli = Cli::try_parse_from(["racetools", "gears", "--gears", "1"]).unwrap();
        let Commands::Gears { calc, .. } = cli.command else {
            panic!("expected gears");
        };
        assert!(calc.apply(CalculatorInputs::default()).is_err());
    }

    #[test]
    fn test_save_and_compare_against_temp_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonConfigStore::in_dir(dir.path());
        let mut six = CalculatorInputs::default();
        six.parameters.gear_count = 6;

        cmd_save(&mut store, "Five", CalculatorInputs::default()).unwrap();
        cmd_save(&mut store, "Six", six).unwrap();

        let ids: Vec<String> = store.load_all().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 2);
        cmd_compare(&store, &ids, true).unwrap();
        assert!(cmd_compare(&store, &["nope".to_string()], false).is_err());
    }

    #[test]
    fn test_tune_copy_save_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TUNES_FILE_NAME);

        cmd_tune(TuneCommand::Copy { id: 1 }, &path, false).unwrap();
        let cli = Cli::try_parse_from([
            "racetools",
            "tune",
            "save",
            "Soft",
            "--front-suspension",
            "12",
            "--rear-camber",
            "-1.0",
        ])
        .unwrap();
        let Commands::Tune { command } = cli.command else {
            panic!("expected tune");
        };
        cmd_tune(command, &path, false).unwrap();

        let library = TuneLibrary::load_or_default(&path).unwrap();
        assert_eq!(library.tunes().len(), 2);
        assert_eq!(library.tunes()[0].name, "Track Day Special (Copy)");
        let soft = library.get("Soft").unwrap();
        assert_eq!(soft.settings.suspension.front, 10.0);
        assert_eq!(soft.settings.camber.rear, -1.0);

        let export = TuneCommand::Export {
            name: "Track Day Special (Copy)".into(),
            out: Some(dir.path().to_path_buf()),
        };
        cmd_tune(export, &path, false).unwrap();
        assert!(dir.path().join("1999-mitsubishi-eclipse-gsx-tune.json").exists());
        assert!(cmd_tune(TuneCommand::Copy { id: 9 }, &path, false).is_err());
    }
}
