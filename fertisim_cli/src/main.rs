//! Fertilizer industry scenario simulation CLI.

use std::{
    path::{Path, PathBuf},
    process::Command as ProcessCommand,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fertisim_analysis::{analyze, save_analysis};
use fertisim_report::{ChartStyle, ReportGenerator};
use fertisim_simulation::{list_scenarios, load_scenario, Settings, SimulationRunner};
use fertisim_telemetry::Telemetry;

#[derive(Parser, Debug)]
#[command(name = "fertisim", version, about = "Fertilizer industry simulation framework")]
struct Cli {
    /// Optional TOML settings overlay.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a simulation with the specified scenario.
    RunSimulation(RunArgs),
    /// Lists all available simulation scenarios.
    ListScenarios,
    /// Shows the effective configuration.
    ShowConfig,
    /// Runs a demo simulation with example data.
    Demo,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Name of the scenario to run.
    #[arg(default_value = "baseline")]
    scenario: String,
    /// Directory to save results into; defaults to the configured results dir.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Skip report generation.
    #[arg(long)]
    no_visualize: bool,
    /// Skip saving the results JSON and analysis CSVs.
    #[arg(long)]
    no_save: bool,
    /// Open the generated report in the default browser.
    #[arg(long)]
    open: bool,
    /// Overrides the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    match &cli.command {
        Commands::RunSimulation(args) => run_simulation(&settings, args),
        Commands::ListScenarios => {
            let scenarios = list_scenarios(&settings);
            if scenarios.is_empty() {
                println!("No scenarios found.");
            } else {
                println!("Available scenarios:");
                for scenario in scenarios {
                    println!("- {scenario}");
                }
            }
            Ok(())
        }
        Commands::ShowConfig => {
            let rendered =
                serde_json::to_string_pretty(&settings).context("rendering settings")?;
            println!("{rendered}");
            Ok(())
        }
        Commands::Demo => {
            println!("Running demo simulation...");
            run_simulation(
                &settings,
                &RunArgs {
                    scenario: "demo".into(),
                    output_dir: None,
                    no_visualize: false,
                    no_save: false,
                    open: false,
                    seed: None,
                },
            )
        }
    }
}

fn run_simulation(settings: &Settings, args: &RunArgs) -> Result<()> {
    settings.ensure_directories()?;
    let telemetry = Telemetry::builder("fertisim")
        .log_path(&settings.log_path)
        .build()
        .ok();

    println!("Starting simulation for scenario: {}", args.scenario);
    let config = load_scenario(&args.scenario, settings)?;

    let mut builder = SimulationRunner::builder(config)
        .seed(args.seed.unwrap_or(settings.default_seed))
        .fallback_period(settings.default_period()?);
    if let Some(telemetry) = telemetry {
        builder = builder.telemetry(telemetry);
    }
    let results = builder.build()?.run()?;
    println!("Simulation completed successfully.");

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.results_dir.clone());
    if !args.no_save {
        let path = results.save(&output_dir, &args.scenario)?;
        println!("Results saved to {}", path.display());
        let report = analyze(&results);
        let analysis_dir = output_dir.join("analysis");
        save_analysis(&report, &analysis_dir)?;
        println!("Analysis exported to {}", analysis_dir.display());
    }

    if !args.no_visualize {
        // Report generation failures must not undo a successful run.
        let generator = ReportGenerator::new(&results, &settings.html_report_dir)
            .with_style(ChartStyle::from_settings(settings));
        match generator.generate() {
            Ok(path) => {
                println!("Report generated at {}", path.display());
                if args.open {
                    if let Err(err) = open_in_browser(&path) {
                        eprintln!("Warning: could not open report in browser: {err}");
                        eprintln!("You can open it manually at {}", path.display());
                    }
                }
            }
            Err(err) => eprintln!("Warning: failed to generate report: {err:#}"),
        }
    }
    Ok(())
}

fn open_in_browser(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(not(target_os = "macos"))]
    const OPENER: &str = "xdg-open";
    let status = ProcessCommand::new(OPENER)
        .arg(path)
        .status()
        .with_context(|| format!("launching {OPENER}"))?;
    if !status.success() {
        bail!("{OPENER} exited with {status}");
    }
    Ok(())
}
