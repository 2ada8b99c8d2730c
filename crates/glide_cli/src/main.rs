use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glide_cli::inspect::{momentum_profile, EngineReport};
use glide_cli::{run_scenario, GlideConfig, ReplaySettings, Scenario};
use glide_scroll::engine;

#[derive(Parser)]
#[command(name = "glide")]
#[command(author, version, about = "Replay and inspect Glide inertial scrolling")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario against a simulated element
    Replay {
        /// Scenario JSON file
        scenario: PathBuf,
        /// glide.toml (or a directory containing one)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the JSON report here instead of stdout (relative path)
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Show the detected engine and wheel multiplier for a user agent
    Engine {
        user_agent: String,
    },
    /// Print the momentum decay for a release velocity
    Momentum {
        /// Release velocity in px/ms
        #[arg(long, allow_hyphen_values = true)]
        velocity: f64,
        /// Distance to the container edge in px
        #[arg(long)]
        max: Option<f64>,
        /// glide.toml with physics overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Replay {
            scenario,
            config,
            report,
        } => replay(&scenario, config.as_deref(), report.as_deref()),
        Commands::Engine { user_agent } => {
            let report = EngineReport::for_user_agent(Some(&user_agent));
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Momentum {
            velocity,
            max,
            config,
        } => {
            let config = GlideConfig::load_or_default(config.as_deref())?;
            let physics = config.scroll_options().physics;
            let profile = momentum_profile(velocity, max, &physics);

            println!("{:>5}  {:>10}  {:>10}", "frame", "velocity", "travelled");
            for frame in &profile.frames {
                println!(
                    "{:>5}  {:>10.4}  {:>10.2}",
                    frame.frame, frame.velocity, frame.travelled
                );
            }
            println!(
                "{} frames, travelled {:.2}px (closed form {:.2}px){}",
                profile.frames.len(),
                profile.travelled,
                profile.closed_form,
                if profile.pinned { ", stopped at edge" } else { "" }
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn replay(
    scenario_path: &std::path::Path,
    config_path: Option<&std::path::Path>,
    report_path: Option<&std::path::Path>,
) -> Result<ExitCode> {
    let config = GlideConfig::load_or_default(config_path)?;
    if let Some(user_agent) = &config.environment.user_agent {
        engine::set_user_agent(user_agent.clone());
    }
    let settings = ReplaySettings::from_config(&config, engine::current().engine);

    let scenario = Scenario::from_path(scenario_path)?;
    let report = run_scenario(&scenario, settings)?;

    match report_path {
        Some(path) => {
            report.write_to_path(path)?;
            tracing::info!("report written to {}", path.display());
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    if report.is_failed() {
        tracing::error!(
            "step {}: {}",
            report.failed_step_index.unwrap_or_default(),
            report.message.as_deref().unwrap_or("failed")
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
