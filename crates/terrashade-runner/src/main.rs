//! `terrashade`: render shaded relief images of terrain around a point.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use terrashade_dem::DownloadCallback;
use terrashade_runner::{
    describe_record, parse_latitude, parse_longitude, parse_radius, run_interactive, ConfigError,
    RunnerConfig, DEFAULT_RADIUS_MILES,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "terrashade")]
#[command(about = "Fetch terrain elevation around a point and render it as shaded relief")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print download progress and info-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a single image and exit
    Render {
        /// Center latitude in decimal degrees
        #[arg(long, value_parser = parse_latitude, allow_hyphen_values = true)]
        lat: f64,

        /// Center longitude in decimal degrees
        #[arg(long, value_parser = parse_longitude, allow_hyphen_values = true)]
        lon: f64,

        /// Radius in miles (clamped to 0.1..10)
        #[arg(long, value_parser = parse_radius, default_value_t = DEFAULT_RADIUS_MILES)]
        radius: f64,

        /// Output image path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Shading texture (overrides config)
        #[arg(long)]
        texture: Option<String>,

        /// Sun azimuth in degrees clockwise from north (overrides config)
        #[arg(long, allow_hyphen_values = true)]
        sun_angle: Option<f64>,
    },

    /// Read `lat lon radius` lines from stdin, rendering each one
    Interactive,
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<RunnerConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    config.verbose |= args.verbose;
    Ok(config)
}

fn progress_callback() -> DownloadCallback {
    Box::new(|msg: &str| eprintln!("  {}", msg))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    match args.command {
        Commands::Render {
            lat,
            lon,
            radius,
            output,
            texture,
            sun_angle,
        } => {
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(texture) = texture {
                config.texture = texture;
            }
            if let Some(sun_angle) = sun_angle {
                config.sun_angle = sun_angle;
            }

            let mut session = match config.build_session(Some(progress_callback())) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::from(2);
                }
            };

            info!("Rendering ({}, {}) radius {} mi", lat, lon, radius);
            match session.run(lat, lon, radius) {
                Ok(record) => {
                    println!("{}", describe_record(record));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(1)
                }
            }
        }

        Commands::Interactive => {
            let mut session = match config.build_session(Some(progress_callback())) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::from(2);
                }
            };

            let stdin = io::stdin();
            match run_interactive(&mut session, stdin.lock(), io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("I/O error: {}", e);
                    ExitCode::from(1)
                }
            }
        }
    }
}
