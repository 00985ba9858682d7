//! Cosmic Stride - Rust Implementation
//!
//! CLI commands:
//! - gui: Launch native journey viewer
//! - serve: Start HTTP server
//! - stats: Print distance and milestone progress for a route or distance
//! - list: List the milestone ladder and configured routes
//! - snapshot: Render PNG previews of each route

mod config;
mod geo;
mod gui;
mod journey;
mod logging;
mod milestone;
mod projection;
mod server;
mod snapshot;
mod state;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::geo::RoutePoint;
use crate::milestone::{Milestone, RewardKind};

#[derive(Parser)]
#[command(name = "cosmic_stride")]
#[command(about = "Gamified journey-to-space visualization of GPS runs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to journey.yaml config
    #[arg(short, long, default_value = "journey.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch native GUI viewer
    Gui,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Print distance and milestone progress
    Stats {
        /// Route to summarize (defaults to the first configured route)
        #[arg(long)]
        route: Option<String>,

        /// Use an explicit run distance in km instead of a route
        #[arg(long)]
        distance: Option<f64>,

        /// Lifetime mileage in km, selects the space-distance multiplier
        #[arg(long, default_value = "0")]
        lifetime: f64,
    },

    /// List the milestone ladder and configured routes
    List,

    /// Render PNG snapshots of each route
    Snapshot {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image size in pixels (square)
        #[arg(short, long, default_value = "512")]
        size: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging first
    logging::init_logging("logs");
    tracing::info!("Cosmic Stride starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    // Load config
    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        default_config()
    };
    tracing::info!(
        "Config loaded: {} routes, {} milestones",
        config.routes.len(),
        config.milestones.len()
    );

    // Load secrets
    let secrets = config::Secrets::load();

    match cli.command {
        Commands::Gui => {
            tracing::info!("Launching native GUI viewer");
            gui::run_viewer(config)?;
        }

        Commands::Serve { port } => {
            let state = state::AppState::new(config)?;
            server::serve(state, port).await?;
        }

        Commands::Stats {
            route,
            distance,
            lifetime,
        } => {
            print_stats(&config, route.as_deref(), distance, lifetime)?;
        }

        Commands::List => {
            list_config(&config);
        }

        Commands::Snapshot { output, size } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&secrets.snapshot_dir));
            snapshot::generate(&config, &output, size)?;
        }
    }

    Ok(())
}

/// Print the milestone state for a route or an explicit distance
fn print_stats(
    config: &config::Config,
    route: Option<&str>,
    distance: Option<f64>,
    lifetime: f64,
) -> anyhow::Result<()> {
    let track = config.milestone_track()?;

    let (label, run_km) = match distance {
        Some(d) => {
            anyhow::ensure!(d.is_finite() && d >= 0.0, "distance must be non-negative");
            ("explicit distance".to_string(), d)
        }
        None => {
            let route = match route {
                Some(id) => config
                    .get_route(id)
                    .ok_or_else(|| anyhow::anyhow!("Route not found: {}", id))?,
                None => config
                    .routes
                    .first()
                    .ok_or_else(|| anyhow::anyhow!("No routes configured"))?,
            };
            (route.name.clone(), geo::route_distance_km(&route.points))
        }
    };

    println!("Run: {} ({:.2} km)", label, run_km);
    println!(
        "Space distance: {:.1} km (lifetime {:.0} km)",
        milestone::space_distance_km(run_km, lifetime),
        lifetime
    );

    match track.current(run_km) {
        Some(m) => println!("Reached: {} {} ({})", m.icon, m.name, m.altitude),
        None => println!("Reached: (still on the launchpad)"),
    }
    match track.next(run_km) {
        Some(m) => println!(
            "Next: {} {} ({}) - {:.1} km to go, {:.1}%",
            m.icon,
            m.name,
            m.altitude,
            m.distance_km - run_km,
            track.progress_percent(run_km)
        ),
        None => println!("Next: journey complete!"),
    }

    Ok(())
}

/// List milestones and routes
fn list_config(config: &config::Config) {
    println!("Milestones ({}):", config.milestones.len());
    for m in &config.milestones {
        let reward = m
            .reward
            .map(|r| format!(" [reward: {:?}]", r))
            .unwrap_or_default();
        println!(
            "  {:>7.2} km  {} {} ({}){}",
            m.distance_km, m.icon, m.name, m.altitude, reward
        );
    }

    println!();
    println!("Routes ({}):", config.routes.len());
    for r in &config.routes {
        println!(
            "  - {} [{}] ({} points, {:.2} km)",
            r.name,
            r.id,
            r.points.len(),
            geo::route_distance_km(&r.points)
        );
    }
}

/// Default config when no file exists: the Sofia demo route and the
/// balanced milestone ladder
fn default_config() -> config::Config {
    let points = vec![
        RoutePoint::new(42.6977, 23.3219, 550.0), // Start - Sofia center
        RoutePoint::new(42.7000, 23.3400, 555.0),
        RoutePoint::new(42.7100, 23.3600, 560.0),
        RoutePoint::new(42.7200, 23.3800, 565.0),
        RoutePoint::new(42.7300, 23.4000, 570.0),
        RoutePoint::new(42.7400, 23.4200, 575.0),
        RoutePoint::new(42.7500, 23.4400, 580.0),
        RoutePoint::new(42.7600, 23.4600, 585.0),
        RoutePoint::new(42.7700, 23.4800, 590.0),
        RoutePoint::new(42.7800, 23.5000, 595.0),
        RoutePoint::new(42.7900, 23.5200, 600.0),
        RoutePoint::new(42.8000, 23.5400, 605.0), // End
    ];

    let milestones = vec![
        Milestone {
            distance_km: 0.05,
            name: "Stratosphere".to_string(),
            altitude: "50 km".to_string(),
            icon: "\u{1F321}".to_string(),
            description: Some("Where weather balloons fly".to_string()),
            reward: None,
        },
        Milestone {
            distance_km: 0.1,
            name: "Commercial Flight Zone".to_string(),
            altitude: "10 km".to_string(),
            icon: "\u{2708}".to_string(),
            description: Some("Cruising altitude".to_string()),
            reward: None,
        },
        Milestone {
            distance_km: 1.0,
            name: "Karman Line".to_string(),
            altitude: "100 km".to_string(),
            icon: "\u{1F680}".to_string(),
            description: Some("The edge of space!".to_string()),
            reward: None,
        },
        Milestone {
            distance_km: 4.0,
            name: "ISS Orbit".to_string(),
            altitude: "408 km".to_string(),
            icon: "\u{1F6F0}".to_string(),
            description: Some("Home of astronauts".to_string()),
            reward: Some(RewardKind::Iss),
        },
        Milestone {
            distance_km: 10.0,
            name: "GPS Satellites".to_string(),
            altitude: "20,000 km".to_string(),
            icon: "\u{1F4E1}".to_string(),
            description: Some("Navigation constellation".to_string()),
            reward: Some(RewardKind::Satellite),
        },
        Milestone {
            distance_km: 38.0,
            name: "The Moon".to_string(),
            altitude: "384,400 km".to_string(),
            icon: "\u{1F315}".to_string(),
            description: Some("Earth's natural satellite".to_string()),
            reward: Some(RewardKind::Moon),
        },
        Milestone {
            distance_km: 100.0,
            name: "Mars (closest)".to_string(),
            altitude: "54.6M km".to_string(),
            icon: "\u{1F534}".to_string(),
            description: Some("The Red Planet".to_string()),
            reward: Some(RewardKind::Mars),
        },
        Milestone {
            distance_km: 500.0,
            name: "Jupiter".to_string(),
            altitude: "628M km".to_string(),
            icon: "\u{1FA90}".to_string(),
            description: Some("The giant planet".to_string()),
            reward: None,
        },
    ];

    config::Config {
        routes: vec![config::Route {
            id: "sofia_morning".to_string(),
            name: "Sofia Morning Run".to_string(),
            points,
        }],
        milestones,
        conditions: config::CosmicConditions {
            uv_index: 6,
            solar_wind_kms: 450.0,
            kp_index: 3,
            temperature_c: 18.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        default_config().validate().unwrap();
    }

    #[test]
    fn default_route_is_about_21_km() {
        let config = default_config();
        let d = geo::route_distance_km(&config.routes[0].points);
        // Ten ~2 km segments plus the short opening leg across Sofia
        assert!(d > 19.0 && d < 23.0, "got {d}");
    }
}
