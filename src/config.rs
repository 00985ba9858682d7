//! Configuration loader - YAML manifest + .env secrets

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::geo::{self, GeoError, RoutePoint};
use crate::milestone::{Milestone, MilestoneError, MilestoneTrack};

/// Main configuration loaded from journey.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub routes: Vec<Route>,
    pub milestones: Vec<Milestone>,
    pub conditions: CosmicConditions,
}

/// A named GPS route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub points: Vec<RoutePoint>,
}

/// Static display record for the conditions card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmicConditions {
    /// UV index, 0-11 scale
    pub uv_index: u8,
    /// Solar wind speed in km/s
    pub solar_wind_kms: f64,
    /// Geomagnetic activity, 0-9 scale
    pub kp_index: u8,
    /// Surface temperature in Celsius
    pub temperature_c: f64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("route '{id}': {source}")]
    InvalidRoute {
        id: String,
        #[source]
        source: GeoError,
    },
    #[error("milestones: {0}")]
    InvalidMilestones(#[from] MilestoneError),
}

/// Secrets loaded from .env
#[derive(Debug, Clone)]
pub struct Secrets {
    pub port: u16,
    pub snapshot_dir: String,
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every route's coordinates and the milestone ladder.
    /// Bad data is rejected here, at ingestion, never projected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for route in &self.routes {
            geo::validate_route(&route.points).map_err(|source| ConfigError::InvalidRoute {
                id: route.id.clone(),
                source,
            })?;
        }
        MilestoneTrack::new(self.milestones.clone())?;
        Ok(())
    }

    /// Build the validated milestone track
    pub fn milestone_track(&self) -> Result<MilestoneTrack, MilestoneError> {
        MilestoneTrack::new(self.milestones.clone())
    }

    /// Get route by ID
    pub fn get_route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }
}

impl Secrets {
    /// Load secrets from .env file
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Secrets {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            snapshot_dir: std::env::var("SNAPSHOT_DIR")
                .unwrap_or_else(|_| "./snapshots".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions() -> CosmicConditions {
        CosmicConditions {
            uv_index: 6,
            solar_wind_kms: 450.0,
            kp_index: 3,
            temperature_c: 18.0,
        }
    }

    #[test]
    fn rejects_route_with_bad_latitude() {
        let config = Config {
            routes: vec![Route {
                id: "bad".to_string(),
                name: "Bad".to_string(),
                points: vec![RoutePoint::new(95.0, 0.0, 0.0)],
            }],
            milestones: vec![],
            conditions: conditions(),
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoute { ref id, .. } if id == "bad"));
    }

    #[test]
    fn parses_yaml_manifest() {
        let yaml = r#"
routes:
  - id: test
    name: Test Route
    points:
      - { lat: 42.6977, lon: 23.3219, alt_m: 550.0 }
      - { lat: 42.7000, lon: 23.3400, alt_m: 555.0 }
milestones:
  - { distance_km: 1.0, name: "Karman Line", altitude: "100 km", icon: "rocket" }
  - distance_km: 4.0
    name: "ISS Orbit"
    altitude: "408 km"
    icon: "station"
    reward: iss
conditions:
  uv_index: 6
  solar_wind_kms: 450.0
  kp_index: 3
  temperature_c: 18.0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.routes[0].points.len(), 2);
        assert_eq!(
            config.milestones[1].reward,
            Some(crate::milestone::RewardKind::Iss)
        );
    }
}
