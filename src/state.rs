//! Application State - Single Source of Truth (SSOT)
//!
//! Holds the loaded config, the validated milestone track, and a cache of
//! computed route summaries shared across all requests.

use crate::config::{Config, Route};
use crate::geo;
use crate::milestone::{self, MilestoneTrack};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Computed summary for one route
#[derive(Debug, Clone)]
pub struct RouteData {
    pub id: String,
    pub name: String,
    pub points: Vec<crate::geo::RoutePoint>,
    /// Total traversed distance on the ground
    pub distance_km: f64,
    /// Equivalent journey-to-space distance (demo scaling)
    pub space_distance_km: f64,
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub track: Arc<MilestoneTrack>,
    pub routes: Arc<RwLock<HashMap<String, RouteData>>>,
}

impl AppState {
    /// Create new app state from a validated config
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let track = config.milestone_track()?;
        Ok(Self {
            config: Arc::new(config),
            track: Arc::new(track),
            routes: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Load a route's computed summary, from cache if available
    pub async fn load_route(&self, id: &str) -> Option<RouteData> {
        tracing::debug!("load_route called for id='{}'", id);

        {
            let routes = self.routes.read().await;
            if let Some(route) = routes.get(id) {
                tracing::debug!("Route '{}' found in cache", id);
                return Some(route.clone());
            }
        }

        let route = match self.config.get_route(id) {
            Some(r) => r,
            None => {
                tracing::warn!("Route '{}' NOT found in config", id);
                return None;
            }
        };

        let data = summarize(route);
        tracing::info!(
            "Route '{}' computed: {} points, {:.3} km ground, {:.1} km space",
            id,
            data.points.len(),
            data.distance_km,
            data.space_distance_km
        );

        {
            let mut routes = self.routes.write().await;
            routes.insert(id.to_string(), data.clone());
            tracing::debug!("Route '{}' cached", id);
        }

        Some(data)
    }

    /// Get all available route IDs
    pub fn route_ids(&self) -> Vec<String> {
        self.config.routes.iter().map(|r| r.id.clone()).collect()
    }
}

fn summarize(route: &Route) -> RouteData {
    let distance_km = geo::route_distance_km(&route.points);
    RouteData {
        id: route.id.clone(),
        name: route.name.clone(),
        points: route.points.clone(),
        distance_km,
        space_distance_km: milestone::space_distance_simple_km(distance_km),
    }
}

/// Route metadata for listing (without point data)
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteMeta {
    pub id: String,
    pub name: String,
    pub num_points: usize,
}

impl From<&Route> for RouteMeta {
    fn from(r: &Route) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            num_points: r.points.len(),
        }
    }
}
