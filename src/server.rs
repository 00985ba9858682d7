//! HTTP Server - Serves route and milestone data via REST API
//!
//! Endpoints:
//! - GET /api/config            → Full config as JSON
//! - GET /api/routes            → List all routes with metadata
//! - GET /api/routes/:id        → Route points + computed distances
//! - GET /api/routes/:id/points → Projected globe coordinates
//! - GET /api/milestones        → The milestone ladder
//! - GET /api/progress          → Milestone state for a given distance
//! - GET /api/conditions        → Cosmic conditions card data

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::milestone::{self, Milestone};
use crate::projection;
use crate::state::{AppState, RouteMeta};

/// Start the HTTP server
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    tracing::info!("Initializing HTTP server on port {}", port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api = Router::new()
        .route("/config", get(get_config))
        .route("/routes", get(list_routes))
        .route("/routes/:id", get(get_route))
        .route("/routes/:id/points", get(get_route_points))
        .route("/milestones", get(get_milestones))
        .route("/progress", get(get_progress))
        .route("/conditions", get(get_conditions))
        .with_state(state.clone());
    tracing::debug!("API routes registered");

    // Static file serving from ./web directory
    let static_files = ServeDir::new("web");

    let app = Router::new()
        .nest("/api", api)
        .fallback_service(static_files)
        .layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting server on http://localhost:{}", port);
    tracing::info!("  API: http://localhost:{}/api/routes", port);
    tracing::info!("  Available routes: {}", state.config.routes.len());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server bound to {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/config - Full config as JSON
async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("GET /api/config");
    Json((*state.config).clone())
}

/// GET /api/routes - List all routes
async fn list_routes(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("GET /api/routes - listing {} routes", state.config.routes.len());
    let routes: Vec<RouteMeta> = state.config.routes.iter().map(RouteMeta::from).collect();
    Json(routes)
}

/// GET /api/routes/:id - Route points and computed distances
async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    tracing::info!("GET /api/routes/{}", id);
    match state.load_route(&id).await {
        Some(route) => Ok(Json(RouteResponse {
            id: route.id,
            name: route.name,
            num_points: route.points.len(),
            distance_km: route.distance_km,
            space_distance_km: route.space_distance_km,
            points: route.points,
        })),
        None => {
            tracing::warn!("Route '{}' not found", id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

#[derive(Serialize)]
struct RouteResponse {
    id: String,
    name: String,
    num_points: usize,
    distance_km: f64,
    space_distance_km: f64,
    points: Vec<crate::geo::RoutePoint>,
}

/// Query params for the points endpoint
#[derive(Deserialize)]
struct PointsQuery {
    /// Animation progress 0-100; sets the runner position and trail length
    progress: Option<f64>,
}

/// GET /api/routes/:id/points - Projected globe coordinates
async fn get_route_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PointsQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    tracing::info!("GET /api/routes/{}/points progress={:?}", id, params.progress);

    let route = match state.load_route(&id).await {
        Some(r) => r,
        None => {
            tracing::warn!("Route '{}' not found - returning 404", id);
            return Err(StatusCode::NOT_FOUND);
        }
    };

    let points = projection::project_route(&route.points);
    let progress = params.progress.unwrap_or(100.0).clamp(0.0, 100.0);
    let runner = projection::runner_position(&points, progress);
    let trail_len = projection::trail(&points, progress).len();
    tracing::debug!("Route '{}' projected: {} points", id, points.len());

    Ok(Json(PointsResponse {
        id: route.id,
        name: route.name,
        num_points: points.len(),
        runner,
        trail_len,
        points,
    }))
}

#[derive(Serialize)]
struct PointsResponse {
    id: String,
    name: String,
    num_points: usize,
    runner: Option<[f32; 3]>,
    trail_len: usize,
    points: Vec<[f32; 3]>,
}

/// GET /api/milestones - The milestone ladder
async fn get_milestones(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("GET /api/milestones");
    Json(state.track.milestones().to_vec())
}

/// Query params for the progress endpoint
#[derive(Deserialize)]
struct ProgressQuery {
    /// Run distance on the ground in km
    distance: f64,
    /// Lifetime mileage, selects the space-distance multiplier
    lifetime: Option<f64>,
}

/// GET /api/progress - Milestone state for a given run distance
async fn get_progress(
    State(state): State<AppState>,
    Query(params): Query<ProgressQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    tracing::info!(
        "GET /api/progress distance={} lifetime={:?}",
        params.distance,
        params.lifetime
    );
    if !params.distance.is_finite() || params.distance < 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let space_km = match params.lifetime {
        Some(lifetime) => milestone::space_distance_km(params.distance, lifetime),
        None => milestone::space_distance_simple_km(params.distance),
    };

    // Milestone thresholds are run distances; space distance is display-only
    let current = state.track.current(params.distance).cloned();
    let next = state.track.next(params.distance).cloned();
    let percent = state.track.progress_percent(params.distance);
    let remaining_km = next.as_ref().map(|m| m.distance_km - params.distance);

    Ok(Json(ProgressResponse {
        distance_km: params.distance,
        space_distance_km: space_km,
        current,
        next,
        percent,
        remaining_km,
    }))
}

#[derive(Serialize)]
struct ProgressResponse {
    distance_km: f64,
    space_distance_km: f64,
    current: Option<Milestone>,
    next: Option<Milestone>,
    /// Progress toward the next milestone, 0-100
    percent: f64,
    remaining_km: Option<f64>,
}

/// GET /api/conditions - Cosmic conditions card data
async fn get_conditions(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("GET /api/conditions");
    Json(state.config.conditions.clone())
}
