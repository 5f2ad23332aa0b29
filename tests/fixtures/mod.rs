//! Test fixtures for resource-router.
//!
//! Provides:
//! - A Las Vegas hospital network with known shortages and surpluses
//! - Mock routing services (instant, failing, panicking, delayed)
//! - A map surface that records every request

pub mod las_vegas_hospitals;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use resource_router::error::RoutingError;
use resource_router::haversine::{Coordinate, distance_km};
use resource_router::polyline::Polyline;
use resource_router::traits::{Bounds, MapSurface, RouteStyle, RoutingService, ServiceRoute};

pub use las_vegas_hospitals::*;

// ============================================================================
// Map surface
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingMap {
    pub overlays: BTreeMap<String, (Vec<Coordinate>, RouteStyle)>,
    pub draws: Vec<String>,
    pub removed: Vec<String>,
    pub fits: Vec<(Bounds, u8)>,
}

impl MapSurface for RecordingMap {
    fn draw_route(&mut self, overlay_id: &str, geometry: &[Coordinate], style: RouteStyle) {
        self.draws.push(overlay_id.to_string());
        self.overlays
            .insert(overlay_id.to_string(), (geometry.to_vec(), style));
    }

    fn remove_route(&mut self, overlay_id: &str) {
        self.removed.push(overlay_id.to_string());
        self.overlays.remove(overlay_id);
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8) {
        self.fits.push((bounds, max_zoom));
    }
}

// ============================================================================
// Routing services
// ============================================================================

/// Answers immediately with a three-point route through the midpoint.
#[derive(Debug, Default, Clone)]
pub struct InstantService {
    pub calls: Arc<AtomicUsize>,
}

impl InstantService {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn road_route(from: Coordinate, to: Coordinate) -> ServiceRoute {
    let mid = Coordinate::new((from.lat + to.lat) / 2.0, (from.lng + to.lng) / 2.0);
    let km = distance_km(from, to) * 1.3;
    ServiceRoute {
        geometry: Polyline::new(vec![from, mid, to]),
        distance_m: km * 1000.0,
        duration_s: km / 40.0 * 3600.0,
    }
}

#[async_trait]
impl RoutingService for InstantService {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<ServiceRoute, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(road_route(from, to))
    }
}

/// Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingService;

#[async_trait]
impl RoutingService for FailingService {
    async fn route(&self, _: Coordinate, _: Coordinate) -> Result<ServiceRoute, RoutingError> {
        Err(RoutingError::Service {
            code: "InvalidQuery".to_string(),
            message: "unreachable".to_string(),
        })
    }
}

/// Panics on every call, like a service tripping over a broken response.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanickingService;

#[async_trait]
impl RoutingService for PanickingService {
    async fn route(&self, _: Coordinate, _: Coordinate) -> Result<ServiceRoute, RoutingError> {
        panic!("route shape could not be handled")
    }
}

/// Delays routes that end at `slow_target`; everything else is instant.
#[derive(Debug, Clone, Copy)]
pub struct DelayedService {
    pub slow_target: Coordinate,
    pub delay: Duration,
}

#[async_trait]
impl RoutingService for DelayedService {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<ServiceRoute, RoutingError> {
        if to == self.slow_target {
            tokio::time::sleep(self.delay).await;
        }
        Ok(road_route(from, to))
    }
}
