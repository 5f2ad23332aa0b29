//! Interfaces to the engine's external collaborators.
//!
//! Concrete apps implement these for their routing backend and map widget.

use async_trait::async_trait;

use crate::error::RoutingError;
use crate::haversine::Coordinate;
use crate::polyline::Polyline;

/// A route as reported by the routing service, in service units.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRoute {
    pub geometry: Polyline,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// External point-to-point routing.
///
/// Shared across concurrently running resolutions.
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<ServiceRoute, RoutingError>;
}

/// Style applied to a route overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStyle {
    Transfer,
    Supplier,
}

/// Geographic bounding region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// The map widget. The engine only issues requests; rendering is not its concern.
pub trait MapSurface {
    /// Draws the named overlay, replacing any overlay with the same name.
    fn draw_route(&mut self, overlay_id: &str, geometry: &[Coordinate], style: RouteStyle);

    fn remove_route(&mut self, overlay_id: &str);

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: u8);
}
