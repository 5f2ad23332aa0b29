//! Route resolution with a straight-line fallback.
//!
//! The resolver never fails: service errors, malformed routes and timeouts
//! all degrade to an `Estimated` result.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RoutingOptions;
use crate::haversine::{Coordinate, distance_km, estimate_minutes};
use crate::polyline::Polyline;
use crate::route::{Provenance, RouteRequest, RouteResult};
use crate::traits::{RoutingService, ServiceRoute};

/// Turns route requests into displayable results, using `S` when it answers
/// in time and a straight-line estimate otherwise.
pub struct RouteResolver<S> {
    service: S,
    timeout: Duration,
    speed_kmh: f64,
}

impl<S: RoutingService> RouteResolver<S> {
    /// Creates a resolver with the timeout and fallback speed from `options`.
    pub fn new(service: S, options: &RoutingOptions) -> Self {
        Self {
            service,
            timeout: options.timeout(),
            speed_kmh: options.assumed_speed_kmh,
        }
    }

    /// Resolves one request.
    ///
    /// Waits at most the configured timeout for the service. Errors, timeouts
    /// and routes that fail validation all yield [`RouteResolver::estimate`].
    pub async fn resolve(&self, request: RouteRequest) -> RouteResult {
        let attempt = tokio::time::timeout(
            self.timeout,
            self.service.route(request.source, request.target),
        )
        .await;

        let failure = match attempt {
            Ok(Ok(route)) => match validate(&route) {
                Ok(()) => {
                    debug!(key = ?request.key, points = route.geometry.len(), "route resolved");
                    return RouteResult {
                        key: request.key,
                        source: request.source,
                        target: request.target,
                        distance_km: route.distance_m / 1000.0,
                        duration_min: route.duration_s / 60.0,
                        geometry: route.geometry,
                        provenance: Provenance::Resolved,
                    };
                }
                Err(reason) => reason.to_string(),
            },
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("timed out after {:?}", self.timeout),
        };

        warn!(key = ?request.key, reason = %failure, "routing service unavailable, estimating route");
        self.estimate(request)
    }

    /// Straight-line result for a request.
    pub fn estimate(&self, request: RouteRequest) -> RouteResult {
        let km = distance_km(request.source, request.target);
        RouteResult {
            geometry: Polyline::straight(request.source, request.target),
            distance_km: km,
            duration_min: estimate_minutes(km, self.speed_kmh),
            provenance: Provenance::Estimated,
            key: request.key,
            source: request.source,
            target: request.target,
        }
    }
}

fn validate(route: &ServiceRoute) -> Result<(), &'static str> {
    if route.geometry.len() < 2 {
        return Err("route geometry has fewer than two points");
    }
    let valid = |value: f64| value.is_finite() && value >= 0.0;
    if !valid(route.distance_m) || !valid(route.duration_s) {
        return Err("route distance or duration is invalid");
    }
    if !route.geometry.points().iter().all(Coordinate::is_valid) {
        return Err("route geometry has out-of-range coordinates");
    }
    Ok(())
}
