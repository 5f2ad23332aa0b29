//! Route requests and their resolved results.

use serde::Serialize;

use crate::haversine::Coordinate;
use crate::hospital::EquipmentType;
use crate::polyline::Polyline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Supplier hospital to the hospital with the shortage.
    Transfer,
    /// Selected hospital to an externally chosen vendor location.
    Supplier,
}

/// Identity of a displayed route within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RouteKey {
    Transfer {
        equipment: EquipmentType,
        supplier_id: String,
    },
    Supplier,
}

impl RouteKey {
    pub fn transfer(equipment: EquipmentType, supplier_id: impl Into<String>) -> Self {
        RouteKey::Transfer {
            equipment,
            supplier_id: supplier_id.into(),
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            RouteKey::Transfer { .. } => RouteKind::Transfer,
            RouteKey::Supplier => RouteKind::Supplier,
        }
    }

    /// Name of the map overlay that shows this route.
    pub fn overlay_id(&self) -> String {
        match self {
            RouteKey::Transfer {
                equipment,
                supplier_id,
            } => format!("transfer:{}:{}", equipment.slug(), supplier_id),
            RouteKey::Supplier => "supplier".to_string(),
        }
    }
}

/// A route the coordinator wants resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    pub key: RouteKey,
    pub source: Coordinate,
    pub target: Coordinate,
}

impl RouteRequest {
    /// Creates a request for the route `key` from `source` to `target`.
    pub fn new(key: RouteKey, source: Coordinate, target: Coordinate) -> Self {
        Self {
            key,
            source,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Returned by the routing service.
    Resolved,
    /// Straight-line fallback.
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub key: RouteKey,
    pub source: Coordinate,
    pub target: Coordinate,
    pub geometry: Polyline,
    pub distance_km: f64,
    pub duration_min: f64,
    pub provenance: Provenance,
}

impl RouteResult {
    pub fn is_estimated(&self) -> bool {
        self.provenance == Provenance::Estimated
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            provenance: self.provenance,
        }
    }
}

/// Distance and duration reported to the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_min: f64,
    pub provenance: Provenance,
}
