//! Fitting the map viewport around a set of points.
//!
//! The adjuster itself is stateless; the coordinator decides when to call it.

use tracing::debug;

use crate::config::ViewportOptions;
use crate::haversine::Coordinate;
use crate::traits::{Bounds, MapSurface};

impl Bounds {
    /// Smallest region containing all points, `None` for an empty set.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for point in iter {
            bounds.south = bounds.south.min(point.lat);
            bounds.north = bounds.north.max(point.lat);
            bounds.west = bounds.west.min(point.lng);
            bounds.east = bounds.east.max(point.lng);
        }
        Some(bounds)
    }

    /// Grows each side by `fraction` of the span on that axis.
    pub fn padded(self, fraction: f64) -> Self {
        let lat_pad = (self.north - self.south) * fraction;
        let lng_pad = (self.east - self.west) * fraction;
        Bounds {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

/// Turns route points into a single fit request for the map.
#[derive(Debug, Clone, Default)]
pub struct ViewportAdjuster {
    options: ViewportOptions,
}

impl ViewportAdjuster {
    /// Creates an adjuster with the given padding and zoom cap.
    pub fn new(options: ViewportOptions) -> Self {
        Self { options }
    }

    /// Requests the map to fit `points`. Returns the bounds sent, if any.
    pub fn fit<'a, M: MapSurface>(
        &self,
        points: impl IntoIterator<Item = &'a Coordinate>,
        map: &mut M,
    ) -> Option<Bounds> {
        let bounds = Bounds::around(points)?.padded(self.options.padding_fraction);
        debug!(?bounds, max_zoom = self.options.max_zoom, "fitting viewport");
        map.fit_bounds(bounds, self.options.max_zoom);
        Some(bounds)
    }
}
