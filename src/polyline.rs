//! Polyline representation for route geometries.
//!
//! Geometries are held as decoded coordinates. The compact encoded form
//! (Google polyline, as returned by OSRM) only exists at the service
//! boundary, via [`decode`] and [`Polyline::encode`].

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;
use crate::haversine::Coordinate;

/// Precision used by OSRM's `geometries=polyline` output.
pub const OSRM_PRECISION: u32 = 5;

/// A route geometry as an ordered sequence of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from already decoded points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Two-point straight line.
    pub fn straight(from: Coordinate, to: Coordinate) -> Self {
        Self {
            points: vec![from, to],
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Encodes the points in the Google polyline format.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let (mut prev_lat, mut prev_lng) = (0i64, 0i64);
        for point in &self.points {
            let lat = (point.lat * factor).round() as i64;
            let lng = (point.lng * factor).round() as i64;
            encode_value(lat - prev_lat, &mut out);
            encode_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }
        out
    }
}

/// Decodes a Google-format encoded polyline.
pub fn decode(encoded: &str, precision: u32) -> Result<Polyline, PolylineError> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut offset = 0;
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut points = Vec::new();

    while offset < bytes.len() {
        lat = accumulate(lat, bytes, &mut offset)?;
        lng = accumulate(lng, bytes, &mut offset)?;
        points.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(Polyline::new(points))
}

/// Adds the next delta to a running coordinate value.
fn accumulate(current: i64, bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let start = *offset;
    let delta = next_value(bytes, offset)?;
    current
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { offset: start })
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;
    loop {
        let byte = *bytes
            .get(*offset)
            .ok_or(PolylineError::Truncated { offset: *offset })?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                offset: *offset,
                byte,
            });
        }
        if shift > 58 {
            return Err(PolylineError::Overflow { offset: *offset });
        }
        let chunk = i64::from(byte - 63);
        *offset += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}
