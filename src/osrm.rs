//! OSRM HTTP adapter for point-to-point routes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::haversine::Coordinate;
use crate::polyline::{self, OSRM_PRECISION};
use crate::traits::{RoutingService, ServiceRoute};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<ServiceRoute, RoutingError> {
        let response = self.client.get(self.route_url(from, to)).send().await?;
        let status = response.status();

        // OSRM reports routing failures (NoRoute, InvalidQuery) as 4xx with a JSON body.
        let body = match response.json::<OsrmRouteResponse>().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(err.into()),
            Err(_) => {
                return Err(RoutingError::Service {
                    code: status.as_str().to_string(),
                    message: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }
        };

        if body.code != "Ok" {
            return Err(RoutingError::Service {
                code: body.code,
                message: body.message.unwrap_or_default(),
            });
        }

        let route = body
            .routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(RoutingError::NoRoute)?;

        Ok(ServiceRoute {
            geometry: polyline::decode(&route.geometry, OSRM_PRECISION)?,
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    distance: f64,
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://osrm.local/".to_string(),
            ..OsrmConfig::default()
        })
        .expect("build client");
        let url = client.route_url(
            Coordinate::new(36.1335, -115.1364),
            Coordinate::new(36.1601, -115.1685),
        );
        assert_eq!(
            url,
            "http://osrm.local/route/v1/car/-115.136400,36.133500;-115.168500,36.160100?overview=full&geometries=polyline"
        );
    }
}
