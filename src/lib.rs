//! resource-router
//!
//! Critical-equipment routing for a hospital network: detect shortages,
//! pick the nearest hospital with surplus, resolve routes between them, and
//! keep the displayed route set consistent while resolutions complete
//! asynchronously.

pub mod config;
pub mod coordinator;
pub mod criticality;
pub mod error;
pub mod haversine;
pub mod hospital;
pub mod osrm;
pub mod polyline;
pub mod resolver;
pub mod route;
pub mod selector;
pub mod traits;
pub mod viewport;
