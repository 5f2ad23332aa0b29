use thiserror::Error;

/// Failure talking to the external routing service.
///
/// Never leaves the resolver; it is logged and replaced by an estimate.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("routing service returned no routes")]
    NoRoute,

    #[error("invalid route geometry: {0}")]
    Geometry(#[from] PolylineError),
}

/// Malformed encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("polyline truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline character {byte:#04x} at byte {offset}")]
    InvalidCharacter { offset: usize, byte: u8 },

    #[error("polyline value overflows at byte {offset}")]
    Overflow { offset: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
