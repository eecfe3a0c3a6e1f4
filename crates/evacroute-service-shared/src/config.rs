//! Environment-driven service configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SERVICE_PORT` | `8080` |
//! | `EVACROUTE_FLOOD_HAZARDS_PATH` | unset (empty flood layer) |
//! | `EVACROUTE_EARTHQUAKE_HAZARDS_PATH` | unset (empty earthquake layer) |
//! | `EVACROUTE_CENTERS_PATH` | `/data/evacuation_centers.json` |
//! | `EVACROUTE_DIRECTIONS_BASE_URL` | `https://api.mapbox.com` |
//! | `EVACROUTE_DIRECTIONS_TOKEN` | empty |
//! | `EVACROUTE_DIRECTIONS_TIMEOUT_SECS` | `10` |
//! | `EVACROUTE_ADMIN_TOKEN` | unset (admin routes unauthenticated) |

use std::path::PathBuf;
use std::time::Duration;

use evacroute_lib::directions::{
    DirectionsConfig, DEFAULT_DIRECTIONS_BASE_URL, DEFAULT_DIRECTIONS_TIMEOUT,
};

pub const DEFAULT_SERVICE_PORT: u16 = 8080;
pub const DEFAULT_CENTERS_PATH: &str = "/data/evacuation_centers.json";

/// Runtime configuration for the routing service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub flood_hazards_path: Option<PathBuf>,
    pub earthquake_hazards_path: Option<PathBuf>,
    pub centers_path: PathBuf,
    pub directions: DirectionsConfig,
    pub admin_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVICE_PORT,
            flood_hazards_path: None,
            earthquake_hazards_path: None,
            centers_path: PathBuf::from(DEFAULT_CENTERS_PATH),
            directions: DirectionsConfig::default(),
            admin_token: None,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("SERVICE_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SERVICE_PORT);

        let timeout = non_empty("EVACROUTE_DIRECTIONS_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DIRECTIONS_TIMEOUT);

        Self {
            port,
            flood_hazards_path: non_empty("EVACROUTE_FLOOD_HAZARDS_PATH").map(PathBuf::from),
            earthquake_hazards_path: non_empty("EVACROUTE_EARTHQUAKE_HAZARDS_PATH")
                .map(PathBuf::from),
            centers_path: non_empty("EVACROUTE_CENTERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CENTERS_PATH)),
            directions: DirectionsConfig {
                base_url: non_empty("EVACROUTE_DIRECTIONS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_DIRECTIONS_BASE_URL.to_string()),
                access_token: lookup("EVACROUTE_DIRECTIONS_TOKEN").unwrap_or_default(),
                timeout,
            },
            admin_token: non_empty("EVACROUTE_ADMIN_TOKEN"),
        }
    }
}
