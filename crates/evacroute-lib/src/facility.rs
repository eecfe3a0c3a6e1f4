//! Evacuation center records and the directory they come from.
//!
//! Center records are owned by an external backend; this crate only reads
//! them. [`CenterDirectory`] is the seam through which services obtain the
//! current list.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coords::{is_valid_lat, is_valid_lng, GeoPoint};
use crate::error::{Error, Result};
use crate::nearest::Located;

/// An evacuation center as supplied by the facility directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvacuationCenter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub capacity_current: u32,
    #[serde(default)]
    pub capacity_total: u32,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Located for EvacuationCenter {
    fn location(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) if is_valid_lng(lng) && is_valid_lat(lat) => {
                GeoPoint::new(lng, lat).ok()
            }
            _ => None,
        }
    }
}

/// Source of the current evacuation center list.
#[async_trait]
pub trait CenterDirectory: Send + Sync {
    async fn evacuation_centers(&self) -> Result<Vec<EvacuationCenter>>;
}

/// A fixed list of centers, typically read from a JSON file at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCenterDirectory {
    centers: Vec<EvacuationCenter>,
}

impl StaticCenterDirectory {
    pub fn new(centers: Vec<EvacuationCenter>) -> Self {
        Self { centers }
    }

    /// Read a JSON array of centers from `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let load_error = |message: String| Error::CenterDataLoad {
            path: PathBuf::from(path),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let centers: Vec<EvacuationCenter> =
            serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))?;

        info!(path = %path.display(), centers = centers.len(), "evacuation centers loaded");
        Ok(Self::new(centers))
    }

    pub fn centers(&self) -> &[EvacuationCenter] {
        &self.centers
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

#[async_trait]
impl CenterDirectory for StaticCenterDirectory {
    async fn evacuation_centers(&self) -> Result<Vec<EvacuationCenter>> {
        Ok(self.centers.clone())
    }
}
