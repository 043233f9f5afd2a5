// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid/scan configuration, plus a storage port and JSON service for persisting it.

use fieldgrid_geom::Vec3;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::error::GridError;
use crate::grid::GridDims;

/// Storage key used by [`ConfigService::load_grid_config`].
pub const GRID_CONFIG_KEY: &str = "grid";
/// Storage key used by [`ConfigService::load_scan_config`].
pub const SCAN_CONFIG_KEY: &str = "scan";

/// Geometry of a collision grid.
///
/// `depth == None` builds a 2D grid (one depth slice; Z is ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World position of the grid's minimum corner.
    pub origin: [f32; 3],
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z; `None` for a planar grid.
    pub depth: Option<f32>,
    /// Edge length of every cell.
    pub cell_size: f32,
    /// Use the largest extent for every axis (square/cubic grid).
    pub force_symmetric: bool,
    /// Bind objects immediately. A disabled grid records objects without binding them.
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            width: 100.0,
            height: 100.0,
            depth: None,
            cell_size: 10.0,
            force_symmetric: false,
            enabled: true,
        }
    }
}

impl GridConfig {
    /// Planar grid anchored at `origin`.
    pub fn planar(origin: Vec3, width: f32, height: f32, cell_size: f32) -> Self {
        Self {
            origin: origin.to_array(),
            width,
            height,
            depth: None,
            cell_size,
            ..Self::default()
        }
    }

    /// Volumetric grid anchored at `origin`.
    pub fn volumetric(origin: Vec3, width: f32, height: f32, depth: f32, cell_size: f32) -> Self {
        Self {
            origin: origin.to_array(),
            width,
            height,
            depth: Some(depth),
            cell_size,
            ..Self::default()
        }
    }

    /// Sets `force_symmetric`.
    pub fn symmetric(mut self, on: bool) -> Self {
        self.force_symmetric = on;
        self
    }

    /// Sets `enabled`.
    pub fn enabled(mut self, on: bool) -> Self {
        self.enabled = on;
        self
    }

    /// Grid origin as a vector.
    pub fn origin(&self) -> Vec3 {
        Vec3::from(self.origin)
    }

    /// Checks extents and cell size without allocating anything.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.origin().is_finite() {
            return Err(GridError::InvalidConfig("origin must be finite".into()));
        }
        let cell = self.cell_size;
        if !(cell.is_finite() && cell > 0.0) {
            let msg = format!("cell_size must be finite and > 0 (got {cell})");
            return Err(GridError::InvalidConfig(msg));
        }
        let extents = [
            ("width", Some(self.width)),
            ("height", Some(self.height)),
            ("depth", self.depth),
        ];
        for (name, value) in extents {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(GridError::InvalidConfig(format!(
                        "{name} must be finite and > 0 (got {v})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Per-axis cell counts: `ceil(extent / cell_size)`, honouring `force_symmetric`.
    pub fn dims(&self) -> Result<GridDims, GridError> {
        self.validate()?;
        let (width, height, depth) = if self.force_symmetric {
            let planar = self.width.max(self.height);
            let side = self.depth.map_or(planar, |d| planar.max(d));
            (side, side, self.depth.map(|_| side))
        } else {
            (self.width, self.height, self.depth)
        };
        let cols = cells_along(width, self.cell_size)?;
        let rows = cells_along(height, self.cell_size)?;
        let depths = match depth {
            Some(d) => cells_along(d, self.cell_size)?,
            None => 1,
        };
        // Field ids are u32; the whole grid must stay addressable.
        let addressable = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(depths))
            .is_some_and(|n| u32::try_from(n).is_ok());
        if !addressable {
            return Err(GridError::InvalidConfig(format!(
                "grid of {rows}x{cols}x{depths} cells is too large"
            )));
        }
        Ok(GridDims { rows, cols, depths })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cells_along(extent: f32, cell_size: f32) -> Result<usize, GridError> {
    let count = (extent / cell_size).ceil();
    if f64::from(count) > f64::from(u32::MAX) {
        let msg = format!("{count} cells along one axis is too many");
        return Err(GridError::InvalidConfig(msg));
    }
    Ok((count as usize).max(1))
}

/// Checker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Count pairwise checks and collisions per pass (diagnostics only).
    pub measure_performance: bool,
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A stored grid config failed validation.
    #[error("invalid stored config: {0}")]
    Invalid(#[from] GridError),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored grid config (validated), or the default when none is stored.
    pub fn load_grid_config(&self) -> Result<GridConfig, ConfigError> {
        let config = self.load::<GridConfig>(GRID_CONFIG_KEY)?.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Stored scan config, or the default when none is stored.
    pub fn load_scan_config(&self) -> Result<ScanConfig, ConfigError> {
        Ok(self.load::<ScanConfig>(SCAN_CONFIG_KEY)?.unwrap_or_default())
    }
}
