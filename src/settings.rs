use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::bounds::BoundingBox;
use crate::error::ConfigError;
use crate::tiles::TileUrlTemplate;

/// Baked-in defaults. A JSON settings file may override any subset of them.
pub const DEFAULT_LOCAL: bool = true;
pub const DEFAULT_N_WORKERS: u32 = 2;
pub const DEFAULT_MEMORY_GIB: u64 = 32;

pub const DEFAULT_STAC_API_URL: &str = "https://edc-skyfox.eds.earthdaily.com/archive/v1/stac/v1";
pub const DEFAULT_STATIC_ASSET_PATH: &str = "/app/assets/";

pub const DEFAULT_OSM_URL: &str = "https://tile.openstreetmap.org/${z}/${x}/${y}.png";
pub const DEFAULT_TOPO_URL: &str =
    "http://services.arcgisonline.com/arcgis/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}";

/// Runtime settings for the stacmap application.
///
/// Built once at startup via [`Settings::effective`], validated, then passed
/// by reference to whatever needs it. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Local development mode (vs. deployed).
    pub local: bool,

    /// Number of parallel workers to provision. Must be at least 1.
    pub n_workers: u32,

    /// Total memory budget in GiB, split evenly across workers.
    pub memory: u64,

    /// Base endpoint of the STAC catalog API.
    #[serde(rename = "STAC_API_URL")]
    pub stac_api_url: String,

    /// Root directory static assets are served from.
    pub static_asset_path: String,

    /// Tile URL template for the OpenStreetMap raster basemap.
    pub osm_url: TileUrlTemplate,

    /// Tile URL template for the topographic basemap.
    pub topo_url: TileUrlTemplate,

    /// Constraint region for map queries.
    pub bounds: BoundingBox,

    /// Initial map viewport on load.
    pub init_bounds: BoundingBox,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            local: DEFAULT_LOCAL,
            n_workers: DEFAULT_N_WORKERS,
            memory: DEFAULT_MEMORY_GIB,
            stac_api_url: DEFAULT_STAC_API_URL.to_string(),
            static_asset_path: DEFAULT_STATIC_ASSET_PATH.to_string(),
            osm_url: TileUrlTemplate::new(DEFAULT_OSM_URL),
            topo_url: TileUrlTemplate::new(DEFAULT_TOPO_URL),
            bounds: BoundingBox::new(
                [55.51125779504265, -122.520837809177].into(),
                [55.54782472683954, -122.4565261844684].into(),
            ),
            init_bounds: BoundingBox::new([48.78, -123.755].into(), [49.7611, -122.5].into()),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Fields absent from the file keep
    /// their defaults; unknown fields are rejected. The result is validated
    /// before being returned.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// The single construction entry point: defaults when no file is given,
    /// [`Settings::load`] otherwise. Defaults are validated too, so a bad
    /// baked-in value cannot slip through unnoticed.
    pub fn effective(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let settings = Self::default();
                settings.validate()?;
                Ok(settings)
            }
        }
    }

    /// Reject misconfigured values before anything reads them. Every error
    /// names the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_workers == 0 {
            return Err(ConfigError::invalid(
                "n_workers",
                "must be at least 1 (per-worker memory is memory / n_workers)",
            ));
        }
        if self.memory == 0 {
            return Err(ConfigError::invalid("memory", "must be a positive number of GiB"));
        }

        let url = Url::parse(&self.stac_api_url)
            .map_err(|e| ConfigError::invalid("STAC_API_URL", e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::invalid(
                "STAC_API_URL",
                format!("expected an http(s) URL, got scheme {:?}", url.scheme()),
            ));
        }

        if self.static_asset_path.is_empty() {
            return Err(ConfigError::invalid("static_asset_path", "must not be empty"));
        }

        self.osm_url
            .check()
            .map_err(|reason| ConfigError::invalid("osm_url", reason))?;
        self.topo_url
            .check()
            .map_err(|reason| ConfigError::invalid("topo_url", reason))?;

        self.bounds
            .check()
            .map_err(|reason| ConfigError::invalid("bounds", reason))?;
        self.init_bounds
            .check()
            .map_err(|reason| ConfigError::invalid("init_bounds", reason))?;

        Ok(())
    }

    /// Per-worker memory budget in GiB: `memory / n_workers`, floored.
    ///
    /// Recomputed on demand so a settings file overriding `memory` or
    /// `n_workers` can never leave a stale value behind. [`Settings::validate`]
    /// rejects `n_workers == 0` before this can divide by zero.
    pub fn worker_memory(&self) -> u64 {
        self.memory / u64::from(self.n_workers)
    }
}
