//! Runner configuration loaded from YAML.
//!
//! ```yaml
//! tile_base_url: https://s3.amazonaws.com/elevation-tiles-prod/geotiff
//! zoom: 14
//! request_timeout_secs: 60
//! output_path: /tmp/terrashade.png
//! texture: desert
//! sun_angle: 315
//! verbose: false
//! ```
//!
//! Every field is optional; missing fields take the defaults shown.

use crate::session::{Pipeline, Session};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use terrashade_dem::{AwsTerrainSource, DemError, DownloadCallback, ElevationGridBuilder};
use terrashade_render::{
    default_output_path, RenderError, ShadeParams, SphereShadeRenderer, Texture, DEFAULT_SUN_ANGLE,
};
use thiserror::Error;

/// Errors that can occur while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid texture: {0}")]
    Texture(#[from] RenderError),

    #[error("Invalid elevation source settings: {0}")]
    Source(#[from] DemError),

    #[error("Invalid sun angle {0} (must be a finite number of degrees)")]
    SunAngle(f64),
}

/// Settings for one terrashade session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Base URL of the GeoTIFF terrain tile set.
    pub tile_base_url: String,
    /// Detail level for every grid.
    pub zoom: u8,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Where the rendered image is written.
    pub output_path: PathBuf,
    /// Shading texture name.
    pub texture: String,
    /// Sun azimuth in degrees clockwise from north.
    pub sun_angle: f64,
    /// Print download progress.
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tile_base_url: terrashade_dem::AWS_TILE_BASE_URL.to_string(),
            zoom: terrashade_dem::DEFAULT_ZOOM,
            request_timeout_secs: terrashade_dem::DEFAULT_TIMEOUT.as_secs(),
            output_path: default_output_path(),
            texture: Texture::default().name().to_string(),
            sun_angle: DEFAULT_SUN_ANGLE,
            verbose: false,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Shading parameters, validating the texture name and sun angle.
    pub fn shade_params(&self) -> Result<ShadeParams, ConfigError> {
        if !self.sun_angle.is_finite() {
            return Err(ConfigError::SunAngle(self.sun_angle));
        }
        Ok(ShadeParams {
            texture: self.texture.parse()?,
            sun_angle: self.sun_angle,
        })
    }

    /// Build a session backed by AWS terrain tiles and the PNG renderer.
    pub fn build_session(
        &self,
        callback: Option<DownloadCallback>,
    ) -> Result<Session<AwsTerrainSource, SphereShadeRenderer>, ConfigError> {
        let params = self.shade_params()?;

        let mut source = AwsTerrainSource::with_options(
            self.tile_base_url.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )?;
        if let Some(cb) = callback {
            source = source.with_callback(cb);
        }

        let builder = ElevationGridBuilder::new(source)
            .with_zoom(self.zoom)?
            .with_verbose(self.verbose);
        let renderer = SphereShadeRenderer::new(&self.output_path);

        Ok(Session::new(Pipeline::new(builder, renderer, params)))
    }
}
