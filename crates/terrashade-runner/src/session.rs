//! Pipeline runs and the session record they replace.

use terrashade_dem::{
    DemError, ElevationGrid, ElevationGridBuilder, ElevationSource, GeoBoundingBox, Query,
};
use terrashade_render::{RenderError, RenderedImage, Renderer, ShadeParams};
use thiserror::Error;
use tracing::{info, warn};

/// Why a pipeline run failed.
///
/// Every variant ends the current run only; the session stays usable.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Latitude, longitude or radius out of range or not finite.
    #[error("Invalid input: {0}")]
    InvalidInput(DemError),

    /// Download, decode or source configuration failure.
    #[error("Elevation retrieval failed: {0}")]
    Retrieval(DemError),

    /// The source returned no samples, or only no-data samples.
    #[error("No elevation data: {0}")]
    NoData(DemError),

    /// Sample count not divisible by the distinct row count.
    #[error("Elevation samples have an unexpected shape: {0}")]
    ShapeMismatch(DemError),

    /// Encoding or writing the image failed.
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl From<DemError> for PipelineError {
    fn from(err: DemError) -> Self {
        match err {
            DemError::InvalidCoordinate { .. } | DemError::InvalidRadius(_) => {
                PipelineError::InvalidInput(err)
            }
            DemError::NoData => PipelineError::NoData(err),
            DemError::ShapeMismatch { .. } => PipelineError::ShapeMismatch(err),
            DemError::TiffDecode(_)
            | DemError::InvalidGeoTiff(_)
            | DemError::InvalidRaster(_)
            | DemError::HttpRequest(_)
            | DemError::TileDownloadFailed { .. }
            | DemError::InvalidZoomLevel(_)
            | DemError::UnsupportedCrs(_)
            | DemError::Retrieval(_) => PipelineError::Retrieval(err),
        }
    }
}

/// Everything one successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Validated inputs of the run.
    pub query: Query,
    /// Box derived from the query.
    pub bounds: GeoBoundingBox,
    /// Height field handed to the renderer.
    pub grid: ElevationGrid,
    /// Where the image went and its size.
    pub image: RenderedImage,
}

/// Query to image: bounds, grid, render.
#[derive(Debug)]
pub struct Pipeline<S, R> {
    builder: ElevationGridBuilder<S>,
    renderer: R,
    params: ShadeParams,
}

impl<S: ElevationSource, R: Renderer> Pipeline<S, R> {
    /// Combine a grid builder and a renderer; `params` apply to every run.
    pub fn new(builder: ElevationGridBuilder<S>, renderer: R, params: ShadeParams) -> Self {
        Self {
            builder,
            renderer,
            params,
        }
    }

    /// Run the whole pipeline for one query. Nothing is retried.
    pub fn run(&self, query: &Query) -> Result<SessionRecord, PipelineError> {
        let bounds = query.bounds();
        info!(
            "Bounds lat {:.5}..{:.5}, lon {:.5}..{:.5} ({:.4} x {:.4} deg)",
            bounds.min_lat,
            bounds.max_lat,
            bounds.min_lon,
            bounds.max_lon,
            bounds.lat_span(),
            bounds.lon_span()
        );

        let grid = self.builder.build_grid(&bounds)?;
        let image = self.renderer.render(&grid, &self.params)?;

        Ok(SessionRecord {
            query: *query,
            bounds,
            grid,
            image,
        })
    }
}

/// UI-owned state: the pipeline plus the record of the last successful run.
///
/// Runs take `&mut self`, so only one can be in flight. The record is
/// replaced whole on success and left untouched on failure.
#[derive(Debug)]
pub struct Session<S, R> {
    pipeline: Pipeline<S, R>,
    current: Option<SessionRecord>,
}

impl<S: ElevationSource, R: Renderer> Session<S, R> {
    /// Start a session with no record.
    pub fn new(pipeline: Pipeline<S, R>) -> Self {
        Self {
            pipeline,
            current: None,
        }
    }

    /// The last successful run, if any.
    pub fn current(&self) -> Option<&SessionRecord> {
        self.current.as_ref()
    }

    /// Validate inputs, run the pipeline and store the result.
    pub fn run(
        &mut self,
        center_lat: f64,
        center_lon: f64,
        radius_miles: f64,
    ) -> Result<&SessionRecord, PipelineError> {
        let outcome = Query::new(center_lat, center_lon, radius_miles)
            .map_err(PipelineError::from)
            .and_then(|query| self.pipeline.run(&query));

        match outcome {
            Ok(record) => Ok(self.current.insert(record)),
            Err(err) => {
                warn!("Run failed: {}", err);
                Err(err)
            }
        }
    }
}
