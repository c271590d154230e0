//! # terrashade-runner
//!
//! Front end for terrashade: configuration, the session that owns the last
//! result, and the `terrashade` command-line tool.
//!
//! A [`Session`] wraps a [`Pipeline`] (grid builder, renderer and fixed
//! shading parameters). Each trigger validates the inputs, computes bounds,
//! builds the grid, renders it and replaces the session record. Failures are
//! returned as [`PipelineError`] and leave the previous record in place.

pub mod config;
pub mod controls;
pub mod interactive;
pub mod session;

pub use config::{ConfigError, RunnerConfig};
pub use controls::{parse_latitude, parse_longitude, parse_radius, DEFAULT_RADIUS_MILES};
pub use interactive::{describe_record, parse_command, run_interactive, Command};
pub use session::{Pipeline, PipelineError, Session, SessionRecord};
