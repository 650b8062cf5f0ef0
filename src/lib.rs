//! Load, normalize, filter and summarize immigration invitation rounds.
//!
//! One pass through the pipeline:
//!
//! 1. [`loader`] reads a CSV export or a JSON feed into raw cells,
//! 2. [`schema`] maps its columns onto canonical fields,
//! 3. [`normalize`] coerces every cell, degrading bad values to `None`,
//! 4. [`record_set`] drops undated rounds and sorts newest first,
//! 5. [`filter`] applies a [`filter::FilterSelection`],
//! 6. [`metrics`] computes the summary figures.
//!
//! Every dashboard variant is a [`config::Preset`] over the same pipeline.

pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod record_set;
pub mod schema;
pub mod types;
pub mod util;

pub use error::{LoadError, Result};
