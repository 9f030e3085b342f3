//! hwy-ingest
//! ==========
//!
//! The ingest-and-validation core for a Travel Mapping highway dataset: a
//! layered parser enforcing referential integrity across continents,
//! countries, regions, highway systems, chopped routes, connected routes,
//! and waypoints; a parallel per-system waypoint reader that populates
//! geometry and emits datacheck findings; a point quadtree used to
//! discover colocated waypoints; and the datacheck rule engine itself.
//!
//! This crate has no `clap`/process-exit/stdout concerns of its own —
//! those live in the `hwy-ingest-cli` binary crate, which builds an
//! [`IngestConfig`](config::IngestConfig) and calls
//! [`pipeline::run_ingest`].

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod datacheck;
pub mod error;
pub mod geo;
pub mod model;
pub mod pipeline;
pub mod primitives;
pub mod quadtree;
pub mod reader;
pub mod sinks;

pub use config::{IngestConfig, QuadtreeConfig};
pub use context::IngestContext;
pub use error::IngestError;
pub use pipeline::run_ingest;
