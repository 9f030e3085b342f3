use std::path::PathBuf;

/// The slice of the CLI surface this core actually consumes. Built by a
/// collaborator (the CLI crate's `clap::Parser`) and passed in by value;
/// nothing in this crate reads argv or the environment itself.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Root of the dataset tree (contains `continents.csv`, `hwy_data/`, ...).
    pub highway_data_path: PathBuf,
    /// Name of the systems list file, relative to `highway_data_path`.
    pub systems_file: String,
    /// Worker count for the waypoint-reading phase. `1` runs a single
    /// scoped thread rather than a separate sequential code path.
    pub num_threads: usize,
    /// Restrict the `.wpt` crawl / orphan check to a single region code,
    /// when set.
    pub split_region: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            highway_data_path: PathBuf::new(),
            systems_file: "systems.csv".to_string(),
            num_threads: 1,
            split_region: None,
        }
    }
}

/// Quadtree refine behavior. No reference source for the exact refine
/// threshold used by a production dataset of this size was available, so
/// this is parameterized rather than guessed into a hardcoded constant. The
/// default below is a reasonable value for the dataset's density; see
/// DESIGN.md for the reasoning.
#[derive(Clone, Copy, Debug)]
pub struct QuadtreeConfig {
    /// A leaf refines into four children once it holds more unique
    /// locations than this.
    pub refine_threshold: usize,
    /// A leaf never refines below this span (in degrees) on either axis,
    /// so pathologically co-located points don't recurse forever.
    pub min_span_deg: f64,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        QuadtreeConfig {
            refine_threshold: 50,
            min_span_deg: 0.001,
        }
    }
}
