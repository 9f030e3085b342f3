use crate::config::{IngestConfig, QuadtreeConfig};
use crate::model::{ContinentTable, CountryTable, HighwaySystem, RegionTable, RouteNameRegistry};
use crate::quadtree::WaypointQuadtree;
use crate::sinks::{Datacheck, ErrorList};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// Everything ingest threads reach through shared references: the taxonomy
/// tables and route-name registry (read-only once construction finishes),
/// one mutex per `HighwaySystem` (so the worker pool can claim and mutate
/// exactly one at a time), and the three cross-cutting sinks.
pub struct IngestContext {
    pub config: IngestConfig,
    pub continents: ContinentTable,
    pub countries: CountryTable,
    pub regions: RegionTable,
    pub registry: RouteNameRegistry,
    pub systems: Vec<Mutex<HighwaySystem>>,
    pub all_wpt_files: Mutex<HashSet<PathBuf>>,
    pub error_list: ErrorList,
    pub datacheck: Datacheck,
    pub quadtree: WaypointQuadtree,
}

impl IngestContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: IngestConfig,
        continents: ContinentTable,
        countries: CountryTable,
        regions: RegionTable,
        registry: RouteNameRegistry,
        systems: Vec<HighwaySystem>,
        all_wpt_files: HashSet<PathBuf>,
        quadtree_config: QuadtreeConfig,
        error_list: ErrorList,
    ) -> IngestContext {
        IngestContext {
            config,
            continents,
            countries,
            regions,
            registry,
            systems: systems.into_iter().map(Mutex::new).collect(),
            all_wpt_files: Mutex::new(all_wpt_files),
            error_list,
            datacheck: Datacheck::new(),
            quadtree: WaypointQuadtree::new(quadtree_config),
        }
    }

    pub fn mark_wpt_file_read(&self, path: &std::path::Path) {
        self.all_wpt_files.lock().unwrap().remove(path);
    }

    /// Paths left in `all_wpt_files` after ingest: orphaned data files that
    /// no route ever opened.
    pub fn orphaned_wpt_files(&self) -> Vec<PathBuf> {
        self.all_wpt_files.lock().unwrap().iter().cloned().collect()
    }
}
