use hwy_ingest_types::RouteId;
use std::collections::HashSet;
use std::sync::Mutex;

/// One highway segment: the connection between two consecutive waypoints on
/// a route. `clinched_by` is populated by the (out-of-scope) traveler pass;
/// it's guarded by its own mutex here because that pass, like the waypoint
/// reader, runs against shared segments from multiple workers.
pub struct HighwaySegment {
    pub waypoint1: usize,
    pub waypoint2: usize,
    pub route: RouteId,
    pub length: f64,
    clinched_by: Mutex<HashSet<usize>>,

    /// `None` until a (separately specified) concurrency-detection pass
    /// populates it; kept as `Option` rather than forced into an empty
    /// `Vec` that would misleadingly read as "computed, no concurrencies
    /// found".
    pub concurrent: Option<Vec<usize>>,
    pub system_concurrency_count: u8,
    pub active_only_concurrency_count: u8,
    pub active_preview_concurrency_count: u8,
}

impl HighwaySegment {
    pub fn new(waypoint1: usize, waypoint2: usize, route: RouteId, length: f64) -> HighwaySegment {
        HighwaySegment {
            waypoint1,
            waypoint2,
            route,
            length,
            clinched_by: Mutex::new(HashSet::new()),
            concurrent: None,
            system_concurrency_count: 1,
            active_only_concurrency_count: 1,
            active_preview_concurrency_count: 1,
        }
    }

    /// Record that `traveler` has clinched this segment. Returns whether
    /// this was a new entry, mirroring `unordered_set::insert`'s `.second`.
    pub fn add_clinched_by(&self, traveler: usize) -> bool {
        self.clinched_by.lock().unwrap().insert(traveler)
    }

    pub fn clinched_by_count(&self) -> usize {
        self.clinched_by.lock().unwrap().len()
    }
}
