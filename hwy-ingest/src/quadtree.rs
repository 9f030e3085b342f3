//! Point-region quadtree over `[-90,90]x[-180,180]`, used to find waypoints
//! stored at exactly the same coordinates (colocation) and, later, pairs of
//! waypoints within a small tolerance of each other (near-miss).
//!
//! Concurrent inserts from the worker pool descend top-down, locking one
//! node at a time and releasing it before moving to a child — equivalent to
//! a recursive per-node lock without requiring a reentrant `Mutex`.

use crate::config::QuadtreeConfig;
use hwy_ingest_types::{ColocatedGroupId, WaypointRef};
use std::sync::{Arc, Mutex};

struct LeafPoint {
    lat: f64,
    lng: f64,
    group: ColocatedGroupId,
}

enum QuadNodeInner {
    Leaf(Vec<LeafPoint>),
    Refined(Box<[Arc<QuadNode>; 4]>),
}

struct QuadNode {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
    inner: Mutex<QuadNodeInner>,
}

impl QuadNode {
    fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> QuadNode {
        QuadNode {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
            inner: Mutex::new(QuadNodeInner::Leaf(Vec::new())),
        }
    }

    fn intersects(&self, lat: f64, lng: f64, tolerance: f64) -> bool {
        lat + tolerance >= self.min_lat
            && lat - tolerance <= self.max_lat
            && lng + tolerance >= self.min_lng
            && lng - tolerance <= self.max_lng
    }
}

/// 0=SW, 1=SE, 2=NW, 3=NE, split about the node's midpoint.
fn quadrant_index(mid_lat: f64, mid_lng: f64, lat: f64, lng: f64) -> usize {
    match (lat >= mid_lat, lng >= mid_lng) {
        (false, false) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (true, true) => 3,
    }
}

pub struct WaypointQuadtree {
    root: Arc<QuadNode>,
    groups: Mutex<Vec<Vec<WaypointRef>>>,
    config: QuadtreeConfig,
}

impl WaypointQuadtree {
    pub fn new(config: QuadtreeConfig) -> WaypointQuadtree {
        WaypointQuadtree {
            root: Arc::new(QuadNode::new(-90.0, 90.0, -180.0, 180.0)),
            groups: Mutex::new(Vec::new()),
            config,
        }
    }

    /// Insert `waypoint` at `(lat, lng)`, returning the id of the colocated
    /// group it now belongs to (freshly created if this is the first
    /// waypoint seen at this exact location).
    pub fn insert(&self, waypoint: WaypointRef, lat: f64, lng: f64) -> ColocatedGroupId {
        insert_at(&self.root, waypoint, lat, lng, &self.groups, &self.config)
    }

    pub fn colocated_group(&self, id: ColocatedGroupId) -> Vec<WaypointRef> {
        self.groups.lock().unwrap()[id.0].clone()
    }

    pub fn unique_location_count(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    /// All waypoints whose stored location falls within `tolerance` degrees
    /// of `(lat, lng)` in both axes, found by descending only into quadrants
    /// whose bounding box overlaps the query window.
    pub fn near_miss_waypoints(&self, lat: f64, lng: f64, tolerance: f64) -> Vec<WaypointRef> {
        let mut out = Vec::new();
        collect_near_miss(&self.root, lat, lng, tolerance, &self.groups, &mut out);
        out
    }
}

fn insert_at(
    node: &Arc<QuadNode>,
    waypoint: WaypointRef,
    lat: f64,
    lng: f64,
    groups: &Mutex<Vec<Vec<WaypointRef>>>,
    config: &QuadtreeConfig,
) -> ColocatedGroupId {
    let mut current = Arc::clone(node);
    loop {
        let mut inner = current.inner.lock().unwrap();
        match &mut *inner {
            QuadNodeInner::Refined(children) => {
                let mid_lat = (current.min_lat + current.max_lat) / 2.0;
                let mid_lng = (current.min_lng + current.max_lng) / 2.0;
                let idx = quadrant_index(mid_lat, mid_lng, lat, lng);
                let child = Arc::clone(&children[idx]);
                drop(inner);
                current = child;
                continue;
            }
            QuadNodeInner::Leaf(points) => {
                if let Some(existing) = points.iter().find(|p| p.lat == lat && p.lng == lng) {
                    let group_id = existing.group;
                    groups.lock().unwrap()[group_id.0].push(waypoint);
                    return group_id;
                }

                let span = (current.max_lat - current.min_lat).max(current.max_lng - current.min_lng);
                if points.len() < config.refine_threshold || span <= config.min_span_deg {
                    let group_id = {
                        let mut g = groups.lock().unwrap();
                        g.push(vec![waypoint]);
                        ColocatedGroupId(g.len() - 1)
                    };
                    points.push(LeafPoint { lat, lng, group: group_id });
                    return group_id;
                }

                let mid_lat = (current.min_lat + current.max_lat) / 2.0;
                let mid_lng = (current.min_lng + current.max_lng) / 2.0;
                let children: [Arc<QuadNode>; 4] = [
                    Arc::new(QuadNode::new(current.min_lat, mid_lat, current.min_lng, mid_lng)),
                    Arc::new(QuadNode::new(current.min_lat, mid_lat, mid_lng, current.max_lng)),
                    Arc::new(QuadNode::new(mid_lat, current.max_lat, current.min_lng, mid_lng)),
                    Arc::new(QuadNode::new(mid_lat, current.max_lat, mid_lng, current.max_lng)),
                ];
                for p in points.drain(..) {
                    let idx = quadrant_index(mid_lat, mid_lng, p.lat, p.lng);
                    let mut child_inner = children[idx].inner.lock().unwrap();
                    if let QuadNodeInner::Leaf(child_points) = &mut *child_inner {
                        child_points.push(p);
                    }
                }
                let target_idx = quadrant_index(mid_lat, mid_lng, lat, lng);
                let target = Arc::clone(&children[target_idx]);
                *inner = QuadNodeInner::Refined(Box::new(children));
                drop(inner);
                current = target;
                continue;
            }
        }
    }
}

fn collect_near_miss(
    node: &Arc<QuadNode>,
    lat: f64,
    lng: f64,
    tolerance: f64,
    groups: &Mutex<Vec<Vec<WaypointRef>>>,
    out: &mut Vec<WaypointRef>,
) {
    if !node.intersects(lat, lng, tolerance) {
        return;
    }
    let inner = node.inner.lock().unwrap();
    match &*inner {
        QuadNodeInner::Leaf(points) => {
            let g = groups.lock().unwrap();
            for p in points {
                if (p.lat - lat).abs() <= tolerance && (p.lng - lng).abs() <= tolerance {
                    out.extend(g[p.group.0].iter().copied());
                }
            }
        }
        QuadNodeInner::Refined(children) => {
            let children = children.clone();
            drop(inner);
            for child in children.iter() {
                collect_near_miss(child, lat, lng, tolerance, groups, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwy_ingest_types::{RouteId, SystemId};

    fn wref(point: usize) -> WaypointRef {
        WaypointRef { route: RouteId { system: SystemId(0), index: 0 }, point }
    }

    #[test]
    fn distinct_points_get_distinct_groups() {
        let qt = WaypointQuadtree::new(QuadtreeConfig::default());
        let g1 = qt.insert(wref(0), 34.0, -118.0);
        let g2 = qt.insert(wref(1), 35.0, -119.0);
        assert_ne!(g1.0, g2.0);
        assert_eq!(qt.unique_location_count(), 2);
    }

    #[test]
    fn exact_duplicate_joins_existing_group() {
        let qt = WaypointQuadtree::new(QuadtreeConfig::default());
        let g1 = qt.insert(wref(0), 34.0, -118.0);
        let g2 = qt.insert(wref(1), 34.0, -118.0);
        assert_eq!(g1, g2);
        assert_eq!(qt.unique_location_count(), 1);
        assert_eq!(qt.colocated_group(g1).len(), 2);
    }

    #[test]
    fn refinement_preserves_all_points() {
        let config = QuadtreeConfig { refine_threshold: 2, min_span_deg: 0.0001 };
        let qt = WaypointQuadtree::new(config);
        for i in 0..20 {
            qt.insert(wref(i), i as f64 * 0.01, i as f64 * 0.01);
        }
        assert_eq!(qt.unique_location_count(), 20);
    }

    #[test]
    fn near_miss_finds_points_within_tolerance() {
        let qt = WaypointQuadtree::new(QuadtreeConfig::default());
        qt.insert(wref(0), 34.0, -118.0);
        qt.insert(wref(1), 34.0005, -118.0005);
        qt.insert(wref(2), 40.0, -120.0);
        let hits = qt.near_miss_waypoints(34.0, -118.0, 0.001);
        assert_eq!(hits.len(), 2);
    }
}
