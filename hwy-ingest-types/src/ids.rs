use serde::{Deserialize, Serialize};

/// Index into `IngestContext::systems`. Stable for the lifetime of a run.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct SystemId(pub usize);

/// Index of a `Region` within `IngestContext::regions`.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct RegionId(pub usize);

/// Non-owning handle to a `Route`: which system it belongs to, and its
/// position in that system's `route_list`. Stands in for the chopped-route
/// pointer the original C++ core carries directly.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct RouteId {
    pub system: SystemId,
    pub index: usize,
}

/// Non-owning handle to a `ConnectedRoute`.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct ConRouteId {
    pub system: SystemId,
    pub index: usize,
}

/// Non-owning handle to a single `Waypoint`: its route, and its position in
/// that route's `point_list`. This is what the quadtree stores instead of a
/// borrowed reference, so insertion never fights the borrow checker over a
/// structure mutated concurrently by other workers.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct WaypointRef {
    pub route: RouteId,
    pub point: usize,
}

/// Index into the quadtree's colocated-group arena.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct ColocatedGroupId(pub usize);
