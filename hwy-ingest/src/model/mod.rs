pub mod connected_route;
pub mod region;
pub mod route;
pub mod segment;
pub mod system;
pub mod taxonomy;
pub mod waypoint;

pub use connected_route::ConnectedRoute;
pub use region::{Region, RegionTable};
pub use route::{Route, RouteNameRegistry};
pub use segment::HighwaySegment;
pub use system::{load_connected_routes, HighwaySystem, HighwaySystemHeader};
pub use taxonomy::{ContinentTable, CountryTable};
pub use waypoint::{ParsedWaypoint, Waypoint};
