//! hwy-ingest-types
//! ================
//!
//! Plain, serde-friendly value types shared between the `hwy-ingest` parsing
//! core and any consumer of its output: taxonomy records, the DB field-length
//! table, and the datacheck finding catalogue. No I/O, no parsing logic.

#![forbid(unsafe_code)]

mod field_length;
mod finding;
mod ids;
mod level;
mod taxonomy;

pub use field_length::DBFieldLength;
pub use finding::{DatacheckCode, Finding};
pub use ids::{
    ColocatedGroupId, ConRouteId, RegionId, RouteId, SystemId, WaypointRef,
};
pub use level::SystemLevel;
pub use taxonomy::{Continent, Country};
