//! Error type for conditions this core cannot survive at all, as opposed
//! to data-quality problems, which accumulate in `ErrorList`/`Datacheck` and
//! never abort (see `sinks`). A plain enum, `Display` forwarding to `Debug`,
//! and a manual `std::error::Error` impl rather than pulling in a macro
//! crate for a single variant.
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IngestError {
    /// The highway data root does not exist or is not a directory; crawling
    /// it for `.wpt` files would be meaningless. Every other file-read
    /// failure (a missing taxonomy file, a missing `.wpt`) is merely logged
    /// to `ErrorList` and ingest continues.
    MissingDataRoot(PathBuf),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for IngestError {}
