//! The CLI arguments parser, using `clap`'s derive API.
//!
//! Covers the flags this binary actually threads through to
//! [`hwy_ingest::IngestConfig`], plus `--userlist`/`--userlistfilepath`,
//! which are accepted and recorded (the traveler-list ingestion they feed
//! stays out of this core's scope) and `-v`/`-q` verbosity, which only
//! drives `env_logger`'s filter.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "hwy-ingest", about, author, version)]
pub struct Cli {
    /// Root of the highway dataset tree (contains `continents.csv`,
    /// `hwy_data/`, ...).
    pub highwaydatapath: PathBuf,

    /// Name of the systems list file, relative to `highwaydatapath`.
    #[clap(long, default_value = "systems.csv")]
    pub systems_file: String,

    /// Path to a traveler list file. Recorded but not processed by this
    /// core; traveler-list ingestion is a separate collaborator.
    #[clap(long)]
    pub userlist: Option<String>,

    /// Path to a directory of traveler list files. Same caveat as
    /// `--userlist`.
    #[clap(long)]
    pub userlistfilepath: Option<PathBuf>,

    /// Worker thread count for the waypoint-reading phase.
    #[clap(long, default_value = "1")]
    pub num_threads: usize,

    /// Restrict the `.wpt` crawl / orphan check to a single region code.
    #[clap(long)]
    pub split_region: Option<String>,

    /// Summary output format: `text` (default, colorized) or `json`.
    #[clap(long, default_value = "text")]
    pub format: String,

    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

impl Cli {
    pub fn from_args() -> Result<Cli, clap::Error> {
        Cli::try_parse()
    }
}
