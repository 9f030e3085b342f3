//! Top-level ingest pipeline and the worker-pool driver for the parallel
//! waypoint phase. Everything up through the systems/routes/connected-routes
//! load runs single-threaded, in file order; only the waypoint phase fans
//! out across `IngestConfig::num_threads`.

use crate::config::{IngestConfig, QuadtreeConfig};
use crate::context::IngestContext;
use crate::error::IngestError;
use crate::model::region::RegionTable;
use crate::model::route::RouteNameRegistry;
use crate::model::system::HighwaySystem;
use crate::model::taxonomy::{ContinentTable, CountryTable};
use crate::reader::{crawl_wpt_files, read_system};
use crate::sinks::ErrorList;
use hwy_ingest_types::SystemId;
use log::{debug, info};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Read a `;`-delimited config file's body (header skipped), or record the
/// open failure to `el` and return an empty body so the table loads with
/// just its sentinel row and ingest continues.
fn read_body_lines(path: &Path, el: &ErrorList) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.lines().skip(1).map(str::to_string).collect(),
        Err(_) => {
            el.add_error(format!("Could not open {}", path.display()));
            Vec::new()
        }
    }
}

/// Drive the whole sequential load (taxonomy, then systems/routes/
/// connected-routes), then the parallel waypoint phase, and return the
/// populated `IngestContext` for a caller to inspect or hand off to a later
/// stage.
///
/// Returns `Err` only for the one condition treated as unrecoverable:
/// `hwy_data/` itself doesn't exist, so a crawl for `.wpt` files would be
/// meaningless. Every other bad-data condition — a missing `continents.csv`,
/// an unparsable `systems.csv` line, an unreadable `.wpt` file — is recorded
/// to `ErrorList`/`Datacheck` and ingest continues.
pub fn run_ingest(
    config: IngestConfig,
    quadtree_config: QuadtreeConfig,
) -> Result<IngestContext, IngestError> {
    let hwy_data = config.highway_data_path.join("hwy_data");
    if !hwy_data.is_dir() {
        return Err(IngestError::MissingDataRoot(hwy_data));
    }

    let el = ErrorList::new();

    info!("loading taxonomy from {}", config.highway_data_path.display());
    let continent_lines =
        read_body_lines(&config.highway_data_path.join("continents.csv"), &el);
    let continents = ContinentTable::load(&continent_lines, &el);

    let country_lines = read_body_lines(&config.highway_data_path.join("countries.csv"), &el);
    let countries = CountryTable::load(&country_lines, &el);

    let region_lines = read_body_lines(&config.highway_data_path.join("regions.csv"), &el);
    let regions = RegionTable::load(&region_lines, &countries, &continents, &el);
    debug!(
        "taxonomy loaded: {} continents, {} countries, {} regions",
        continents.len(),
        countries.len(),
        regions.len()
    );

    info!("loading highway systems from {}", config.systems_file);
    let (systems, registry) = load_systems(&config, &countries, &regions, &el);
    info!("loaded {} highway systems", systems.len());

    info!("crawling {} for .wpt files", hwy_data.display());
    let all_wpt_files = crawl_wpt_files(&config.highway_data_path);
    info!("found {} .wpt files", all_wpt_files.len());

    let ctx = IngestContext::new(
        config,
        continents,
        countries,
        regions,
        registry,
        systems,
        all_wpt_files,
        quadtree_config,
        el,
    );

    let num_threads = ctx.config.num_threads.max(1);
    info!("starting waypoint phase with {} worker thread(s)", num_threads);
    run_waypoint_phase(&ctx, num_threads);
    info!(
        "waypoint phase complete: {} datacheck findings, {} config errors, {} orphaned .wpt files",
        ctx.datacheck.len(),
        ctx.error_list.len(),
        ctx.orphaned_wpt_files().len()
    );

    Ok(ctx)
}

/// Skip blank lines and `#`-prefixed comments, construct a `HighwaySystem`
/// per remaining line, and load its chopped routes. A line that fails to
/// parse even its six header fields is discarded outright; every other
/// problem is recorded and a best-effort system is still produced.
///
/// Connected routes load in a second pass, once every system's chopped
/// routes exist: a connected-route root can name a route owned by a
/// different system (a reported mismatch, but still linked), so the pass
/// needs every system's `route_list` available, not just the one being read.
fn load_systems(
    config: &IngestConfig,
    countries: &CountryTable,
    regions: &RegionTable,
    el: &ErrorList,
) -> (Vec<HighwaySystem>, RouteNameRegistry) {
    let mut registry = RouteNameRegistry::new();
    let mut systems = Vec::new();

    let systems_path = config.highway_data_path.join(&config.systems_file);
    let contents = match std::fs::read_to_string(&systems_path) {
        Ok(c) => c,
        Err(_) => {
            el.add_error(format!("Could not open {}", systems_path.display()));
            return (systems, registry);
        }
    };

    for line in contents.lines().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            debug!("ignored comment in {}: {}", config.systems_file, line);
            continue;
        }

        let system_id = SystemId(systems.len());
        let header =
            match HighwaySystem::parse(line, system_id, &config.systems_file, countries, el) {
                Some(h) => h,
                None => continue,
            };
        let system = HighwaySystem::load_chopped_routes(
            header,
            &config.highway_data_path,
            regions,
            &mut registry,
            el,
        );
        systems.push(system);
    }

    for index in 0..systems.len() {
        crate::model::load_connected_routes(
            &mut systems,
            SystemId(index),
            &config.highway_data_path,
            &registry,
            el,
        );
    }

    (systems, registry)
}

/// Work units are `HighwaySystem`s, claimed one at a time from a shared
/// queue under a single mutex; routes within a system are read sequentially
/// by whichever worker claimed it. `num_threads == 1` takes the same code
/// path with one scoped thread rather than a separate sequential
/// implementation.
fn run_waypoint_phase(ctx: &IngestContext, num_threads: usize) {
    let pending: Mutex<VecDeque<SystemId>> =
        Mutex::new((0..ctx.systems.len()).map(SystemId).collect());

    std::thread::scope(|scope| {
        for worker in 0..num_threads {
            let pending = &pending;
            scope.spawn(move || loop {
                let next = pending.lock().unwrap().pop_front();
                let system_id = match next {
                    Some(id) => id,
                    None => break,
                };
                debug!("worker {} claimed system {}", worker, system_id.0);
                read_system(ctx, system_id);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// A single valid continent/country/region/system/route/
    /// connected-route/waypoint-file tree: everything an ingest needs to
    /// resolve cleanly.
    fn build_clean_tree(root: &Path) {
        write(&root.join("continents.csv"), "code;name\nNA;North America\n");
        write(&root.join("countries.csv"), "code;name\nUSA;United States\n");
        write(
            &root.join("regions.csv"),
            "code;name;country;continent;regiontype\nCA;California;USA;NA;state\n",
        );
        write(
            &root.join("systems.csv"),
            "system;country;fullname;color;tier;level\nusaca;USA;California;red;1;active\n",
        );
        write(
            &root.join("hwy_data/_systems/usaca.csv"),
            "system;region;route;banner;abbrev;city;root;altroutenames\nusaca;CA;SR;;;Anywhere;ca.sr001;\n",
        );
        write(
            &root.join("hwy_data/_systems/usaca_con.csv"),
            "system;route;banner;groupname;roots\nusaca;SR;;Anywhere;ca.sr001\n",
        );
        write(
            &root.join("hwy_data/CA/usaca/ca.sr001.wpt"),
            "A http://osm.org/?lat=34&lon=-118\nB http://osm.org/?lat=34.2&lon=-118\n",
        );
    }

    #[test]
    fn clean_tree_ingests_with_no_errors() {
        let dir = tempfile::tempdir().unwrap();
        build_clean_tree(dir.path());

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();

        assert!(ctx.error_list.snapshot().is_empty(), "{:?}", ctx.error_list.snapshot());
        assert_eq!(ctx.systems.len(), 1);
        let system = ctx.systems[0].lock().unwrap();
        assert_eq!(system.route_list.len(), 1);
        assert_eq!(system.route_list[0].point_list.len(), 2);
        assert_eq!(system.route_list[0].segment_list.len(), 1);
        let length = system.route_list[0].segment_list[0].length;
        assert!((length - 14.1).abs() < 0.2, "got {}", length);

        let findings = ctx.datacheck.snapshot();
        assert!(
            findings.iter().all(|f| f.code != hwy_ingest_types::DatacheckCode::VisibleDistance),
            "active system should suppress VISIBLE_DISTANCE: {:?}",
            findings
        );
        assert!(ctx.orphaned_wpt_files().is_empty());
    }

    /// Identical tree but `level=devel` fires `VISIBLE_DISTANCE` since the
    /// suppression is active-only.
    #[test]
    fn devel_system_fires_visible_distance() {
        let dir = tempfile::tempdir().unwrap();
        build_clean_tree(dir.path());
        fs::write(
            dir.path().join("systems.csv"),
            "system;country;fullname;color;tier;level\nusaca;USA;California;red;1;devel\n",
        )
        .unwrap();

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();

        let findings = ctx.datacheck.snapshot();
        assert!(findings
            .iter()
            .any(|f| f.code == hwy_ingest_types::DatacheckCode::VisibleDistance));
    }

    /// A chopped-route line with 7 fields instead of 8 is reported and the
    /// route is not registered.
    #[test]
    fn wrong_field_count_is_reported_and_route_dropped() {
        let dir = tempfile::tempdir().unwrap();
        build_clean_tree(dir.path());
        fs::write(
            dir.path().join("hwy_data/_systems/usaca.csv"),
            "system;region;route;banner;abbrev;city;root;altroutenames\nusaca;CA;SR;;;Anywhere;ca.sr001\n",
        )
        .unwrap();

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();

        let errors = ctx.error_list.snapshot();
        assert!(errors.iter().any(|e| e.contains("expected 8 fields, found 7")));
        let system = ctx.systems[0].lock().unwrap();
        assert!(system.route_list.is_empty());
    }

    /// A connected-route root owned by a different system is still linked,
    /// but reported as a mismatch.
    #[test]
    fn system_mismatch_still_links_root() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("continents.csv"), "code;name\nNA;North America\n");
        write(&dir.path().join("countries.csv"), "code;name\nUSA;United States\n");
        write(
            &dir.path().join("regions.csv"),
            "code;name;country;continent;regiontype\nCA;California;USA;NA;state\n",
        );
        write(
            &dir.path().join("systems.csv"),
            "system;country;fullname;color;tier;level\nusaca;USA;California;red;1;active\nusacb;USA;Other;blue;1;active\n",
        );
        write(
            &dir.path().join("hwy_data/_systems/usaca.csv"),
            "system;region;route;banner;abbrev;city;root;altroutenames\nusaca;CA;SR;;;Anywhere;ca.sr001;\n",
        );
        write(
            &dir.path().join("hwy_data/_systems/usaca_con.csv"),
            "system;route;banner;groupname;roots\nusaca;SR;;Anywhere;ca.sr001\n",
        );
        write(
            &dir.path().join("hwy_data/_systems/usacb.csv"),
            "system;region;route;banner;abbrev;city;root;altroutenames\n",
        );
        write(
            &dir.path().join("hwy_data/_systems/usacb_con.csv"),
            "system;route;banner;groupname;roots\nusacb;SR;;Anywhere;ca.sr001\n",
        );
        write(
            &dir.path().join("hwy_data/CA/usaca/ca.sr001.wpt"),
            "A http://osm.org/?lat=34&lon=-118\nB http://osm.org/?lat=34.2&lon=-118\n",
        );

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();

        let errors = ctx.error_list.snapshot();
        assert!(errors.iter().any(|e| e.contains("System mismatch: chopped route")));

        // usaca's own _con.csv links ca.sr001 first; usacb's _con.csv names
        // the same root and is reported as both a system mismatch and a
        // duplicate link, but the original linkage (into usaca's connected
        // route) is kept rather than stolen.
        assert!(errors.iter().any(|e| e.contains("Duplicate root")));
        let usaca = ctx.systems[0].lock().unwrap();
        assert_eq!(
            usaca.route_list[0].con_route,
            Some(hwy_ingest_types::ConRouteId {
                system: hwy_ingest_types::SystemId(0),
                index: 0
            })
        );
    }

    #[test]
    fn missing_hwy_data_root_is_unrecoverable() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let err = run_ingest(config, QuadtreeConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingDataRoot(_)));
    }

    #[test]
    fn multiple_worker_threads_produce_same_result_as_one() {
        let dir = tempfile::tempdir().unwrap();
        build_clean_tree(dir.path());

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            num_threads: 4,
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();
        assert!(ctx.error_list.snapshot().is_empty());
        assert_eq!(ctx.systems[0].lock().unwrap().route_list[0].point_list.len(), 2);
    }

    /// Three waypoints sharing one coordinate must fire all three pairwise
    /// DUPLICATE_COORDS findings ((A,B), (A,C), (B,C)), not just the two
    /// rooted at the first point.
    #[test]
    fn three_way_colocation_fires_every_pairwise_duplicate_coords() {
        let dir = tempfile::tempdir().unwrap();
        build_clean_tree(dir.path());
        fs::write(
            dir.path().join("hwy_data/CA/usaca/ca.sr001.wpt"),
            "A http://osm.org/?lat=34&lon=-118\n\
             B http://osm.org/?lat=34&lon=-118\n\
             C http://osm.org/?lat=34&lon=-118\n",
        )
        .unwrap();

        let config = IngestConfig {
            highway_data_path: dir.path().to_path_buf(),
            ..IngestConfig::default()
        };
        let ctx = run_ingest(config, QuadtreeConfig::default()).unwrap();

        let dup_pairs: Vec<(String, String)> = ctx
            .datacheck
            .snapshot()
            .into_iter()
            .filter(|f| f.code == hwy_ingest_types::DatacheckCode::DuplicateCoords)
            .map(|f| (f.label1, f.label2))
            .collect();
        assert_eq!(dup_pairs.len(), 3, "{:?}", dup_pairs);
        assert!(dup_pairs.contains(&("A".to_string(), "B".to_string())));
        assert!(dup_pairs.contains(&("A".to_string(), "C".to_string())));
        assert!(dup_pairs.contains(&("B".to_string(), "C".to_string())));
    }
}
