use crate::model::connected_route::ConnectedRoute;
use crate::model::region::RegionTable;
use crate::model::route::{Route, RouteNameRegistry};
use crate::model::taxonomy::CountryTable;
use crate::primitives::split_on;
use crate::sinks::ErrorList;
use hwy_ingest_types::{DBFieldLength, SystemId, SystemLevel};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

pub struct HighwaySystem {
    pub system_name: String,
    pub country_code: String,
    pub full_name: String,
    pub color: String,
    pub tier: i64,
    pub level: SystemLevel,
    pub route_list: Vec<Route>,
    pub con_route_list: Vec<ConnectedRoute>,
    /// Populated by the (out-of-scope) traveler-list pass; carried here
    /// because the type owns the mutex the original attaches to the system.
    pub listnamesinuse: Mutex<HashSet<String>>,
    pub unusedaltroutenames: Mutex<HashSet<String>>,
}

impl HighwaySystem {
    pub fn active(&self) -> bool {
        self.level.is_active()
    }

    /// Parse one `systems.csv` line. Returns `None` on the field-count
    /// failure only; other problems are recorded and a best-effort system
    /// (with fallback tier/level) is still produced so its routes can load.
    pub fn parse(
        line: &str,
        system_id: SystemId,
        systems_file: &str,
        countries: &CountryTable,
        el: &ErrorList,
    ) -> Option<HighwaySystemHeader> {
        let (fields, observed) = split_on(line, 6, ';');
        if observed != 6 {
            el.add_error(format!(
                "Could not parse {} line: [{}], expected 6 fields, found {}",
                systems_file, line, observed
            ));
            return None;
        }
        let system_name = fields[0].clone();
        let country_str = &fields[1];
        let full_name = fields[2].clone();
        let color = fields[3].clone();
        let tier_str = &fields[4];
        let level_str = &fields[5];

        if system_name.len() > DBFieldLength::SYSTEM_NAME {
            el.add_error(format!(
                "System code > {} bytes in {} line {}",
                DBFieldLength::SYSTEM_NAME,
                systems_file,
                line
            ));
        }
        let country_code = countries
            .find(country_str, el, &format!("{} line: {}", systems_file, line))
            .code
            .clone();
        if full_name.len() > DBFieldLength::SYSTEM_FULL_NAME {
            el.add_error(format!(
                "System name > {} bytes in {} line {}",
                DBFieldLength::SYSTEM_FULL_NAME,
                systems_file,
                line
            ));
        }
        if color.len() > DBFieldLength::COLOR {
            el.add_error(format!(
                "Color > {} bytes in {} line {}",
                DBFieldLength::COLOR,
                systems_file,
                line
            ));
        }
        let tier: i64 = tier_str.parse().unwrap_or(-1);
        if tier < 1 {
            el.add_error(format!("Invalid tier in {} line {}", systems_file, line));
        }
        let level = match SystemLevel::parse(level_str) {
            Some(l) => l,
            None => {
                el.add_error(format!(
                    "Unrecognized level in {} line: {}",
                    systems_file, line
                ));
                SystemLevel::Devel
            }
        };

        Some(HighwaySystemHeader {
            system_id,
            system_name,
            country_code,
            full_name,
            color,
            tier,
            level,
        })
    }

    /// Load `<dataRoot>/hwy_data/_systems/<name>.csv` (chopped routes only)
    /// for a system whose header has already been parsed. Connected routes
    /// are loaded separately, once every system's chopped routes exist, so
    /// a connected-route root can reference a route in any system.
    pub fn load_chopped_routes(
        header: HighwaySystemHeader,
        highway_data_path: &Path,
        regions: &RegionTable,
        registry: &mut RouteNameRegistry,
        el: &ErrorList,
    ) -> HighwaySystem {
        let systems_dir = highway_data_path.join("hwy_data").join("_systems");
        let route_list = load_route_lines(&systems_dir, &header.system_name, header.system_id, regions, registry, el);

        let mut unused_alt_names = HashSet::new();
        for route in &route_list {
            for alt in &route.alt_route_names {
                unused_alt_names.insert(crate::primitives::upper(&format!("{} {}", route.region_code, alt)));
            }
        }

        HighwaySystem {
            system_name: header.system_name,
            country_code: header.country_code,
            full_name: header.full_name,
            color: header.color,
            tier: header.tier,
            level: header.level,
            route_list,
            con_route_list: Vec::new(),
            listnamesinuse: Mutex::new(HashSet::new()),
            unusedaltroutenames: Mutex::new(unused_alt_names),
        }
    }
}

/// Load `<name>_con.csv` for `systems[system_id]` and populate its
/// `con_route_list`. Takes every system (not just the one being loaded)
/// because a connected route's root may resolve into a different system's
/// `route_list` (a reported mismatch, but the original still links the
/// back-reference across systems).
pub fn load_connected_routes(
    systems: &mut [HighwaySystem],
    system_id: SystemId,
    highway_data_path: &Path,
    registry: &RouteNameRegistry,
    el: &ErrorList,
) {
    let systems_dir = highway_data_path.join("hwy_data").join("_systems");
    let system_name = systems[system_id.0].system_name.clone();
    let con_path = systems_dir.join(format!("{}_con.csv", system_name));

    let contents = match std::fs::read_to_string(&con_path) {
        Ok(c) => c,
        Err(_) => {
            el.add_error(format!("Could not open {}", con_path.display()));
            return;
        }
    };

    let mut con_route_list = Vec::new();
    for line in contents.lines().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let self_id = hwy_ingest_types::ConRouteId { system: system_id, index: con_route_list.len() };
        let con = ConnectedRoute::parse(line, system_id, &system_name, self_id, registry, systems, el);
        con_route_list.push(con);
    }
    systems[system_id.0].con_route_list = con_route_list;
}

pub struct HighwaySystemHeader {
    pub system_id: SystemId,
    pub system_name: String,
    pub country_code: String,
    pub full_name: String,
    pub color: String,
    pub tier: i64,
    pub level: SystemLevel,
}

fn load_route_lines(
    systems_dir: &Path,
    system_name: &str,
    system_id: SystemId,
    regions: &RegionTable,
    registry: &mut RouteNameRegistry,
    el: &ErrorList,
) -> Vec<Route> {
    let path = systems_dir.join(format!("{}.csv", system_name));
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => {
            el.add_error(format!("Could not open {}", path.display()));
            return Vec::new();
        }
    };
    let mut routes = Vec::new();
    for line in contents.lines().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match Route::parse(line, system_id, system_name, routes.len(), regions, registry, el) {
            Some(route) => routes.push(route),
            None => el.add_error(format!(
                "Unable to find root in {}.csv line: [{}]",
                system_name, line
            )),
        }
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> CountryTable {
        let el = ErrorList::new();
        CountryTable::load(&["USA;United States".to_string()], &el)
    }

    #[test]
    fn well_formed_header_parses() {
        let el = ErrorList::new();
        let header = HighwaySystem::parse(
            "usaca;USA;California;red;1;active",
            SystemId(0),
            "systems.csv",
            &countries(),
            &el,
        )
        .unwrap();
        assert_eq!(header.system_name, "usaca");
        assert!(header.level.is_active());
        assert!(el.is_empty());
    }

    #[test]
    fn invalid_tier_is_reported() {
        let el = ErrorList::new();
        let header = HighwaySystem::parse(
            "usaca;USA;California;red;0;active",
            SystemId(0),
            "systems.csv",
            &countries(),
            &el,
        )
        .unwrap();
        assert_eq!(header.tier, 0);
        assert_eq!(el.len(), 1);
    }

    #[test]
    fn unrecognized_level_falls_back_to_devel() {
        let el = ErrorList::new();
        let header = HighwaySystem::parse(
            "usaca;USA;California;red;1;experimental",
            SystemId(0),
            "systems.csv",
            &countries(),
            &el,
        )
        .unwrap();
        assert!(!header.level.is_active());
        assert_eq!(el.len(), 1);
    }
}
