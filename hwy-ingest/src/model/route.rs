use crate::model::region::RegionTable;
use crate::model::segment::HighwaySegment;
use crate::model::waypoint::Waypoint;
use crate::primitives::{lower, split_on, upper};
use crate::sinks::ErrorList;
use hwy_ingest_types::{ConRouteId, DBFieldLength, RegionId, RouteId, SystemId};
use std::collections::HashMap;

/// The three process-global name registries, populated sequentially while
/// routes are constructed and read-only once the worker pool starts.
#[derive(Default)]
pub struct RouteNameRegistry {
    pub root_hash: HashMap<String, RouteId>,
    pub pri_list_hash: HashMap<String, RouteId>,
    pub alt_list_hash: HashMap<String, RouteId>,
    /// System name of each root's owner, kept alongside `root_hash` purely
    /// so duplicate-root errors can name the earlier file the way the
    /// original message does.
    root_owner_system_name: HashMap<String, String>,
}

impl RouteNameRegistry {
    pub fn new() -> RouteNameRegistry {
        RouteNameRegistry::default()
    }
}

pub struct Route {
    pub system: SystemId,
    pub region: RegionId,
    pub region_code: String,
    pub route: String,
    pub banner: String,
    pub abbrev: String,
    pub city: String,
    pub root: String,
    pub alt_route_names: Vec<String>,
    pub con_route: Option<ConRouteId>,
    pub root_order: Option<usize>,
    pub point_list: Vec<Waypoint>,
    pub segment_list: Vec<HighwaySegment>,
}

impl Route {
    /// Parse one `<sys>.csv` line. Returns `None` only on the field-count
    /// failure (the original clears `root` and bails, so `HighwaySystem`
    /// discards the object outright); every other problem is recorded and
    /// the route is still built and registered.
    pub fn parse(
        line: &str,
        system: SystemId,
        system_name: &str,
        self_index: usize,
        regions: &RegionTable,
        registry: &mut RouteNameRegistry,
        el: &ErrorList,
    ) -> Option<Route> {
        let (fields, observed) = split_on(line, 8, ';');
        if observed != 8 {
            el.add_error(format!(
                "Could not parse {}.csv line: [{}], expected 8 fields, found {}",
                system_name, line, observed
            ));
            return None;
        }
        let sys_str = &fields[0];
        let region_code = fields[1].clone();
        let route = fields[2].clone();
        let banner = fields[3].clone();
        let abbrev = fields[4].clone();
        let city = fields[5].clone();
        let mut root = fields[6].clone();
        let mut arn_str = fields[7].clone();

        if sys_str != system_name {
            el.add_error(format!(
                "System mismatch parsing {}.csv line [{}], expected {}",
                system_name, line, system_name
            ));
        }

        let region = regions.find(&region_code, el, &format!("{}.csv line: {}", system_name, line));

        if route.len() > DBFieldLength::ROUTE {
            el.add_error(format!(
                "Route > {} bytes in {}.csv line: {}",
                DBFieldLength::ROUTE,
                system_name,
                line
            ));
        }
        if banner.len() > DBFieldLength::BANNER {
            el.add_error(format!(
                "Banner > {} bytes in {}.csv line: {}",
                DBFieldLength::BANNER,
                system_name,
                line
            ));
        }
        if abbrev.len() > DBFieldLength::ABBREV {
            el.add_error(format!(
                "Abbrev > {} bytes in {}.csv line: {}",
                DBFieldLength::ABBREV,
                system_name,
                line
            ));
        }
        if city.len() > DBFieldLength::CITY {
            el.add_error(format!(
                "City > {} bytes in {}.csv line: {}",
                DBFieldLength::CITY,
                system_name,
                line
            ));
        }
        if root.len() > DBFieldLength::ROOT {
            el.add_error(format!(
                "Root > {} bytes in {}.csv line: {}",
                DBFieldLength::ROOT,
                system_name,
                line
            ));
        }
        root = lower(&root);

        arn_str = upper(&arn_str);
        let alt_route_names: Vec<String> = if arn_str.is_empty() {
            Vec::new()
        } else {
            arn_str.split(',').map(|s| s.to_string()).collect()
        };

        let id = RouteId { system, index: self_index };

        if let Some(prior_system) = registry.root_owner_system_name.get(&root) {
            el.add_error(format!(
                "Duplicate root in {}.csv: {} already in {}.csv",
                system_name, root, prior_system
            ));
        } else {
            registry.root_hash.insert(root.clone(), id);
            registry
                .root_owner_system_name
                .insert(root.clone(), system_name.to_string());
        }

        let readable = readable_name(&region_code, &route, &banner, &abbrev);
        let list_name = upper(&readable);
        if registry.alt_list_hash.contains_key(&list_name) {
            el.add_error(format!(
                "Duplicate main list name in {}: '{}' already points to an alt name",
                root, readable
            ));
        } else if registry.pri_list_hash.contains_key(&list_name) {
            el.add_error(format!(
                "Duplicate main list name in {}: '{}' already points to a primary name",
                root, readable
            ));
        } else {
            registry.pri_list_hash.insert(list_name, id);
        }

        for alt in &alt_route_names {
            let alt_list_name = upper(&format!("{} {}", region_code, alt));
            if registry.pri_list_hash.contains_key(&alt_list_name) {
                el.add_error(format!(
                    "Duplicate alt route name in {}: '{}' already points to a primary name",
                    root, alt_list_name
                ));
            } else if registry.alt_list_hash.contains_key(&alt_list_name) {
                el.add_error(format!(
                    "Duplicate alt route name in {}: '{}' already points to an alt name",
                    root, alt_list_name
                ));
            } else {
                registry.alt_list_hash.insert(alt_list_name, id);
            }
        }

        Some(Route {
            system,
            region,
            region_code,
            route,
            banner,
            abbrev,
            city,
            root,
            alt_route_names,
            con_route: None,
            root_order: None,
            point_list: Vec::new(),
            segment_list: Vec::new(),
        })
    }

    pub fn readable_name(&self) -> String {
        readable_name(&self.region_code, &self.route, &self.banner, &self.abbrev)
    }

    pub fn list_entry_name(&self) -> String {
        format!("{}{}{}", self.route, self.banner, self.abbrev)
    }

    pub fn name_no_abbrev(&self) -> String {
        format!("{}{}", self.route, self.banner)
    }

    pub fn str(&self) -> String {
        format!("{} ({} total points)", self.root, self.point_list.len())
    }
}

fn readable_name(region_code: &str, route: &str, banner: &str, abbrev: &str) -> String {
    format!("{} {}{}{}", region_code, route, banner, abbrev)
}
