use crate::model::route::RouteNameRegistry;
use crate::model::system::HighwaySystem;
use crate::primitives::{lower, split_on};
use crate::sinks::ErrorList;
use hwy_ingest_types::{ConRouteId, DBFieldLength, RouteId, SystemId};

pub struct ConnectedRoute {
    pub system: SystemId,
    pub route: String,
    pub banner: String,
    pub group_name: String,
    pub roots: Vec<RouteId>,
}

impl ConnectedRoute {
    /// Parse one `<sys>_con.csv` line, resolving each comma-separated root
    /// against `root_hash` and linking it back via `routes[root].con_route`.
    /// `systems` is every system built so far (this connected route's own
    /// system included), indexed by `RouteId::system`, since a root can name
    /// a route belonging to a *different* system (a reported mismatch, but
    /// the original still links the back-reference in that case too).
    /// `self_id` is this connected route's own eventual index (the caller
    /// knows it before the object is pushed into `con_route_list`), needed
    /// so the back-link can be written while roots are still resolved here.
    /// A field-count failure still produces an (empty) `ConnectedRoute`,
    /// matching the original keeping the object but recording the error.
    pub fn parse(
        line: &str,
        system: SystemId,
        system_name: &str,
        self_id: ConRouteId,
        registry: &RouteNameRegistry,
        systems: &mut [HighwaySystem],
        el: &ErrorList,
    ) -> ConnectedRoute {
        let (fields, observed) = split_on(line, 5, ';');
        if observed != 5 {
            el.add_error(format!(
                "Could not parse {}_con.csv line: [{}], expected 5 fields, found {}",
                system_name, line, observed
            ));
            return ConnectedRoute {
                system,
                route: String::new(),
                banner: String::new(),
                group_name: String::new(),
                roots: Vec::new(),
            };
        }
        let sys_str = &fields[0];
        let route = fields[1].clone();
        let banner = fields[2].clone();
        let group_name = fields[3].clone();
        let mut roots_str = fields[4].clone();

        if sys_str != system_name {
            el.add_error(format!(
                "System mismatch parsing {}_con.csv line [{}], expected {}",
                system_name, line, system_name
            ));
        }
        if route.len() > DBFieldLength::ROUTE {
            el.add_error(format!(
                "route > {} bytes in {}_con.csv line: {}",
                DBFieldLength::ROUTE,
                system_name,
                line
            ));
        }
        if banner.len() > DBFieldLength::BANNER {
            el.add_error(format!(
                "banner > {} bytes in {}_con.csv line: {}",
                DBFieldLength::BANNER,
                system_name,
                line
            ));
        }
        if group_name.len() > DBFieldLength::CITY {
            el.add_error(format!(
                "groupname > {} bytes in {}_con.csv line: {}",
                DBFieldLength::CITY,
                system_name,
                line
            ));
        }

        roots_str = lower(&roots_str);
        let mut roots = Vec::new();
        let mut root_order = 0usize;
        for root_name in roots_str.split(',') {
            match registry.root_hash.get(root_name) {
                Some(&root_id) => {
                    let existing_con_route = systems
                        .get(root_id.system.0)
                        .and_then(|s| s.route_list.get(root_id.index))
                        .and_then(|r| r.con_route);
                    if let Some(prior) = existing_con_route {
                        let prior_system_name = systems
                            .get(prior.system.0)
                            .map(|s| s.system_name.clone())
                            .unwrap_or_else(|| system_name.to_string());
                        el.add_error(format!(
                            "Duplicate root in {}_con.csv: {} already in {}_con.csv",
                            system_name, root_name, prior_system_name
                        ));
                    }
                    let target = systems
                        .get_mut(root_id.system.0)
                        .and_then(|s| s.route_list.get_mut(root_id.index));
                    if let Some(r) = target {
                        if existing_con_route.is_none() {
                            r.root_order = Some(root_order);
                            r.con_route = Some(self_id);
                        }
                    }
                    if root_id.system != system {
                        el.add_error(format!(
                            "System mismatch: chopped route {} in connected route in {}_con.csv",
                            root_name, system_name
                        ));
                    }
                    roots.push(root_id);
                    root_order += 1;
                }
                None => {
                    el.add_error(format!(
                        "Could not find Route matching ConnectedRoute root {} in system {}.",
                        root_name, system_name
                    ));
                }
            }
        }
        if roots.is_empty() {
            el.add_error(format!(
                "No valid roots in {}_con.csv line: {}",
                system_name, line
            ));
        }

        ConnectedRoute {
            system,
            route,
            banner,
            group_name,
            roots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::region::RegionTable;
    use crate::model::route::Route;
    use crate::model::taxonomy::{ContinentTable, CountryTable};
    use hwy_ingest_types::SystemLevel;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn built_system(registry: &mut RouteNameRegistry, system_name: &str) -> HighwaySystem {
        let el = ErrorList::new();
        let countries = CountryTable::load(&["USA;United States".to_string()], &el);
        let continents = ContinentTable::load(&["NA;North America".to_string()], &el);
        let regions = RegionTable::load(
            &["CA;California;USA;NA;state".to_string()],
            &countries,
            &continents,
            &el,
        );
        let route = Route::parse(
            &format!("{};CA;SR;;;Anywhere;ca.sr001;", system_name),
            SystemId(0),
            system_name,
            0,
            &regions,
            registry,
            &el,
        )
        .unwrap();
        HighwaySystem {
            system_name: system_name.to_string(),
            country_code: "USA".to_string(),
            full_name: "California".to_string(),
            color: "red".to_string(),
            tier: 1,
            level: SystemLevel::Active,
            route_list: vec![route],
            con_route_list: Vec::new(),
            listnamesinuse: Mutex::new(HashSet::new()),
            unusedaltroutenames: Mutex::new(HashSet::new()),
        }
    }

    #[test]
    fn resolves_root_and_sets_order() {
        let el = ErrorList::new();
        let mut registry = RouteNameRegistry::new();
        let mut systems = vec![built_system(&mut registry, "usaca")];
        let con = ConnectedRoute::parse(
            "usaca;SR;;Anywhere;ca.sr001",
            SystemId(0),
            "usaca",
            ConRouteId { system: SystemId(0), index: 0 },
            &registry,
            &mut systems,
            &el,
        );
        assert_eq!(con.roots.len(), 1);
        assert_eq!(systems[0].route_list[0].root_order, Some(0));
        assert_eq!(
            systems[0].route_list[0].con_route,
            Some(ConRouteId { system: SystemId(0), index: 0 })
        );
        assert!(el.is_empty());
    }

    #[test]
    fn duplicate_root_across_connected_routes_is_reported_and_first_link_kept() {
        let el = ErrorList::new();
        let mut registry = RouteNameRegistry::new();
        let mut systems = vec![built_system(&mut registry, "usaca")];
        let _first = ConnectedRoute::parse(
            "usaca;SR;;Anywhere;ca.sr001",
            SystemId(0),
            "usaca",
            ConRouteId { system: SystemId(0), index: 0 },
            &registry,
            &mut systems,
            &el,
        );
        let _second = ConnectedRoute::parse(
            "usaca;SR;;Anywhere Else;ca.sr001",
            SystemId(0),
            "usaca",
            ConRouteId { system: SystemId(0), index: 1 },
            &registry,
            &mut systems,
            &el,
        );
        assert!(el.snapshot().iter().any(|e| e.contains("Duplicate root")));
        assert!(el.snapshot().iter().any(|e| e.contains("already in usaca_con.csv")));
        assert_eq!(
            systems[0].route_list[0].con_route,
            Some(ConRouteId { system: SystemId(0), index: 0 })
        );
        // root_order must stay pinned to the first claimant alongside
        // con_route, not get overwritten by the second (rejected) claim.
        assert_eq!(systems[0].route_list[0].root_order, Some(0));
    }

    #[test]
    fn unresolvable_root_is_reported() {
        let el = ErrorList::new();
        let registry = RouteNameRegistry::new();
        let mut systems: Vec<HighwaySystem> = Vec::new();
        let con = ConnectedRoute::parse(
            "usaca;SR;;Anywhere;ca.sr999",
            SystemId(0),
            "usaca",
            ConRouteId { system: SystemId(0), index: 0 },
            &registry,
            &mut systems,
            &el,
        );
        assert!(con.roots.is_empty());
        assert_eq!(el.len(), 2); // unresolved root + "no valid roots"
    }
}
