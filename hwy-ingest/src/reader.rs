//! Per-route and per-system waypoint ingest: the parallel-safe half of the
//! pipeline. Each route is read, parsed, inserted into the quadtree, and
//! run through the datacheck rule driver independently of every other
//! route — the only shared state touched is `IngestContext`'s mutexed
//! sinks and the quadtree's own per-node locking.

use crate::context::IngestContext;
use crate::datacheck::{
    alt_label_invalid_char, bus_with_i, interstate_no_hyphen, label_invalid_char,
    label_invalid_ends, label_looks_hidden, label_parens, label_selfref, label_slashes,
    lacks_generic, us_letter, underscore_datachecks,
};
use crate::model::segment::HighwaySegment;
use crate::model::waypoint::Waypoint;
use hwy_ingest_types::{DatacheckCode, RouteId, SystemId, WaypointRef};
use std::path::PathBuf;

const LONG_SEGMENT_MILES: f64 = 20.0;
const VISIBLE_DISTANCE_MILES: f64 = 10.0;
const SHARP_ANGLE_DEGREES: f64 = 135.0;

/// Read every route belonging to `system_id`, in file order. Routes within
/// a system are processed sequentially; no cross-route synchronization is
/// needed since each route only touches data it owns.
pub fn read_system(ctx: &IngestContext, system_id: SystemId) {
    let mut system = ctx.systems[system_id.0].lock().unwrap();
    let usa_flag = system.country_code == "USA";
    let system_name = system.system_name.clone();
    let is_active = system.active();

    for route_index in 0..system.route_list.len() {
        let (region_code, root) = {
            let route = &system.route_list[route_index];
            (route.region_code.clone(), route.root.clone())
        };
        let path = ctx
            .config
            .highway_data_path
            .join("hwy_data")
            .join(&region_code)
            .join(&system_name)
            .join(format!("{}.wpt", root));
        ctx.mark_wpt_file_read(&path);

        let route_id = RouteId { system: system_id, index: route_index };
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => {
                ctx.error_list
                    .add_error(format!("[Errno 2] No such file or directory: '{}'", path.display()));
                continue;
            }
        };

        read_route_body(ctx, &contents, &mut system.route_list[route_index], route_id, usa_flag, is_active);
    }
}

fn read_route_body(
    ctx: &IngestContext,
    contents: &str,
    route: &mut crate::model::route::Route,
    route_id: RouteId,
    usa_flag: bool,
    system_is_active: bool,
) {
    let mut vis_dist = 0.0f64;
    let mut last_visible_label: Option<String> = None;

    for raw_line in contents.split(['\n', '\r']) {
        let line = raw_line.trim_matches(|c: char| c == ' ' || c == '\t');
        if line.is_empty() {
            continue;
        }

        let parsed = Waypoint::parse(line);
        let mut waypoint = parsed.waypoint;
        for (code, info) in &parsed.findings {
            ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", *code, info.clone());
        }

        let label_too_long = if let Some((truncated, excess)) = waypoint.truncate_if_too_long() {
            ctx.datacheck.add(route_id, format!("{}...", truncated), "", "", DatacheckCode::LabelTooLong, excess);
            true
        } else {
            false
        };

        if parsed.is_malformed() || label_too_long {
            continue;
        }

        let point_index = route.point_list.len();
        let wp_ref = WaypointRef { route: route_id, point: point_index };
        waypoint.colocated_group = Some(ctx.quadtree.insert(wp_ref, waypoint.lat, waypoint.lng));

        out_of_bounds(ctx, route_id, &waypoint);
        duplicate_coords(ctx, route_id, route, &waypoint);
        if let Some(info) = label_invalid_char(&waypoint.label) {
            ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelInvalidChar, info);
        }
        for alt in &waypoint.alt_labels {
            if alt_label_invalid_char(alt) {
                ctx.datacheck.add(route_id, alt.clone(), "", "", DatacheckCode::LabelInvalidChar, "");
            }
        }

        if !route.point_list.is_empty() {
            let prev = route.point_list.last().unwrap();
            let distance = waypoint.distance_to(prev);
            vis_dist += distance;
            if distance > LONG_SEGMENT_MILES {
                ctx.datacheck.add(
                    route_id,
                    prev.label.clone(),
                    waypoint.label.clone(),
                    "",
                    DatacheckCode::LongSegment,
                    format!("{:.2}", distance),
                );
            }
            route.segment_list.push(HighwaySegment::new(point_index - 1, point_index, route_id, distance));
        }

        if !waypoint.is_hidden {
            let slash_count = waypoint.label.matches('/').count();
            if usa_flag && waypoint.label.len() >= 2 {
                if bus_with_i(&waypoint.label) {
                    ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::BusWithI, "");
                }
                if interstate_no_hyphen(&waypoint.label) {
                    ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::InterstateNoHyphen, "");
                }
                if us_letter(&waypoint.label) {
                    ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::UsLetter, "");
                }
            }
            let (first, last) = label_invalid_ends(&waypoint.label);
            if let Some(c) = first {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::InvalidFirstChar, c.to_string());
            }
            if let Some(c) = last {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::InvalidFinalChar, c.to_string());
            }
            if label_looks_hidden(&waypoint.label) {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelLooksHidden, "");
            }
            if label_parens(&waypoint.label) {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelParens, "");
            }
            if label_selfref(&waypoint.label, &route.route, &route.banner) {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelSelfref, "");
            }
            if label_slashes(&waypoint.label) {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelSlashes, "");
            }
            if lacks_generic(&waypoint.label) {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LacksGeneric, "");
            }
            let (too_many_underscores, long_underscore, nonterminal_underscore) =
                underscore_datachecks(&waypoint.label);
            if too_many_underscores {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LabelUnderscores, "");
            }
            if long_underscore {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::LongUnderscore, "");
            }
            if nonterminal_underscore {
                ctx.datacheck.add(route_id, waypoint.label.clone(), "", "", DatacheckCode::NonterminalUnderscore, "");
            }
            let _ = slash_count;

            if vis_dist > VISIBLE_DISTANCE_MILES && !system_is_active {
                if let Some(last_label) = &last_visible_label {
                    ctx.datacheck.add(
                        route_id,
                        last_label.clone(),
                        waypoint.label.clone(),
                        "",
                        DatacheckCode::VisibleDistance,
                        format!("{:.2}", vis_dist),
                    );
                }
            }
            last_visible_label = Some(waypoint.label.clone());
            vis_dist = 0.0;
        }

        route.point_list.push(waypoint);
    }

    if route.point_list.len() < 2 {
        ctx.error_list.add_error(format!("Route contains fewer than 2 points: {}", route.str()));
        return;
    }

    if route.point_list.first().unwrap().is_hidden {
        let label = route.point_list.first().unwrap().label.clone();
        ctx.datacheck.add(route_id, label, "", "", DatacheckCode::HiddenTerminus, "");
    }
    if route.point_list.last().unwrap().is_hidden {
        let label = route.point_list.last().unwrap().label.clone();
        ctx.datacheck.add(route_id, label, "", "", DatacheckCode::HiddenTerminus, "");
    }

    for i in 1..route.point_list.len() - 1 {
        let (pred, here, succ) = (&route.point_list[i - 1], &route.point_list[i], &route.point_list[i + 1]);
        if pred.same_coords(here) || succ.same_coords(here) {
            ctx.datacheck.add(
                route_id,
                pred.label.clone(),
                here.label.clone(),
                succ.label.clone(),
                DatacheckCode::BadAngle,
                "",
            );
        } else {
            let angle = here.angle(pred, succ);
            if angle > SHARP_ANGLE_DEGREES {
                ctx.datacheck.add(
                    route_id,
                    pred.label.clone(),
                    here.label.clone(),
                    succ.label.clone(),
                    DatacheckCode::SharpAngle,
                    format!("{:.2}", angle),
                );
            }
        }
    }
}

fn out_of_bounds(ctx: &IngestContext, route_id: RouteId, wp: &Waypoint) {
    if !(-90.0..=90.0).contains(&wp.lat) || !(-180.0..=180.0).contains(&wp.lng) {
        ctx.datacheck.add(
            route_id,
            wp.label.clone(),
            "",
            "",
            DatacheckCode::OutOfBounds,
            format!("({},{})", wp.lat, wp.lng),
        );
    }
}

/// Walk the already-accepted points, reporting one finding against every
/// earlier exact match, not just the first — three or more waypoints
/// sharing a coordinate must produce every pairwise finding, matching the
/// original's unconditional loop over all earlier points.
fn duplicate_coords(ctx: &IngestContext, route_id: RouteId, route: &crate::model::route::Route, wp: &Waypoint) {
    for earlier in &route.point_list {
        if earlier.lat == wp.lat && earlier.lng == wp.lng {
            ctx.datacheck.add(
                route_id,
                earlier.label.clone(),
                wp.label.clone(),
                "",
                DatacheckCode::DuplicateCoords,
                format!("({},{})", wp.lat, wp.lng),
            );
        }
    }
}

/// Directory-crawl product: every `.wpt` path under `hwy_data/`, used both
/// to seed `all_wpt_files` and (out of scope here) to cross-check it.
pub fn crawl_wpt_files(highway_data_path: &std::path::Path) -> std::collections::HashSet<PathBuf> {
    let hwy_data = highway_data_path.join("hwy_data");
    let mut out = std::collections::HashSet::new();
    for entry in walkdir::WalkDir::new(&hwy_data).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == "wpt") {
            out.insert(entry.path().to_path_buf());
        }
    }
    out
}
