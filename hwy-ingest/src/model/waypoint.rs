use crate::geo::{haversine_miles, turn_angle_degrees};
use crate::primitives::{truncate_utf8_safe, valid_num_str};
use hwy_ingest_types::{ColocatedGroupId, DBFieldLength, DatacheckCode};

/// Outcome of parsing one `.wpt` line, before the caller decides whether to
/// keep the resulting `Waypoint`.
pub struct ParsedWaypoint {
    pub waypoint: Waypoint,
    /// Set when the URL was missing `lat=`/`lon=` entirely; the caller
    /// discards such waypoints outright.
    pub url_malformed: bool,
    /// Datacheck findings raised purely by construction (MALFORMED_URL,
    /// MALFORMED_LAT, MALFORMED_LON). Label/route context is filled in by
    /// the caller since this function doesn't have a `Datacheck` sink.
    pub findings: Vec<(DatacheckCode, String)>,
}

impl ParsedWaypoint {
    /// True if any of MALFORMED_URL/MALFORMED_LAT/MALFORMED_LON fired,
    /// meaning the coordinates are the `(0,0)` default rather than real
    /// data. The reader discards such waypoints rather than risk treating
    /// a genuine `(0,0)` coordinate as malformed.
    pub fn is_malformed(&self) -> bool {
        !self.findings.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Waypoint {
    pub label: String,
    pub alt_labels: Vec<String>,
    pub lat: f64,
    pub lng: f64,
    pub is_hidden: bool,
    pub colocated_group: Option<ColocatedGroupId>,
}

impl Waypoint {
    /// Parse a single whitespace-separated `.wpt` line. All tokens are
    /// labels except the last, an OSM-style URL from which `lat=`/`lon=`
    /// query parameters are extracted.
    pub fn parse(line: &str) -> ParsedWaypoint {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let url = tokens.pop().unwrap_or("");
        let (label, alt_labels) = if tokens.is_empty() {
            ("NULL".to_string(), Vec::new())
        } else {
            let label = tokens[0].to_string();
            let alt_labels = tokens[1..].iter().map(|s| s.to_string()).collect();
            (label, alt_labels)
        };
        let is_hidden = label.starts_with('+');

        let mut findings = Vec::new();
        let lat_pos = url.find("lat=").map(|p| p + 4);
        let lon_pos = url.find("lon=").map(|p| p + 4);

        let (lat, lng, url_malformed) = match (lat_pos, lon_pos) {
            (Some(lat_beg), Some(lon_beg)) => {
                let lat_slice = &url[lat_beg..];
                let lon_slice = &url[lon_beg..];
                let mut valid = true;

                if !valid_num_str(lat_slice, '&') {
                    findings.push((
                        DatacheckCode::MalformedLat,
                        bounded_info(lat_slice),
                    ));
                    valid = false;
                }
                if !valid_num_str(lon_slice, '&') {
                    findings.push((
                        DatacheckCode::MalformedLon,
                        bounded_info(lon_slice),
                    ));
                    valid = false;
                }

                if valid {
                    let lat: f64 = parse_prefix_number(lat_slice).unwrap_or(0.0);
                    let lng: f64 = parse_prefix_number(lon_slice).unwrap_or(0.0);
                    (lat, lng, false)
                } else {
                    (0.0, 0.0, false)
                }
            }
            _ => {
                findings.push((DatacheckCode::MalformedUrl, "MISSING_ARG(S)".to_string()));
                (0.0, 0.0, true)
            }
        };

        ParsedWaypoint {
            waypoint: Waypoint {
                label,
                alt_labels,
                lat,
                lng,
                is_hidden,
                colocated_group: None,
            },
            url_malformed,
            findings,
        }
    }

    /// Truncate an overlong label to `DBFieldLength::LABEL - 3` bytes and
    /// return the `(truncated_label, excess_info)` finding payload if it
    /// was too long. Mutates `self.label` in place, matching the original's
    /// in-place truncation.
    pub fn truncate_if_too_long(&mut self) -> Option<(String, String)> {
        if self.label.len() <= DBFieldLength::LABEL {
            return None;
        }
        let cut = DBFieldLength::LABEL - 3;
        let excess_start = {
            let mut start = cut;
            while start > 0 && !self.label.is_char_boundary(start) {
                start -= 1;
            }
            start
        };
        let mut excess = self.label[excess_start..].to_string();
        excess = truncate_utf8_safe(&excess, DBFieldLength::DC_ERR_VALUE - 3).to_string();
        if self.label[excess_start..].len() > DBFieldLength::DC_ERR_VALUE - 3 {
            excess.push_str("...");
        }

        let mut truncated = truncate_utf8_safe(&self.label, cut).to_string();
        self.label = truncated.clone();
        truncated.push_str("...");
        Some((truncated, format!("...{}", excess)))
    }

    pub fn same_coords(&self, other: &Waypoint) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }

    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        haversine_miles(self.lat, self.lng, other.lat, other.lng)
    }

    pub fn angle(&self, pred: &Waypoint, succ: &Waypoint) -> f64 {
        turn_angle_degrees((pred.lat, pred.lng), (self.lat, self.lng), (succ.lat, succ.lng))
    }
}

/// Parse the decimal prefix of `s` up to `&` or end, the same substring
/// `valid_num_str` already validated.
fn parse_prefix_number(s: &str) -> Option<f64> {
    let prefix = match s.find('&') {
        Some(pos) => &s[..pos],
        None => s,
    };
    prefix.parse::<f64>().ok()
}

/// Bound a malformed coordinate substring to `DBFieldLength::DC_ERR_VALUE`
/// bytes with a UTF-8-safe ellipsis, for embedding in MALFORMED_LAT/
/// MALFORMED_LON finding text.
fn bounded_info(s: &str) -> String {
    let up_to_amp = match s.find('&') {
        Some(pos) => &s[..pos],
        None => s,
    };
    if up_to_amp.len() <= DBFieldLength::DC_ERR_VALUE {
        up_to_amp.to_string()
    } else {
        let mut truncated =
            truncate_utf8_safe(up_to_amp, DBFieldLength::DC_ERR_VALUE - 3).to_string();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn url_only_line_gets_null_label() {
        let parsed = Waypoint::parse("http://osm.org/?lat=34&lon=-118");
        assert_eq!(parsed.waypoint.label, "NULL");
        assert_eq!(parsed.waypoint.lat, 34.0);
    }

    #[test]
    fn hidden_label_starts_with_plus() {
        let parsed = Waypoint::parse("+X1 http://osm.org/?lat=34&lon=-118");
        assert!(parsed.waypoint.is_hidden);
    }

    #[test]
    fn alt_labels_collected_between_primary_and_url() {
        let parsed = Waypoint::parse("A +B +C http://osm.org/?lat=1&lon=2");
        assert_eq!(parsed.waypoint.label, "A");
        assert_eq!(parsed.waypoint.alt_labels, vec!["+B", "+C"]);
    }

    #[test]
    fn missing_lat_param_is_malformed_url() {
        let parsed = Waypoint::parse("A http://osm.org/?lon=-118");
        assert!(parsed.url_malformed);
        assert_eq!(parsed.waypoint.lat, 0.0);
        assert_eq!(parsed.waypoint.lng, 0.0);
        assert_eq!(parsed.findings[0].0, DatacheckCode::MalformedUrl);
    }

    #[test]
    fn non_numeric_lat_is_malformed_lat_and_defaults_zero() {
        let parsed = Waypoint::parse("A http://osm.org/?lat=abc&lon=-118");
        assert!(!parsed.url_malformed);
        assert_eq!(parsed.waypoint.lat, 0.0);
        assert_eq!(parsed.waypoint.lng, 0.0);
        assert_eq!(parsed.findings[0].0, DatacheckCode::MalformedLat);
        assert_eq!(parsed.findings[0].1, "abc");
    }

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    fn boundary_coords_parse_exactly(#[case] lat: f64, #[case] lng: f64) {
        let line = format!("A http://osm.org/?lat={}&lon={}", lat, lng);
        let parsed = Waypoint::parse(&line);
        assert_eq!(parsed.waypoint.lat, lat);
        assert_eq!(parsed.waypoint.lng, lng);
    }

    #[test]
    fn label_too_long_truncates_and_reports_excess() {
        let long_label = "A".repeat(40);
        let mut wp = Waypoint {
            label: long_label.clone(),
            alt_labels: vec![],
            lat: 0.0,
            lng: 0.0,
            is_hidden: false,
            colocated_group: None,
        };
        let result = wp.truncate_if_too_long();
        assert!(result.is_some());
        assert_eq!(wp.label.len(), DBFieldLength::LABEL - 3);
    }

    #[test]
    fn label_within_limit_is_untouched() {
        let mut wp = Waypoint {
            label: "SR001".to_string(),
            alt_labels: vec![],
            lat: 0.0,
            lng: 0.0,
            is_hidden: false,
            colocated_group: None,
        };
        assert!(wp.truncate_if_too_long().is_none());
        assert_eq!(wp.label, "SR001");
    }

    #[test]
    fn same_coords_exact_match_only() {
        let a = Waypoint {
            label: "A".into(),
            alt_labels: vec![],
            lat: 34.0,
            lng: -118.0,
            is_hidden: false,
            colocated_group: None,
        };
        let mut b = a.clone();
        assert!(a.same_coords(&b));
        b.lat = 34.0000001;
        assert!(!a.same_coords(&b));
    }
}
