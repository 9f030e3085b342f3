use crate::model::taxonomy::{ContinentTable, CountryTable};
use crate::primitives::split_on;
use crate::sinks::ErrorList;
use hwy_ingest_types::{DBFieldLength, RegionId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub country_code: String,
    pub continent_code: String,
    pub region_type: String,
}

pub struct RegionTable {
    rows: Vec<Region>,
    code_hash: HashMap<String, RegionId>,
}

impl RegionTable {
    /// Parse `regions.csv` body lines, resolving country/continent codes
    /// against the two taxonomy tables (sentinel on miss), and append the
    /// sentinel `"error"` region last.
    pub fn load(
        lines: &[String],
        countries: &CountryTable,
        continents: &ContinentTable,
        el: &ErrorList,
    ) -> RegionTable {
        let mut rows = Vec::new();
        let mut code_hash = HashMap::new();

        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (fields, observed) = split_on(line, 5, ';');
            if observed != 5 {
                el.add_error(format!(
                    "Could not parse regions.csv line: [{}], expected 5 fields, found {}",
                    line, observed
                ));
                continue;
            }
            let code = fields[0].clone();
            let name = fields[1].clone();
            let country_str = &fields[2];
            let continent_str = &fields[3];
            let region_type = fields[4].clone();

            if code.len() > DBFieldLength::REGION_CODE {
                el.add_error(format!(
                    "Region code > {} bytes in regions.csv line {}",
                    DBFieldLength::REGION_CODE,
                    line
                ));
            }
            if name.len() > DBFieldLength::REGION_NAME {
                el.add_error(format!(
                    "Region name > {} bytes in regions.csv line {}",
                    DBFieldLength::REGION_NAME,
                    line
                ));
            }
            if region_type.len() > DBFieldLength::REGION_TYPE {
                el.add_error(format!(
                    "Region type > {} bytes in regions.csv line {}",
                    DBFieldLength::REGION_TYPE,
                    line
                ));
            }

            let country = countries.find(country_str, el, &format!("regions.csv line: {}", line));
            let continent =
                continents.find(continent_str, el, &format!("regions.csv line: {}", line));

            if code_hash.contains_key(&code) {
                el.add_error(format!("Duplicate region code in regions.csv: {}", code));
                continue;
            }

            let id = RegionId(rows.len());
            rows.push(Region {
                code: code.clone(),
                name,
                country_code: country.code.clone(),
                continent_code: continent.code.clone(),
                region_type,
            });
            code_hash.insert(code, id);
        }

        let sentinel_id = RegionId(rows.len());
        rows.push(Region {
            code: "error".to_string(),
            name: "unrecognized region code".to_string(),
            country_code: "error".to_string(),
            continent_code: "error".to_string(),
            region_type: "unrecognized region code".to_string(),
        });
        code_hash.insert("error".to_string(), sentinel_id);

        RegionTable { rows, code_hash }
    }

    pub fn get(&self, id: RegionId) -> &Region {
        &self.rows[id.0]
    }

    /// Resolve a region by code, recording an error and returning the
    /// sentinel id on a miss.
    pub fn find(&self, code: &str, el: &ErrorList, context: &str) -> RegionId {
        match self.code_hash.get(code) {
            Some(&id) => id,
            None => {
                el.add_error(format!("Unrecognized region in {}", context));
                self.sentinel_id()
            }
        }
    }

    pub fn sentinel_id(&self) -> RegionId {
        *self.code_hash.get("error").expect("sentinel always present")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_region_resolves_to_sentinel_and_logs_error() {
        let el = ErrorList::new();
        let countries = CountryTable::load(&["USA;United States".to_string()], &el);
        let continents = ContinentTable::load(&["NA;North America".to_string()], &el);
        let regions = RegionTable::load(
            &["CA;California;USA;NA;state".to_string()],
            &countries,
            &continents,
            &el,
        );
        assert!(el.is_empty());
        let id = regions.find("ZZ", &el, "usaca.csv line: foo");
        assert_eq!(id, regions.sentinel_id());
        assert_eq!(el.len(), 1);
    }

    #[test]
    fn known_region_resolves_without_error() {
        let el = ErrorList::new();
        let countries = CountryTable::load(&["USA;United States".to_string()], &el);
        let continents = ContinentTable::load(&["NA;North America".to_string()], &el);
        let regions = RegionTable::load(
            &["CA;California;USA;NA;state".to_string()],
            &countries,
            &continents,
            &el,
        );
        let id = regions.find("CA", &el, "ctx");
        assert_eq!(regions.get(id).name, "California");
        assert!(el.is_empty());
    }
}
