//! Continent and country tables: flat vectors with a sentinel row appended
//! so a lookup by code can never fail to return something, while still
//! recording the miss as a config error.

use crate::sinks::ErrorList;
use hwy_ingest_types::{Continent, Country, DBFieldLength};

pub struct ContinentTable {
    rows: Vec<Continent>,
}

impl ContinentTable {
    /// Parse `continents.csv` body lines (header already skipped), appending
    /// the sentinel row afterward.
    pub fn load(lines: &[String], el: &ErrorList) -> ContinentTable {
        let mut rows = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            match line.split_once(';') {
                None => el.add_error(format!(
                    "Could not parse continents.csv line: [{}], expected 2 fields, found 1",
                    line
                )),
                Some((code, name)) => {
                    if name.contains(';') {
                        el.add_error(format!(
                            "Could not parse continents.csv line: [{}], expected 2 fields, found 3",
                            line
                        ));
                        continue;
                    }
                    if code.len() > DBFieldLength::CONTINENT_CODE {
                        el.add_error(format!(
                            "Continent code > {} bytes in continents.csv line {}",
                            DBFieldLength::CONTINENT_CODE,
                            line
                        ));
                    }
                    if name.len() > DBFieldLength::CONTINENT_NAME {
                        el.add_error(format!(
                            "Continent name > {} bytes in continents.csv line {}",
                            DBFieldLength::CONTINENT_NAME,
                            line
                        ));
                    }
                    rows.push(Continent {
                        code: code.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }
        rows.push(Continent::sentinel());
        ContinentTable { rows }
    }

    /// Resolve a continent by code, recording an error and returning the
    /// sentinel row on a miss.
    pub fn find(&self, code: &str, el: &ErrorList, context: &str) -> &Continent {
        match self.rows.iter().find(|c| c.code == code) {
            Some(c) => c,
            None => {
                el.add_error(format!("Could not find continent matching {}", context));
                self.sentinel()
            }
        }
    }

    fn sentinel(&self) -> &Continent {
        self.rows.last().expect("sentinel row always present")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

pub struct CountryTable {
    rows: Vec<Country>,
}

impl CountryTable {
    pub fn load(lines: &[String], el: &ErrorList) -> CountryTable {
        let mut rows = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            match line.split_once(';') {
                None => el.add_error(format!(
                    "Could not parse countries.csv line: [{}], expected 2 fields, found 1",
                    line
                )),
                Some((code, name)) => {
                    if name.contains(';') {
                        el.add_error(format!(
                            "Could not parse countries.csv line: [{}], expected 2 fields, found 3",
                            line
                        ));
                        continue;
                    }
                    if code.len() > DBFieldLength::COUNTRY_CODE {
                        el.add_error(format!(
                            "Country code > {} bytes in countries.csv line {}",
                            DBFieldLength::COUNTRY_CODE,
                            line
                        ));
                    }
                    if name.len() > DBFieldLength::COUNTRY_NAME {
                        el.add_error(format!(
                            "Country name > {} bytes in countries.csv line {}",
                            DBFieldLength::COUNTRY_NAME,
                            line
                        ));
                    }
                    rows.push(Country {
                        code: code.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }
        rows.push(Country::sentinel());
        CountryTable { rows }
    }

    pub fn find(&self, code: &str, el: &ErrorList, context: &str) -> &Country {
        match self.rows.iter().find(|c| c.code == code) {
            Some(c) => c,
            None => {
                el.add_error(format!("Could not find country matching {}", context));
                self.sentinel()
            }
        }
    }

    fn sentinel(&self) -> &Country {
        self.rows.last().expect("sentinel row always present")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
