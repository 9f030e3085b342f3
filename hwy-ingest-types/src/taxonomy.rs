use serde::{Deserialize, Serialize};

/// One row of `continents.csv`: a short code and a display name.
///
/// Lookups that miss resolve to the sentinel row
/// `("error", "unrecognized continent code")` appended after the real data,
/// so a `code_hash`-style lookup can never fail to return *something* while
/// still letting the caller log that the code was bogus.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Continent {
    pub code: String,
    pub name: String,
}

impl Continent {
    pub const SENTINEL_CODE: &'static str = "error";
    pub const SENTINEL_NAME: &'static str = "unrecognized continent code";

    pub fn sentinel() -> Continent {
        Continent {
            code: Self::SENTINEL_CODE.to_string(),
            name: Self::SENTINEL_NAME.to_string(),
        }
    }
}

/// One row of `countries.csv`. Same shape and sentinel discipline as
/// `Continent`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    pub const SENTINEL_CODE: &'static str = "error";
    pub const SENTINEL_NAME: &'static str = "unrecognized country code";

    pub fn sentinel() -> Country {
        Country {
            code: Self::SENTINEL_CODE.to_string(),
            name: Self::SENTINEL_NAME.to_string(),
        }
    }

    pub fn is_usa(&self) -> bool {
        self.code == "USA"
    }
}
