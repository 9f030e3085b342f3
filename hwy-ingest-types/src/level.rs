use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a `HighwaySystem`: active systems suppress the
/// `VISIBLE_DISTANCE` datacheck to reduce clutter on well-maintained data.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SystemLevel {
    Active,
    Preview,
    Devel,
}

impl SystemLevel {
    /// Parse the `level` field of a `systems.csv` line. Returns `None` for
    /// anything other than the three recognized spellings; the caller is
    /// responsible for recording the resulting error.
    pub fn parse(s: &str) -> Option<SystemLevel> {
        match s {
            "active" => Some(SystemLevel::Active),
            "preview" => Some(SystemLevel::Preview),
            "devel" => Some(SystemLevel::Devel),
            _ => None,
        }
    }

    /// The single-character code stored in place of the full word, matching
    /// the original schema's `char level`.
    pub fn code(self) -> char {
        match self {
            SystemLevel::Active => 'a',
            SystemLevel::Preview => 'p',
            SystemLevel::Devel => 'd',
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, SystemLevel::Active)
    }
}

impl fmt::Display for SystemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemLevel::Active => "active",
            SystemLevel::Preview => "preview",
            SystemLevel::Devel => "devel",
        })
    }
}
