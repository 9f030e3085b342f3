use crate::RouteId;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// The fixed catalogue of datacheck codes. `Display`/`FromStr` (via
/// `strum`) give the exact upper-snake-case spelling used in the finding
/// log, so the enum is both the type-checked representation used inside
/// `hwy-ingest` and the serialized form consumers see.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, Hash,
    PartialEq, Serialize,
)]
pub enum DatacheckCode {
    MalformedUrl,
    MalformedLat,
    MalformedLon,
    LabelTooLong,
    LabelInvalidChar,
    OutOfBounds,
    DuplicateCoords,
    LongSegment,
    VisibleDistance,
    HiddenTerminus,
    BadAngle,
    SharpAngle,
    BusWithI,
    InterstateNoHyphen,
    InvalidFirstChar,
    InvalidFinalChar,
    LabelLooksHidden,
    LabelParens,
    LabelSelfref,
    LabelSlashes,
    LacksGeneric,
    LabelUnderscores,
    LongUnderscore,
    NonterminalUnderscore,
    UsLetter,
}

impl DatacheckCode {
    /// The spelling used in the original finding log (`SCREAMING_SNAKE`),
    /// independent of whatever `Display` derives to for the Rust identifier.
    pub fn code_str(self) -> &'static str {
        match self {
            DatacheckCode::MalformedUrl => "MALFORMED_URL",
            DatacheckCode::MalformedLat => "MALFORMED_LAT",
            DatacheckCode::MalformedLon => "MALFORMED_LON",
            DatacheckCode::LabelTooLong => "LABEL_TOO_LONG",
            DatacheckCode::LabelInvalidChar => "LABEL_INVALID_CHAR",
            DatacheckCode::OutOfBounds => "OUT_OF_BOUNDS",
            DatacheckCode::DuplicateCoords => "DUPLICATE_COORDS",
            DatacheckCode::LongSegment => "LONG_SEGMENT",
            DatacheckCode::VisibleDistance => "VISIBLE_DISTANCE",
            DatacheckCode::HiddenTerminus => "HIDDEN_TERMINUS",
            DatacheckCode::BadAngle => "BAD_ANGLE",
            DatacheckCode::SharpAngle => "SHARP_ANGLE",
            DatacheckCode::BusWithI => "BUS_WITH_I",
            DatacheckCode::InterstateNoHyphen => "INTERSTATE_NO_HYPHEN",
            DatacheckCode::InvalidFirstChar => "INVALID_FIRST_CHAR",
            DatacheckCode::InvalidFinalChar => "INVALID_FINAL_CHAR",
            DatacheckCode::LabelLooksHidden => "LABEL_LOOKS_HIDDEN",
            DatacheckCode::LabelParens => "LABEL_PARENS",
            DatacheckCode::LabelSelfref => "LABEL_SELFREF",
            DatacheckCode::LabelSlashes => "LABEL_SLASHES",
            DatacheckCode::LacksGeneric => "LACKS_GENERIC",
            DatacheckCode::LabelUnderscores => "LABEL_UNDERSCORES",
            DatacheckCode::LongUnderscore => "LONG_UNDERSCORE",
            DatacheckCode::NonterminalUnderscore => "NONTERMINAL_UNDERSCORE",
            DatacheckCode::UsLetter => "US_LETTER",
        }
    }
}

/// One datacheck finding: a per-waypoint quality issue attached to a route.
/// Distinct from a config error — findings are the intended *product* of
/// ingest, never a reason to abort.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Finding {
    pub route: RouteId,
    pub label1: String,
    pub label2: String,
    pub label3: String,
    pub code: DatacheckCode,
    pub info: String,
}

impl Finding {
    pub fn new(
        route: RouteId,
        label1: impl Into<String>,
        label2: impl Into<String>,
        label3: impl Into<String>,
        code: DatacheckCode,
        info: impl Into<String>,
    ) -> Finding {
        Finding {
            route,
            label1: label1.into(),
            label2: label2.into(),
            label3: label3.into(),
            code,
            info: info.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{};{};{}",
            self.route.index,
            self.label1,
            self.label2,
            self.label3,
            self.code.code_str(),
            self.info
        )
    }
}
