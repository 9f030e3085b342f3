//! Thread-safe append-only logs: `ErrorList` for config-level problems,
//! `Datacheck` for per-waypoint quality findings. Both may be written from
//! any worker thread; ordering within a single route's findings is
//! insertion order, but no ordering is promised across routes.

use hwy_ingest_types::{DatacheckCode, Finding, RouteId};
use std::sync::Mutex;

/// Append-only thread-safe list of human-readable config problems. Any
/// entry signals something severe enough that downstream consumers may
/// choose to refuse to proceed; this core itself never aborts on one.
#[derive(Default)]
pub struct ErrorList {
    entries: Mutex<Vec<String>>,
}

impl ErrorList {
    pub fn new() -> ErrorList {
        ErrorList::default()
    }

    pub fn add_error(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("config error: {}", message);
        self.entries.lock().unwrap().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries.into_inner().unwrap()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// Append-only thread-safe log of datacheck findings. Distinct sink from
/// `ErrorList`: these are never errors, they are the product.
#[derive(Default)]
pub struct Datacheck {
    findings: Mutex<Vec<Finding>>,
}

impl Datacheck {
    pub fn new() -> Datacheck {
        Datacheck::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &self,
        route: RouteId,
        label1: impl Into<String>,
        label2: impl Into<String>,
        label3: impl Into<String>,
        code: DatacheckCode,
        info: impl Into<String>,
    ) {
        self.findings.lock().unwrap().push(Finding::new(
            route, label1, label2, label3, code, info,
        ));
    }

    pub fn len(&self) -> usize {
        self.findings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.lock().unwrap().is_empty()
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.findings.into_inner().unwrap()
    }

    pub fn snapshot(&self) -> Vec<Finding> {
        self.findings.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwy_ingest_types::SystemId;

    fn rid() -> RouteId {
        RouteId { system: SystemId(0), index: 0 }
    }

    #[test]
    fn error_list_is_append_only_and_ordered() {
        let el = ErrorList::new();
        el.add_error("first");
        el.add_error("second");
        assert_eq!(el.snapshot(), vec!["first", "second"]);
    }

    #[test]
    fn datacheck_add_is_totally_ordered_per_caller() {
        let dc = Datacheck::new();
        dc.add(rid(), "A", "", "", DatacheckCode::OutOfBounds, "");
        dc.add(rid(), "B", "", "", DatacheckCode::HiddenTerminus, "");
        let findings = dc.snapshot();
        assert_eq!(findings[0].label1, "A");
        assert_eq!(findings[1].label1, "B");
    }
}
