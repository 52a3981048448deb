//! Milestone status taxonomy.
//!
//! Upstream data spells the same state several ways. Every aggregation
//! consumes the classified form only; raw strings are never compared
//! downstream of `classify`.

use serde::{Deserialize, Serialize};

/// Mutually exclusive status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusClass {
    Completed,
    InProgress,
    Pending,
    /// Work handed in, waiting on the client. Only feeds earnings.
    AwaitingApproval,
}

const COMPLETED: &[&str] = &["completed", "approved", "paid"];
const IN_PROGRESS: &[&str] = &["in_progress", "in-progress", "started"];
const PENDING: &[&str] = &["pending", "not_started"];
const AWAITING_APPROVAL: &[&str] = &["awaiting_approval", "submitted", "review"];

/// Exact-match classification. Unknown statuses return `None` and are
/// left out of every class-based count.
pub fn classify(raw: &str) -> Option<StatusClass> {
    [
        (COMPLETED, StatusClass::Completed),
        (IN_PROGRESS, StatusClass::InProgress),
        (PENDING, StatusClass::Pending),
        (AWAITING_APPROVAL, StatusClass::AwaitingApproval),
    ]
    .into_iter()
    .find(|(spellings, _)| spellings.contains(&raw))
    .map(|(_, class)| class)
}

impl StatusClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In progress",
            Self::Pending => "Pending",
            Self::AwaitingApproval => "Awaiting approval",
        }
    }

    /// Still owed work: counts toward upcoming earnings.
    pub fn is_open(self) -> bool {
        matches!(self, Self::InProgress | Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_spelling_maps_to_its_class() {
        let table = [
            ("completed", StatusClass::Completed),
            ("approved", StatusClass::Completed),
            ("paid", StatusClass::Completed),
            ("in_progress", StatusClass::InProgress),
            ("in-progress", StatusClass::InProgress),
            ("started", StatusClass::InProgress),
            ("pending", StatusClass::Pending),
            ("not_started", StatusClass::Pending),
            ("awaiting_approval", StatusClass::AwaitingApproval),
            ("submitted", StatusClass::AwaitingApproval),
            ("review", StatusClass::AwaitingApproval),
        ];
        for (raw, class) in table {
            assert_eq!(classify(raw), Some(class), "{raw}");
        }
    }

    #[test]
    fn unknown_or_differently_cased_is_unclassified() {
        assert_eq!(classify("cancelled"), None);
        assert_eq!(classify("Completed"), None);
        assert_eq!(classify(" pending"), None);
        assert_eq!(classify(""), None);
    }
}
