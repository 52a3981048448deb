//! Pure aggregations over the typed workspace model.
//!
//! None of these fail: malformed input was already zero-filled by
//! `Workspace::from_json`, and unclassified milestones simply fall out of
//! every class-based bucket.

use std::cmp::Reverse;

use serde::Serialize;

use crate::model::{Message, Milestone, SharedFile};
use crate::status::StatusClass;

pub const CLIENT_ROLE: &str = "client";
pub const FREELANCER_ROLE: &str = "freelancer";

/// Share of milestones completed, `0..=100`, rounded half up.
///
/// The denominator counts every milestone, unclassified ones included.
pub fn compute_progress(milestones: &[Milestone]) -> u8 {
    let total = milestones.len();
    if total == 0 {
        return 0;
    }
    let completed = count_class(milestones, StatusClass::Completed);
    let pct = (200 * completed + total) / (2 * total);
    u8::try_from(pct.min(100)).unwrap_or(100)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    /// Completed milestones.
    pub total: f64,
    /// Portion of `total` already marked `paid`.
    pub paid: f64,
    /// Awaiting client approval.
    pub pending: f64,
    /// Still being worked on or not yet started.
    pub upcoming: f64,
}

pub fn compute_earnings(milestones: &[Milestone]) -> Earnings {
    milestones
        .iter()
        .fold(Earnings::default(), |mut acc, milestone| {
            match milestone.status {
                Some(StatusClass::Completed) => {
                    acc.total += milestone.amount;
                    if milestone.raw_status == "paid" {
                        acc.paid += milestone.amount;
                    }
                }
                Some(StatusClass::AwaitingApproval) => acc.pending += milestone.amount,
                Some(class) if class.is_open() => acc.upcoming += milestone.amount,
                Some(_) | None => {}
            }
            acc
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub awaiting_approval: usize,
    pub unclassified: usize,
}

pub fn count_milestones(milestones: &[Milestone]) -> MilestoneCounts {
    MilestoneCounts {
        total: milestones.len(),
        completed: count_class(milestones, StatusClass::Completed),
        in_progress: count_class(milestones, StatusClass::InProgress),
        pending: count_class(milestones, StatusClass::Pending),
        awaiting_approval: count_class(milestones, StatusClass::AwaitingApproval),
        unclassified: milestones.iter().filter(|m| m.status.is_none()).count(),
    }
}

fn count_class(milestones: &[Milestone], class: StatusClass) -> usize {
    milestones
        .iter()
        .filter(|m| m.status == Some(class))
        .count()
}

/// Messages from the client the freelancer has not opened yet.
pub fn compute_unread_messages(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter(|m| m.sender_role == CLIENT_ROLE && !m.is_read_by(FREELANCER_ROLE))
        .count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageCounts {
    pub total: usize,
    pub unread: usize,
}

pub fn count_messages(messages: &[Message]) -> MessageCounts {
    MessageCounts {
        total: messages.len(),
        unread: compute_unread_messages(messages),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileSummary {
    pub total: usize,
    /// Newest first; files without an upload time sort last.
    pub recent: Vec<SharedFile>,
}

pub fn summarize_files(files: &[SharedFile], limit: usize) -> FileSummary {
    let mut recent = files.to_vec();
    // Stable: equal timestamps keep source order.
    recent.sort_by_key(|f| Reverse(f.uploaded_at));
    recent.truncate(limit);
    FileSummary {
        total: files.len(),
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Workspace;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn milestones(raw: Value) -> Vec<Milestone> {
        Workspace::from_json(&json!({ "sharedMilestones": raw })).milestones
    }

    fn messages(raw: Value) -> Vec<Message> {
        Workspace::from_json(&json!({ "sharedMessages": raw })).messages
    }

    #[test]
    fn progress_of_empty_list_is_zero() {
        assert_eq!(compute_progress(&[]), 0);
    }

    #[test]
    fn progress_stays_in_range() {
        let statuses = ["completed", "paid", "pending", "bogus", "review", "started"];
        for len in 1..=statuses.len() {
            let raw: Vec<Value> = statuses[..len]
                .iter()
                .map(|s| json!({ "status": s }))
                .collect();
            let progress = compute_progress(&milestones(Value::Array(raw)));
            assert!(progress <= 100, "{progress}");
        }
        let all_done = milestones(json!([{ "status": "completed" }, { "status": "approved" }]));
        assert_eq!(compute_progress(&all_done), 100);
    }

    #[test]
    fn progress_rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut raw = vec![json!({ "status": "completed" })];
        raw.extend(std::iter::repeat_n(json!({ "status": "pending" }), 7));
        assert_eq!(compute_progress(&milestones(Value::Array(raw))), 13);

        // 2 of 3 = 66.67%
        let two_of_three = milestones(json!([
            { "status": "completed" }, { "status": "paid" }, { "status": "pending" }
        ]));
        assert_eq!(compute_progress(&two_of_three), 67);
    }

    #[test]
    fn unrecognized_statuses_count_in_denominator_only() {
        let list = milestones(json!([
            { "status": "cancelled" }, { "status": "Done" }, { "status": "" }, {}
        ]));
        assert_eq!(compute_progress(&list), 0);
        assert_eq!(count_milestones(&list).unclassified, 4);
        assert_eq!(count_milestones(&list).total, 4);
        assert_eq!(compute_earnings(&list), Earnings::default());

        let mixed = milestones(json!([{ "status": "completed" }, { "status": "cancelled" }]));
        assert_eq!(compute_progress(&mixed), 50);
    }

    #[test]
    fn mixed_scenario_progress_and_earnings() {
        let list = milestones(json!([
            { "amount": 100, "status": "completed" },
            { "amount": 50, "status": "awaiting_approval" },
            { "amount": 75, "status": "pending" }
        ]));

        assert_eq!(compute_progress(&list), 33);
        assert_eq!(
            compute_earnings(&list),
            Earnings {
                total: 100.0,
                paid: 0.0,
                pending: 50.0,
                upcoming: 75.0,
            }
        );
    }

    #[test]
    fn earnings_never_exceed_sum_of_amounts() {
        let list = milestones(json!([
            { "amount": 100, "status": "paid" },
            { "amount": "40", "status": "approved" },
            { "amount": 30, "status": "submitted" },
            { "amount": 20, "status": "in-progress" },
            { "amount": 10, "status": "not_started" },
            { "amount": 999, "status": "archived" },
            { "amount": "n/a", "status": "completed" },
            { "status": "review" }
        ]));
        let earnings = compute_earnings(&list);
        let sum: f64 = list.iter().map(|m| m.amount).sum();

        assert_eq!(earnings.total, 140.0);
        assert_eq!(earnings.paid, 100.0);
        assert_eq!(earnings.pending, 30.0);
        assert_eq!(earnings.upcoming, 30.0);
        assert!(earnings.total + earnings.pending + earnings.upcoming <= sum);
        assert!(earnings.paid <= earnings.total);
    }

    #[test]
    fn aggregations_are_repeatable() {
        let list = milestones(json!([
            { "amount": 0.1, "status": "completed" },
            { "amount": 0.2, "status": "completed" },
            { "amount": 0.3, "status": "started" }
        ]));
        let first = (compute_progress(&list), compute_earnings(&list));
        let second = (compute_progress(&list), compute_earnings(&list));
        assert_eq!(first.0, second.0);
        assert_eq!(first.1.total.to_bits(), second.1.total.to_bits());
        assert_eq!(first.1.upcoming.to_bits(), second.1.upcoming.to_bits());
    }

    #[test]
    fn unread_counts_client_messages_without_freelancer_receipt() {
        let list = messages(json!([
            { "senderRole": "client", "readBy": ["client"] },
            { "senderRole": "client", "readBy": ["freelancer"] },
            { "senderRole": "freelancer" }
        ]));
        assert_eq!(compute_unread_messages(&list), 1);
    }

    #[test]
    fn missing_read_tracking_is_unread() {
        let list = messages(json!([
            { "senderRole": "client" },
            { "sender": { "role": "client" }, "readBy": [{ "role": "freelancer" }] }
        ]));
        assert_eq!(count_messages(&list), MessageCounts { total: 2, unread: 1 });
    }

    #[test]
    fn file_summary_orders_newest_first_and_truncates() {
        let files = Workspace::from_json(&json!({
            "sharedFiles": [
                { "name": "undated" },
                { "name": "old", "uploadedAt": "2026-09-01T00:00:00Z" },
                { "name": "new", "uploadedAt": "2026-10-10T00:00:00Z" },
                { "name": "mid", "createdAt": "2026-09-20" }
            ]
        }))
        .files;

        let summary = summarize_files(&files, 3);
        assert_eq!(summary.total, 4);
        let names: Vec<&str> = summary.recent.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);

        let everything = summarize_files(&files, 10);
        assert_eq!(everything.recent.last().map(|f| f.name.as_str()), Some("undated"));
    }
}
