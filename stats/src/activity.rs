//! Recent-activity feed merged from milestones, files and messages.

use std::cmp::Reverse;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::model::Workspace;
use crate::status::StatusClass;

/// Lookback per event source plus the feed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindows {
    pub milestones: TimeDelta,
    pub files: TimeDelta,
    pub messages: TimeDelta,
    pub limit: usize,
}

impl Default for ActivityWindows {
    fn default() -> Self {
        Self {
            milestones: TimeDelta::days(7),
            files: TimeDelta::days(7),
            messages: TimeDelta::days(1),
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    MilestoneCompleted,
    FileUploaded,
    MessageReceived,
}

impl ActivityKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::MilestoneCompleted => "check-circle",
            Self::FileUploaded => "file",
            Self::MessageReceived => "message-square",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub icon: &'static str,
    pub title: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    fn new(kind: ActivityKind, title: String, detail: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            icon: kind.icon(),
            title,
            detail,
            timestamp,
        }
    }
}

/// Events inside their window, newest first, at most `windows.limit`.
/// Anything without a timestamp, or dated after `now`, is skipped.
pub fn compute_recent_activity(
    workspace: &Workspace,
    windows: &ActivityWindows,
    now: DateTime<Utc>,
) -> Vec<ActivityEvent> {
    let within = |ts: Option<DateTime<Utc>>, window: TimeDelta| {
        ts.filter(|ts| (now - window..=now).contains(ts))
    };

    let milestones = workspace
        .milestones
        .iter()
        .filter(|m| m.status == Some(StatusClass::Completed))
        .filter_map(|m| {
            within(m.completed_date, windows.milestones).map(|ts| {
                ActivityEvent::new(
                    ActivityKind::MilestoneCompleted,
                    "Milestone completed".to_string(),
                    m.title.clone(),
                    ts,
                )
            })
        });

    let files = workspace.files.iter().filter_map(|f| {
        within(f.uploaded_at, windows.files).map(|ts| {
            ActivityEvent::new(
                ActivityKind::FileUploaded,
                "File uploaded".to_string(),
                f.name.clone(),
                ts,
            )
        })
    });

    let messages = workspace.messages.iter().filter_map(|m| {
        within(m.created_at, windows.messages).map(|ts| {
            let from = if m.sender_name.is_empty() {
                m.sender_role.as_str()
            } else {
                m.sender_name.as_str()
            };
            ActivityEvent::new(
                ActivityKind::MessageReceived,
                format!("New message from {from}"),
                m.content.clone(),
                ts,
            )
        })
    });

    let mut events: Vec<ActivityEvent> = milestones.chain(files).chain(messages).collect();
    events.sort_by_key(|e| Reverse(e.timestamp));
    events.truncate(windows.limit);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn workspace() -> Workspace {
        Workspace::from_json(&json!({
            "sharedMilestones": [
                { "title": "Wireframes", "status": "approved", "completedDate": "2026-10-13T09:00:00Z" },
                { "title": "Ancient", "status": "completed", "completedDate": "2026-09-01T09:00:00Z" },
                { "title": "Undated", "status": "completed" },
                { "title": "Open", "status": "pending", "completedDate": "2026-10-15T08:00:00Z" }
            ],
            "sharedFiles": [
                { "name": "brief.pdf", "uploadedAt": "2026-10-14T10:00:00Z" },
                { "name": "nodate.zip" }
            ],
            "sharedMessages": [
                { "content": "Looks good", "senderName": "Dana", "createdAt": "2026-10-15T11:00:00Z" },
                { "content": "Stale", "senderRole": "client", "createdAt": "2026-10-13T11:00:00Z" }
            ]
        }))
    }

    #[test]
    fn merges_sources_newest_first() {
        let feed = compute_recent_activity(&workspace(), &ActivityWindows::default(), now());
        let summary: Vec<(ActivityKind, &str)> =
            feed.iter().map(|e| (e.kind, e.detail.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (ActivityKind::MessageReceived, "Looks good"),
                (ActivityKind::FileUploaded, "brief.pdf"),
                (ActivityKind::MilestoneCompleted, "Wireframes"),
            ]
        );
        assert_eq!(feed[0].title, "New message from Dana");
        assert_eq!(feed[0].icon, "message-square");
    }

    #[test]
    fn truncates_to_limit() {
        let windows = ActivityWindows {
            limit: 2,
            ..ActivityWindows::default()
        };
        assert_eq!(compute_recent_activity(&workspace(), &windows, now()).len(), 2);

        let files: Vec<_> = (0..8)
            .map(|h| json!({ "name": format!("f{h}"), "uploadedAt": format!("2026-10-15T0{h}:00:00Z") }))
            .collect();
        let busy = Workspace::from_json(&json!({ "sharedFiles": files }));
        let feed = compute_recent_activity(&busy, &ActivityWindows::default(), now());
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].detail, "f7");
    }

    #[test]
    fn future_dated_events_are_skipped() {
        let ws = Workspace::from_json(&json!({
            "sharedFiles": [
                { "name": "tomorrow.pdf", "uploadedAt": "2026-10-16T09:00:00Z" },
                { "name": "today.pdf", "uploadedAt": "2026-10-15T09:00:00Z" }
            ],
            "sharedMessages": [{ "content": "from the future", "createdAt": "2026-10-15T12:30:00Z" }]
        }));
        let feed = compute_recent_activity(&ws, &ActivityWindows::default(), now());
        let details: Vec<&str> = feed.iter().map(|e| e.detail.as_str()).collect();
        assert_eq!(details, vec!["today.pdf"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let ws = workspace();
        let windows = ActivityWindows::default();
        assert_eq!(
            compute_recent_activity(&ws, &windows, now()),
            compute_recent_activity(&ws, &windows, now())
        );
    }
}
