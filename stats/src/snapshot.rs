//! The full derived snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::actions::{QuickAction, compute_quick_actions};
use crate::activity::{ActivityEvent, ActivityWindows, compute_recent_activity};
use crate::compute::{
    Earnings, FileSummary, MessageCounts, MilestoneCounts, compute_earnings, compute_progress,
    count_messages, count_milestones, summarize_files,
};
use crate::model::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    pub windows: ActivityWindows,
    /// Length of `files.recent`.
    pub recent_files: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            windows: ActivityWindows::default(),
            recent_files: 3,
        }
    }
}

/// Everything the dashboard shows for one workspace. Always built whole;
/// never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub workspace_id: String,
    pub progress: u8,
    pub earnings: Earnings,
    pub milestones: MilestoneCounts,
    pub messages: MessageCounts,
    pub files: FileSummary,
    pub recent_activity: Vec<ActivityEvent>,
    pub quick_actions: Vec<QuickAction>,
    pub computed_at: DateTime<Utc>,
}

pub fn derive_stats(
    workspace: &Workspace,
    options: &StatsOptions,
    now: DateTime<Utc>,
) -> WorkspaceStats {
    let stats = WorkspaceStats {
        workspace_id: workspace.id.clone(),
        progress: compute_progress(&workspace.milestones),
        earnings: compute_earnings(&workspace.milestones),
        milestones: count_milestones(&workspace.milestones),
        messages: count_messages(&workspace.messages),
        files: summarize_files(&workspace.files, options.recent_files),
        recent_activity: compute_recent_activity(workspace, &options.windows, now),
        quick_actions: compute_quick_actions(&workspace.id, &workspace.milestones),
        computed_at: now,
    };
    debug!(
        workspace = %stats.workspace_id,
        progress = stats.progress,
        unclassified = stats.milestones.unclassified,
        "derived workspace stats"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn derives_every_section_from_one_pass() {
        let now = Utc
            .with_ymd_and_hms(2026, 10, 15, 12, 0, 0)
            .single()
            .unwrap_or_default();
        let ws = Workspace::from_json(&json!({
            "workspace": {
                "_id": "ws-1",
                "sharedMilestones": [
                    { "amount": 100, "status": "completed", "completedAt": "2026-10-14T08:00:00Z" },
                    { "amount": 50, "status": "awaiting_approval" },
                    { "title": "Ship", "amount": 75, "status": "pending" }
                ],
                "sharedMessages": [{ "senderRole": "client", "createdAt": "2026-10-15T10:00:00Z" }],
                "sharedFiles": [{ "name": "a.txt" }]
            }
        }));

        let stats = derive_stats(&ws, &StatsOptions::default(), now);

        assert_eq!(stats.workspace_id, "ws-1");
        assert_eq!(stats.progress, 33);
        assert_eq!(stats.earnings.total, 100.0);
        assert_eq!(stats.milestones.awaiting_approval, 1);
        assert_eq!(stats.messages, MessageCounts { total: 1, unread: 1 });
        assert_eq!(stats.files.total, 1);
        assert_eq!(stats.recent_activity.len(), 2);
        assert_eq!(stats.quick_actions[0].description, "Ship");
        assert_eq!(stats, derive_stats(&ws, &StatsOptions::default(), now));

        let wire = serde_json::to_value(&stats).unwrap_or_default();
        assert_eq!(wire["milestones"]["awaitingApproval"], json!(1));
        assert_eq!(wire["recentActivity"][0]["kind"], json!("messageReceived"));
    }
}
