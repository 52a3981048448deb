//! Suggested next steps shown on the workspace dashboard.

use serde::Serialize;

use crate::model::Milestone;
use crate::status::StatusClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickActionKind {
    SubmitWork,
    UploadFile,
    MessageClient,
    ScheduleCall,
    AddMilestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub kind: QuickActionKind,
    pub label: String,
    pub description: String,
    pub href: String,
}

impl QuickAction {
    fn new(kind: QuickActionKind, label: &str, description: &str, href: String) -> Self {
        Self {
            kind,
            label: label.to_string(),
            description: description.to_string(),
            href,
        }
    }
}

/// Fixed action list, led by "submit work" for the first open milestone
/// when there is one.
pub fn compute_quick_actions(workspace_id: &str, milestones: &[Milestone]) -> Vec<QuickAction> {
    let base = format!("/freelancer/workspaces/{workspace_id}");
    let mut actions = Vec::with_capacity(5);

    if let Some(open) = milestones
        .iter()
        .find(|m| m.status.is_some_and(StatusClass::is_open))
    {
        actions.push(QuickAction::new(
            QuickActionKind::SubmitWork,
            "Submit work",
            &open.title,
            format!("{base}/milestones/{}", open.id),
        ));
    }

    actions.extend([
        QuickAction::new(
            QuickActionKind::UploadFile,
            "Upload file",
            "Share deliverables with your client",
            format!("{base}/files"),
        ),
        QuickAction::new(
            QuickActionKind::MessageClient,
            "Message client",
            "Send an update or ask a question",
            format!("{base}/messages"),
        ),
        QuickAction::new(
            QuickActionKind::ScheduleCall,
            "Schedule call",
            "Set up a meeting with your client",
            format!("{base}/calls"),
        ),
        QuickAction::new(
            QuickActionKind::AddMilestone,
            "Add milestone",
            "Propose the next phase of work",
            format!("{base}/milestones/new"),
        ),
    ]);
    actions
}
