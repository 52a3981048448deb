//! Workspace statistics for the freelancer dashboard.
//!
//! Raw workspace JSON is normalised once into a typed [`Workspace`];
//! milestone statuses are bucketed by [`classify`]; every figure on the
//! dashboard is then a pure function of that model. [`derive_stats`]
//! bundles them into one [`WorkspaceStats`] snapshot and
//! [`StatsController`] keeps the latest snapshot current across manual
//! refreshes.

pub mod actions;
pub mod activity;
pub mod compute;
pub mod model;
pub mod refresh;
pub mod snapshot;
pub mod status;

pub use actions::{QuickAction, QuickActionKind, compute_quick_actions};
pub use activity::{ActivityEvent, ActivityKind, ActivityWindows, compute_recent_activity};
pub use compute::{
    Earnings, FileSummary, MessageCounts, MilestoneCounts, compute_earnings, compute_progress,
    compute_unread_messages,
};
pub use model::{Message, Milestone, SharedFile, Workspace};
pub use refresh::{RefreshOutcome, SnapshotPhase, SourceError, StatsController, WorkspaceSource};
pub use snapshot::{StatsOptions, WorkspaceStats, derive_stats};
pub use status::{StatusClass, classify};
