//! Manual refresh of a workspace snapshot.
//!
//! Every refresh takes a sequence number when it starts. A response is
//! applied only when its number is still the latest issued, so a slow
//! early response can never overwrite a faster later one. `detach`
//! cancels whatever is in flight once the owner goes away.

use std::error::Error as StdError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::model::Workspace;
use crate::snapshot::{StatsOptions, WorkspaceStats, derive_stats};

/// Failure reported by a `WorkspaceSource`.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SourceError(Box<dyn StdError + Send + Sync>);

impl SourceError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Where raw workspace records come from.
#[async_trait]
pub trait WorkspaceSource: Send + Sync {
    async fn fetch_workspace(&self, workspace_id: &str) -> Result<Value, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotPhase {
    /// Nothing fetched yet.
    Stale,
    Refreshing,
    Fresh,
    /// Last refresh failed; any previous snapshot is still served.
    StaleWithError(String),
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Applied(Arc<WorkspaceStats>),
    /// A newer refresh was issued while this one was in flight.
    Superseded { seq: u64, latest: u64 },
    Failed(SourceError),
    Detached,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct State {
    snapshot: Option<Arc<WorkspaceStats>>,
    phase: SnapshotPhase,
    applied_seq: u64,
}

pub struct StatsController {
    workspace_id: String,
    source: Arc<dyn WorkspaceSource>,
    options: StatsOptions,
    clock: Clock,
    issued: AtomicU64,
    state: RwLock<State>,
    cancel: CancellationToken,
}

impl StatsController {
    pub fn new(
        workspace_id: impl Into<String>,
        source: Arc<dyn WorkspaceSource>,
        options: StatsOptions,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            source,
            options,
            clock: Arc::new(Utc::now),
            issued: AtomicU64::new(0),
            state: RwLock::new(State {
                snapshot: None,
                phase: SnapshotPhase::Stale,
                applied_seq: 0,
            }),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn snapshot(&self) -> Option<Arc<WorkspaceStats>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    pub fn phase(&self) -> SnapshotPhase {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .phase
            .clone()
    }

    /// Sequence number of the snapshot currently served, `0` if none.
    pub fn applied_seq(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .applied_seq
    }

    pub fn is_detached(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel in-flight refreshes and refuse new ones.
    pub fn detach(&self) {
        debug!(workspace = %self.workspace_id, "detaching stats controller");
        self.cancel.cancel();
    }

    /// Fetch and re-derive. Never panics or returns `Err`; the outcome
    /// says what happened to the snapshot.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.is_detached() {
            return RefreshOutcome::Detached;
        }
        let seq = self.issue();
        self.state_mut().phase = SnapshotPhase::Refreshing;
        debug!(workspace = %self.workspace_id, seq, "refresh started");

        let fetched = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                settle_detached(&mut self.state_mut());
                return RefreshOutcome::Detached;
            }
            result = self.source.fetch_workspace(&self.workspace_id) => result,
        };

        match fetched {
            Ok(raw) => {
                let workspace = Workspace::from_json(&raw);
                let stats = Arc::new(derive_stats(&workspace, &self.options, (self.clock)()));
                let mut state = self.state_mut();
                if let Some(outcome) = self.stale_outcome(&mut state, seq) {
                    return outcome;
                }
                state.snapshot = Some(Arc::clone(&stats));
                state.phase = SnapshotPhase::Fresh;
                state.applied_seq = seq;
                info!(workspace = %self.workspace_id, seq, progress = stats.progress, "refresh applied");
                RefreshOutcome::Applied(stats)
            }
            Err(err) => {
                let mut state = self.state_mut();
                if let Some(outcome) = self.stale_outcome(&mut state, seq) {
                    return outcome;
                }
                warn!(workspace = %self.workspace_id, seq, error = %err, "refresh failed; keeping last snapshot");
                state.phase = SnapshotPhase::StaleWithError(err.to_string());
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Replace the source record directly and recompute. Supersedes any
    /// refresh still in flight.
    pub fn set_source(&self, raw: &Value) -> Arc<WorkspaceStats> {
        let workspace = Workspace::from_json(raw);
        let stats = Arc::new(derive_stats(&workspace, &self.options, (self.clock)()));
        let mut state = self.state_mut();
        let seq = self.issue();
        state.snapshot = Some(Arc::clone(&stats));
        state.phase = SnapshotPhase::Fresh;
        state.applied_seq = seq;
        debug!(workspace = %self.workspace_id, seq, "source record replaced");
        stats
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Must be called with the state lock held.
    fn stale_outcome(&self, state: &mut State, seq: u64) -> Option<RefreshOutcome> {
        if self.is_detached() {
            settle_detached(state);
            return Some(RefreshOutcome::Detached);
        }
        let latest = self.issued.load(Ordering::SeqCst);
        if seq == latest {
            return None;
        }
        debug!(workspace = %self.workspace_id, seq, latest, "dropping superseded refresh");
        Some(RefreshOutcome::Superseded { seq, latest })
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cancelled refresh leaves `Refreshing` for whatever the snapshot supports.
fn settle_detached(state: &mut State) {
    if state.phase == SnapshotPhase::Refreshing {
        state.phase = if state.snapshot.is_some() {
            SnapshotPhase::Fresh
        } else {
            SnapshotPhase::Stale
        };
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    /// Answers calls in order, each after its own delay.
    struct ScriptedSource {
        script: Mutex<VecDeque<(Duration, Result<Value, String>)>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<(u64, Result<Value, String>)>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|(ms, reply)| (Duration::from_millis(ms), reply))
                        .collect(),
                ),
            })
        }
    }

    #[async_trait]
    impl WorkspaceSource for ScriptedSource {
        async fn fetch_workspace(&self, _workspace_id: &str) -> Result<Value, SourceError> {
            let (delay, reply) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch");
            tokio::time::sleep(delay).await;
            reply.map_err(SourceError::new)
        }
    }

    fn workspace(id: &str) -> Value {
        json!({ "_id": id, "sharedMilestones": [{ "status": "completed" }] })
    }

    fn controller(source: Arc<ScriptedSource>) -> StatsController {
        let fixed = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        StatsController::new("ws", source, StatsOptions::default()).with_clock(move || fixed)
    }

    #[tokio::test]
    async fn successful_refresh_replaces_snapshot() {
        let c = controller(ScriptedSource::new(vec![(0, Ok(workspace("first")))]));
        assert_eq!(c.phase(), SnapshotPhase::Stale);
        assert!(c.snapshot().is_none());

        let outcome = c.refresh().await;

        assert!(matches!(outcome, RefreshOutcome::Applied(ref s) if s.workspace_id == "first"));
        assert_eq!(c.phase(), SnapshotPhase::Fresh);
        assert_eq!(c.snapshot().unwrap().progress, 100);
        assert_eq!(c.applied_seq(), 1);
    }

    #[tokio::test]
    async fn slow_earlier_response_does_not_overwrite_newer_one() {
        let c = controller(ScriptedSource::new(vec![
            (50, Ok(workspace("older"))),
            (5, Ok(workspace("newer"))),
        ]));

        let (first, second) = tokio::join!(c.refresh(), c.refresh());

        assert!(matches!(
            first,
            RefreshOutcome::Superseded { seq: 1, latest: 2 }
        ));
        assert!(matches!(second, RefreshOutcome::Applied(_)));
        assert_eq!(c.snapshot().unwrap().workspace_id, "newer");
        assert_eq!(c.applied_seq(), 2);
        assert_eq!(c.phase(), SnapshotPhase::Fresh);
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot() {
        let c = controller(ScriptedSource::new(vec![
            (0, Ok(workspace("good"))),
            (0, Err("503 Service Unavailable".to_string())),
        ]));
        c.refresh().await;
        let before = c.snapshot().unwrap();

        let outcome = c.refresh().await;

        match outcome {
            RefreshOutcome::Failed(err) => assert_eq!(err.to_string(), "503 Service Unavailable"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            c.phase(),
            SnapshotPhase::StaleWithError("503 Service Unavailable".to_string())
        );
        assert!(Arc::ptr_eq(&before, &c.snapshot().unwrap()));
    }

    #[tokio::test]
    async fn detach_cancels_in_flight_refresh() {
        let c = controller(ScriptedSource::new(vec![(10_000, Ok(workspace("late")))]));

        let (outcome, ()) = tokio::join!(c.refresh(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            c.detach();
        });

        assert!(matches!(outcome, RefreshOutcome::Detached));
        assert!(c.is_detached());
        assert!(c.snapshot().is_none());
        assert_eq!(c.phase(), SnapshotPhase::Stale);
        assert!(matches!(c.refresh().await, RefreshOutcome::Detached));
        assert_eq!(c.phase(), SnapshotPhase::Stale);
    }

    #[tokio::test]
    async fn detach_after_fetch_keeps_last_snapshot_fresh() {
        let c = controller(ScriptedSource::new(vec![
            (0, Ok(workspace("first"))),
            (10_000, Ok(workspace("late"))),
        ]));
        c.refresh().await;

        let (outcome, ()) = tokio::join!(c.refresh(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            c.detach();
        });

        assert!(matches!(outcome, RefreshOutcome::Detached));
        assert_eq!(c.phase(), SnapshotPhase::Fresh);
        assert_eq!(c.snapshot().unwrap().workspace_id, "first");
    }

    #[tokio::test]
    async fn set_source_supersedes_in_flight_refresh() {
        let c = controller(ScriptedSource::new(vec![(30, Ok(workspace("remote")))]));

        let (outcome, local) = tokio::join!(c.refresh(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            c.set_source(&workspace("local"))
        });

        assert!(matches!(outcome, RefreshOutcome::Superseded { seq: 1, latest: 2 }));
        assert_eq!(local.workspace_id, "local");
        assert_eq!(c.snapshot().unwrap().workspace_id, "local");
    }
}
