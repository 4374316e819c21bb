//! Best-effort notification of first-time group type insertions.
//!
//! The manager enqueues a [`GroupTypeInserted`] message and moves on. A
//! [`NotificationWorker`] drains the queue, enriches each message with team
//! metadata and emits an analytics event. Nothing that happens here can fail
//! the allocation that produced the message.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::GroupTypeResult;
use super::mapping::{GroupTypeIndex, ProjectId, TeamId};

/// Name of the event emitted for a newly inserted group type.
pub const GROUP_TYPE_INGESTED_EVENT: &str = "group type ingested";

/// Team metadata used to attribute the emitted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub project_id: ProjectId,
    pub name: String,
}

/// Lookup of team metadata.
#[async_trait]
pub trait TeamLookup: Send + Sync {
    /// Fetch a team, returning `None` if it does not exist.
    async fn fetch_team(&self, team_id: TeamId) -> GroupTypeResult<Option<Team>>;
}

/// Outbound analytics event emission.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    async fn capture(
        &self,
        team: &Team,
        event: &str,
        properties: serde_json::Value,
    ) -> GroupTypeResult<()>;
}

/// A group type row was created by this process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupTypeInserted {
    pub team_id: TeamId,
    pub project_id: ProjectId,
    pub group_type: String,
    pub group_type_index: GroupTypeIndex,
}

/// Sending half of the notification queue.
#[derive(Clone, Debug)]
pub struct NotificationSender {
    tx: mpsc::UnboundedSender<GroupTypeInserted>,
}

impl NotificationSender {
    /// Enqueue a notification without waiting for it to be delivered.
    pub fn send(&self, message: GroupTypeInserted) {
        if let Err(err) = self.tx.send(message) {
            warn!(
                project_id = %err.0.project_id,
                group_type = %err.0.group_type,
                "group type notification queue is closed, dropping notification"
            );
        }
    }
}

/// Create a notification queue and the worker that drains it.
///
/// The worker is returned unstarted; see [`spawn_notification_worker`] for the
/// common case.
pub fn notification_channel(
    team_lookup: Arc<dyn TeamLookup>,
    notifier: Arc<dyn EventNotifier>,
) -> (NotificationSender, NotificationWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        NotificationSender { tx },
        NotificationWorker {
            rx,
            team_lookup,
            notifier,
        },
    )
}

/// Spawn a worker on the current runtime. It exits once every sender is dropped.
pub fn spawn_notification_worker(
    team_lookup: Arc<dyn TeamLookup>,
    notifier: Arc<dyn EventNotifier>,
) -> (NotificationSender, JoinHandle<()>) {
    let (sender, worker) = notification_channel(team_lookup, notifier);
    (sender, tokio::spawn(worker.run()))
}

/// Drains the notification queue.
pub struct NotificationWorker {
    rx: mpsc::UnboundedReceiver<GroupTypeInserted>,
    team_lookup: Arc<dyn TeamLookup>,
    notifier: Arc<dyn EventNotifier>,
}

impl NotificationWorker {
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            self.deliver(message).await;
        }
        debug!("group type notification worker stopped");
    }

    async fn deliver(&self, message: GroupTypeInserted) {
        let team = match self.team_lookup.fetch_team(message.team_id).await {
            Ok(Some(team)) => team,
            Ok(None) => {
                debug!(
                    team_id = %message.team_id,
                    group_type = %message.group_type,
                    "team not found, skipping group type notification"
                );
                return;
            }
            Err(err) => {
                warn!(
                    team_id = %message.team_id,
                    error = %err,
                    "team lookup failed, skipping group type notification"
                );
                return;
            }
        };

        let properties = json!({
            "group_type": message.group_type,
            "group_type_index": message.group_type_index.get(),
        });
        if let Err(err) = self
            .notifier
            .capture(&team, GROUP_TYPE_INGESTED_EVENT, properties)
            .await
        {
            warn!(
                team_id = %team.id,
                error = %err,
                "failed to emit group type notification"
            );
        }
    }
}
