//! Group type manager - cache-first resolution of group type indices.
//!
//! This module provides `GroupTypeManager`, the entry point used by ingestion
//! to turn a group type name into its column index.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::allocator::IndexAllocator;
use super::cache::{CacheStats, GroupTypeCache};
use super::config::GroupTypeManagerConfig;
use super::error::GroupTypeResult;
use super::mapping::{GroupTypeIndex, GroupTypeToColumnIndex, ProjectId, TeamId};
use super::notifier::{GroupTypeInserted, NotificationSender};
use super::store::GroupTypeStore;
use super::timeout_guard::with_slow_warning;

/// Resolves group type names to indices, allocating new ones on first sight.
///
/// # Thread Safety
///
/// `GroupTypeManager` is safe to share across tasks. The cache sits behind a
/// `RwLock` that is never held across a store call; concurrent allocations
/// are arbitrated by the store alone.
///
/// # Example
///
/// ```rust,ignore
/// let (notifications, _worker) = spawn_notification_worker(teams, notifier);
/// let manager = GroupTypeManager::new(store, GroupTypeManagerConfig::default())
///     .with_notifications(notifications);
///
/// match manager.fetch_group_type_index(team_id, project_id, "organization").await? {
///     Some(index) => println!("$group_{}", index),
///     None => println!("project is out of group type slots"),
/// }
/// ```
pub struct GroupTypeManager {
    store: Arc<dyn GroupTypeStore>,
    allocator: IndexAllocator,
    cache: RwLock<GroupTypeCache>,
    notifications: Option<NotificationSender>,
    config: GroupTypeManagerConfig,
}

impl GroupTypeManager {
    pub fn new(store: Arc<dyn GroupTypeStore>, config: GroupTypeManagerConfig) -> Self {
        let cache = GroupTypeCache::new(config.cache_max_age(), config.cache_max_projects);
        Self {
            allocator: IndexAllocator::new(store.clone(), config.slow_operation_warning()),
            store,
            cache: RwLock::new(cache),
            notifications: None,
            config,
        }
    }

    /// Emit a notification for every group type this manager inserts.
    pub fn with_notifications(mut self, notifications: NotificationSender) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn config(&self) -> &GroupTypeManagerConfig {
        &self.config
    }

    /// Get the full mapping of a project, from cache when fresh.
    ///
    /// A miss reads the store and refreshes the cache.
    pub async fn fetch_group_types(
        &self,
        project_id: ProjectId,
    ) -> GroupTypeResult<GroupTypeToColumnIndex> {
        if let Some(cached) = self.cache.write().await.get(&project_id) {
            debug!(%project_id, "group types cache hit");
            return Ok(cached);
        }
        self.refresh(project_id).await
    }

    /// Resolve `group_type` to its index within `project_id`, allocating one if
    /// the name is new.
    ///
    /// Returns `Ok(None)` when the project has no free index left. That outcome
    /// is permanent for the name and is not an error.
    ///
    /// # Errors
    ///
    /// Store failures are propagated without retry.
    pub async fn fetch_group_type_index(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        group_type: &str,
    ) -> GroupTypeResult<Option<GroupTypeIndex>> {
        let cached = self.cache.write().await.get(&project_id);
        if let Some(index) = cached.as_ref().and_then(|mapping| mapping.get(group_type)) {
            return Ok(Some(*index));
        }

        // The cached mapping may predate the name; reread before allocating.
        let mapping = self.refresh(project_id).await?;
        if let Some(index) = mapping.get(group_type) {
            return Ok(Some(*index));
        }

        let allocation = self
            .allocator
            .allocate(team_id, project_id, group_type, mapping.len())
            .await?;
        let Some(allocation) = allocation else {
            return Ok(None);
        };

        self.invalidate(project_id).await;

        if allocation.inserted {
            info!(
                %project_id,
                group_type,
                index = allocation.index.get(),
                "inserted new group type"
            );
            if let Some(notifications) = &self.notifications {
                notifications.send(GroupTypeInserted {
                    team_id,
                    project_id,
                    group_type: group_type.to_string(),
                    group_type_index: allocation.index,
                });
            }
        }

        Ok(Some(allocation.index))
    }

    /// Drop the cached mapping of a project.
    pub async fn invalidate(&self, project_id: ProjectId) {
        self.cache.write().await.invalidate(&project_id);
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    async fn refresh(&self, project_id: ProjectId) -> GroupTypeResult<GroupTypeToColumnIndex> {
        debug!(%project_id, "fetching group types from store");
        let mapping = with_slow_warning(
            "fetch_all",
            self.config.slow_operation_warning(),
            self.store.fetch_all(project_id),
        )
        .await?;

        self.cache.write().await.set(project_id, mapping.clone());
        Ok(mapping)
    }
}

impl std::fmt::Debug for GroupTypeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupTypeManager")
            .field("config", &self.config)
            .field("notifications", &self.notifications.is_some())
            .finish()
    }
}
