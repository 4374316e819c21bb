//! Mock mapping store for testing.
//!
//! This module provides an in-memory [`GroupTypeStore`] that enforces the same
//! two uniqueness constraints as the real table.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::error::{GroupTypeError, GroupTypeResult};
use super::mapping::{
    GroupTypeIndex, GroupTypeMapping, GroupTypeToColumnIndex, InsertOutcome, ProjectId, TeamId,
};
use super::store::GroupTypeStore;

/// In-memory mock mapping store.
///
/// Each `insert_or_read` is atomic, like the single statement it stands in
/// for. Both operations yield to the scheduler before touching state so that
/// concurrent callers interleave.
///
/// # Example
///
/// ```rust,ignore
/// let store = MockGroupTypeStore::new();
/// store.seed(ProjectId(1), TeamId(1), "organization", 0);
///
/// let outcome = store
///     .insert_or_read(TeamId(1), ProjectId(1), "account", GroupTypeIndex::new(0).unwrap())
///     .await?;
/// assert_eq!(outcome, InsertOutcome::IndexTaken);
/// ```
pub struct MockGroupTypeStore {
    rows: Mutex<Vec<GroupTypeMapping>>,
    fetch_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    /// Number of upcoming calls that fail with `StoreUnavailable`.
    failures_remaining: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MockGroupTypeStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fetch_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            failures_remaining: AtomicUsize::new(0),
            delay: Mutex::new(None),
        }
    }

    /// Insert a row directly, bypassing constraints (for test setup).
    pub fn seed(&self, project_id: ProjectId, team_id: TeamId, group_type: &str, index: u8) {
        self.rows.lock().unwrap().push(GroupTypeMapping {
            team_id,
            project_id,
            group_type: group_type.to_string(),
            group_type_index: GroupTypeIndex::new(index).unwrap(),
        });
    }

    /// All persisted rows of a project.
    pub fn rows(&self, project_id: ProjectId) -> GroupTypeToColumnIndex {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.project_id == project_id)
            .map(|row| (row.group_type.clone(), row.group_type_index))
            .collect()
    }

    /// Number of rows across all projects.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Make the next `n` store calls fail.
    pub fn fail_next_calls(&self, n: usize) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    /// Make every store call take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn before_call(&self, operation: &str) -> GroupTypeResult<()> {
        let delay = *self.delay.lock().unwrap();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(GroupTypeError::store_unavailable(
                operation,
                "connection refused",
            ));
        }
        Ok(())
    }
}

impl Default for MockGroupTypeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroupTypeStore for MockGroupTypeStore {
    async fn fetch_all(&self, project_id: ProjectId) -> GroupTypeResult<GroupTypeToColumnIndex> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call("fetch_all").await?;
        Ok(self.rows(project_id))
    }

    async fn insert_or_read(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        group_type: &str,
        candidate: GroupTypeIndex,
    ) -> GroupTypeResult<InsertOutcome> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call("insert_or_read").await?;

        let mut rows = self.rows.lock().unwrap();
        let existing = rows
            .iter()
            .find(|row| row.project_id == project_id && row.group_type == group_type);
        if let Some(row) = existing {
            return Ok(InsertOutcome::Existing(row.group_type_index));
        }

        let index_taken = rows
            .iter()
            .any(|row| row.project_id == project_id && row.group_type_index == candidate);
        if index_taken {
            return Ok(InsertOutcome::IndexTaken);
        }

        rows.push(GroupTypeMapping {
            team_id,
            project_id,
            group_type: group_type.to_string(),
            group_type_index: candidate,
        });
        Ok(InsertOutcome::Inserted(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(value: u8) -> GroupTypeIndex {
        GroupTypeIndex::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_mock_insert_then_fetch() {
        let store = MockGroupTypeStore::new();

        let outcome = store
            .insert_or_read(TeamId(1), ProjectId(1), "organization", index(0))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted(index(0)));

        let mapping = store.fetch_all(ProjectId(1)).await.unwrap();
        assert_eq!(mapping.get("organization"), Some(&index(0)));
        assert!(store.fetch_all(ProjectId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_name_conflict_reads_existing() {
        let store = MockGroupTypeStore::new();
        store.seed(ProjectId(1), TeamId(1), "organization", 3);

        let outcome = store
            .insert_or_read(TeamId(1), ProjectId(1), "organization", index(0))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Existing(index(3)));
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_index_conflict_with_other_name() {
        let store = MockGroupTypeStore::new();
        store.seed(ProjectId(1), TeamId(1), "organization", 0);

        let outcome = store
            .insert_or_read(TeamId(1), ProjectId(1), "account", index(0))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::IndexTaken);
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_projects_are_independent() {
        let store = MockGroupTypeStore::new();
        store.seed(ProjectId(1), TeamId(1), "organization", 0);

        let outcome = store
            .insert_or_read(TeamId(2), ProjectId(2), "account", index(0))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted(index(0)));
    }

    #[tokio::test]
    async fn test_mock_injected_failure() {
        let store = MockGroupTypeStore::new();
        store.fail_next_calls(1);

        assert!(store.fetch_all(ProjectId(1)).await.is_err());
        assert!(store.fetch_all(ProjectId(1)).await.is_ok());
        assert_eq!(store.fetch_calls(), 2);
    }
}
