//! Mapping store trait for abstracting persistence of group type rows.
//!
//! This module defines the [`GroupTypeStore`] trait. The store is the only
//! source of truth and is shared by every process that allocates indices, so
//! its uniqueness constraints are what keep allocation correct.

use async_trait::async_trait;

use super::error::GroupTypeResult;
use super::mapping::{GroupTypeIndex, GroupTypeToColumnIndex, InsertOutcome, ProjectId, TeamId};

/// Abstraction over the relational table holding group type mappings.
///
/// The backing table is keyed by `(project_id, group_type)` with columns
/// `team_id` and `group_type_index`, and carries unique constraints on both
/// `(project_id, group_type)` and `(project_id, group_type_index)`.
///
/// # Example Implementation
///
/// ```rust,ignore
/// #[async_trait]
/// impl GroupTypeStore for PostgresGroupTypeStore {
///     async fn insert_or_read(
///         &self,
///         team_id: TeamId,
///         project_id: ProjectId,
///         group_type: &str,
///         candidate: GroupTypeIndex,
///     ) -> GroupTypeResult<InsertOutcome> {
///         // WITH insert_result AS (
///         //     INSERT INTO group_type_mapping (team_id, project_id, group_type, group_type_index)
///         //     VALUES ($1, $2, $3, $4)
///         //     ON CONFLICT DO NOTHING
///         //     RETURNING group_type_index
///         // )
///         // SELECT group_type_index, 1 AS is_insert FROM insert_result
///         // UNION
///         // SELECT group_type_index, 0 AS is_insert FROM group_type_mapping
///         // WHERE project_id = $2 AND group_type = $3
///         let row = self.query_opt(/* ... */).await?;
///         Ok(match row {
///             Some((index, true)) => InsertOutcome::Inserted(index),
///             Some((index, false)) => InsertOutcome::Existing(index),
///             None => InsertOutcome::IndexTaken,
///         })
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait GroupTypeStore: Send + Sync {
    /// Read every mapping currently persisted for a project.
    ///
    /// Returns an empty map for a project with no group types.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    async fn fetch_all(&self, project_id: ProjectId) -> GroupTypeResult<GroupTypeToColumnIndex>;

    /// Try to insert `(project_id, group_type) -> candidate`, then read back
    /// whichever row exists for `(project_id, group_type)`.
    ///
    /// A conflict on the name is silently skipped, leaving the existing row to
    /// be read back as [`InsertOutcome::Existing`]. A conflict on the index
    /// with some other name yields [`InsertOutcome::IndexTaken`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    async fn insert_or_read(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        group_type: &str,
        candidate: GroupTypeIndex,
    ) -> GroupTypeResult<InsertOutcome>;
}
