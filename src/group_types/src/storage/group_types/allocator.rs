//! Index allocation against the mapping store.
//!
//! No in-process lock can stop another process from racing for the same
//! candidate index. The `(project_id, group_type_index)` uniqueness constraint
//! in the store is the mutual-exclusion primitive: an allocation that loses
//! the race observes [`InsertOutcome::IndexTaken`] and moves on to the next
//! candidate.
//!
//! ```text
//! candidate = k
//!   │
//!   ▼
//! insert_or_read(k) ──Inserted(k)────► (k, inserted)
//!   │           └─────Existing(j)────► (j, read back)
//!   ▼ IndexTaken
//! candidate = k + 1 ... until k == MAX_GROUP_TYPES_PER_PROJECT ──► None
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::GroupTypeResult;
use super::mapping::{
    AllocationOutcome, GroupTypeIndex, InsertOutcome, ProjectId, TeamId,
    MAX_GROUP_TYPES_PER_PROJECT,
};
use super::store::GroupTypeStore;
use super::timeout_guard::with_slow_warning;

/// Allocates indices for new group types, one store round-trip per candidate.
#[derive(Clone)]
pub struct IndexAllocator {
    store: Arc<dyn GroupTypeStore>,
    slow_operation_warning: Duration,
}

impl IndexAllocator {
    pub fn new(store: Arc<dyn GroupTypeStore>, slow_operation_warning: Duration) -> Self {
        Self {
            store,
            slow_operation_warning,
        }
    }

    /// Allocate an index for `group_type`, starting at `candidate`.
    ///
    /// Returns `Ok(None)` once every index from `candidate` up to the quota is
    /// claimed by other names. At most `MAX_GROUP_TYPES_PER_PROJECT` store
    /// calls are made.
    ///
    /// # Errors
    ///
    /// Store failures are returned as-is and not retried.
    pub async fn allocate(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        group_type: &str,
        candidate: usize,
    ) -> GroupTypeResult<Option<AllocationOutcome>> {
        let start = candidate.min(MAX_GROUP_TYPES_PER_PROJECT as usize);
        let candidates = GroupTypeIndex::all().skip(start);

        for candidate in candidates {
            let outcome = with_slow_warning(
                "insert_or_read",
                self.slow_operation_warning,
                self.store
                    .insert_or_read(team_id, project_id, group_type, candidate),
            )
            .await?;

            match outcome {
                InsertOutcome::Inserted(index) => {
                    return Ok(Some(AllocationOutcome {
                        index,
                        inserted: true,
                    }));
                }
                InsertOutcome::Existing(index) => {
                    return Ok(Some(AllocationOutcome {
                        index,
                        inserted: false,
                    }));
                }
                InsertOutcome::IndexTaken => {
                    debug!(
                        %project_id,
                        group_type,
                        candidate = candidate.get(),
                        "group type index already taken, trying next"
                    );
                }
            }
        }

        // Rows are never deleted, so a collision is a permanent claim: running
        // out of candidates means the project is at quota.
        warn!(
            %project_id,
            group_type,
            start_candidate = start,
            "project reached the maximum number of group types"
        );
        Ok(None)
    }
}
