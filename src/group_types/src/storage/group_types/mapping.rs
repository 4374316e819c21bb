//! Data model for group type mappings.
//!
//! A mapping row ties a group type name to a small column index inside one
//! project. Rows are immutable once written.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of distinct group types a single project may register.
///
/// Indices are allocated densely in `0..MAX_GROUP_TYPES_PER_PROJECT`.
pub const MAX_GROUP_TYPES_PER_PROJECT: u8 = 5;

/// Identifier of a project, the scope of an index space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the team owning a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column index assigned to a group type.
///
/// Always lies in `0..MAX_GROUP_TYPES_PER_PROJECT`; the constructor refuses
/// anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GroupTypeIndex(u8);

impl GroupTypeIndex {
    /// Create an index, returning `None` when `value` is outside the quota.
    pub fn new(value: u8) -> Option<Self> {
        (value < MAX_GROUP_TYPES_PER_PROJECT).then_some(Self(value))
    }

    /// Raw index value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// All indices of the quota range, in ascending order.
    pub fn all() -> impl Iterator<Item = GroupTypeIndex> {
        (0..MAX_GROUP_TYPES_PER_PROJECT).map(GroupTypeIndex)
    }

    /// The index following this one, if it is still within quota.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl TryFrom<u8> for GroupTypeIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "group type index {} out of range (max {})",
                value,
                MAX_GROUP_TYPES_PER_PROJECT - 1
            )
        })
    }
}

impl From<GroupTypeIndex> for u8 {
    fn from(index: GroupTypeIndex) -> Self {
        index.0
    }
}

impl fmt::Display for GroupTypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full name -> index mapping of one project.
pub type GroupTypeToColumnIndex = HashMap<String, GroupTypeIndex>;

/// A persisted mapping row.
///
/// Unique on `(project_id, group_type)` and on `(project_id, group_type_index)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTypeMapping {
    /// Owning team, stored redundantly next to the project.
    pub team_id: TeamId,
    pub project_id: ProjectId,
    pub group_type: String,
    pub group_type_index: GroupTypeIndex,
}

/// Result of a combined conditional insert and lookup against the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// This call created the row with the candidate index.
    Inserted(GroupTypeIndex),
    /// A row for the name already existed; carries its index.
    Existing(GroupTypeIndex),
    /// The candidate index belongs to another name; no row exists for this one.
    IndexTaken,
}

/// Successful allocation of an index for a group type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub index: GroupTypeIndex,
    /// Whether this allocation wrote the row, as opposed to reading one
    /// written concurrently by someone else.
    pub inserted: bool,
}
