//! # Group Type Index Allocation
//!
//! This module maps group type names (e.g. `"organization"`) to small dense
//! column indices, scoped per project, and caches the mapping in memory.
//!
//! ## Overview
//!
//! Every project owns an index space of `0..MAX_GROUP_TYPES_PER_PROJECT`.
//! A name is assigned an index exactly once, even when several ingestion
//! processes see the name for the first time simultaneously. Indices are
//! never reclaimed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    GroupTypeManager                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  In-Memory:                                                  │
//! │  └─ GroupTypeCache (project → name → index, age-bounded)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexAllocator (bounded candidate loop)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  GroupTypeStore (shared, unique on name and on index)        │
//! └─────────────────────────────────────────────────────────────┘
//!          │ first insert only
//!          ▼
//!   NotificationSender ──► NotificationWorker ──► EventNotifier
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//! 1. Cached mapping fresh and contains the name? → return its index
//! 2. Fetch the mapping from the store, refresh the cache
//! 3. Name present now? → return its index
//! 4. Allocate starting at candidate = mapping.len()
//!    ├─ IndexTaken → candidate + 1 (never past the quota)
//!    ├─ None       → quota exhausted, return None
//!    └─ Some(idx)  → invalidate cache, notify if inserted, return idx
//! ```
//!
//! ## Consistency
//!
//! The cache is weakly consistent. A reader may miss a name inserted a moment
//! ago by another caller; it then falls through to the allocator, whose
//! insert degrades to reading the existing row. The store's uniqueness
//! constraints are the only mutual exclusion.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let manager = GroupTypeManager::new(store, GroupTypeManagerConfig::default());
//!
//! let index = manager
//!     .fetch_group_type_index(TeamId(2), ProjectId(2), "organization")
//!     .await?;
//! ```

mod allocator;
mod cache;
mod config;
mod error;
mod manager;
mod mapping;
mod notifier;
mod store;
mod timeout_guard;

pub use allocator::IndexAllocator;
pub use cache::{AgeBoundedCache, CacheStats, GroupTypeCache};
pub use config::GroupTypeManagerConfig;
pub use error::{GroupTypeError, GroupTypeResult};
pub use manager::GroupTypeManager;
pub use mapping::{
    AllocationOutcome, GroupTypeIndex, GroupTypeMapping, GroupTypeToColumnIndex, InsertOutcome,
    ProjectId, TeamId, MAX_GROUP_TYPES_PER_PROJECT,
};
pub use notifier::{
    notification_channel, spawn_notification_worker, EventNotifier, GroupTypeInserted,
    NotificationSender, NotificationWorker, Team, TeamLookup, GROUP_TYPE_INGESTED_EVENT,
};
pub use store::GroupTypeStore;
pub use timeout_guard::with_slow_warning;

#[cfg(test)]
pub(crate) mod mock_store;
