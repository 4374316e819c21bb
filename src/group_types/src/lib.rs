//! Group type index allocation for event ingestion.
//!
//! See [`storage::group_types`] for the allocation protocol.

pub mod storage;
