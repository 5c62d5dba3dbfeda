//! Entity handles
//!
//! Entities are plain integers. They carry no data and no generation:
//! the manager issues them from a monotonically increasing counter and
//! never hands the same value out twice.

/// Opaque entity handle, used directly as the sparse index of every pool.
pub type EntityId = u32;
