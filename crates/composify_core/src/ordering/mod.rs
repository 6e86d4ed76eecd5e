//! Ordered child indexing.
//!
//! # Responsibility
//! - Keep the children of one parent densely indexed (`0..n`) across
//!   insert, delete and reorder.
//! - Stay storage-agnostic: children are read through [`ChildAccessor`] and
//!   written through [`PersistenceGateway`].
//!
//! # Invariants
//! - Indices are data on the child, not positions in storage.
//! - A delete renumbers only the suffix above the removed index.
//! - No state is cached between calls; every operation re-reads children.
//!
//! # Known gap
//! - Renumbering writes are individual units of work. A gateway failure in the
//!   middle of a delete leaves already-applied decrements in place; callers
//!   run [`ChildIndexManager::repair`] to re-derive a dense layout.

mod index_manager;

pub use index_manager::{
    next_index_of, ChildAccessor, ChildIndexManager, IndexError, IndexResult, OrderedChild,
    PersistenceGateway,
};
