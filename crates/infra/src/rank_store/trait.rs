use async_trait::async_trait;

use toplist_core::{RankId, UserId};
use toplist_ranks::Rank;

use crate::error::StoreError;
use crate::rank_store::query::RankQuery;

/// Document-store boundary for rank aggregates.
///
/// Each rank is one self-contained document; writes are whole-document and
/// atomic per document. The store maintains `created_at`/`updated_at`:
/// `insert` stamps both, `replace` refreshes `updated_at`.
///
/// The read-modify-write sequence of a caller (load, mutate, `replace`) is
/// **not** serialized against concurrent writers. Two concurrent writers on
/// the same rank resolve by last-write-wins on the whole document; the
/// persisted state is always a self-consistent document, never a partial
/// merge. This is an accepted weak-consistency boundary.
#[async_trait]
pub trait RankStore: Send + Sync {
    /// Persist a new rank. Stamps `created_at` and `updated_at`.
    async fn insert(&self, rank: Rank) -> Result<Rank, StoreError>;

    /// Fetch one rank by id.
    async fn get(&self, id: RankId) -> Result<Option<Rank>, StoreError>;

    /// Whole-document write (save semantics: the document is stored whether
    /// or not the id is currently present). Refreshes `updated_at`.
    async fn replace(&self, rank: Rank) -> Result<Rank, StoreError>;

    /// Delete a rank, returning the removed document if it existed. Embedded
    /// comments go with it; no orphan comment records exist.
    async fn remove(&self, id: RankId) -> Result<Option<Rank>, StoreError>;

    /// Resolve a listing query: filter, sort, then apply the pagination
    /// window. No matches is an empty vector, not an error.
    async fn find(&self, query: RankQuery) -> Result<Vec<Rank>, StoreError>;

    /// All ranks authored by `author`, newest first.
    async fn find_by_author(&self, author: UserId) -> Result<Vec<Rank>, StoreError>;
}
