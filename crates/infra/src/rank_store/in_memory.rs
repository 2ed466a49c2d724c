use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use toplist_core::{RankId, UserId};
use toplist_ranks::Rank;

use crate::error::StoreError;
use crate::rank_store::query::{RankQuery, RankSort};
use crate::rank_store::r#trait::RankStore;

#[derive(Debug, Clone)]
struct Doc {
    /// Monotonic insertion sequence; defines store-native order.
    seq: u64,
    rank: Rank,
}

/// In-memory rank collection.
///
/// Intended for tests/dev. Not optimized for performance: `find` scans the
/// whole collection.
#[derive(Debug, Default)]
pub struct InMemoryRankStore {
    docs: RwLock<HashMap<RankId, Doc>>,
    next_seq: AtomicU64,
}

impl InMemoryRankStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::backend("lock poisoned")
    }
}

#[async_trait]
impl RankStore for InMemoryRankStore {
    async fn insert(&self, mut rank: Rank) -> Result<Rank, StoreError> {
        let now = Utc::now();
        rank.created_at = now;
        rank.updated_at = now;

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut docs = self.docs.write().map_err(|_| Self::lock_poisoned())?;
        docs.insert(
            rank.id,
            Doc {
                seq,
                rank: rank.clone(),
            },
        );
        Ok(rank)
    }

    async fn get(&self, id: RankId) -> Result<Option<Rank>, StoreError> {
        let docs = self.docs.read().map_err(|_| Self::lock_poisoned())?;
        Ok(docs.get(&id).map(|d| d.rank.clone()))
    }

    async fn replace(&self, mut rank: Rank) -> Result<Rank, StoreError> {
        rank.updated_at = Utc::now();

        let mut docs = self.docs.write().map_err(|_| Self::lock_poisoned())?;
        let seq = docs
            .get(&rank.id)
            .map(|d| d.seq)
            .unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::Relaxed));
        docs.insert(
            rank.id,
            Doc {
                seq,
                rank: rank.clone(),
            },
        );
        Ok(rank)
    }

    async fn remove(&self, id: RankId) -> Result<Option<Rank>, StoreError> {
        let mut docs = self.docs.write().map_err(|_| Self::lock_poisoned())?;
        Ok(docs.remove(&id).map(|d| d.rank))
    }

    async fn find(&self, query: RankQuery) -> Result<Vec<Rank>, StoreError> {
        let docs = self.docs.read().map_err(|_| Self::lock_poisoned())?;

        let mut matched: Vec<(u64, Rank)> = docs
            .values()
            .filter(|d| query.filter.matches(&d.rank))
            .map(|d| (d.seq, d.rank.clone()))
            .collect();
        drop(docs);

        // Store-native order first; the stable sort below then leaves it as
        // the tie-break within equal sort keys.
        matched.sort_by_key(|(seq, _)| *seq);
        match query.sort {
            RankSort::Newest => matched.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at)),
            RankSort::Upvotes => matched.sort_by(|a, b| b.1.upvotes.len().cmp(&a.1.upvotes.len())),
        }

        Ok(matched
            .into_iter()
            .skip(query.page.skip())
            .take(query.page.take())
            .map(|(_, rank)| rank)
            .collect())
    }

    async fn find_by_author(&self, author: UserId) -> Result<Vec<Rank>, StoreError> {
        let docs = self.docs.read().map_err(|_| Self::lock_poisoned())?;

        let mut matched: Vec<(u64, Rank)> = docs
            .values()
            .filter(|d| d.rank.author == author)
            .map(|d| (d.seq, d.rank.clone()))
            .collect();
        drop(docs);

        matched.sort_by_key(|(seq, _)| *seq);
        matched.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(matched.into_iter().map(|(_, rank)| rank).collect())
    }
}
