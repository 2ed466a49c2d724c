use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use toplist_core::{CommentId, DomainError, RankId, UserId};
use toplist_infra::{
    InMemoryRankStore, InMemoryUserStore, RankQuery, RankStore, StoreError, UserRecord, UserStore,
};
use toplist_ranks::{Rank, RankDraft};

/// Failure of a service operation: a domain rule said no, or the store did.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A rank plus the display identities resolved for it.
///
/// `usernames` covers the rank author always, and comment authors only on
/// detail views (listing views skip them to keep payloads small).
#[derive(Debug, Clone)]
pub struct RankView {
    pub rank: Rank,
    pub usernames: HashMap<UserId, String>,
}

/// Store wiring used by the HTTP handlers.
///
/// Every mutation is a load → mutate-aggregate → whole-document replace; the
/// replace is atomic per document but the sequence is not serialized against
/// concurrent writers (accepted last-write-wins boundary).
pub struct AppServices {
    ranks: Arc<dyn RankStore>,
    users: Arc<dyn UserStore>,
}

/// In-memory infra wiring (dev/test); a networked document store slots in
/// behind the same traits.
pub fn build_services() -> AppServices {
    AppServices {
        ranks: Arc::new(InMemoryRankStore::new()),
        users: Arc::new(InMemoryUserStore::new()),
    }
}

impl AppServices {
    pub fn user_store(&self) -> Arc<dyn UserStore> {
        self.users.clone()
    }

    /// Resolve a listing query; enrich each rank's author only.
    pub async fn list_ranks(&self, query: RankQuery) -> Result<Vec<RankView>, ServiceError> {
        let ranks = self.ranks.find(query).await?;
        self.listing_views(ranks).await
    }

    pub async fn create_rank(
        &self,
        author: UserId,
        draft: RankDraft,
    ) -> Result<RankView, ServiceError> {
        let rank = Rank::create(RankId::new(), author, draft, Utc::now())?;
        let stored = self.ranks.insert(rank).await?;
        self.detail_view(stored).await
    }

    pub async fn get_rank(&self, id: RankId) -> Result<RankView, ServiceError> {
        let rank = self.load(id).await?;
        self.detail_view(rank).await
    }

    pub async fn update_rank(
        &self,
        id: RankId,
        actor: UserId,
        draft: RankDraft,
    ) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.edit(actor, draft, Utc::now())?;
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    /// Author-only. Embedded comments disappear with the document.
    pub async fn delete_rank(&self, id: RankId, actor: UserId) -> Result<RankView, ServiceError> {
        let rank = self.load(id).await?;
        rank.ensure_author(actor)?;
        let removed = self
            .ranks
            .remove(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        self.detail_view(removed).await
    }

    pub async fn toggle_upvote(&self, id: RankId, actor: UserId) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.toggle_upvote(actor);
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    pub async fn toggle_downvote(
        &self,
        id: RankId,
        actor: UserId,
    ) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.toggle_downvote(actor);
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    pub async fn add_comment(
        &self,
        id: RankId,
        actor: UserId,
        text: String,
    ) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.add_comment(CommentId::new(), actor, text, Utc::now())?;
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    pub async fn edit_comment(
        &self,
        id: RankId,
        comment_id: CommentId,
        actor: UserId,
        text: String,
    ) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.edit_comment(comment_id, actor, text, Utc::now())?;
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    pub async fn delete_comment(
        &self,
        id: RankId,
        comment_id: CommentId,
        actor: UserId,
    ) -> Result<RankView, ServiceError> {
        let mut rank = self.load(id).await?;
        rank.delete_comment(comment_id, actor)?;
        let stored = self.ranks.replace(rank).await?;
        self.detail_view(stored).await
    }

    /// All ranks authored by one user, newest first, authors resolved.
    pub async fn user_ranks(&self, author: UserId) -> Result<Vec<RankView>, ServiceError> {
        let ranks = self.ranks.find_by_author(author).await?;
        self.listing_views(ranks).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ServiceError> {
        Ok(self.users.list().await?)
    }

    async fn load(&self, id: RankId) -> Result<Rank, ServiceError> {
        self.ranks
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound.into())
    }

    async fn detail_view(&self, rank: Rank) -> Result<RankView, ServiceError> {
        let mut ids: Vec<UserId> = Vec::with_capacity(1 + rank.comments.len());
        ids.push(rank.author);
        ids.extend(rank.comments.iter().map(|c| c.author));

        let usernames = self.resolve(&ids).await?;
        Ok(RankView { rank, usernames })
    }

    async fn listing_views(&self, ranks: Vec<Rank>) -> Result<Vec<RankView>, ServiceError> {
        let ids: Vec<UserId> = ranks.iter().map(|r| r.author).collect();
        let usernames = self.resolve(&ids).await?;

        Ok(ranks
            .into_iter()
            .map(|rank| {
                let author = rank.author;
                let mut own = HashMap::with_capacity(1);
                if let Some(name) = usernames.get(&author) {
                    own.insert(author, name.clone());
                }
                RankView {
                    rank,
                    usernames: own,
                }
            })
            .collect())
    }

    async fn resolve(&self, ids: &[UserId]) -> Result<HashMap<UserId, String>, ServiceError> {
        Ok(self
            .users
            .get_many(ids)
            .await?
            .into_iter()
            .map(|(id, user)| (id, user.username))
            .collect())
    }
}
