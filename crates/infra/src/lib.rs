//! `toplist-infra` — persistence boundary.
//!
//! The document store is modeled as traits with find/sort/skip/limit
//! capabilities; the in-memory implementations back dev and tests, and a
//! networked backend can slot in behind the same traits.

pub mod error;
pub mod rank_store;
pub mod user_store;

pub use error::StoreError;
pub use rank_store::{InMemoryRankStore, Pagination, RankFilter, RankQuery, RankSort, RankStore};
pub use user_store::{InMemoryUserStore, UserRecord, UserStore};
