mod in_memory;
mod query;
mod r#trait;

pub use in_memory::InMemoryRankStore;
pub use query::{Pagination, RankFilter, RankQuery, RankSort};
pub use r#trait::RankStore;
