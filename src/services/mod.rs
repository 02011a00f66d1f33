// Service exports
pub mod cache;
pub mod locks;
pub mod matching;
pub mod postgres;
pub mod store;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use locks::UserLocks;
pub use matching::{MatchService, MatchServiceError, MatchServiceOptions};
pub use postgres::PostgresStore;
pub use store::{MatchStore, MemoryStore, StoreError};
