pub mod backend;
pub mod roster_cache;

pub use backend::{CacheBackend, FileCache, MemoryCache};
pub use roster_cache::RosterCache;
