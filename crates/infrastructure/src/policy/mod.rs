mod block_cache;
mod sqlite_store;

pub use sqlite_store::SqlitePolicyStore;
