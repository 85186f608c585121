pub mod tree_cache;

pub use tree_cache::TreeCache;
