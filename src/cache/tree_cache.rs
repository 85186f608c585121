use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::graph::{build_tree, Graph, NavigationTree};

type TreeKey = Option<String>;

/// Thread-safe LRU cache of navigation trees for one graph
///
/// Trees depend only on the (immutable) graph and the requested root, so a
/// tree built once can be shared by every renderer that needs it. The owner
/// must not reuse a cache across different graphs.
pub struct TreeCache {
    cache: Mutex<LruCache<TreeKey, Arc<NavigationTree>>>,
}

impl TreeCache {
    /// Create a new tree cache with the specified capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of trees to keep; 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Return the tree for `root`, building and caching it on a miss
    ///
    /// Build failures (e.g. no root page) are not cached.
    pub fn get_or_build(&self, graph: &Graph, root: Option<&str>) -> Result<Arc<NavigationTree>> {
        let key: TreeKey = root.map(str::to_string);

        if let Some(tree) = self.lock().get(&key) {
            log::debug!("navigation tree cache hit for root {:?}", root);
            return Ok(Arc::clone(tree));
        }

        let tree = Arc::new(build_tree(graph, root)?);
        self.lock().put(key, Arc::clone(&tree));
        Ok(tree)
    }

    /// Get the current number of cached trees
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<TreeKey, Arc<NavigationTree>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures;

    #[test]
    fn test_cache_hit_returns_same_tree() {
        let graph = fixtures::storefront();
        let cache = TreeCache::new(4);

        let first = cache.get_or_build(&graph, None).unwrap();
        let second = cache.get_or_build(&graph, None).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_tree_matches_fresh_build() {
        let graph = fixtures::storefront();
        let cache = TreeCache::new(4);

        let cached = cache.get_or_build(&graph, Some("login")).unwrap();
        let fresh = build_tree(&graph, Some("login")).unwrap();
        assert_eq!(*cached, fresh);
    }

    #[test]
    fn test_cache_eviction() {
        let graph = fixtures::storefront();
        let cache = TreeCache::new(2);

        let home = cache.get_or_build(&graph, Some("home")).unwrap();
        cache.get_or_build(&graph, Some("cart")).unwrap();
        // Third root evicts "home" (least recently used)
        cache.get_or_build(&graph, Some("login")).unwrap();
        assert_eq!(cache.len(), 2);

        let rebuilt = cache.get_or_build(&graph, Some("home")).unwrap();
        assert!(!Arc::ptr_eq(&home, &rebuilt));
        assert_eq!(*home, *rebuilt);
    }

    #[test]
    fn test_failures_not_cached() {
        let graph = fixtures::storefront();
        let cache = TreeCache::new(2);

        assert!(cache.get_or_build(&graph, Some("header")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_zero_clamped() {
        let graph = fixtures::two_page();
        let cache = TreeCache::new(0);

        cache.get_or_build(&graph, None).unwrap();
        cache.get_or_build(&graph, Some("login")).unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
