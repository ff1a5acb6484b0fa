use async_trait::async_trait;
use mockall::automock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLookup {
    Hit(String),
    /// Hand `generation` back to [`PageCache::put_if_fresh`] once rendered.
    Miss { generation: u64 },
}

/// Rendered pages keyed by their logical path.
#[automock]
#[async_trait]
pub trait PageCache {
    async fn lookup(&self, path: &str) -> PageLookup;
    /// Stores `rendered` unless `path` was revalidated after `generation` was
    /// observed. Returns whether the page was stored.
    async fn put_if_fresh(&self, path: &str, generation: u64, rendered: String) -> bool;
    /// The next read of `path` must miss and re-render.
    async fn revalidate_path(&self, path: &str);
}
