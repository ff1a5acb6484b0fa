use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::interfaces::page_cache::{PageCache, PageLookup};

#[derive(Debug, Clone)]
struct CachedPage {
    rendered: String,
    rendered_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct PageTable {
    pages: HashMap<String, CachedPage>,
    /// Bumped on every revalidation of a path.
    generations: HashMap<String, u64>,
}

impl PageTable {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or_default()
    }
}

/// Process-local page cache. Entries live until their path is revalidated.
#[derive(Debug, Default)]
pub struct InMemoryPageCache {
    table: RwLock<PageTable>,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn lookup(&self, path: &str) -> PageLookup {
        let table = self.table.read().await;
        match table.pages.get(path) {
            Some(page) => {
                debug!(
                    path,
                    rendered_at = %page.rendered_at,
                    "page_cache: hit"
                );
                PageLookup::Hit(page.rendered.clone())
            }
            None => PageLookup::Miss {
                generation: table.generation(path),
            },
        }
    }

    async fn put_if_fresh(&self, path: &str, generation: u64, rendered: String) -> bool {
        let mut table = self.table.write().await;
        let current = table.generation(path);
        if current != generation {
            debug!(
                path,
                rendered_for = generation,
                current,
                "page_cache: dropped render started before revalidation"
            );
            return false;
        }

        table.pages.insert(
            path.to_string(),
            CachedPage {
                rendered,
                rendered_at: Utc::now(),
            },
        );
        true
    }

    async fn revalidate_path(&self, path: &str) {
        let mut table = self.table.write().await;
        let generation = table.generations.entry(path.to_string()).or_default();
        *generation = generation.wrapping_add(1);
        if table.pages.remove(path).is_some() {
            debug!(path, "page_cache: revalidated cached page");
        }
    }
}
