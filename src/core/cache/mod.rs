//! Catalog cache
//!
//! Holds the last fully materialized catalog snapshot and publishes it
//! atomically to renderer-side readers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::core::catalog::CatalogDocument;
use crate::core::image::RemoteImage;

/// Resolved images for one project.
///
/// `None` slots mean the reference was absent or failed to materialize.
#[derive(Debug, Clone, Default)]
pub struct ProjectImages {
    pub background: Option<RemoteImage>,
    pub page_background: Option<RemoteImage>,
}

/// Resolved images for one group.
///
/// `projects` has the same length and order as the group's project list.
#[derive(Debug, Clone, Default)]
pub struct GroupImages {
    pub logo: Option<RemoteImage>,
    pub projects: Vec<ProjectImages>,
    pub beta_background: Option<RemoteImage>,
}

/// One immutable, fully resolved view of the catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    /// Strictly increasing commit counter.
    pub generation: u64,
    pub document: CatalogDocument,
    pub images: BTreeMap<String, GroupImages>,
}

impl CatalogSnapshot {
    pub fn group_images(&self, key: &str) -> Option<&GroupImages> {
        self.images.get(key)
    }
}

/// Publishes catalog snapshots to arbitrarily many readers.
///
/// Readers take the read lock only long enough to clone an `Arc`; a refresh
/// in flight never blocks them. The refresh cycle is the sole writer.
#[derive(Debug, Default)]
pub struct CatalogCache {
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    generation: AtomicU64,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest committed snapshot, or `None` before the first commit.
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.read().unwrap().clone()
    }

    /// Publish a new snapshot, replacing the current one atomically.
    ///
    /// The previous snapshot is released once its last reader drops it.
    pub fn commit(
        &self,
        document: CatalogDocument,
        images: BTreeMap<String, GroupImages>,
    ) -> Arc<CatalogSnapshot> {
        debug_assert!(document.iter().all(|(key, group)| {
            images
                .get(key)
                .is_some_and(|resolved| resolved.projects.len() == group.projects.len())
        }));

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = Arc::new(CatalogSnapshot {
            generation,
            document,
            images,
        });

        *self.current.write().unwrap() = Some(Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{BetaProject, Group, Palette, Project};

    fn group_named(name: &str, projects: usize) -> Group {
        Group {
            name: name.to_string(),
            projects: (0..projects)
                .map(|index| Project {
                    name: format!("{name}-{index}"),
                    version: "1.0.0".to_string(),
                    date: "2025-01-01".to_string(),
                    changelog: String::new(),
                    overview: String::new(),
                    description: String::new(),
                    background: String::new(),
                    page_background: None,
                    variants: None,
                    package: None,
                })
                .collect(),
            beta: BetaProject {
                background: String::new(),
            },
            logo: String::new(),
            update: None,
            path: format!("/{name}"),
            palette: Palette {
                primary: "#000000".to_string(),
                secondary: "#000000".to_string(),
                circle1: "#000000".to_string(),
                circle2: "#000000".to_string(),
                circle3: "#000000".to_string(),
                circle4: "#000000".to_string(),
                circle5: "#000000".to_string(),
            },
            hide: None,
        }
    }

    fn snapshot_parts(marker: usize) -> (CatalogDocument, BTreeMap<String, GroupImages>) {
        let key = format!("group-{marker}");
        let mut document = CatalogDocument::new();
        document.insert(key.clone(), group_named(&key, marker));

        let mut images = BTreeMap::new();
        images.insert(
            key,
            GroupImages {
                logo: None,
                projects: vec![ProjectImages::default(); marker],
                beta_background: None,
            },
        );
        (document, images)
    }

    #[test]
    fn test_empty_before_first_commit() {
        let cache = CatalogCache::new();
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_commit_replaces_current() {
        let cache = CatalogCache::new();

        let (document, images) = snapshot_parts(1);
        cache.commit(document, images);
        assert_eq!(cache.current().unwrap().generation, 1);

        let (document, images) = snapshot_parts(2);
        cache.commit(document, images);

        let current = cache.current().unwrap();
        assert_eq!(current.generation, 2);
        assert!(current.document.contains_key("group-2"));
    }

    #[test]
    fn test_readers_never_see_mixed_pairing() {
        let cache = Arc::new(CatalogCache::new());
        let reader_cache = Arc::clone(&cache);

        let reader = std::thread::spawn(move || {
            let mut last_generation = 0;
            for _ in 0..10_000 {
                if let Some(snapshot) = reader_cache.current() {
                    // Document and image table always come from the same
                    // commit: the single document key has a matching image
                    // entry with aligned project counts.
                    let (key, group) = snapshot.document.iter().next().unwrap();
                    let images = snapshot.group_images(key).unwrap();
                    assert_eq!(images.projects.len(), group.projects.len());

                    assert!(snapshot.generation >= last_generation);
                    last_generation = snapshot.generation;
                }
            }
        });

        for marker in 0..100 {
            let (document, images) = snapshot_parts(marker);
            cache.commit(document, images);
        }

        reader.join().unwrap();
    }
}
