//! Refresh orchestration
//!
//! One refresh cycle: fetch the catalog payload, decode it, fan out image
//! materialization over a bounded worker pool, then commit an immutable
//! snapshot. A failed image degrades to an empty slot; a failed fetch or
//! decode aborts the cycle and the previous snapshot stays visible.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};
use tokio::sync::Notify;

use crate::config::Config;
use crate::core::cache::{CatalogCache, GroupImages, ProjectImages};
use crate::core::catalog::{self, CatalogDocument, DecodeError};
use crate::core::image::{self, RemoteImage, TextureQueue};
use crate::util::http::{Transport, TransportError};

/// Cooperative cancellation shared between the shell and refresh workers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake pending waiters.
    pub fn cancel(&self) {
        let already_cancelled = self.cancelled.swap(true, Ordering::SeqCst);
        if !already_cancelled {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// A refresh cycle that did not produce a new snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// Catalog payload could not be fetched.
    #[error("failed to fetch catalog: {0}")]
    Fetch(#[from] TransportError),

    /// Catalog payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The cycle was cancelled before committing.
    #[error("refresh cancelled")]
    Cancelled,
}

/// What one committed refresh cycle produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub generation: u64,
    pub groups: usize,
    pub images_loaded: usize,
    pub images_failed: usize,
}

/// An image slot within a group, addressed by project index where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Logo,
    Background(usize),
    PageBackground(usize),
    Beta,
}

/// Drives refresh cycles against one [`CatalogCache`].
///
/// Owned and wired at startup; the shell holds it behind an `Arc` and
/// triggers cycles from worker threads, never from the render thread.
pub struct Refresher<T: Transport> {
    transport: T,
    config: Config,
    cache: Arc<CatalogCache>,
    textures: Arc<TextureQueue>,
    in_flight: tokio::sync::Mutex<()>,
}

impl<T: Transport> Refresher<T> {
    pub fn new(
        transport: T,
        config: Config,
        cache: Arc<CatalogCache>,
        textures: Arc<TextureQueue>,
    ) -> Self {
        Self {
            transport,
            config,
            cache,
            textures,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one full refresh cycle.
    ///
    /// Returns `Ok(None)` when another cycle is already in flight: the
    /// trigger is dropped, not queued, so commits stay strictly serialized.
    pub async fn run_cycle(
        &self,
        cancel: &CancelToken,
    ) -> Result<Option<RefreshSummary>, RefreshError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("refresh already in flight, ignoring trigger");
            return Ok(None);
        };

        tracing::info!("refreshing catalog from {}", self.config.catalog.url);
        let raw = self.fetch(&self.config.catalog.url, cancel).await?;

        let document = catalog::decode_catalog(&raw)?;
        if cancel.is_cancelled() {
            return Err(RefreshError::Cancelled);
        }

        let jobs = image_jobs(&document);
        let total = jobs.len();
        tracing::debug!(
            "materializing {} images across {} groups",
            total,
            document.len()
        );

        let fan_out = stream::iter(jobs)
            .map(|(key, slot, url)| {
                let transport = &self.transport;
                let substitutions = &self.config.images.substitutions;
                let textures = &self.textures;
                async move {
                    match image::fetch_image(transport, substitutions, &url).await {
                        Ok(fetched) => {
                            textures.push(fetched.clone());
                            (key, slot, Some(fetched))
                        }
                        Err(err) => {
                            tracing::warn!("image {} failed: {}", url, err);
                            (key, slot, None)
                        }
                    }
                }
            })
            .buffer_unordered(self.config.network.concurrent_fetches.max(1))
            .collect::<Vec<_>>();

        let results = tokio::select! {
            _ = cancel.cancelled() => return Err(RefreshError::Cancelled),
            results = fan_out => results,
        };

        let (images, loaded) = assemble(&document, results);
        if cancel.is_cancelled() {
            return Err(RefreshError::Cancelled);
        }

        let snapshot = self.cache.commit(document, images);
        let summary = RefreshSummary {
            generation: snapshot.generation,
            groups: snapshot.document.len(),
            images_loaded: loaded,
            images_failed: total - loaded,
        };
        tracing::info!(
            "catalog refresh committed: generation {}, {} groups, {}/{} images",
            summary.generation,
            summary.groups,
            loaded,
            total
        );

        Ok(Some(summary))
    }

    /// Fetch `url`, racing the request against cancellation.
    async fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Vec<u8>, RefreshError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(RefreshError::Cancelled),
            result = self.transport.get(url) => Ok(result?),
        }
    }
}

/// Enumerate every image reference in the document. Empty URLs are skipped;
/// their slots stay `None` without a fetch.
fn image_jobs(document: &CatalogDocument) -> Vec<(String, Slot, String)> {
    let mut jobs = Vec::new();

    for (key, group) in document {
        if !group.logo.is_empty() {
            jobs.push((key.clone(), Slot::Logo, group.logo.clone()));
        }

        for (index, project) in group.projects.iter().enumerate() {
            if !project.background.is_empty() {
                jobs.push((
                    key.clone(),
                    Slot::Background(index),
                    project.background.clone(),
                ));
            }
            if let Some(url) = &project.page_background {
                if !url.is_empty() {
                    jobs.push((key.clone(), Slot::PageBackground(index), url.clone()));
                }
            }
        }

        if !group.beta.background.is_empty() {
            jobs.push((key.clone(), Slot::Beta, group.beta.background.clone()));
        }
    }

    jobs
}

/// Fold fan-out results into per-group image tables aligned with the
/// document's project order. Returns the tables and the success count.
fn assemble(
    document: &CatalogDocument,
    results: Vec<(String, Slot, Option<RemoteImage>)>,
) -> (BTreeMap<String, GroupImages>, usize) {
    let mut images: BTreeMap<String, GroupImages> = document
        .iter()
        .map(|(key, group)| {
            (
                key.clone(),
                GroupImages {
                    logo: None,
                    projects: vec![ProjectImages::default(); group.projects.len()],
                    beta_background: None,
                },
            )
        })
        .collect();

    let mut loaded = 0;
    for (key, slot, fetched) in results {
        if fetched.is_some() {
            loaded += 1;
        }

        let Some(group) = images.get_mut(&key) else {
            continue;
        };
        match slot {
            Slot::Logo => group.logo = fetched,
            Slot::Background(index) => {
                if let Some(project) = group.projects.get_mut(index) {
                    project.background = fetched;
                }
            }
            Slot::PageBackground(index) => {
                if let Some(project) = group.projects.get_mut(index) {
                    project.page_background = fetched;
                }
            }
            Slot::Beta => group.beta_background = fetched,
        }
    }

    (images, loaded)
}
