//! CLI module
//!
//! Headless catalog commands for hangar.

mod args;

pub use args::{Args, Commands};

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::core::cache::CatalogCache;
use crate::core::catalog::{self, CatalogDocument};
use crate::core::image::TextureQueue;
use crate::core::refresh::{CancelToken, Refresher};
use crate::core::registry;
use crate::util::http::{HttpTransport, Transport};

/// Run one refresh cycle without the GUI and print what it did.
pub async fn run_sync(config: Config) -> Result<()> {
    let transport = HttpTransport::new(&config.network)?;
    let cache = Arc::new(CatalogCache::new());
    let textures = Arc::new(TextureQueue::new());
    let refresher = Refresher::new(transport, config, cache, textures);

    println!("🔄 Syncing catalog...");

    let summary = refresher
        .run_cycle(&CancelToken::new())
        .await
        .context("Catalog refresh failed")?
        .context("Refresh skipped: another cycle in flight")?;

    println!("✅ Catalog synced (generation {})", summary.generation);
    println!("   Groups: {}", summary.groups);
    println!(
        "   Images: {} loaded, {} failed",
        summary.images_loaded, summary.images_failed
    );

    Ok(())
}

/// Fetch and decode the catalog, then print it as JSON. No image fetches.
pub async fn run_dump(config: Config, pretty: bool) -> Result<()> {
    let transport = HttpTransport::new(&config.network)?;

    let raw = transport
        .get(&config.catalog.url)
        .await
        .context("Failed to fetch catalog")?;
    let document = catalog::decode_catalog(&raw).context("Failed to decode catalog")?;

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", json);

    Ok(())
}

/// Encode a JSON catalog document into the compressed wire format.
pub fn run_pack(input: &Path, output: &Path) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .context(format!("Failed to read {}", input.display()))?;
    let document: CatalogDocument =
        serde_json::from_str(&json).context("Input is not a catalog document")?;

    let bytes = catalog::encode_catalog(&document)?;
    std::fs::write(output, &bytes).context(format!("Failed to write {}", output.display()))?;

    println!(
        "📦 Packed {} groups into {} ({} bytes)",
        document.len(),
        output.display(),
        bytes.len()
    );

    Ok(())
}

/// List the static product registry.
pub fn list_products() -> Result<()> {
    println!("📦 Known products ({}):", registry::all().len());
    println!();

    for entry in registry::all() {
        println!("   {} - {} {}", entry.code, entry.group, entry.aircraft);
    }

    Ok(())
}
