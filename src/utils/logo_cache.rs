use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use image::DynamicImage;
use moka::future::Cache;
use once_cell::sync::Lazy;

use crate::render::logo::{self, Logo};

/// Decoded logos keyed by URL. The image is immutable once decoded, so one
/// entry serves every render in every batch.
pub static LOGO_CACHE: Lazy<Cache<String, Arc<DynamicImage>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(8)
        .time_to_live(Duration::from_secs(3600)) // re-fetch hourly
        .build()
});

/// Logo for a batch: cached copy if present, otherwise fetch + decode.
/// Any failure degrades to the placeholder and is logged, never surfaced.
pub async fn logo_for(client: &reqwest::Client, url: &str) -> Logo {
    if let Some(img) = LOGO_CACHE.get(url).await {
        return Logo::Loaded(img);
    }

    match logo::fetch_logo(client, url).await {
        Ok(img) => {
            let img = Arc::new(img);
            LOGO_CACHE.insert(url.to_string(), img.clone()).await;
            Logo::Loaded(img)
        }
        Err(e) => {
            tracing::warn!(error = %e, url, "logo unavailable, using text placeholder");
            Logo::Placeholder
        }
    }
}

/// Pre-fetch the configured logo so the first upload does not pay for it.
pub async fn warmup_logo_cache(client: &reqwest::Client, url: &str) -> Result<()> {
    let img = logo::fetch_logo(client, url).await?;
    let (w, h) = (img.width(), img.height());
    LOGO_CACHE.insert(url.to_string(), Arc::new(img)).await;

    log::info!("Logo cache warmup complete: {} ({}x{})", url, w, h);

    Ok(())
}
