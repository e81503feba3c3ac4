use std::sync::Arc;

use anyhow::{Context, Result};
use image::DynamicImage;

/// Outcome of the logo lookup; the layout consumes both variants the same
/// way, so a dead logo URL can never fail a batch.
#[derive(Clone)]
pub enum Logo {
    Loaded(Arc<DynamicImage>),
    Placeholder,
}

/// Fetch and decode the company logo.
pub async fn fetch_logo(client: &reqwest::Client, url: &str) -> Result<DynamicImage> {
    let bytes = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("logo fetch failed: {url}"))?
        .bytes()
        .await
        .context("logo body read failed")?;

    image::load_from_memory(&bytes).context("logo decode failed")
}
