//! Extraction of embedded scan images from analysis results.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::AnalysisResult;

/// Returns the raw bytes of a base64 `data:` URL. Pixels are not decoded.
pub fn decode_data_url(reference: &str) -> anyhow::Result<Vec<u8>> {
    let rest = reference
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("image reference is not an embedded data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("malformed data URL: missing payload separator"))?;
    if !header.ends_with(";base64") {
        bail!("embedded image is not base64-encoded");
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| anyhow!("invalid embedded image payload: {e}"))
}

/// Writes the embedded scan of `result` to `path`, returning the byte count.
pub fn save_embedded_image(result: &AnalysisResult, path: &Path) -> anyhow::Result<usize> {
    let bytes = decode_data_url(&result.image)?;
    fs::write(path, &bytes)
        .with_context(|| format!("failed to write image to '{}'", path.display()))?;
    Ok(bytes.len())
}
