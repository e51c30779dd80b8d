//! API key and catalogue loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tearsheet::output::Catalog;

#[derive(Debug, Deserialize)]
struct Credentials {
    api_key: String,
}

fn parse_credentials(json: &str) -> Result<String> {
    let credentials: Credentials = serde_json::from_str(json)?;
    Ok(credentials.api_key)
}

/// Resolves the Nasdaq Data Link key: an explicit key wins over the
/// credentials file.
pub(crate) fn api_key(explicit: Option<String>, credentials: &Path) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    if !credentials.exists() {
        bail!(
            "no API key: pass --api-key, set NASDAQ_DATA_LINK_API_KEY or create {}",
            credentials.display()
        );
    }
    let json = std::fs::read_to_string(credentials)
        .with_context(|| format!("reading {}", credentials.display()))?;
    let key = parse_credentials(&json)
        .with_context(|| format!("parsing {}", credentials.display()))?;
    if key.trim().is_empty() {
        bail!("empty api_key in {}", credentials.display());
    }
    tracing::debug!(path = %credentials.display(), "loaded API key");
    Ok(key)
}

/// The metric catalogue: a user file when given, else the built-in one.
pub(crate) fn catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            Catalog::from_path(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(Catalog::builtin()?),
    }
}
