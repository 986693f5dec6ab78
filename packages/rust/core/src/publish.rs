//! Published output directory.
//!
//! A generation pass is published as:
//! ```text
//! <out_dir>/
//! ├── index.html
//! ├── props.json
//! └── manifest.json
//! ```
//! Every file is written to a temp file first and renamed into place; the
//! manifest goes last, so a readable manifest always describes a complete
//! output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use storefront_shared::{Result, StorefrontError};

use crate::fetcher::PageProps;

pub const INDEX_FILE: &str = "index.html";
pub const PROPS_FILE: &str = "props.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Metadata describing one published generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishManifest {
    pub generated_at: DateTime<Utc>,
    pub revalidate_secs: u64,
    pub locale: String,
    pub preview: bool,
    /// SHA-256 of `index.html`, hex encoded.
    pub content_hash: String,
}

impl PublishManifest {
    /// When this output goes stale.
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.revalidate_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| self.generated_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the output is still within its revalidation interval at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// Whether this output was generated for the same locale and mode.
    pub fn matches(&self, locale: &str, preview: bool) -> bool {
        self.locale == locale && self.preview == preview
    }
}

/// Per-publish metadata supplied by the caller.
#[derive(Debug, Clone)]
pub struct PublishMeta<'a> {
    pub locale: &'a str,
    pub preview: bool,
    pub revalidate: Duration,
    pub generated_at: DateTime<Utc>,
}

/// Output from a successful publish.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub out_dir: PathBuf,
    pub manifest: PublishManifest,
}

/// Write the rendered page, its props and the manifest into `out_dir`.
#[instrument(skip_all, fields(out_dir = %out_dir.display(), locale = meta.locale, preview = meta.preview))]
pub fn publish(
    out_dir: &Path,
    html: &str,
    props: &PageProps,
    meta: &PublishMeta<'_>,
) -> Result<PublishResult> {
    std::fs::create_dir_all(out_dir).map_err(|e| StorefrontError::io(out_dir, e))?;

    write_atomic(&out_dir.join(INDEX_FILE), html.as_bytes())?;
    write_json(&out_dir.join(PROPS_FILE), props)?;

    let manifest = PublishManifest {
        generated_at: meta.generated_at,
        revalidate_secs: meta.revalidate.as_secs(),
        locale: meta.locale.to_string(),
        preview: meta.preview,
        content_hash: sha256_hex(html.as_bytes()),
    };
    write_json(&out_dir.join(MANIFEST_FILE), &manifest)?;

    info!(
        hash = %manifest.content_hash,
        expires_at = %manifest.expires_at().to_rfc3339(),
        "home page published"
    );

    Ok(PublishResult {
        out_dir: out_dir.to_path_buf(),
        manifest,
    })
}

/// Read the manifest of a published output, if there is one.
pub fn read_manifest(out_dir: &Path) -> Result<Option<PublishManifest>> {
    let path = out_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| StorefrontError::io(&path, e))?;
    let manifest = serde_json::from_str(&content)
        .map_err(|e| StorefrontError::validation(format!("invalid {MANIFEST_FILE}: {e}")))?;
    Ok(Some(manifest))
}

/// The manifest of a published output for `locale` and mode that has not gone stale at `now`.
pub fn fresh_manifest(
    out_dir: &Path,
    locale: &str,
    preview: bool,
    now: DateTime<Utc>,
) -> Result<Option<PublishManifest>> {
    Ok(read_manifest(out_dir)?.filter(|m| m.matches(locale, preview) && m.is_fresh(now)))
}

/// Verify that a published output is complete and its page matches the manifest hash.
pub fn validate_output(out_dir: &Path) -> Result<PublishManifest> {
    for file in [INDEX_FILE, PROPS_FILE] {
        if !out_dir.join(file).exists() {
            return Err(StorefrontError::validation(format!("missing {file}")));
        }
    }

    let manifest = read_manifest(out_dir)?
        .ok_or_else(|| StorefrontError::validation(format!("missing {MANIFEST_FILE}")))?;

    let index = out_dir.join(INDEX_FILE);
    let html = std::fs::read(&index).map_err(|e| StorefrontError::io(&index, e))?;
    let actual = sha256_hex(&html);
    if actual != manifest.content_hash {
        return Err(StorefrontError::validation(format!(
            "{INDEX_FILE} hash mismatch: manifest has {}, file has {actual}",
            manifest.content_hash
        )));
    }

    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write a JSON file (pretty-printed).
fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| {
        StorefrontError::validation(format!("JSON serialization failed: {e}"))
    })?;
    write_atomic(path, json.as_bytes())
}

/// Write to a dot-prefixed temp file next to `path`, then rename over it.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| StorefrontError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| StorefrontError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
