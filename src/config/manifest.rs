//! `package.json` fields used as fallbacks

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::domain::services::normalize;

pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` tsrig reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    config: Option<ManifestConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestConfig {
    #[serde(default)]
    port: Option<Value>,
}

impl PackageManifest {
    /// Read `package.json` in `root`. Missing or malformed manifests read as empty.
    pub fn load(root: &Path) -> Self {
        fs::read_to_string(root.join(MANIFEST_FILE))
            .ok()
            .and_then(|text| Self::parse(&text))
            .unwrap_or_default()
    }

    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// `config.port`, as a number or a numeric string
    pub fn port(&self) -> Option<u16> {
        match self.config.as_ref()?.port.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|p| *p != 0)
    }
}

/// Explicit argument, then `TSRIG_ENTRY`, then the manifest's `main`.
///
/// The result is absolute, resolved against `root`.
pub fn resolve_entry(
    explicit: Option<&Path>,
    env: Option<&Path>,
    manifest: &PackageManifest,
    root: &Path,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.map(Path::to_path_buf))
        .or_else(|| manifest.main.as_deref().map(PathBuf::from))
        .map(|entry| normalize(&root.join(entry)))
}
