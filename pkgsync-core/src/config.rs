//! Catalog root discovery
//!
//! A catalog root is a directory holding the three documents pkgsync
//! works with. Resolution order:
//! 1. Explicit override (CLI `--root`)
//! 2. `PKGSYNC_ROOT` environment variable
//! 3. Platform-specific user data directory

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Environment variable naming the catalog root
pub const ROOT_ENV_VAR: &str = "PKGSYNC_ROOT";

/// Source list file name
pub const SOURCES_FILE: &str = "sources.json";

/// Available catalog file name
pub const PACKAGES_FILE: &str = "packages.json";

/// Installed set file name
pub const INSTALLED_FILE: &str = "installed.json";

/// Paths of the documents inside a catalog root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    /// Root directory
    pub root: PathBuf,
    /// Source URL list
    pub sources: PathBuf,
    /// Merged available catalog
    pub packages: PathBuf,
    /// Installed set
    pub installed: PathBuf,
}

impl CatalogPaths {
    /// Lay out the documents under `root` without touching the filesystem
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            sources: root.join(SOURCES_FILE),
            packages: root.join(PACKAGES_FILE),
            installed: root.join(INSTALLED_FILE),
            root,
        }
    }

    /// Discover the catalog root and make sure it exists
    pub fn discover() -> Result<Self> {
        Self::discover_with_override(None)
    }

    /// Discover the catalog root with an optional explicit override
    pub fn discover_with_override(cli_override: Option<PathBuf>) -> Result<Self> {
        trace!("Discovering catalog root");

        let root = match cli_override {
            Some(path) => {
                debug!("Using --root override: {}", path.display());
                validate_override(&path, "--root")?;
                path
            }
            None => match std::env::var_os(ROOT_ENV_VAR) {
                Some(value) if !value.is_empty() => {
                    let path = PathBuf::from(value);
                    debug!("Using {} override: {}", ROOT_ENV_VAR, path.display());
                    validate_override(&path, ROOT_ENV_VAR)?;
                    path
                }
                _ => Self::platform_data_dir()?,
            },
        };

        std::fs::create_dir_all(&root).with_context(|| {
            format!("Failed to create catalog root directory: {}", root.display())
        })?;

        Ok(Self::from_root(root))
    }

    /// Get the platform-specific data directory
    fn platform_data_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("io", "pkgsync", "pkgsync")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine data directory")
    }
}

fn validate_override(path: &Path, origin: &str) -> Result<()> {
    if !path.is_absolute() {
        anyhow::bail!(
            "Catalog root from {} must be absolute (got: {})",
            origin,
            path.display()
        );
    }

    if path.exists() && !path.is_dir() {
        anyhow::bail!(
            "Catalog root from {} must be a directory: {}",
            origin,
            path.display()
        );
    }

    Ok(())
}
