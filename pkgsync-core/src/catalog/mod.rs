//! pkgsync Catalog - package discovery and install-state tracking
//!
//! This module provides functionality for synchronizing a local package
//! catalog from remote sources and tracking which packages are installed.
//!
//! # Overview
//!
//! The catalog system allows users to:
//! - Pull package lists from any number of remote sources
//! - Merge them into one catalog where the highest version of a name wins
//! - Find installed packages with newer versions available
//! - Install, update and remove packages through a caller-supplied action
//!
//! # Architecture
//!
//! ```text
//! Sources (sources.json)
//!     │
//!     ├── https://a.example/packages.json  ← JSON array of descriptors
//!     └── https://b.example/packages.json
//!            │
//!            ▼
//!     merge (highest version wins, order kept)
//!            │
//!            ▼
//!     packages.json   ← Available catalog
//!     installed.json  ← Installed set, advanced by install/remove
//! ```

mod descriptor;
mod diff;
mod error;
mod manager;
mod merge;
mod source;
mod store;
mod transition;
mod version;

pub use descriptor::{Catalog, PackageDescriptor};
pub use diff::updated_packages;
pub use error::{CatalogError, FetchError, Result, StoreError};
pub use manager::{PackageManager, RefreshSummary};
pub use merge::{merge_catalogs, merge_into};
pub use source::{HttpSourceFetcher, SourceFetcher, SourceList};
pub use store::{CatalogStore, InstalledStore, JsonDocument};
pub use transition::{
    install_package, remove_package, Outcome, PackageAction, TransitionFault, TransitionReport,
};
pub use version::{compare_versions, Version, VersionError};

#[cfg(test)]
mod tests;
