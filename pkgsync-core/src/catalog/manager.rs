//! Package manager facade
//!
//! Ties the source list, the available catalog and the installed set of
//! one catalog root together behind the public operations.

use futures::future::try_join_all;

use super::descriptor::{Catalog, PackageDescriptor};
use super::diff::updated_packages;
use super::error::{CatalogError, Result, StoreError};
use super::merge::merge_catalogs;
use super::source::{HttpSourceFetcher, SourceFetcher, SourceList};
use super::store::{CatalogStore, InstalledStore};
use super::transition::{install_package, remove_package, PackageAction, TransitionReport};
use super::version::VersionError;
use crate::config::CatalogPaths;

/// What a refresh did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Number of sources fetched
    pub sources: usize,
    /// Catalog size before the refresh
    pub previous_len: usize,
    /// Catalog size after the refresh
    pub current_len: usize,
}

/// Owns the stores of one catalog root
pub struct PackageManager<F = HttpSourceFetcher> {
    sources: SourceList,
    catalog: CatalogStore,
    installed: InstalledStore,
    fetcher: F,
}

impl PackageManager<HttpSourceFetcher> {
    /// Open a catalog root, fetching sources over HTTP
    pub fn open(paths: &CatalogPaths) -> Result<Self> {
        let fetcher = HttpSourceFetcher::new().map_err(CatalogError::HttpClient)?;
        Self::with_fetcher(paths, fetcher)
    }
}

impl<F> PackageManager<F>
where
    F: SourceFetcher,
{
    /// Open a catalog root with a custom fetcher
    pub fn with_fetcher(paths: &CatalogPaths, fetcher: F) -> Result<Self> {
        Ok(Self {
            sources: SourceList::load_from_path(&paths.sources)?,
            catalog: CatalogStore::load_or_empty(&paths.packages)?,
            installed: InstalledStore::load_or_empty(&paths.installed)?,
            fetcher,
        })
    }

    /// Fetch every source, merge into the catalog and save it
    ///
    /// The current catalog is the merge baseline and sources follow in
    /// configured order. Sources are fetched concurrently but merged in
    /// that order regardless of completion order. Any fetch or version
    /// failure aborts the refresh before the catalog is touched.
    pub async fn refresh(&mut self) -> Result<RefreshSummary> {
        let urls = self.sources.urls().to_vec();
        if urls.is_empty() {
            tracing::warn!("No sources configured; catalog left as is");
        }

        let fetcher = &self.fetcher;
        let fetches = urls.iter().map(|url| async move {
            let catalog = fetcher
                .fetch(url)
                .await
                .map_err(|source| CatalogError::Fetch {
                    source_url: url.clone(),
                    source,
                })?;
            tracing::debug!("Fetched {} packages from '{}'", catalog.len(), url);
            Ok::<_, CatalogError>(catalog)
        });
        let fetched = try_join_all(fetches).await?;

        let previous_len = self.catalog.len();
        let merged = merge_catalogs(std::iter::once(self.catalog.items().to_vec()).chain(fetched))?;

        self.catalog.replace(merged);
        self.catalog.save()?;

        let summary = RefreshSummary {
            sources: urls.len(),
            previous_len,
            current_len: self.catalog.len(),
        };
        tracing::info!(
            "Refreshed catalog from {} source(s): {} -> {} packages",
            summary.sources,
            summary.previous_len,
            summary.current_len
        );

        Ok(summary)
    }

    /// Packages currently considered installed
    pub fn installed_packages(&self) -> &[PackageDescriptor] {
        self.installed.items()
    }

    /// Packages in the merged catalog
    pub fn available_packages(&self) -> &[PackageDescriptor] {
        self.catalog.items()
    }

    /// Catalog entries newer than what is installed
    pub fn updated_packages(&self) -> Result<Catalog, VersionError> {
        updated_packages(self.installed.items(), self.catalog.items())
    }

    /// Install the catalog entry at `index` through `action`
    ///
    /// The installed set is changed in memory only; call
    /// [`save_installed`](Self::save_installed) to persist it.
    pub fn install_package<A>(&mut self, index: usize, action: &mut A) -> TransitionReport
    where
        A: PackageAction + ?Sized,
    {
        install_package(self.catalog.items(), self.installed.items_mut(), index, action)
    }

    /// Remove the installed entry at `index` through `action`
    pub fn remove_package<A>(&mut self, index: usize, action: &mut A) -> TransitionReport
    where
        A: PackageAction + ?Sized,
    {
        remove_package(self.installed.items_mut(), index, action)
    }

    /// Persist the installed set
    pub fn save_installed(&self) -> Result<(), StoreError> {
        self.installed.save()
    }

    /// Configured sources
    pub fn sources(&self) -> &SourceList {
        &self.sources
    }

    /// Mutable access to the configured sources
    pub fn sources_mut(&mut self) -> &mut SourceList {
        &mut self.sources
    }
}
