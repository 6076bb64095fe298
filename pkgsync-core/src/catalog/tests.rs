//! Integration tests for the catalog module

#[cfg(test)]
mod integration_tests {
    use crate::catalog::{
        CatalogError, FetchError, Outcome, PackageDescriptor, PackageManager, SourceFetcher,
    };
    use crate::config::CatalogPaths;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    fn pkg(name: &str, version: &str) -> PackageDescriptor {
        PackageDescriptor::new(name, version)
    }

    /// Serves canned package lists; unknown URLs answer 404
    #[derive(Default)]
    struct StaticFetcher {
        lists: HashMap<String, (Duration, Vec<PackageDescriptor>)>,
    }

    impl StaticFetcher {
        fn serve(mut self, url: &str, packages: Vec<PackageDescriptor>) -> Self {
            self.lists
                .insert(url.to_string(), (Duration::ZERO, packages));
            self
        }

        fn serve_after(mut self, url: &str, delay: Duration, packages: Vec<PackageDescriptor>) -> Self {
            self.lists.insert(url.to_string(), (delay, packages));
            self
        }
    }

    #[async_trait]
    impl SourceFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<PackageDescriptor>, FetchError> {
            match self.lists.get(url) {
                Some((delay, packages)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(packages.clone())
                }
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn open(
        temp_dir: &TempDir,
        sources: &[&str],
        fetcher: StaticFetcher,
    ) -> PackageManager<StaticFetcher> {
        let paths = CatalogPaths::from_root(temp_dir.path());
        let mut manager = PackageManager::with_fetcher(&paths, fetcher).unwrap();
        for url in sources {
            manager.sources_mut().add(url).unwrap();
        }
        manager.sources().save().unwrap();
        manager
    }

    const MAIN: &str = "https://main.example.com/packages.json";
    const MIRROR: &str = "https://mirror.example.com/packages.json";

    #[tokio::test]
    async fn test_refresh_merges_sources_in_priority_order() {
        let temp_dir = TempDir::new().unwrap();
        // The higher-priority source answers last
        let fetcher = StaticFetcher::default()
            .serve_after(
                MAIN,
                Duration::from_millis(50),
                vec![pkg("editor", "1.0"), pkg("shell", "2.0")],
            )
            .serve(MIRROR, vec![pkg("viewer", "0.1"), pkg("editor", "1.5")]);
        let mut manager = open(&temp_dir, &[MAIN, MIRROR], fetcher);

        let summary = manager.refresh().await.unwrap();

        assert_eq!(summary.sources, 2);
        assert_eq!(summary.previous_len, 0);
        assert_eq!(summary.current_len, 3);
        assert_eq!(
            manager.available_packages(),
            &[pkg("editor", "1.5"), pkg("shell", "2.0"), pkg("viewer", "0.1")]
        );

        // Persisted
        let paths = CatalogPaths::from_root(temp_dir.path());
        let reopened = PackageManager::with_fetcher(&paths, StaticFetcher::default()).unwrap();
        assert_eq!(reopened.available_packages(), manager.available_packages());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::default().serve(MAIN, vec![pkg("editor", "1.0")]);
        let mut manager = open(&temp_dir, &[MAIN], fetcher);

        manager.refresh().await.unwrap();
        let first = manager.available_packages().to_vec();
        manager.refresh().await.unwrap();

        assert_eq!(manager.available_packages(), first.as_slice());
    }

    #[tokio::test]
    async fn test_failed_source_aborts_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::default().serve(MAIN, vec![pkg("editor", "1.0")]);
        let mut manager = open(
            &temp_dir,
            &[MAIN, "https://offline.example.com/packages.json"],
            fetcher,
        );

        let err = manager.refresh().await.unwrap_err();

        match err {
            CatalogError::Fetch { source_url, .. } => {
                assert_eq!(source_url, "https://offline.example.com/packages.json")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(manager.available_packages().is_empty());
        assert!(!CatalogPaths::from_root(temp_dir.path()).packages.exists());
    }

    #[tokio::test]
    async fn test_cancelled_refresh_leaves_catalog_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CatalogPaths::from_root(temp_dir.path());
        let seeded = r#"[{"name": "editor", "version": "0.9"}]"#;
        std::fs::write(&paths.packages, seeded).unwrap();

        // The mirror answers long after the caller gives up
        let fetcher = StaticFetcher::default()
            .serve(MAIN, vec![pkg("editor", "1.0"), pkg("shell", "2.0")])
            .serve_after(MIRROR, Duration::from_secs(60), vec![pkg("viewer", "0.1")]);
        let mut manager = open(&temp_dir, &[MAIN, MIRROR], fetcher);

        let result = tokio::time::timeout(Duration::from_millis(100), manager.refresh()).await;
        assert!(result.is_err(), "refresh should still be waiting on the mirror");

        assert_eq!(manager.available_packages(), &[pkg("editor", "0.9")]);
        assert_eq!(std::fs::read_to_string(&paths.packages).unwrap(), seeded);
    }

    #[tokio::test]
    async fn test_malformed_version_aborts_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::default()
            .serve(MAIN, vec![pkg("editor", "1.0")])
            .serve(MIRROR, vec![pkg("editor", "next")]);
        let mut manager = open(&temp_dir, &[MAIN, MIRROR], fetcher);

        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, CatalogError::Version(_)));
        assert!(manager.available_packages().is_empty());
    }

    #[tokio::test]
    async fn test_install_update_remove_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::default()
            .serve(MAIN, vec![pkg("editor", "1.0"), pkg("shell", "2.0")]);
        let mut manager = open(&temp_dir, &[MAIN], fetcher);
        manager.refresh().await.unwrap();

        let mut install = |_: &PackageDescriptor| -> anyhow::Result<Outcome> { Ok(Outcome::Installed) };
        assert_eq!(manager.install_package(0, &mut install).outcome, Outcome::Installed);
        assert_eq!(manager.install_package(1, &mut install).outcome, Outcome::Installed);
        manager.save_installed().unwrap();
        assert!(manager.updated_packages().unwrap().is_empty());

        // A newer editor shows up upstream
        let paths = CatalogPaths::from_root(temp_dir.path());
        let fetcher = StaticFetcher::default()
            .serve(MAIN, vec![pkg("editor", "1.1"), pkg("shell", "2.0")]);
        let mut manager = PackageManager::with_fetcher(&paths, fetcher).unwrap();
        manager.refresh().await.unwrap();

        assert_eq!(manager.updated_packages().unwrap(), vec![pkg("editor", "1.1")]);

        let mut update = |_: &PackageDescriptor| -> anyhow::Result<Outcome> { Ok(Outcome::Updated) };
        let report = manager.install_package(0, &mut update);
        assert_eq!(report.outcome, Outcome::Updated);
        assert_eq!(
            manager.installed_packages(),
            &[pkg("editor", "1.1"), pkg("shell", "2.0")]
        );

        let mut remove = |_: &PackageDescriptor| -> anyhow::Result<Outcome> { Ok(Outcome::Removed) };
        assert_eq!(manager.remove_package(0, &mut remove).outcome, Outcome::Removed);
        manager.save_installed().unwrap();

        let reopened = PackageManager::with_fetcher(&paths, StaticFetcher::default()).unwrap();
        assert_eq!(reopened.installed_packages(), &[pkg("shell", "2.0")]);
    }

    #[tokio::test]
    async fn test_out_of_range_leaves_both_stores_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::default().serve(MAIN, vec![pkg("editor", "1.0")]);
        let mut manager = open(&temp_dir, &[MAIN], fetcher);
        manager.refresh().await.unwrap();

        let mut install = |_: &PackageDescriptor| -> anyhow::Result<Outcome> { Ok(Outcome::Installed) };
        let report = manager.install_package(7, &mut install);
        assert_eq!(report.outcome, Outcome::NotFound);

        let mut remove = |_: &PackageDescriptor| -> anyhow::Result<Outcome> { Ok(Outcome::Removed) };
        let report = manager.remove_package(0, &mut remove);
        assert_eq!(report.outcome, Outcome::NotFound);

        assert_eq!(manager.available_packages(), &[pkg("editor", "1.0")]);
        assert!(manager.installed_packages().is_empty());
    }
}
