// ABOUTME: Batch updater: fetches, extracts and stores every registry route in turn.
// ABOUTME: A failing route is logged and counted; it never stops the rest of the run.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::client::Fetcher;
use crate::error::Result;
use crate::extract::PageExtractor;
use crate::images::ImageResolver;
use crate::models::RouteRecord;
use crate::registry::RouteRegistry;
use crate::store::DatasetStore;

/// Outcome counts of one update run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated: usize,
    pub failed: usize,
    /// Routes listed more than once in the registry.
    pub skipped: usize,
}

pub struct Updater<'a> {
    fetcher: &'a dyn Fetcher,
    images: &'a dyn ImageResolver,
    store: DatasetStore,
}

impl<'a> Updater<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, images: &'a dyn ImageResolver, store: DatasetStore) -> Self {
        Self { fetcher, images, store }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Updates every registry route, or only the named ones when `only` is given.
    pub fn update(&self, registry: &RouteRegistry, only: Option<&[String]>) -> UpdateSummary {
        if let Some(only) = only {
            for wanted in only {
                if !registry.routes().any(|(_, route)| route == wanted) {
                    warn!("{} is not in the route registry", wanted);
                }
            }
        }

        let mut summary = UpdateSummary::default();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for (region, route) in registry.routes() {
            if only.is_some_and(|only| !only.iter().any(|wanted| wanted == route)) {
                continue;
            }
            if !seen.insert((region, route)) {
                summary.skipped += 1;
                continue;
            }

            match self.update_route(region, route) {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    warn!("Failed to update {}/{}: {}", region, route, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            updated = summary.updated,
            failed = summary.failed,
            skipped = summary.skipped,
            "update finished"
        );
        summary
    }

    /// Fetches one route page, extracts it and merges it into the store.
    pub fn update_route(&self, region: &str, route: &str) -> Result<RouteRecord> {
        let html = self.fetcher.fetch_page(route)?;
        let record = PageExtractor::new(self.images).extract_html(route, &html);
        self.store.merge_record(region, route, record.clone())?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WikiError;
    use bytes::Bytes;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><body>
        <h2>Items</h2>
        <table>
          <tr><th>Item</th><th>Quantity</th><th>Cooldown</th></tr>
          <tr><td></td><td>Potion</td><td>1</td><td>Once</td></tr>
        </table>
    </body></html>"#;

    /// Serves `PAGE` for every title except the failing one.
    struct FakeWiki {
        failing: &'static str,
        pages: RefCell<Vec<String>>,
    }

    impl Fetcher for FakeWiki {
        fn fetch_page(&self, article_title: &str) -> Result<String> {
            self.pages.borrow_mut().push(article_title.to_string());
            if article_title == self.failing {
                return Err(WikiError::fetch(article_title, "FetchPage", None));
            }
            Ok(PAGE.to_string())
        }

        fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
            Err(WikiError::fetch(url, "FetchBytes", None))
        }
    }

    struct NoImages;

    impl ImageResolver for NoImages {
        fn resolve(&self, _entity: &str, _src: &str) -> Option<String> {
            None
        }
    }

    fn registry() -> RouteRegistry {
        RouteRegistry::from_json(r#"{"Kanto": ["Route_1", "Route_2", "Route_1"], "Johto": ["Route_29"]}"#)
            .unwrap()
    }

    #[test]
    fn failure_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        let wiki = FakeWiki {
            failing: "Route_2",
            pages: RefCell::new(Vec::new()),
        };
        let updater = Updater::new(&wiki, &NoImages, DatasetStore::new(dir.path().join("route_data.json")));

        let summary = updater.update(&registry(), None);
        assert_eq!(
            summary,
            UpdateSummary {
                updated: 2,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(*wiki.pages.borrow(), vec!["Route_1", "Route_2", "Route_29"]);

        let dataset = updater.store().load().unwrap();
        assert!(dataset.get("Kanto", "Route_1").is_some());
        assert!(dataset.get("Kanto", "Route_2").is_none());
        assert_eq!(
            dataset.get("Johto", "Route_29").and_then(|r| r.items.as_ref()).map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn only_filter_limits_the_run() {
        let dir = TempDir::new().unwrap();
        let wiki = FakeWiki {
            failing: "",
            pages: RefCell::new(Vec::new()),
        };
        let updater = Updater::new(&wiki, &NoImages, DatasetStore::new(dir.path().join("route_data.json")));

        let only = vec!["Route_29".to_string(), "Route_404".to_string()];
        let summary = updater.update(&registry(), Some(&only));
        assert_eq!(summary.updated, 1);
        assert_eq!(*wiki.pages.borrow(), vec!["Route_29"]);
    }
}
