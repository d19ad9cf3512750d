// ABOUTME: Route Dataset Store: the persisted region -> route -> record JSON document.
// ABOUTME: Loads leniently, merges one route at a time and writes pretty-printed, order-preserving JSON.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Result, WikiError};
use crate::models::RouteRecord;

/// Every scraped route, grouped by region, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteDataset(IndexMap<String, IndexMap<String, RouteRecord>>);

impl RouteDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a dataset file. A missing file is an empty dataset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let target = path.display().to_string();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", target);
                return Ok(Self::default());
            }
            Err(e) => return Err(WikiError::io(target, "LoadDataset", Some(e.into()))),
        };

        serde_json::from_str(&text).map_err(|e| WikiError::json(target, "LoadDataset", Some(e.into())))
    }

    /// Writes the dataset as UTF-8 JSON indented by four spaces.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let target = path.display().to_string();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| WikiError::io(dir.display().to_string(), "SaveDataset", Some(e.into())))?;
        }

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)
            .map_err(|e| WikiError::json(&target, "SaveDataset", Some(e.into())))?;
        buf.push(b'\n');

        fs::write(path, buf).map_err(|e| WikiError::io(target, "SaveDataset", Some(e.into())))
    }

    /// Merges a freshly extracted record into the stored one.
    ///
    /// Top-level keys of `record` replace the stored ones; keys it lacks survive.
    pub fn merge_record(&mut self, region: &str, route_id: &str, record: RouteRecord) {
        let routes = self.0.entry(region.to_string()).or_default();
        match routes.get_mut(route_id) {
            Some(stored) => stored.merge(record),
            None => {
                routes.insert(route_id.to_string(), record);
            }
        }
    }

    pub fn get(&self, region: &str, route_id: &str) -> Option<&RouteRecord> {
        self.0.get(region)?.get(route_id)
    }

    /// Region names in file order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Records of one region in file order; empty for an unknown region.
    pub fn routes_in<'a>(&'a self, region: &str) -> impl Iterator<Item = (&'a str, &'a RouteRecord)> {
        self.0
            .get(region)
            .into_iter()
            .flat_map(|routes| routes.iter())
            .map(|(id, record)| (id.as_str(), record))
    }

    /// Every `(region, route_id, record)` triple in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &RouteRecord)> {
        self.0.iter().flat_map(|(region, routes)| {
            routes
                .iter()
                .map(move |(id, record)| (region.as_str(), id.as_str(), record))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(IndexMap::is_empty)
    }
}

/// The dataset file, updated one route at a time.
///
/// Each merge re-reads the file so a crash loses at most the route in flight.
/// Only one process may use a store at a time.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RouteDataset> {
        RouteDataset::load(&self.path)
    }

    /// Load, merge and save in one step.
    pub fn merge_record(&self, region: &str, route_id: &str, record: RouteRecord) -> Result<()> {
        let mut dataset = self.load()?;
        dataset.merge_record(region, route_id, record);
        dataset.save(&self.path)
    }
}
