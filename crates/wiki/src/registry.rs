// ABOUTME: Route name registry: the hand-maintained region -> route ids list that drives updates and outlines.
// ABOUTME: Read-only; a missing or malformed file is a configuration error.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, WikiError};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RouteRegistry(IndexMap<String, Vec<String>>);

impl RouteRegistry {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let target = path.display().to_string();
        let text =
            fs::read_to_string(path).map_err(|e| WikiError::registry(&target, "LoadRegistry", Some(e.into())))?;
        Self::from_json(&text).map_err(|e| WikiError::registry(target, "LoadRegistry", e.source))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WikiError::json("registry", "ParseRegistry", Some(e.into())))
    }

    /// Region names in file order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Route ids of one region, `None` for an unknown region.
    pub fn routes_in(&self, region: &str) -> Option<&[String]> {
        self.0.get(region).map(Vec::as_slice)
    }

    /// Every `(region, route_id)` pair in file order, duplicates included.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(region, ids)| ids.iter().map(move |id| (region.as_str(), id.as_str())))
    }
}
