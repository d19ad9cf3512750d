// ABOUTME: Rust models for route data extracted from the wiki.
// ABOUTME: JSON field names match the route_data.json file consumed by the renderer.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Classification of an encounter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Land,
    Water,
    #[serde(rename = "Headbuttable Trees")]
    HeadbuttableTrees,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Land, Style::Water, Style::HeadbuttableTrees];

    /// The heading text the wiki uses for this style.
    pub fn name(&self) -> &'static str {
        match self {
            Style::Land => "Land",
            Style::Water => "Water",
            Style::HeadbuttableTrees => "Headbuttable Trees",
        }
    }

    /// Maps a subsection heading to a style. Unknown headings give no hint.
    pub fn from_heading(heading: &str) -> Option<Style> {
        let heading = heading.trim();
        Style::ALL.into_iter().find(|style| style.name() == heading)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Time of day during which a creature can appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpawnTime {
    Morning,
    Day,
    Night,
}

impl SpawnTime {
    pub const ALL: [SpawnTime; 3] = [SpawnTime::Morning, SpawnTime::Day, SpawnTime::Night];

    /// Column header for this time of day.
    pub fn name(&self) -> &'static str {
        match self {
            SpawnTime::Morning => "Morning",
            SpawnTime::Day => "Day",
            SpawnTime::Night => "Night",
        }
    }
}

impl fmt::Display for SpawnTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rarity tier as printed by the wiki.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Other(String),
}

impl Rarity {
    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Other(s) => s,
        }
    }
}

impl From<&str> for Rarity {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Common" => Rarity::Common,
            "Uncommon" => Rarity::Uncommon,
            "Rare" => Rarity::Rare,
            other => Rarity::Other(other.to_string()),
        }
    }
}

impl From<String> for Rarity {
    fn from(s: String) -> Self {
        Rarity::from(s.as_str())
    }
}

impl From<Rarity> for String {
    fn from(r: Rarity) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One wild creature row of an encounter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRow {
    /// Path of the cached image, relative to the image root.
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "Pokémon")]
    pub pokemon: String,
    #[serde(rename = "Level Range")]
    pub level_range: String,
    #[serde(rename = "Held Item", default, skip_serializing_if = "Option::is_none")]
    pub held_item: Option<String>,
    #[serde(rename = "Rarity Tier")]
    pub rarity: Rarity,
    /// Only set for styles with time-of-day columns.
    #[serde(rename = "Spawn Times", default, skip_serializing_if = "Option::is_none")]
    pub spawn_times: Option<Vec<SpawnTime>>,
}

/// One row of a route's item table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    /// Item images are not cached; always empty.
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Cooldown")]
    pub cooldown: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

/// Everything known about one route page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub name: String,
    /// Encounter rows keyed by area label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild_pokemon: Option<IndexMap<String, Vec<EncounterRow>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemRow>>,
    /// Keys this crate does not produce, kept as found on disk.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl RouteRecord {
    /// Starts an empty record for an article.
    pub fn new(article_title: &str) -> Self {
        Self {
            name: display_name(article_title),
            ..Default::default()
        }
    }

    /// Merges a newer extraction into this record.
    ///
    /// Top-level keys present in `newer` replace the stored values wholesale;
    /// keys it lacks are left untouched.
    pub fn merge(&mut self, newer: RouteRecord) {
        self.name = newer.name;
        if let Some(wild_pokemon) = newer.wild_pokemon {
            self.wild_pokemon = Some(wild_pokemon);
        }
        if let Some(items) = newer.items {
            self.items = Some(items);
        }
        self.extra.extend(newer.extra);
    }

    /// Appends encounter rows under an area label.
    pub fn add_encounters(&mut self, area: impl Into<String>, rows: Vec<EncounterRow>) {
        self.wild_pokemon
            .get_or_insert_with(IndexMap::new)
            .entry(area.into())
            .or_default()
            .extend(rows);
    }

    /// Appends item rows.
    pub fn add_items(&mut self, rows: Vec<ItemRow>) {
        self.items.get_or_insert_with(Vec::new).extend(rows);
    }

    /// Encounter tables, empty when the page had none.
    pub fn encounter_areas(&self) -> impl Iterator<Item = (&str, &[EncounterRow])> {
        self.wild_pokemon
            .iter()
            .flat_map(|areas| areas.iter())
            .map(|(area, rows)| (area.as_str(), rows.as_slice()))
    }

    /// Hand-curated display title (`"Name"` key), if any.
    pub fn title_override(&self) -> Option<&str> {
        self.extra.get("Name").and_then(|v| v.as_str())
    }
}

/// Turns a route id such as `Route_201` into `Route 201`.
pub fn display_name(route_id: &str) -> String {
    route_id.replace('_', " ")
}
