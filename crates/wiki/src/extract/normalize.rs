// ABOUTME: Row Normalizer: turns raw table rows into EncounterRow and ItemRow records.
// ABOUTME: Drops malformed rows, resolves creature images, derives spawn times from time-of-day cells.

use indexmap::IndexMap;
use tracing::debug;

use crate::extract::classify::{shape_of, StyleShape};
use crate::extract::table::{RawRow, RawTable};
use crate::images::ImageResolver;
use crate::models::{EncounterRow, ItemRow, Rarity, SpawnTime, Style};

/// Item tables always open with their header row.
pub const ITEM_BODY_START: usize = 1;

/// Columns an item table must name for its rows to be usable.
pub const ITEM_REQUIRED_HEADERS: [&str; 3] = ["Item", "Quantity", "Cooldown"];

/// Normalizes the rows of an encounter table, starting at `start_index`.
///
/// Rows whose cell count differs from the style's canonical header count,
/// rows without an image and rows whose image cannot be cached are skipped.
pub fn normalize(
    style: Style,
    rows: &[RawRow],
    start_index: usize,
    images: &dyn ImageResolver,
) -> Vec<EncounterRow> {
    let shape = shape_of(style);
    rows.iter()
        .enumerate()
        .skip(start_index)
        .filter_map(|(idx, row)| normalize_row(shape, idx, row, images))
        .collect()
}

/// Normalizes an encounter table from the style's own body start row.
pub fn normalize_table(style: Style, table: &RawTable, images: &dyn ImageResolver) -> Vec<EncounterRow> {
    normalize(style, &table.rows, shape_of(style).body_start, images)
}

fn normalize_row(
    shape: &StyleShape,
    idx: usize,
    row: &RawRow,
    images: &dyn ImageResolver,
) -> Option<EncounterRow> {
    if row.data_cells.len() != shape.headers.len() {
        if !row.data_cells.is_empty() {
            debug!(
                row = idx,
                cells = row.data_cells.len(),
                expected = shape.headers.len(),
                "skipping {} row with wrong cell count",
                shape.style
            );
        }
        return None;
    }

    let src = row.image_src.as_deref()?;

    let mut fields: IndexMap<&str, &str> = shape
        .headers
        .iter()
        .zip(&row.data_cells)
        .filter(|(label, _)| !label.is_empty())
        .map(|(label, value)| (*label, value.as_str()))
        .collect();

    let pokemon = fields.shift_remove("Pokémon").unwrap_or_default().to_string();
    let image = images.resolve(&pokemon, src)?;

    let spawn_times = if shape.has_time_columns() {
        let mut times = Vec::new();
        for time in SpawnTime::ALL {
            let present = fields
                .shift_remove(time.name())
                .is_some_and(|text| !text.trim().is_empty());
            if present {
                times.push(time);
            }
        }
        Some(times)
    } else {
        None
    };

    Some(EncounterRow {
        image: Some(image),
        pokemon,
        level_range: fields.shift_remove("Level Range").unwrap_or_default().to_string(),
        held_item: fields.shift_remove("Held Item").map(str::to_string),
        rarity: Rarity::from(fields.shift_remove("Rarity Tier").unwrap_or_default()),
        spawn_times,
    })
}

/// Header list for an item table: the image column followed by the table's own headers.
///
/// `None` when the table does not name every required item column.
pub fn item_headers(table: &RawTable) -> Option<Vec<String>> {
    let mut headers = vec!["Image".to_string()];
    headers.extend(table.all_header_cells());

    let complete = ITEM_REQUIRED_HEADERS
        .iter()
        .all(|required| headers.iter().any(|h| h == required));
    complete.then_some(headers)
}

/// Normalizes item rows against the given headers.
///
/// Item images are not cached, so a missing image is fine here.
pub fn normalize_items(headers: &[String], rows: &[RawRow]) -> Vec<ItemRow> {
    rows.iter()
        .enumerate()
        .skip(ITEM_BODY_START)
        .filter_map(|(idx, row)| {
            if row.data_cells.len() != headers.len() {
                debug!(
                    row = idx,
                    cells = row.data_cells.len(),
                    expected = headers.len(),
                    "skipping item row with wrong cell count"
                );
                return None;
            }

            let mut item = ItemRow::default();
            for (label, value) in headers.iter().zip(&row.data_cells) {
                match label.as_str() {
                    "" | "Image" => {}
                    "Item" => item.item = value.clone(),
                    "Quantity" => item.quantity = value.clone(),
                    "Cooldown" => item.cooldown = value.clone(),
                    other => {
                        item.extra.insert(other.to_string(), value.clone());
                    }
                }
            }
            Some(item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Maps every entity to `pokemon/<entity>.png` and remembers the calls.
    #[derive(Default)]
    struct FakeImages {
        calls: RefCell<Vec<(String, String)>>,
        refuse: Option<&'static str>,
    }

    impl ImageResolver for FakeImages {
        fn resolve(&self, entity: &str, src: &str) -> Option<String> {
            self.calls.borrow_mut().push((entity.to_string(), src.to_string()));
            if self.refuse == Some(entity) {
                return None;
            }
            Some(format!("pokemon/{}.png", entity))
        }
    }

    fn land_row(name: &str, morning: &str, day: &str, night: &str) -> RawRow {
        RawRow::data(
            &["", name, "2-4", morning, day, night, "Oran Berry", "Common"],
            Some("/images/x.png"),
        )
    }

    #[test]
    fn land_row_derives_spawn_times() {
        let images = FakeImages::default();
        let rows = vec![land_row("Hoothoot", "x", "", " x ")];
        let out = normalize(Style::Land, &rows, 0, &images);

        assert_eq!(
            out,
            vec![EncounterRow {
                image: Some("pokemon/Hoothoot.png".into()),
                pokemon: "Hoothoot".into(),
                level_range: "2-4".into(),
                held_item: Some("Oran Berry".into()),
                rarity: Rarity::Common,
                spawn_times: Some(vec![SpawnTime::Morning, SpawnTime::Night]),
            }]
        );
        assert_eq!(
            images.calls.borrow().as_slice(),
            &[("Hoothoot".to_string(), "/images/x.png".to_string())]
        );
    }

    #[test]
    fn whitespace_only_time_cell_is_absent() {
        let images = FakeImages::default();
        let out = normalize(Style::Land, &[land_row("Pidgey", "  ", "x", "")], 0, &images);
        assert_eq!(out[0].spawn_times, Some(vec![SpawnTime::Day]));
    }

    #[test]
    fn wrong_cell_count_yields_nothing() {
        let images = FakeImages::default();
        let rows = vec![
            RawRow::header(&["Pokémon", "Level", "Times", "Item", "Rarity"]),
            RawRow::data(&["", "Pidgey", "2-4"], Some("/images/x.png")),
            land_row("Rattata", "x", "x", "x"),
        ];
        let out = normalize(Style::Land, &rows, 0, &images);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pokemon, "Rattata");
    }

    #[test]
    fn row_without_image_is_dropped() {
        let images = FakeImages::default();
        let mut no_image = land_row("Sentret", "x", "x", "x");
        no_image.image_src = None;
        let rows = vec![land_row("Pidgey", "x", "", ""), no_image];

        let out = normalize(Style::Land, &rows, 0, &images);
        assert_eq!(out.len(), rows.len() - 1);
        assert_eq!(images.calls.borrow().len(), 1);
    }

    #[test]
    fn row_with_unavailable_image_is_dropped() {
        let images = FakeImages {
            refuse: Some("Pidgey"),
            ..Default::default()
        };
        let rows = vec![land_row("Pidgey", "x", "", ""), land_row("Rattata", "", "x", "")];
        let out = normalize(Style::Land, &rows, 0, &images);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pokemon, "Rattata");
    }

    #[test]
    fn water_rod_column_is_not_stored() {
        let images = FakeImages::default();
        let rows = vec![
            RawRow::header(&["Pokémon", "Level", "Times", "Rod", "Item", "Rarity"]),
            RawRow::data(
                &["", "Tentacool", "15-20", "", "x", "", "Good Rod", "", "Rare"],
                Some("/images/t.png"),
            ),
        ];
        let out = normalize(Style::Water, &rows, 1, &images);
        assert_eq!(out.len(), 1);
        let row = &out[0];
        assert_eq!(row.held_item.as_deref(), Some(""));
        assert_eq!(row.rarity, Rarity::Rare);
        assert_eq!(row.spawn_times, Some(vec![SpawnTime::Day]));

        let value = serde_json::to_value(row).unwrap();
        assert!(!value.as_object().unwrap().values().any(|v| v == "Good Rod"));
    }

    #[test]
    fn headbutt_rows_have_no_time_or_item_fields() {
        let images = FakeImages::default();
        let rows = vec![
            RawRow::header(&["Pokémon", "Level", "Rarity"]),
            RawRow::data(&["", "Aipom", "10-12", "Uncommon"], Some("/images/a.png")),
        ];
        let out = normalize_table(Style::HeadbuttableTrees, &RawTable { rows }, &images);
        assert_eq!(
            out,
            vec![EncounterRow {
                image: Some("pokemon/Aipom.png".into()),
                pokemon: "Aipom".into(),
                level_range: "10-12".into(),
                held_item: None,
                rarity: Rarity::Uncommon,
                spawn_times: None,
            }]
        );
    }

    #[test]
    fn start_index_skips_leading_rows() {
        let images = FakeImages::default();
        let rows = vec![
            RawRow::data(&["", "Magikarp", "5", "Common"], Some("/images/m.png")),
            RawRow::data(&["", "Heracross", "20", "Rare"], Some("/images/h.png")),
        ];
        let out = normalize(Style::HeadbuttableTrees, &rows, 1, &images);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pokemon, "Heracross");
    }

    fn item_table() -> RawTable {
        RawTable {
            rows: vec![
                RawRow::header(&["Item", "Quantity", "Cooldown", "Location"]),
                RawRow::data(&["", "Potion", "1", "24 hours", "North grass"], Some("/i/p.png")),
                RawRow::data(&["", "Ether", "2", "Once", "Cave"], None),
                RawRow::data(&["", "Broken"], None),
            ],
        }
    }

    #[test]
    fn item_headers_prefix_image_column() {
        assert_eq!(
            item_headers(&item_table()),
            Some(vec![
                "Image".to_string(),
                "Item".to_string(),
                "Quantity".to_string(),
                "Cooldown".to_string(),
                "Location".to_string(),
            ])
        );
    }

    #[test]
    fn item_headers_require_known_columns() {
        let table = RawTable {
            rows: vec![RawRow::header(&["Trainer", "Reward"])],
        };
        assert_eq!(item_headers(&table), None);
    }

    #[test]
    fn items_tolerate_missing_images() {
        let table = item_table();
        let headers = item_headers(&table).unwrap();
        let items = normalize_items(&headers, &table.rows);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item, "Potion");
        assert_eq!(items[0].quantity, "1");
        assert_eq!(items[0].cooldown, "24 hours");
        assert_eq!(items[0].image, "");
        assert_eq!(items[0].extra.get("Location").map(String::as_str), Some("North grass"));
        assert_eq!(items[1].item, "Ether");
        assert_eq!(items[1].image, "");
    }
}
