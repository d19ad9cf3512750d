// ABOUTME: LaTeX longtable fragments for encounter and item tables.
// ABOUTME: Row colors follow the encounter area, rarity and spawn time cells are colored, text is escaped.

use proguide_wiki::{display_name, EncounterRow, ItemRow, Rarity, SpawnTime};
use tracing::debug;

/// Renders one table of a route into a self-contained fragment.
///
/// `None` means there was nothing to render and no file should be written.
pub trait FragmentRenderer {
    fn render_encounters(&self, route_id: &str, area: &str, rows: &[EncounterRow]) -> Option<String>;
    fn render_items(&self, route_id: &str, rows: &[ItemRow]) -> Option<String>;
}

/// Thumbnail width of creature images.
pub const IMAGE_WIDTH: &str = r"0.02\textwidth";

const GROUND_COLOR: &str = "GroundColor";
const WATER_COLOR: &str = "WaterColor";
const DEFAULT_ROW_COLOR: &str = "gray";

/// `longtable` renderer used for the guide.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Pokemon,
    LevelRange,
    HeldItem,
    Rarity,
    SpawnTimes,
}

impl Column {
    fn header(self) -> &'static str {
        match self {
            Column::Pokemon => "Pokémon",
            Column::LevelRange => "Level Range",
            Column::HeldItem => "Held Item",
            Column::Rarity => "Rarity Tier",
            Column::SpawnTimes => "Spawn Times",
        }
    }

    fn cell(self, row: &EncounterRow) -> String {
        match self {
            Column::Pokemon => escape(&row.pokemon),
            Column::LevelRange => escape(&row.level_range),
            Column::HeldItem => escape(row.held_item.as_deref().unwrap_or_default()),
            Column::Rarity => rarity_cell(&row.rarity),
            Column::SpawnTimes => spawn_times_cell(row.spawn_times.as_deref().unwrap_or_default()),
        }
    }
}

/// Columns shown for a table, taken from the fields its first row carries.
fn columns_for(first: &EncounterRow) -> Vec<Column> {
    let mut columns = vec![Column::Pokemon, Column::LevelRange];
    if first.held_item.is_some() {
        columns.push(Column::HeldItem);
    }
    columns.push(Column::Rarity);
    if first.spawn_times.is_some() {
        columns.push(Column::SpawnTimes);
    }
    columns
}

impl FragmentRenderer for LatexRenderer {
    fn render_encounters(&self, route_id: &str, area: &str, rows: &[EncounterRow]) -> Option<String> {
        let route_name = display_name(route_id);
        let shown_area = area_title(&route_name, area);

        let Some(first) = rows.first() else {
            debug!("Empty table provided for {} ({})", route_name, area);
            return None;
        };

        let columns = columns_for(first);
        let bg = row_color(shown_area);

        let mut header = vec![String::new()];
        header.extend(columns.iter().map(|c| escape(c.header())));

        let mut lines = vec![
            format!(r"\begin{{longtable}}{{{}}}", column_spec(header.len())),
            r"\hline".to_string(),
            format!(r"\rowcolor{{{}}}", bg),
            table_row(&header),
            r"\hline".to_string(),
            r"\endhead".to_string(),
            r"\hline".to_string(),
        ];

        for row in rows {
            let mut cells = vec![image_cell(row.image.as_deref())];
            cells.extend(columns.iter().map(|c| c.cell(row)));
            lines.push(format!(r"\rowcolor{{{}}}", bg));
            lines.push(table_row(&cells));
            lines.push(r"\hline".to_string());
        }

        lines.push(format!(
            r"\caption{{{}}}",
            escape(&format!("Wild Pokémon in {} ({})", route_name, shown_area))
        ));
        lines.push(format!(r"\label{{tab:{}}}", label_id(route_id, area)));
        lines.push(r"\end{longtable}".to_string());

        Some(finish(lines))
    }

    fn render_items(&self, route_id: &str, rows: &[ItemRow]) -> Option<String> {
        if rows.is_empty() {
            debug!("No items for {}", route_id);
            return None;
        }

        let route_name = display_name(route_id);
        let mut lines = vec![
            r"\begin{longtable}{|| l l l l ||}".to_string(),
            r"\hline".to_string(),
            table_row(&["", "Item", "Quantity", "Cooldown"]),
            r"\hline".to_string(),
            r"\endhead".to_string(),
            r"\hline".to_string(),
        ];

        for item in rows {
            lines.push(table_row(&[
                image_cell(Some(item.image.as_str())),
                escape(&item.item),
                escape(&item.quantity),
                escape(&item.cooldown),
            ]));
            lines.push(r"\hline".to_string());
        }

        lines.push(format!(r"\caption{{{}}}", escape(&format!("Items in {}", route_name))));
        lines.push(format!(r"\label{{tab:{}_Items}}", label_text(route_id)));
        lines.push(r"\end{longtable}".to_string());

        Some(finish(lines))
    }
}

/// Area label without a leading copy of the route's own name.
///
/// `Route 29 Headbutt` on Route 29 reads as `Headbutt`.
pub fn area_title<'a>(route_name: &str, area: &'a str) -> &'a str {
    area.strip_prefix(route_name)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(area)
}

fn row_color(area: &str) -> &'static str {
    match area {
        "Land" | "Headbuttable Trees" => GROUND_COLOR,
        "Water" => WATER_COLOR,
        _ => DEFAULT_ROW_COLOR,
    }
}

fn rarity_color(rarity: &Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "black",
        Rarity::Uncommon => "OliveGreen",
        Rarity::Rare => "RedOrange",
        Rarity::Other(_) => "black",
    }
}

fn spawn_time_color(time: SpawnTime) -> &'static str {
    match time {
        SpawnTime::Morning => "yellow",
        SpawnTime::Day => "orange",
        SpawnTime::Night => "blue",
    }
}

fn spawn_time_label(time: SpawnTime) -> &'static str {
    match time {
        SpawnTime::Morning => "Morn",
        other => other.name(),
    }
}

fn rarity_cell(rarity: &Rarity) -> String {
    format!(r"\textcolor{{{}}}{{{}}}", rarity_color(rarity), escape(rarity.as_str()))
}

/// Members only, always in Morning, Day, Night order.
fn spawn_times_cell(times: &[SpawnTime]) -> String {
    SpawnTime::ALL
        .into_iter()
        .filter(|time| times.contains(time))
        .map(|time| format!(r"\textcolor{{{}}}{{{}}}", spawn_time_color(time), spawn_time_label(time)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn image_cell(path: Option<&str>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!(r"\includegraphics[width={}]{{{}}}", IMAGE_WIDTH, path),
        _ => String::new(),
    }
}

fn column_spec(columns: usize) -> String {
    format!("||{}||", vec!["l"; columns].join(" "))
}

fn table_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
    format!(r"{}\\", cells.join(" & "))
}

fn label_id(route_id: &str, area: &str) -> String {
    label_text(&format!("{}_{}", route_id, area))
}

/// Label keys drop parentheses and use `_` for spaces.
fn label_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Escapes LaTeX special characters in running text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\^{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            '[' => out.push_str("{[}"),
            ']' => out.push_str("{]}"),
            _ => out.push(c),
        }
    }
    out
}
