// ABOUTME: Table Classifier: decides which encounter style a wiki table holds from its header shape.
// ABOUTME: Canonical header lists, markup-quirk offsets and body start rows live in one static table.

//! The wiki's own header rows are unreliable: cells are missing, merged or
//! mislabeled depending on the table type. Each style therefore carries a
//! canonical header list that replaces the site's headers, plus the number of
//! header cells the site is known to leave out. The header-cell count the
//! site actually renders (`canonical - omitted`) is what identifies a table
//! when no subsection heading says what it is.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Style;

/// Canonical layout of one encounter table style.
#[derive(Debug)]
pub struct StyleShape {
    pub style: Style,
    /// Column labels in cell order. Empty labels are not stored.
    pub headers: &'static [&'static str],
    /// Header cells the wiki omits from its own header row.
    pub omitted_headers: usize,
    /// First body row to read; some styles carry an extra leading row.
    pub body_start: usize,
}

impl StyleShape {
    /// Number of `<th>` cells the wiki renders for this style.
    pub fn expected_header_count(&self) -> usize {
        self.headers.len() - self.omitted_headers
    }

    /// True when the style has Morning/Day/Night columns.
    pub fn has_time_columns(&self) -> bool {
        self.headers.contains(&"Morning")
    }
}

pub const LAND_HEADERS: &[&str] = &[
    "",
    "Pokémon",
    "Level Range",
    "Morning",
    "Day",
    "Night",
    "Held Item",
    "Rarity Tier",
];

/// The empty label after the time columns is the Rod column, which is not kept.
pub const WATER_HEADERS: &[&str] = &[
    "",
    "Pokémon",
    "Level Range",
    "Morning",
    "Day",
    "Night",
    "",
    "Held Item",
    "Rarity Tier",
];

pub const HEADBUTT_HEADERS: &[&str] = &["", "Pokémon", "Level Range", "Rarity Tier"];

// Land and Water render neither the image nor the Morning/Day/Night headers
// as separate cells; headbutt tables only drop the image header.
pub static SHAPES: [StyleShape; 3] = [
    StyleShape {
        style: Style::Land,
        headers: LAND_HEADERS,
        omitted_headers: 3,
        body_start: 0,
    },
    StyleShape {
        style: Style::Water,
        headers: WATER_HEADERS,
        omitted_headers: 3,
        body_start: 1,
    },
    StyleShape {
        style: Style::HeadbuttableTrees,
        headers: HEADBUTT_HEADERS,
        omitted_headers: 1,
        body_start: 1,
    },
];

/// Rendered header count → styles with that count.
static STYLES_BY_HEADER_COUNT: Lazy<HashMap<usize, Vec<Style>>> = Lazy::new(|| {
    let mut by_count: HashMap<usize, Vec<Style>> = HashMap::new();
    for shape in &SHAPES {
        by_count
            .entry(shape.expected_header_count())
            .or_default()
            .push(shape.style);
    }
    by_count
});

/// Returns the canonical layout of a style.
pub fn shape_of(style: Style) -> &'static StyleShape {
    match style {
        Style::Land => &SHAPES[0],
        Style::Water => &SHAPES[1],
        Style::HeadbuttableTrees => &SHAPES[2],
    }
}

/// Classifies a table from its rendered header cells.
///
/// A style hint taken from the enclosing subsection heading wins outright.
/// Otherwise the header count must match exactly one style; `None` means the
/// table is not an encounter table this crate understands.
pub fn classify<S: AsRef<str>>(header_cells: &[S], style_hint: Option<Style>) -> Option<Style> {
    if let Some(style) = style_hint {
        return Some(style);
    }

    match STYLES_BY_HEADER_COUNT.get(&header_cells.len()) {
        Some(styles) if styles.len() == 1 => Some(styles[0]),
        _ => None,
    }
}
