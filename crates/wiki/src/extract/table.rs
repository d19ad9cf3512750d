// ABOUTME: Flattens an HTML <table> into raw rows of header texts, data texts and image sources.
// ABOUTME: Classification and normalization work on these rows instead of on the DOM.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// One `<tr>` of a wiki table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Trimmed `<th>` texts.
    pub header_cells: Vec<String>,
    /// Trimmed `<td>` texts.
    pub data_cells: Vec<String>,
    /// `src` of the first image in the first data cell.
    pub image_src: Option<String>,
}

impl RawRow {
    /// Convenience constructor for a body row.
    pub fn data<S: AsRef<str>>(cells: &[S], image_src: Option<&str>) -> Self {
        Self {
            header_cells: Vec::new(),
            data_cells: cells.iter().map(|c| c.as_ref().to_string()).collect(),
            image_src: image_src.map(str::to_string),
        }
    }

    /// Convenience constructor for a header row.
    pub fn header<S: AsRef<str>>(cells: &[S]) -> Self {
        Self {
            header_cells: cells.iter().map(|c| c.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }
}

/// All rows of a wiki table, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Reads every `<tr>` of a table element.
    pub fn from_element(table: ElementRef<'_>) -> Self {
        let rows = table
            .select(&ROW)
            .map(|row| {
                let header_cells = row.select(&HEADER_CELL).map(cell_text).collect();
                let cells: Vec<ElementRef<'_>> = row.select(&DATA_CELL).collect();
                let image_src = cells.first().and_then(|first| image_src(*first));
                RawRow {
                    header_cells,
                    data_cells: cells.into_iter().map(cell_text).collect(),
                    image_src,
                }
            })
            .collect();
        Self { rows }
    }

    /// Header texts of the table.
    ///
    /// Some tables start with a row that has no `<th>` at all; the second row
    /// then carries the headers. `None` when neither row has any.
    pub fn header_cells(&self) -> Option<&[String]> {
        self.rows
            .iter()
            .take(2)
            .map(|row| row.header_cells.as_slice())
            .find(|cells| !cells.is_empty())
    }

    /// Every `<th>` text in the table, in document order.
    pub fn all_header_cells(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.header_cells.iter().cloned())
            .collect()
    }
}

/// Text content of an element with whitespace runs collapsed.
pub fn cell_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn image_src(cell: ElementRef<'_>) -> Option<String> {
    let img = cell.select(&IMAGE).next()?;
    // Lazy-loaded thumbnails keep the real source in data-src
    img.value()
        .attr("src")
        .or_else(|| img.value().attr("data-src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn parse_first_table(html: &str) -> RawTable {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse("table").unwrap();
        RawTable::from_element(doc.select(&selector).next().unwrap())
    }

    #[test]
    fn reads_headers_cells_and_image() {
        let table = parse_first_table(
            r#"<table>
                <tr><th>Pokémon</th><th> Level
                    range </th></tr>
                <tr><td><img src="/images/Pidgey.png"></td><td> Pidgey </td></tr>
            </table>"#,
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].header_cells, vec!["Pokémon", "Level range"]);
        assert!(table.rows[0].data_cells.is_empty());
        assert_eq!(table.rows[1].data_cells, vec!["", "Pidgey"]);
        assert_eq!(table.rows[1].image_src.as_deref(), Some("/images/Pidgey.png"));
    }

    #[test]
    fn image_only_taken_from_first_cell() {
        let table = parse_first_table(
            r#"<table><tr><td>Pidgey</td><td><img src="/images/Pidgey.png"></td></tr></table>"#,
        );
        assert_eq!(table.rows[0].image_src, None);
    }

    #[test]
    fn data_src_fallback() {
        let table = parse_first_table(
            r#"<table><tr><td><img data-src="/images/Zubat.png"></td></tr></table>"#,
        );
        assert_eq!(table.rows[0].image_src.as_deref(), Some("/images/Zubat.png"));
    }

    #[test]
    fn header_falls_back_to_second_row() {
        let table = RawTable {
            rows: vec![
                RawRow::data(&["Land encounters"], None),
                RawRow::header(&["Pokémon", "Level", "Rarity"]),
            ],
        };
        assert_eq!(
            table.header_cells().map(<[String]>::len),
            Some(3)
        );
    }

    #[test]
    fn header_missing_from_both_rows() {
        let table = RawTable {
            rows: vec![
                RawRow::data(&["a"], None),
                RawRow::data(&["b"], None),
                RawRow::header(&["late"]),
            ],
        };
        assert_eq!(table.header_cells(), None);
        assert_eq!(RawTable::default().header_cells(), None);
    }
}
