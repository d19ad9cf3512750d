// ABOUTME: Page Data Extractor: walks a route page's headings and tables in document order.
// ABOUTME: Tracks the active section/subsection in an explicit state enum and dispatches each table.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info};

use crate::extract::classify::classify;
use crate::extract::normalize::{item_headers, normalize_items, normalize_table};
use crate::extract::table::{cell_text, RawTable};
use crate::images::ImageResolver;
use crate::models::{RouteRecord, Style};

static FIRST_SECTION: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse(".mw-headline").unwrap());
static WRAPPED_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3").unwrap());

/// Section heading of the encounter tables.
pub const WILD_POKEMON_SECTION: &str = "Wild Pokémon";
/// Section heading of the item tables.
pub const ITEMS_SECTION: &str = "Items";

/// Top-level page section, from an `h2` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    WildPokemon,
    Items,
    Other(String),
}

impl Section {
    fn from_heading(heading: &str) -> Self {
        match heading {
            WILD_POKEMON_SECTION => Section::WildPokemon,
            ITEMS_SECTION => Section::Items,
            other => Section::Other(other.to_string()),
        }
    }
}

/// Heading context at the current point of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    NoSection,
    InSection(Section),
    InSubsection(Section, String),
}

impl WalkState {
    /// An `h2` starts a new section and closes any subsection.
    pub fn enter_section(self, heading: &str) -> Self {
        WalkState::InSection(Section::from_heading(heading))
    }

    /// An `h3` sets the subsection; the section is unchanged.
    pub fn enter_subsection(self, heading: &str) -> Self {
        match self {
            WalkState::NoSection => WalkState::NoSection,
            WalkState::InSection(section) | WalkState::InSubsection(section, _) => {
                WalkState::InSubsection(section, heading.to_string())
            }
        }
    }
}

/// What a sibling node means to the walk.
enum PageNode<'a> {
    Section(String),
    Subsection(String),
    Table(ElementRef<'a>),
    Other,
}

/// Extracts route records from parsed route pages.
pub struct PageExtractor<'a> {
    images: &'a dyn ImageResolver,
}

impl<'a> PageExtractor<'a> {
    pub fn new(images: &'a dyn ImageResolver) -> Self {
        Self { images }
    }

    /// Parses and extracts a page given as HTML text.
    pub fn extract_html(&self, article_title: &str, html: &str) -> RouteRecord {
        let document = Html::parse_document(html);
        self.extract(article_title, &document)
    }

    /// Builds the record for one page.
    ///
    /// The walk covers the first `h2` and every sibling after it. A page
    /// without any `h2` yields a record holding only the name.
    pub fn extract(&self, article_title: &str, document: &Html) -> RouteRecord {
        let mut record = RouteRecord::new(article_title);

        let first = match document.select(&FIRST_SECTION).next() {
            Some(h2) => heading_container(h2),
            None => {
                debug!("{} has no sections", article_title);
                return record;
            }
        };

        let mut state = WalkState::NoSection;
        for node in section_nodes(first) {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            state = match page_node(element) {
                PageNode::Section(heading) => state.enter_section(&heading),
                PageNode::Subsection(heading) => state.enter_subsection(&heading),
                PageNode::Table(table) => {
                    self.dispatch_table(&state, table, &mut record);
                    state
                }
                PageNode::Other => state,
            };
        }

        record
    }

    fn dispatch_table(&self, state: &WalkState, table: ElementRef<'_>, record: &mut RouteRecord) {
        match state {
            WalkState::InSection(Section::WildPokemon) => {
                self.add_encounters(record, table, None);
            }
            WalkState::InSubsection(Section::WildPokemon, subsection) => {
                self.add_encounters(record, table, Some(subsection.as_str()));
            }
            WalkState::InSection(Section::Items) | WalkState::InSubsection(Section::Items, _) => {
                add_items(record, table);
            }
            WalkState::InSection(Section::Other(section)) => {
                info!("Did not process content {}", section);
            }
            WalkState::InSubsection(Section::Other(section), subsection) => {
                info!("Did not process content {}, {}", section, subsection);
            }
            WalkState::NoSection => {
                debug!("table before the first section");
            }
        }
    }

    fn add_encounters(&self, record: &mut RouteRecord, table: ElementRef<'_>, subsection: Option<&str>) {
        let raw = RawTable::from_element(table);
        if raw.rows.is_empty() {
            return;
        }

        let hint = subsection.and_then(Style::from_heading);
        let header = raw.header_cells().unwrap_or_default();
        let Some(style) = classify(header, hint) else {
            debug!(
                subsection = subsection.unwrap_or_default(),
                headers = header.len(),
                "skipping table with unrecognized shape"
            );
            return;
        };

        let rows = normalize_table(style, &raw, self.images);
        let area = subsection.unwrap_or(style.name());
        debug!("{} {} rows under {:?}", rows.len(), style, area);
        record.add_encounters(area, rows);
    }
}

fn add_items(record: &mut RouteRecord, table: ElementRef<'_>) {
    let raw = RawTable::from_element(table);
    if raw.rows.is_empty() {
        return;
    }

    match item_headers(&raw) {
        Some(headers) => record.add_items(normalize_items(&headers, &raw.rows)),
        None => debug!("skipping item table without item columns"),
    }
}

fn page_node(element: ElementRef<'_>) -> PageNode<'_> {
    match element.value().name() {
        "h2" => PageNode::Section(heading_text(element)),
        "h3" => PageNode::Subsection(heading_text(element)),
        "table" => PageNode::Table(element),
        "div" if is_heading_wrapper(element) => match element.select(&WRAPPED_HEADING).next() {
            Some(heading) => page_node(heading),
            None => PageNode::Other,
        },
        _ => PageNode::Other,
    }
}

/// Newer MediaWiki versions wrap headings in `<div class="mw-heading">`.
fn is_heading_wrapper(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == "mw-heading")
}

/// The first section heading followed by every later sibling.
fn section_nodes<'a>(first: ElementRef<'a>) -> impl Iterator<Item = NodeRef<'a, Node>> {
    std::iter::once(*first).chain(first.next_siblings())
}

/// The node whose siblings hold the page content for a heading.
fn heading_container(heading: ElementRef<'_>) -> ElementRef<'_> {
    heading
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| is_heading_wrapper(*parent))
        .unwrap_or(heading)
}

fn heading_text(heading: ElementRef<'_>) -> String {
    match heading.select(&HEADLINE).next() {
        Some(headline) => cell_text(headline),
        None => cell_text(heading),
    }
}
