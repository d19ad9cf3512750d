// ABOUTME: Extraction engine turning wiki route pages into RouteRecords.
// ABOUTME: Splits into table flattening, shape classification, row normalization and the page walk.

pub mod classify;
pub mod normalize;
pub mod page;
pub mod table;

pub use classify::{classify, shape_of, StyleShape};
pub use normalize::{item_headers, normalize, normalize_items, normalize_table};
pub use page::{PageExtractor, Section, WalkState};
pub use table::{RawRow, RawTable};
