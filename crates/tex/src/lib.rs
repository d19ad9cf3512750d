// ABOUTME: Main library entry point for the proguide LaTeX renderer.
// ABOUTME: Re-exports FragmentRenderer, LatexRenderer, generate_route_snippets, generate_outline and RenderError.

//! proguide-tex - turns the scraped route dataset into LaTeX.
//!
//! Every encounter area and item list of a route becomes its own `longtable`
//! fragment; a region outline then `\input`s the fragments route by route.

pub mod error;
pub mod latex;
pub mod outline;
pub mod snippets;

pub use crate::error::{RenderError, Result};
pub use crate::latex::{escape, FragmentRenderer, LatexRenderer};
pub use crate::outline::generate_outline;
pub use crate::snippets::{generate_route_snippets, SnippetSummary, ITEMS_FILE};
