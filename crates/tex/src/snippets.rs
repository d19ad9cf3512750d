// ABOUTME: Writes one fragment file per encounter area and one item fragment per route.
// ABOUTME: Output lives under <output_root>/<region>/<route_id>/; a failing route does not stop the rest.

use std::fs;
use std::path::{Path, PathBuf};

use proguide_wiki::{RouteDataset, RouteRecord};
use tracing::{info, warn};

use crate::error::{RenderError, Result};
use crate::latex::FragmentRenderer;

/// File name of a route's item fragment.
pub const ITEMS_FILE: &str = "Items.tex";

/// Files written by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetSummary {
    pub written: Vec<PathBuf>,
    pub failed_routes: usize,
}

/// Directory holding a route's fragments.
pub fn route_output_dir(output_root: &Path, region: &str, route_id: &str) -> PathBuf {
    output_root.join(region).join(route_id)
}

/// File name of an encounter fragment: `Wild_Pokémon_(<area>).tex` with spaces as `_`.
pub fn encounter_file_name(area: &str) -> String {
    let area: String = area
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("Wild_Pokémon_({}).tex", area)
}

/// Renders every table of every route in the dataset.
pub fn generate_route_snippets(
    dataset: &RouteDataset,
    output_root: &Path,
    renderer: &dyn FragmentRenderer,
) -> SnippetSummary {
    let mut summary = SnippetSummary::default();

    for (region, route_id, record) in dataset.iter() {
        let route_dir = route_output_dir(output_root, region, route_id);
        match write_route(route_id, record, &route_dir, renderer) {
            Ok(written) => summary.written.extend(written),
            Err(e) => {
                warn!("Failed to render {}/{}: {}", region, route_id, e);
                summary.failed_routes += 1;
            }
        }
    }

    info!(
        files = summary.written.len(),
        failed = summary.failed_routes,
        "snippets generated"
    );
    summary
}

fn write_route(
    route_id: &str,
    record: &RouteRecord,
    route_dir: &Path,
    renderer: &dyn FragmentRenderer,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (area, rows) in record.encounter_areas() {
        info!("Generating {} Wild Pokémon ({})", route_id, area);
        if let Some(fragment) = renderer.render_encounters(route_id, area, rows) {
            let path = route_dir.join(encounter_file_name(area));
            write_fragment(&path, &fragment)?;
            written.push(path);
        }
    }

    if let Some(items) = record.items.as_deref() {
        if let Some(fragment) = renderer.render_items(route_id, items) {
            let path = route_dir.join(ITEMS_FILE);
            write_fragment(&path, &fragment)?;
            written.push(path);
        }
    }

    Ok(written)
}

fn write_fragment(path: &Path, fragment: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| RenderError::io("creating", dir, e))?;
    }
    fs::write(path, fragment).map_err(|e| RenderError::io("writing", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_use_underscores() {
        assert_eq!(encounter_file_name("Land"), "Wild_Pokémon_(Land).tex");
        assert_eq!(
            encounter_file_name("Headbuttable Trees"),
            "Wild_Pokémon_(Headbuttable_Trees).tex"
        );
        assert_eq!(encounter_file_name("Cave 1F/B1F"), "Wild_Pokémon_(Cave_1F_B1F).tex");
    }

    #[test]
    fn route_dir_layout() {
        assert_eq!(
            route_output_dir(Path::new("routes"), "Johto", "Route_29"),
            Path::new("routes/Johto/Route_29")
        );
    }
}
