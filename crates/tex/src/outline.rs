// ABOUTME: Builds a region's outline document: one subsubsection per registry route plus \input lines.
// ABOUTME: Inputs point at every fragment already written for the route, relative to the project root.

use std::path::{Component, Path, PathBuf};

use proguide_wiki::{display_name, RouteDataset, RouteRegistry};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{RenderError, Result};
use crate::latex::escape;
use crate::snippets::route_output_dir;

const PREAMBLE: &str = r"\documentclass{article}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage{lmodern}
\usepackage{longtable}
\usepackage{graphicx}
\usepackage[dvipsnames,table]{xcolor}
\definecolor{GroundColor}{RGB}{238,221,187}
\definecolor{WaterColor}{RGB}{204,229,255}
\begin{document}
";

const POSTAMBLE: &str = r"\end{document}
";

/// Renders the outline of one region in registry order.
///
/// Titles come from a record's `Name` key when present, else from the route
/// id. Routes that were never scraped or rendered still get their heading.
pub fn generate_outline(
    region: &str,
    registry: &RouteRegistry,
    dataset: &RouteDataset,
    output_root: &Path,
    project_root: &Path,
) -> Result<String> {
    let routes = registry
        .routes_in(region)
        .ok_or_else(|| RenderError::UnknownRegion(region.to_string()))?;

    let mut doc = String::from(PREAMBLE);
    for route_id in routes {
        let title = dataset
            .get(region, route_id)
            .and_then(|record| record.title_override())
            .map(str::to_string)
            .unwrap_or_else(|| display_name(route_id));
        doc.push_str(&format!("\\subsubsection{{{}}}\n", escape(&title)));

        let route_dir = route_output_dir(output_root, region, route_id);
        if !route_dir.is_dir() {
            debug!("{} has no fragments", route_id);
            continue;
        }

        for input in fragment_inputs(&route_dir, project_root)? {
            doc.push_str(&format!("\\input{{{}}}\n", input));
        }
    }
    doc.push_str(POSTAMBLE);

    Ok(doc)
}

/// `\input` targets for every file below `route_dir`, sorted by path.
fn fragment_inputs(route_dir: &Path, project_root: &Path) -> Result<Vec<String>> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(route_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(route_dir).to_path_buf();
            RenderError::io("listing", path, e.into())
        })?;
        if entry.file_type().is_file() {
            inputs.push(input_target(entry.path(), project_root));
        }
    }
    Ok(inputs)
}

/// Path relative to the project root, extension dropped, `/`-separated.
///
/// Relative paths are taken as already relative to the project root. An
/// absolute path sharing nothing with the root below `/` stays absolute.
fn input_target(path: &Path, project_root: &Path) -> String {
    let without_ext = path.with_extension("");
    let target = relative_to(&without_ext, project_root).unwrap_or(without_ext);
    slash_path(&target)
}

/// `path` expressed from `base`, climbing with `..` out of a shared parent.
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let absolute = path.is_absolute();
    if absolute != base.is_absolute() {
        return None;
    }

    let path: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    if absolute && !path[..common].iter().any(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    // cannot climb out of a base that itself climbs
    if base[common..].iter().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    relative.extend(&path[common..]);
    Some(relative)
}

fn slash_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        let segment = match component {
            Component::Prefix(prefix) => {
                out.push_str(&prefix.as_os_str().to_string_lossy());
                continue;
            }
            Component::RootDir => {
                out.push('/');
                continue;
            }
            Component::CurDir => continue,
            Component::ParentDir => "..".into(),
            Component::Normal(part) => part.to_string_lossy(),
        };
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&segment);
    }
    out
}
