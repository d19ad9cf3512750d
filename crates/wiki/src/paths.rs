// ABOUTME: On-disk layout of a proguide project: data, image and output directories.
// ABOUTME: Derives the registry and dataset file paths from the data directory.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "proguide_data";
pub const DEFAULT_IMGS_DIR: &str = "imgs";
pub const DEFAULT_OUTPUT_DIR: &str = "routes";

pub const ROUTE_NAMES_FILE: &str = "route_names.json";
pub const ROUTE_DATA_FILE: &str = "route_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Holds the route name registry and the dataset.
    pub data_dir: PathBuf,
    /// Image root; records store paths relative to it.
    pub imgs_dir: PathBuf,
    /// Root of the rendered fragment tree.
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            imgs_dir: PathBuf::from(DEFAULT_IMGS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Paths {
    pub fn new(data_dir: impl Into<PathBuf>, imgs_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            imgs_dir: imgs_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn route_names_path(&self) -> PathBuf {
        self.data_dir.join(ROUTE_NAMES_FILE)
    }

    pub fn route_data_path(&self) -> PathBuf {
        self.data_dir.join(ROUTE_DATA_FILE)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_files_live_in_data_dir() {
        let paths = Paths::default();
        assert_eq!(paths.route_names_path(), Path::new("proguide_data/route_names.json"));
        assert_eq!(paths.route_data_path(), Path::new("proguide_data/route_data.json"));
        assert_eq!(paths.imgs_dir, Path::new("imgs"));
        assert_eq!(paths.output_dir(), Path::new("routes"));
    }
}
