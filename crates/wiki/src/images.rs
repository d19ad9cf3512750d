// ABOUTME: Image Cache: downloads each creature image once and hands back a stable relative path.
// ABOUTME: Files are keyed by entity name plus the source extension; an existing file is never re-fetched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use url::Url;

use crate::client::Fetcher;
use crate::error::{Result, WikiError};

/// Subdirectory of the image root holding creature images.
pub const POKEMON_IMAGES: &str = "pokemon";

/// Resolves an image source for an entity to a path usable in records.
pub trait ImageResolver {
    /// Returns the cached path relative to the image root, or `None` when
    /// the image could not be made available.
    fn resolve(&self, entity: &str, src: &str) -> Option<String>;
}

/// On-disk image cache backed by a fetcher.
pub struct ImageCache<'a> {
    root: PathBuf,
    subdir: String,
    fetcher: &'a dyn Fetcher,
}

impl<'a> ImageCache<'a> {
    pub fn new(root: impl Into<PathBuf>, subdir: impl Into<String>, fetcher: &'a dyn Fetcher) -> Self {
        Self {
            root: root.into(),
            subdir: subdir.into(),
            fetcher,
        }
    }

    /// Path, relative to the root, of an entity's image with the given extension.
    pub fn relative_path(&self, entity: &str, ext: &str) -> String {
        format!("{}/{}{}", self.subdir, file_stem(entity), ext)
    }

    /// Absolute location of an entity's image with the given extension.
    pub fn cached_path(&self, entity: &str, ext: &str) -> PathBuf {
        self.root
            .join(&self.subdir)
            .join(format!("{}{}", file_stem(entity), ext))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let bytes = self.fetcher.fetch_bytes(url)?;
        let save_err = |path: &Path, e: std::io::Error| {
            WikiError::io(path.display().to_string(), "SaveImage", Some(e.into()))
        };

        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).map_err(|e| save_err(dir, e))?;
        }

        // Only a complete download may carry the final name.
        let mut partial = dest.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);
        fs::write(&partial, &bytes).map_err(|e| save_err(partial.as_path(), e))?;
        fs::rename(&partial, dest).map_err(|e| save_err(partial.as_path(), e))?;
        Ok(())
    }
}

impl ImageResolver for ImageCache<'_> {
    fn resolve(&self, entity: &str, src: &str) -> Option<String> {
        let url = match self.fetcher.resolve_url(src) {
            Some(url) => url,
            None => {
                warn!("Cannot resolve image source {:?} for {}", src, entity);
                return None;
            }
        };

        let ext = image_extension(&url);
        let dest = self.cached_path(entity, &ext);
        let relative = self.relative_path(entity, &ext);
        if dest.exists() {
            return Some(relative);
        }

        info!("Downloading image: {}", url);
        match self.download(&url, &dest) {
            Ok(()) => Some(relative),
            Err(e) => {
                warn!("Image download for {} failed: {}", entity, e);
                None
            }
        }
    }
}

/// Extension (with leading dot) of the last path segment of a URL; empty when none.
pub fn image_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rfind('.') {
        Some(idx) if idx > 0 => file[idx..].to_string(),
        _ => String::new(),
    }
}

/// Entity names become file names; path separators would escape the cache directory.
fn file_stem(entity: &str) -> String {
    entity.trim().replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Serves a fixed body for every URL and records what was requested.
    struct RecordingFetcher {
        body: Option<&'static [u8]>,
        requests: RefCell<Vec<String>>,
    }

    impl RecordingFetcher {
        fn serving(body: &'static [u8]) -> Self {
            Self {
                body: Some(body),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetcher for RecordingFetcher {
        fn fetch_page(&self, _article_title: &str) -> Result<String> {
            Ok(String::new())
        }

        fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
            self.requests.borrow_mut().push(url.to_string());
            match self.body {
                Some(body) => Ok(Bytes::from_static(body)),
                None => Err(WikiError::fetch(url, "FetchBytes", None)),
            }
        }
    }

    #[test]
    fn downloads_once_per_entity() {
        let dir = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::serving(b"PNG");
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &fetcher);

        let url = "https://prowiki.info/images/Pidgey.png";
        assert_eq!(cache.resolve("Pidgey", url).as_deref(), Some("pokemon/Pidgey.png"));
        assert_eq!(cache.resolve("Pidgey", url).as_deref(), Some("pokemon/Pidgey.png"));

        assert_eq!(fetcher.requests.borrow().len(), 1);
        assert_eq!(
            fs::read(dir.path().join("pokemon").join("Pidgey.png")).unwrap(),
            b"PNG"
        );
        assert!(!dir.path().join("pokemon").join("Pidgey.png.part").exists());
    }

    #[test]
    fn existing_file_is_authoritative() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pokemon")).unwrap();
        fs::write(dir.path().join("pokemon").join("Zubat.gif"), b"old").unwrap();

        let fetcher = RecordingFetcher::serving(b"new");
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &fetcher);
        let path = cache.resolve("Zubat", "https://prowiki.info/images/Zubat.gif");

        assert_eq!(path.as_deref(), Some("pokemon/Zubat.gif"));
        assert!(fetcher.requests.borrow().is_empty());
        assert_eq!(fs::read(dir.path().join("pokemon/Zubat.gif")).unwrap(), b"old");
    }

    #[test]
    fn failed_download_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::failing();
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &fetcher);

        assert_eq!(cache.resolve("Geodude", "https://prowiki.info/images/Geodude.png"), None);
        assert!(!dir.path().join("pokemon/Geodude.png").exists());
    }

    #[test]
    fn download_errors_carry_their_kind() {
        let dir = TempDir::new().unwrap();
        let url = "https://prowiki.info/images/Geodude.png";

        let failing = RecordingFetcher::failing();
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &failing);
        let err = cache.download(url, &cache.cached_path("Geodude", ".png")).unwrap_err();
        assert!(err.is_fetch());

        // a file where the image directory belongs
        fs::write(dir.path().join("pokemon"), b"").unwrap();
        let serving = RecordingFetcher::serving(b"PNG");
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &serving);
        let err = cache.download(url, &cache.cached_path("Geodude", ".png")).unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.op, "SaveImage");
        assert_eq!(cache.resolve("Geodude", url), None);
    }

    #[test]
    fn unresolvable_source_is_not_fetched() {
        let dir = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::serving(b"PNG");
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &fetcher);

        // the default resolver has no base URL for relative sources
        assert_eq!(cache.resolve("Geodude", "/images/Geodude.png"), None);
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn entity_names_cannot_escape_the_cache() {
        let dir = TempDir::new().unwrap();
        let fetcher = RecordingFetcher::serving(b"PNG");
        let cache = ImageCache::new(dir.path(), POKEMON_IMAGES, &fetcher);
        assert_eq!(cache.relative_path("../Ho/Oh", ".png"), "pokemon/.._Ho_Oh.png");
    }

    #[test]
    fn extension_from_url_path() {
        assert_eq!(image_extension("https://prowiki.info/images/Pidgey.png"), ".png");
        assert_eq!(
            image_extension("https://prowiki.info/images/thumb/a/ab/Mr._Mime.gif/40px-Mr._Mime.gif?v=2"),
            ".gif"
        );
        assert_eq!(image_extension("https://prowiki.info/images/noext"), "");
        assert_eq!(image_extension("not a url/file.jpg?x"), ".jpg");
    }
}
