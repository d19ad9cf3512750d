// ABOUTME: Page Fetcher: blocking HTTP access to wiki articles and image files.
// ABOUTME: Defines the Fetcher trait used by the extractor and image cache, and its reqwest implementation.

use bytes::Bytes;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::USER_AGENT;
use tracing::{debug, info};
use url::Url;

use crate::error::{Result, WikiError};
use crate::options::{ClientBuilder, Options};

/// Network collaborator of the scraper.
pub trait Fetcher {
    /// Returns the raw HTML of an article.
    fn fetch_page(&self, article_title: &str) -> Result<String>;

    /// Downloads a binary resource. Anything but a 200 response is an error.
    fn fetch_bytes(&self, url: &str) -> Result<Bytes>;

    /// Turns an `src` attribute into an absolute URL.
    ///
    /// The default accepts absolute and protocol-relative URLs only.
    fn resolve_url(&self, src: &str) -> Option<String> {
        resolve_image_url(src, None)
    }
}

/// Resolves a potentially relative image URL against a base URL.
/// Returns None if resolution fails or the input is empty.
pub fn resolve_image_url(src: &str, base_url: Option<&str>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }

    // MediaWiki thumbnails are often protocol-relative
    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    let base = Url::parse(base_url?).ok()?;
    let resolved = base.join(src).ok()?;
    Some(resolved.to_string())
}

/// The wiki client used by the batch updater.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
    opts: Options,
}

impl WikiClient {
    /// Creates a client from options, building a blocking reqwest client when none is supplied.
    pub fn new(opts: Options) -> Result<Self> {
        let http = match opts.http_client.clone() {
            Some(client) => client,
            None => Client::builder()
                .timeout(opts.timeout)
                .build()
                .map_err(|e| {
                    WikiError::fetch(&opts.base_url, "BuildClient", Some(anyhow::Error::new(e)))
                })?,
        };
        Ok(Self { http, opts })
    }

    /// Returns a builder with default options.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let mut request = self.http.get(url).header(USER_AGENT, &self.opts.user_agent);
        for (key, value) in &self.opts.headers {
            request = request.header(key, value);
        }
        request
    }
}

impl Fetcher for WikiClient {
    fn fetch_page(&self, article_title: &str) -> Result<String> {
        let url = self.opts.article_url(article_title);
        info!("Loading url: {}", url);

        let response = self.get(&url).send().map_err(|e| {
            WikiError::fetch(&url, "FetchPage", Some(anyhow::anyhow!("request failed: {}", e)))
        })?;

        // Status is not checked; an error page yields no tables.
        debug!(status = response.status().as_u16(), "page response");

        response.text().map_err(|e| {
            WikiError::fetch(
                &url,
                "FetchPage",
                Some(anyhow::anyhow!("failed to read body: {}", e)),
            )
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.get(url).send().map_err(|e| {
            WikiError::fetch(url, "FetchBytes", Some(anyhow::anyhow!("request failed: {}", e)))
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(WikiError::fetch(
                url,
                "FetchBytes",
                Some(anyhow::anyhow!("HTTP status {}", status)),
            ));
        }

        response.bytes().map_err(|e| {
            WikiError::fetch(
                url,
                "FetchBytes",
                Some(anyhow::anyhow!("failed to read body: {}", e)),
            )
        })
    }

    fn resolve_url(&self, src: &str) -> Option<String> {
        resolve_image_url(src, Some(&self.opts.base_url))
    }
}
