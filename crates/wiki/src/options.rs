// ABOUTME: Configuration options for the wiki client including Options and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing WikiClient instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::WikiClient;

/// Article URL prefix; the page title is appended verbatim.
pub const DEFAULT_BASE_URL: &str = "https://prowiki.info/?title=";

/// Desktop browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_6) AppleWebKit/\
537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

/// Configuration options for the wiki client.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub http_client: Option<reqwest::blocking::Client>,
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
            headers: HashMap::new(),
        }
    }
}

impl Options {
    /// Builds the article URL for a page title.
    pub fn article_url(&self, article_title: &str) -> String {
        format!("{}{}", self.base_url, article_title)
    }
}

/// Builder for constructing WikiClient instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the article URL prefix.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Build the WikiClient with the configured options.
    pub fn build(self) -> crate::Result<WikiClient> {
        WikiClient::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_url_appends_title() {
        let opts = Options::default();
        assert_eq!(
            opts.article_url("Route_201"),
            "https://prowiki.info/?title=Route_201"
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let builder = ClientBuilder::new()
            .base_url("http://localhost:1234/wiki/")
            .user_agent("proguide-test")
            .timeout(Duration::from_secs(5))
            .header("X-Test", "1");
        assert_eq!(builder.opts.base_url, "http://localhost:1234/wiki/");
        assert_eq!(builder.opts.user_agent, "proguide-test");
        assert_eq!(builder.opts.timeout, Duration::from_secs(5));
        assert_eq!(builder.opts.headers.get("X-Test").map(String::as_str), Some("1"));
    }
}
