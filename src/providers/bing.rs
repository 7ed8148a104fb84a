//! Bing image search.
//!
//! Scrapes the `images/async` results page for full-size image URLs, checks
//! candidates with a HEAD request and downloads the first usable one.

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use reqwest::StatusCode;
use tracing::debug;
use vocadeck_builder::ImageFinder;

use super::images::{download_image, DEFAULT_MAX_WIDTH};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const RESULT_COUNT: &str = "15";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.64 Safari/537.11";

const IMAGE_URL_PATTERN: &str = r"murl&quot;:&quot;(.*?)&quot;";

const IMAGE_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Map a filter shorthand to Bing's `qft` value. Unknown names give `""`.
pub fn filter_query(shorthand: &str) -> &'static str {
    match shorthand {
        "line" | "linedrawing" => "+filterui:photo-linedrawing",
        "photo" => "+filterui:photo-photo",
        "clipart" => "+filterui:photo-clipart",
        "transparent" => "+filterui:photo-transparent",
        _ => "",
    }
}

/// `Accept-Language` header for a deck language, with English as fallback.
fn accept_language(language: &str) -> String {
    let primary = match language {
        "en" => "en-US",
        "fr" => "fr-FR",
        "de" => "de-DE",
        "es" => "es-ES",
        other => other,
    };
    format!("{primary};q=1, en-US;q=0.5")
}

// ---------------------------------------------------------------------------
// BingImageSearch
// ---------------------------------------------------------------------------

/// [`ImageFinder`] that picks the first valid Bing image result.
pub struct BingImageSearch {
    client: reqwest::Client,
    base_url: String,
    accept_language: String,
    adult: String,
    filter: &'static str,
    max_width: u32,
    url_pattern: Regex,
}

impl BingImageSearch {
    pub fn new(base_url: impl Into<String>, language: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            accept_language: accept_language(language),
            adult: "off".to_string(),
            filter: "",
            max_width: DEFAULT_MAX_WIDTH,
            url_pattern: Regex::new(IMAGE_URL_PATTERN).context("invalid image URL pattern")?,
        })
    }

    /// Bing `adlt` setting (`off`, `moderate`, `strict`).
    pub fn with_adult(mut self, adult: impl Into<String>) -> Self {
        self.adult = adult.into();
        self
    }

    /// Filter shorthand, see [`filter_query`].
    pub fn with_filter(mut self, shorthand: &str) -> Self {
        self.filter = filter_query(shorthand);
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Candidate image URLs for `query`, in result order.
    async fn image_urls(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/images/async", self.base_url);
        debug!(query, "Bing image search");

        let page = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .query(&[
                ("q", query),
                ("first", "0"),
                ("count", RESULT_COUNT),
                ("adlt", self.adult.as_str()),
                ("qft", self.filter),
            ])
            .send()
            .await
            .with_context(|| format!("Bing request failed: {url}"))?
            .error_for_status()
            .context("Bing request returned error")?
            .text()
            .await
            .context("failed to read Bing response")?;

        Ok(self
            .url_pattern
            .captures_iter(&page)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect())
    }

    /// HEAD `url` and accept it when it answers 200 with an image content type.
    async fn is_valid(&self, url: &str) -> bool {
        let resp = match self.client.head(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url, error = %e, "Image URL check failed");
                return false;
            }
        };

        if resp.status() != StatusCode::OK {
            debug!(url, status = %resp.status(), "Image URL rejected");
            return false;
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let ok = IMAGE_CONTENT_TYPES.iter().any(|ct| content_type.contains(ct));
        if !ok {
            debug!(url, content_type, "Image URL is not an image");
        }
        ok
    }
}

#[async_trait]
impl ImageFinder for BingImageSearch {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn find_image(&self, query: &str) -> anyhow::Result<Bytes> {
        // Quotes switch Bing to literal matching.
        let query = query.trim().trim_matches(|c: char| c == '"' || c == '\'');

        let urls = self.image_urls(query).await?;
        if urls.is_empty() {
            anyhow::bail!("no image results for '{query}'");
        }

        for url in &urls {
            if self.is_valid(url).await {
                debug!(query, url = %url, "Using image");
                return download_image(&self.client, url, self.max_width).await;
            }
        }

        anyhow::bail!("none of {} image results for '{query}' is reachable", urls.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::images::test_png;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn results_page(urls: &[String]) -> String {
        urls.iter()
            .map(|u| format!("<a m=\"{{&quot;murl&quot;:&quot;{u}&quot;,&quot;t&quot;:1}}\"></a>"))
            .collect()
    }

    #[test]
    fn filters() {
        assert_eq!(filter_query("line"), "+filterui:photo-linedrawing");
        assert_eq!(filter_query("linedrawing"), "+filterui:photo-linedrawing");
        assert_eq!(filter_query("clipart"), "+filterui:photo-clipart");
        assert_eq!(filter_query("sepia"), "");
    }

    #[test]
    fn accept_language_header() {
        assert_eq!(accept_language("fr"), "fr-FR;q=1, en-US;q=0.5");
        assert_eq!(accept_language("it"), "it;q=1, en-US;q=0.5");
    }

    #[tokio::test]
    async fn first_valid_result_is_downloaded() {
        let server = MockServer::start().await;
        let broken = format!("{}/img/broken.jpg", server.uri());
        let html = format!("{}/img/page.html", server.uri());
        let good = format!("{}/img/cat.png", server.uri());

        Mock::given(method("GET"))
            .and(path("/images/async"))
            .and(query_param("q", "le chat"))
            .and(query_param("count", "15"))
            .and(query_param("adlt", "off"))
            .and(query_param("qft", "+filterui:photo-clipart"))
            .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[
                broken.clone(),
                html.clone(),
                good.clone(),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/img/broken.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/img/page.html"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/img/cat.png"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/img/cat.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(test_png(40, 20)))
            .expect(1)
            .mount(&server)
            .await;

        let finder = BingImageSearch::new(server.uri(), "fr")
            .unwrap()
            .with_filter("clipart");
        let png = finder.find_image("\"le chat\"").await.unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (40, 20));
    }

    #[tokio::test]
    async fn no_results_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/async"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let finder = BingImageSearch::new(server.uri(), "en").unwrap();
        let err = finder.find_image("zzz").await.unwrap_err();
        assert!(err.to_string().contains("no image results"));
    }
}
