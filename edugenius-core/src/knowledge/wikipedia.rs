use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const WIKIPEDIA_LANGUAGE: &str = "en";
pub const WIKIPEDIA_USER_AGENT: &str = "EduGenius/2.0 (Educational Content Generator)";

/// An existing encyclopedia page reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiPage {
    pub title: String,
    /// Plain-text intro section. Empty when the page has none.
    pub summary: String,
    pub url: String,
}

/// Lookup of a page by exact title.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// `Ok(None)` when no page with that title exists.
    async fn page(&self, title: &str) -> Result<Option<WikiPage>>;
}

// --- MediaWiki Action API wire types (formatversion=2) ---

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
}

fn fallback_page_url(title: &str) -> String {
    format!(
        "https://{}.wikipedia.org/wiki/{}",
        WIKIPEDIA_LANGUAGE,
        title.replace(' ', "_")
    )
}

/// Picks the first existing page out of an Action API query response.
fn page_from_response(response: QueryResponse) -> Option<WikiPage> {
    response
        .query?
        .pages
        .into_iter()
        .find(|p| !p.missing && !p.invalid)
        .map(|p| WikiPage {
            url: p.fullurl.unwrap_or_else(|| fallback_page_url(&p.title)),
            summary: p.extract.unwrap_or_default(),
            title: p.title,
        })
}

pub struct WikipediaClient {
    http_client: Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            api_url: format!("https://{}.wikipedia.org/w/api.php", WIKIPEDIA_LANGUAGE),
        }
    }
}

#[async_trait]
impl KnowledgeSource for WikipediaClient {
    async fn page(&self, title: &str) -> Result<Option<WikiPage>> {
        let title = title.trim();
        // `|` separates titles in the API; a keyword holding one is not a single page.
        if title.is_empty() || title.contains('|') {
            return Ok(None);
        }

        tracing::debug!(title = %title, "Looking up Wikipedia page");

        let response = self
            .http_client
            .get(&self.api_url)
            .header(reqwest::header::USER_AGENT, WIKIPEDIA_USER_AGENT)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            bail!("Wikipedia API returned error status {}: {}", status, text);
        }

        let body: QueryResponse = response.json().await?;
        Ok(page_from_response(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<WikiPage> {
        page_from_response(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_existing_page() {
        let page = parse(
            r#"{
                "batchcomplete": true,
                "query": {
                    "redirects": [{"from": "mitosis", "to": "Mitosis"}],
                    "pages": [{
                        "pageid": 20338,
                        "ns": 0,
                        "title": "Mitosis",
                        "extract": "Mitosis is a part of the cell cycle.",
                        "fullurl": "https://en.wikipedia.org/wiki/Mitosis"
                    }]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(page.title, "Mitosis");
        assert_eq!(page.summary, "Mitosis is a part of the cell cycle.");
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Mitosis");
    }

    #[test]
    fn test_missing_page() {
        let page = parse(
            r#"{"query": {"pages": [{"ns": 0, "title": "Qwzxv", "missing": true}]}}"#,
        );
        assert!(page.is_none());
    }

    #[test]
    fn test_invalid_title() {
        let page = parse(
            r#"{"query": {"pages": [{"title": "a|b", "invalidreason": "bad", "invalid": true}]}}"#,
        );
        assert!(page.is_none());
    }

    #[test]
    fn test_page_without_extract_or_url() {
        let page = parse(r#"{"query": {"pages": [{"title": "Black hole"}]}}"#).unwrap();
        assert_eq!(page.summary, "");
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Black_hole");
    }

    #[test]
    fn test_response_without_query() {
        assert!(parse(r#"{"batchcomplete": true}"#).is_none());
    }

    #[tokio::test]
    async fn test_blank_title_skips_network() {
        let client = WikipediaClient::new(Client::new());
        assert!(client.page("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_multi_title_term_is_not_a_page() {
        let client = WikipediaClient::new(Client::new());
        assert!(client.page("Cell|Atom").await.unwrap().is_none());
    }
}
