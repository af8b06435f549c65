//! Importing the text and date of a post through oEmbed.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{config::ServiceConfig, draft::domain_of, error::Result, types::date::parse_post_date};

#[derive(Debug, Deserialize)]
struct OembedResponse {
    html: String,
}

/// What a post contributes to a source.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PostImport {
    pub content: String,
    pub date:    Option<String>,
}

/// Whether the content and date of `url` can be imported.
pub fn is_post_url(url: &str) -> bool {
    domain_of(url).as_deref() == Some("x.com")
}

pub struct Oembed {
    client:   reqwest::Client,
    endpoint: String,
}

impl Oembed {
    pub fn new(services: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&services.user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: services.oembed.clone(),
        })
    }

    pub async fn import(&self, url: &str) -> Result<PostImport> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let embed: OembedResponse = serde_json::from_str(&resp)?;

        let mut expansions = HashMap::new();
        for link in short_links(&embed.html) {
            match self.expand(&link).await {
                Ok(Some(target)) => {
                    debug!("{link} -> {target}");
                    expansions.insert(link, target);
                }
                Ok(None) => {}
                Err(e) => warn!("Could not expand {link}: {e}"),
            }
        }
        Ok(parse_post(&embed.html, &expansions))
    }

    /// The shortener answers with a page titled by the target URL.
    async fn expand(&self, link: &str) -> Result<Option<String>> {
        let https = match link.strip_prefix("http:") {
            Some(rest) => format!("https:{rest}"),
            None => link.to_string(),
        };
        let body = self.client.get(https).send().await?.text().await?;
        Ok(page_title(&body))
    }
}

fn selector(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

/// Shortened links shown as their own address, e.g. `https://t.co/abc`.
pub fn short_links(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut links: Vec<String> = vec![];
    for anchor in fragment.select(&selector("p a")) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>();
        let shortened = Url::parse(href)
            .ok()
            .and_then(|url| url.host_str().map(|host| host == "t.co"))
            .unwrap_or(false);
        if shortened && text.trim() == href && !links.iter().any(|l| l == href) {
            links.push(href.to_string());
        }
    }
    links
}

pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title = document.select(&selector("title")).next()?;
    let title = title.text().collect::<String>();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Text of the first paragraph with line breaks kept and links replaced by
/// their expansion, and the date the post was published.
pub fn parse_post(html: &str, expansions: &HashMap<String, String>) -> PostImport {
    let fragment = Html::parse_fragment(html);
    let mut content = String::new();
    if let Some(paragraph) = fragment.select(&selector("p")).next() {
        collect_text(paragraph, expansions, &mut content);
    }
    let date = fragment
        .select(&selector("blockquote > a"))
        .next()
        .and_then(|anchor| parse_post_date(anchor.text().collect::<String>().trim()));
    PostImport { content, date }
}

fn collect_text(element: ElementRef, expansions: &HashMap<String, String>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        match child.value().name() {
            "br" => out.push('\n'),
            "a" => match child.value().attr("href").and_then(|href| expansions.get(href)) {
                Some(target) => out.push_str(target),
                None => collect_text(child, expansions, out),
            },
            _ => collect_text(child, expansions, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBED: &str = r#"<blockquote class="twitter-tweet"><p lang="en" dir="ltr">Finished Dune<br>Read it <a href="https://t.co/abc">https://t.co/abc</a></p>&mdash; Someone (@someone) <a href="https://twitter.com/someone/status/1">March 5, 2024</a></blockquote>"#;

    #[test]
    fn finds_short_links() {
        assert_eq!(short_links(EMBED), vec!["https://t.co/abc".to_string()]);
    }

    #[test]
    fn parses_post() {
        let mut expansions = HashMap::new();
        expansions.insert("https://t.co/abc".to_string(), "https://example.com/dune".to_string());
        let post = parse_post(EMBED, &expansions);
        assert_eq!(post.content, "Finished Dune\nRead it https://example.com/dune");
        assert_eq!(post.date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn reads_page_title() {
        assert_eq!(
            page_title("<html><head><title>https://example.com/</title></head></html>").as_deref(),
            Some("https://example.com/")
        );
    }
}
