use nt_core::{Error, ExtractedArticle, ExtractionConfig, RawPage, Result};
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

mod body;
pub mod sites;
mod title;

pub use title::{default_title_strategies, TitleRule, TitleStrategy};

/// Turns an HTML page into a title and a cleaned-up body.
///
/// Extraction is a pure function of the URL, the HTML and the configuration;
/// an `Extractor` can be shared freely between tasks.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    title_strategies: Vec<TitleStrategy>,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        Ok(Self {
            config,
            title_strategies: default_title_strategies()?,
        })
    }

    /// Replaces the whole title strategy list.
    pub fn with_title_strategies(mut self, strategies: Vec<TitleStrategy>) -> Self {
        self.title_strategies = strategies;
        self
    }

    /// Inserts a strategy at `position` (clamped to the end of the list).
    pub fn insert_title_strategy(&mut self, position: usize, strategy: TitleStrategy) {
        let position = position.min(self.title_strategies.len());
        self.title_strategies.insert(position, strategy);
    }

    pub fn title_strategies(&self) -> &[TitleStrategy] {
        &self.title_strategies
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract_page(&self, page: &RawPage) -> Result<ExtractedArticle> {
        self.extract(&page.url, &page.html)
    }

    /// Extracts the title and body of `html`, fetched from `url`.
    ///
    /// Fails with [`Error::Extraction`] when the body is shorter than
    /// `min_body_chars`. A missing title is not a failure; the configured
    /// fallback title is used instead.
    pub fn extract(&self, url: &str, html: &str) -> Result<ExtractedArticle> {
        let document = Html::parse_document(html);
        let parsed_url = Url::parse(url).ok();

        let title = self.resolve_title(&document, parsed_url.as_ref());

        let candidates = body::harvest_candidates(&document, &self.config.container_keywords);
        let harvested = candidates.len();
        let paragraphs = body::clean_candidates(candidates, self.config.min_paragraph_chars);
        debug!(
            "Kept {} of {} candidate blocks from {}",
            paragraphs.len(),
            harvested,
            url
        );

        let body = paragraphs.join(" ");
        if body.is_empty() || body.chars().count() < self.config.min_body_chars {
            return Err(Error::Extraction { url: url.to_string() });
        }

        Ok(ExtractedArticle { title, body })
    }

    fn resolve_title(&self, document: &Html, url: Option<&Url>) -> String {
        for strategy in &self.title_strategies {
            if !strategy.applies_to(url) {
                continue;
            }
            if let Some(title) = strategy.resolve(document) {
                debug!("Title found by {} strategy", strategy.name());
                return title;
            }
        }
        self.config.fallback_title.clone()
    }
}

/// Collapses runs of whitespace to a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Elements whose contents are never visible text.
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// The element's visible text nodes, each trimmed, joined with single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    let joined = parts
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

fn collect_text<'a>(element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            parts.push(&**text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !NON_TEXT_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, parts);
            }
        }
    }
}
