use nt_core::{Error, Result};
use scraper::{Html, Selector};
use url::Url;

use super::{element_text, sites};

/// How a title strategy reads its candidate out of the document.
#[derive(Debug, Clone)]
pub enum TitleRule {
    /// `content` attribute of the first matching `<meta>` element.
    Meta(Selector),
    /// Visible text of the first matching element.
    Text(Selector),
    /// Visible text of the first `inner` element inside the first `container`.
    Nested { container: Selector, inner: Selector },
}

/// One entry in the ordered list of title sources. Strategies are tried in
/// order and the first one that yields non-empty text wins.
#[derive(Debug, Clone)]
pub struct TitleStrategy {
    name: String,
    hosts: Vec<String>,
    rule: TitleRule,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Scraping(format!("Invalid selector {:?}: {}", selector, e)))
}

impl TitleStrategy {
    pub fn new(name: impl Into<String>, rule: TitleRule) -> Self {
        Self {
            name: name.into(),
            hosts: Vec::new(),
            rule,
        }
    }

    pub fn meta(name: impl Into<String>, selector: &str) -> Result<Self> {
        Ok(Self::new(name, TitleRule::Meta(parse_selector(selector)?)))
    }

    pub fn text(name: impl Into<String>, selector: &str) -> Result<Self> {
        Ok(Self::new(name, TitleRule::Text(parse_selector(selector)?)))
    }

    pub fn nested(name: impl Into<String>, container: &str, inner: &str) -> Result<Self> {
        Ok(Self::new(
            name,
            TitleRule::Nested {
                container: parse_selector(container)?,
                inner: parse_selector(inner)?,
            },
        ))
    }

    /// Restricts the strategy to pages served from one of `hosts` (or their
    /// subdomains). A strategy without hosts applies to every page.
    pub fn for_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(|h| h.into().to_ascii_lowercase()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to(&self, url: Option<&Url>) -> bool {
        if self.hosts.is_empty() {
            return true;
        }
        let Some(host) = url.and_then(|u| u.host_str()) else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
    }

    /// Returns the candidate title, or `None` when the element is absent or empty.
    pub fn resolve(&self, document: &Html) -> Option<String> {
        let title = match &self.rule {
            TitleRule::Meta(selector) => document
                .select(selector)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(|content| content.trim().to_string()),
            TitleRule::Text(selector) => document.select(selector).next().map(element_text),
            TitleRule::Nested { container, inner } => document
                .select(container)
                .next()
                .and_then(|c| c.select(inner).next())
                .map(element_text),
        };
        title.filter(|t| !t.is_empty())
    }
}

/// Title sources in priority order: open-graph meta, `name="title"` meta, a
/// known site title span, the first `<h1>`, `<title>`, and a nested site
/// fallback.
pub fn default_title_strategies() -> Result<Vec<TitleStrategy>> {
    Ok(vec![
        TitleStrategy::meta("og:title", r#"meta[property="og:title"]"#)?,
        TitleStrategy::meta("meta title", r#"meta[name="title"]"#)?,
        sites::interviewed_title()?,
        TitleStrategy::text("h1", "h1")?,
        TitleStrategy::text("document title", "title")?,
        sites::jde_page_title()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_meta_reads_content_attribute() {
        let strategy = TitleStrategy::meta("og", r#"meta[property="og:title"]"#).unwrap();
        let html = doc(r#"<html><head><meta property="og:title" content="  Rates cut  "></head></html>"#);
        assert_eq!(strategy.resolve(&html).as_deref(), Some("Rates cut"));
    }

    #[test]
    fn test_text_collapses_whitespace() {
        let strategy = TitleStrategy::text("h1", "h1").unwrap();
        let html = doc("<body><h1>\n  Markets <em>rally</em>\n  again </h1></body>");
        assert_eq!(strategy.resolve(&html).as_deref(), Some("Markets rally again"));
    }

    #[test]
    fn test_empty_candidate_yields_nothing() {
        let strategy = TitleStrategy::meta("og", r#"meta[property="og:title"]"#).unwrap();
        let html = doc(r#"<head><meta property="og:title" content="   "></head>"#);
        assert_eq!(strategy.resolve(&html), None);
    }

    #[test]
    fn test_nested_rule() {
        let strategy = TitleStrategy::nested("nested", "div#wrap", "span").unwrap();
        let html = doc(r#"<div id="wrap"><p>x</p><span>Inner title</span></div><span>Other</span>"#);
        assert_eq!(strategy.resolve(&html).as_deref(), Some("Inner title"));
    }

    #[test]
    fn test_host_filter() {
        let strategy = TitleStrategy::text("h2", "h2").unwrap().for_hosts(["Example.com"]);
        let exact = Url::parse("https://example.com/a").unwrap();
        let sub = Url::parse("https://news.example.com/a").unwrap();
        let other = Url::parse("https://notexample.com/a").unwrap();
        assert!(strategy.applies_to(Some(&exact)));
        assert!(strategy.applies_to(Some(&sub)));
        assert!(!strategy.applies_to(Some(&other)));
        assert!(!strategy.applies_to(None));
        assert!(TitleStrategy::text("h1", "h1").unwrap().applies_to(None));
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(matches!(TitleStrategy::text("bad", "p[["), Err(Error::Scraping(_))));
    }

    #[test]
    fn test_default_order() {
        let names: Vec<String> = default_title_strategies()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names[0], "og:title");
        assert_eq!(names[3], "h1");
        assert_eq!(names[4], "document title");
        assert_eq!(names.len(), 6);
    }
}
