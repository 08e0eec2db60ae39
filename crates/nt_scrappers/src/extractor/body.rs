use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{Html, Selector};

use super::{element_text, normalize_whitespace};

lazy_static! {
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
    static ref CLASSED_DIV: Selector = Selector::parse("div[class]").unwrap();
}

/// Collects candidate text blocks from three overlapping sources, in order:
/// paragraphs inside `<article>` elements, every paragraph in the document,
/// and content-like `div` containers (their paragraphs, then the container's
/// own flattened text).
pub(crate) fn harvest_candidates(document: &Html, container_keywords: &[String]) -> Vec<String> {
    let mut candidates = Vec::new();

    for article in document.select(&ARTICLE) {
        candidates.extend(article.select(&PARAGRAPH).map(element_text));
    }

    candidates.extend(document.select(&PARAGRAPH).map(element_text));

    let keywords: Vec<String> = container_keywords.iter().map(|k| k.to_lowercase()).collect();
    for div in document.select(&CLASSED_DIV) {
        let class = div.value().attr("class").unwrap_or_default().to_lowercase();
        if !keywords.iter().any(|k| class.contains(k.as_str())) {
            continue;
        }
        candidates.extend(div.select(&PARAGRAPH).map(element_text));
        let own_text = element_text(div);
        if !own_text.is_empty() {
            candidates.push(own_text);
        }
    }

    candidates
}

/// Normalizes whitespace, drops blocks shorter than `min_chars` characters and
/// keeps only the first occurrence of each block.
pub(crate) fn clean_candidates<I>(candidates: I, min_chars: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for candidate in candidates {
        let candidate = normalize_whitespace(&candidate);
        if candidate.chars().count() < min_chars {
            continue;
        }
        if seen.insert(candidate.clone()) {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        nt_core::ExtractionConfig::default().container_keywords
    }

    #[test]
    fn test_harvest_order() {
        let html = Html::parse_document(
            r#"<body>
                <p>loose</p>
                <article><p>inside article</p></article>
                <div class="Main-Column"><p>in container</p></div>
                <div class="sidebar"><p>ignored container</p></div>
            </body>"#,
        );
        let candidates = harvest_candidates(&html, &keywords());
        assert_eq!(
            candidates,
            vec![
                "inside article",
                "loose",
                "inside article",
                "in container",
                "ignored container",
                "in container",
                "in container",
            ]
        );
    }

    #[test]
    fn test_clean_filters_and_dedups() {
        let forty = "a".repeat(40);
        let thirty_nine = "b".repeat(39);
        let spaced = format!("  {}\n\t{}  ", "c".repeat(20), "d".repeat(20));
        let collapsed = format!("{} {}", "c".repeat(20), "d".repeat(20));

        let kept = clean_candidates(
            vec![thirty_nine, forty.clone(), spaced, collapsed.clone(), forty.clone()],
            40,
        );
        assert_eq!(kept, vec![forty, collapsed]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let accented = "é".repeat(40);
        assert_eq!(clean_candidates(vec![accented.clone()], 40), vec![accented]);
        assert!(clean_candidates(vec!["é".repeat(39)], 40).is_empty());
    }
}
