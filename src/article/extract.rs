//! Title and body extraction from a downloaded HTML page.
//!
//! # Title
//!
//! First non-empty of: `og:title`, JSON-LD `headline`, the `<title>` tag with
//! any site-name suffix removed, the first `<h1>`.
//!
//! # Body
//!
//! A JSON-LD `articleBody` of at least [`MIN_JSONLD_BODY`] characters wins
//! outright. Otherwise every `<p>` outside page chrome is scored by its
//! stopword count; the score is credited to the paragraph's container (its
//! parent, lifted through single-child wrappers) and, at half weight, the
//! container's parent. The highest-scoring element, earliest in document
//! order on ties, is taken as the article container and its qualifying
//! paragraphs become the text.
//!
//! Chrome is recognised by tag (`nav`, `footer`, ...) or by a class or id
//! token such as `sidebar` or `related-stories`. Only ancestors below
//! `<body>` are checked.

use super::stopwords::StopWords;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::HashMap;

/// Shortest JSON-LD `articleBody` trusted over DOM extraction.
pub const MIN_JSONLD_BODY: usize = 200;

/// Paragraphs with fewer stopwords than this are treated as boilerplate.
const MIN_PARAGRAPH_STOPWORDS: usize = 2;

const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " — ", " – ", " » ", " :: "];

const CHROME_TAGS: &[&str] = &[
    "nav", "footer", "aside", "header", "form", "script", "style", "noscript", "figcaption",
];

const CHROME_HINTS: &[&str] = &[
    "comment", "related", "newsletter", "share", "social", "promo", "sidebar", "cookie",
];

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("static selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("static selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

/// Extract the article headline.
pub fn extract_title(document: &Html) -> Option<String> {
    let og = document
        .select(&OG_TITLE)
        .filter_map(|m| m.value().attr("content"))
        .map(collapse_whitespace)
        .find(|t| !t.is_empty());
    if og.is_some() {
        return og;
    }

    let headline = jsonld_string(document, "headline");
    if headline.is_some() {
        return headline;
    }

    let title_tag = document
        .select(&TITLE)
        .map(|t| clean_title(&t.text().collect::<String>()))
        .find(|t| !t.is_empty());
    if title_tag.is_some() {
        return title_tag;
    }

    document
        .select(&H1)
        .map(|h| collapse_whitespace(&h.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Strip a site-name suffix or prefix from a `<title>` value.
///
/// Splits on the first separator that occurs and keeps the longest piece,
/// so both "Headline | Site" and "Site - Headline" resolve to the headline.
pub fn clean_title(raw: &str) -> String {
    let title = collapse_whitespace(raw);
    for sep in TITLE_SEPARATORS {
        if title.contains(sep) {
            return title
                .split(sep)
                .map(str::trim)
                .max_by_key(|piece| piece.chars().count())
                .unwrap_or_default()
                .to_string();
        }
    }
    title
}

/// Extract the article body as paragraphs separated by blank lines.
pub fn extract_text(document: &Html, stopwords: &StopWords) -> Option<String> {
    if let Some(body) = jsonld_string(document, "articleBody") {
        let body = paragraphs_from_plain(&body);
        if body.chars().count() >= MIN_JSONLD_BODY {
            return Some(body);
        }
    }

    let mut scores: HashMap<_, f64> = HashMap::new();
    for p in document.select(&PARAGRAPH) {
        let Some(score) = paragraph_score(&p, stopwords, None) else {
            continue;
        };
        let Some(container) = container_of(p) else {
            continue;
        };
        *scores.entry(container.id()).or_default() += score;
        if let Some(grandparent) = container.parent().and_then(ElementRef::wrap) {
            *scores.entry(grandparent.id()).or_default() += score / 2.0;
        }
    }

    // Document order, strict comparison: ties go to the earlier node, which
    // is the ancestor when one candidate contains the other.
    let mut best: Option<(ElementRef, f64)> = None;
    for el in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let Some(&score) = scores.get(&el.id()) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((el, score));
        }
    }
    let (best, _) = best?;

    let text = best
        .select(&PARAGRAPH)
        .filter(|p| paragraph_score(p, stopwords, Some(&best)).is_some())
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.is_empty() { None } else { Some(text) }
}

/// Element a paragraph's score is credited to.
///
/// Starts at the paragraph's parent and climbs through wrappers whose only
/// element child is the branch holding the paragraph, so that
/// `<div><p>..</p></div><div><p>..</p></div>` credits the element around
/// both wrappers. Never climbs into `<body>`.
fn container_of(p: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = p.parent().and_then(ElementRef::wrap)?;
    while element_children(&node) == 1 {
        match node.parent().and_then(ElementRef::wrap) {
            Some(up) if !is_page_root(&up) => node = up,
            _ => break,
        }
    }
    Some(node)
}

fn element_children(el: &ElementRef) -> usize {
    el.children().filter(|c| c.value().is_element()).count()
}

fn is_page_root(el: &ElementRef) -> bool {
    matches!(el.value().name(), "body" | "html")
}

/// Stopword score of a content paragraph, or `None` for boilerplate.
///
/// The chrome check walks up to `<body>`, or to `boundary` when given.
fn paragraph_score(
    p: &ElementRef,
    stopwords: &StopWords,
    boundary: Option<&ElementRef>,
) -> Option<f64> {
    if in_chrome(p, boundary) {
        return None;
    }
    let text = collapse_whitespace(&p.text().collect::<String>());
    if text.is_empty() {
        return None;
    }

    let link_chars: usize = p
        .select(&LINK)
        .map(|a| a.text().map(str::len).sum::<usize>())
        .sum();
    if link_chars * 2 > text.len() {
        return None;
    }

    let stops = stopwords.count_in(&text);
    if stops < MIN_PARAGRAPH_STOPWORDS {
        return None;
    }
    Some(stops as f64)
}

fn in_chrome(el: &ElementRef, boundary: Option<&ElementRef>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| !is_page_root(a) && boundary.is_none_or(|b| b.id() != a.id()))
        .any(|a| is_chrome(&a))
}

fn is_chrome(el: &ElementRef) -> bool {
    let e = el.value();
    CHROME_TAGS.contains(&e.name()) || e.classes().chain(e.id()).any(is_chrome_token)
}

/// Whether one class or id token names page chrome.
///
/// A hint matches the whole token, its plural, or a `-`/`_` prefix of it:
/// `sidebar`, `comments` and `share-bar` match, `has-sidebar` does not.
fn is_chrome_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    CHROME_HINTS.iter().any(|hint| {
        token
            .strip_prefix(*hint)
            .is_some_and(|rest| rest.is_empty() || rest == "s" || rest.starts_with(['-', '_']))
    })
}

/// Re-flow a plain-text body: one paragraph per non-empty line.
fn paragraphs_from_plain(body: &str) -> String {
    body.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First non-empty string value of `key` across the page's JSON-LD blocks.
fn jsonld_string(document: &Html, key: &str) -> Option<String> {
    document
        .select(&JSON_LD)
        .filter_map(|script| {
            serde_json::from_str::<Value>(script.text().collect::<String>().trim()).ok()
        })
        .flat_map(flatten_jsonld)
        .filter_map(|obj| obj.get(key).and_then(Value::as_str).map(str::to_string))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// Objects in a JSON-LD value, descending into arrays and `@graph`.
fn flatten_jsonld(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(flatten_jsonld).collect(),
        Value::Object(mut obj) => {
            let mut out = match obj.remove("@graph") {
                Some(graph) => flatten_jsonld(graph),
                None => Vec::new(),
            };
            out.insert(0, Value::Object(obj));
            out
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> &'static StopWords {
        StopWords::for_language("en")
    }

    const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Researchers shrink language models | Example Times</title>
</head>
<body>
  <nav><p>Home and the world and the news for you</p></nav>
  <header><h1>Researchers shrink language models</h1></header>
  <div class="layout">
    <article>
      <p>Researchers at the lab said on Tuesday that they had found a way to shrink the size of large language models without a loss in quality.</p>
      <p>The method prunes the weights that are rarely used, and it can be applied to any of the open models that are in use today.</p>
      <p>It is not yet clear how the approach will work for the largest models, which are trained on far more data.</p>
      <p><a href="/more">Read more about this story on the site</a></p>
    </article>
    <div class="related-stories"><p>Another story that is in the list of the related links for the page.</p></div>
  </div>
  <footer><p>Copyright and all of the rights are reserved by the owners.</p></footer>
</body>
</html>"#;

    #[test]
    fn test_clean_title_suffix() {
        assert_eq!(
            clean_title("Researchers shrink language models | Example Times"),
            "Researchers shrink language models"
        );
    }

    #[test]
    fn test_clean_title_prefix() {
        assert_eq!(
            clean_title("Tech - Why the new chips matter for AI labs"),
            "Why the new chips matter for AI labs"
        );
    }

    #[test]
    fn test_clean_title_no_separator() {
        assert_eq!(clean_title("  Plain   headline "), "Plain headline");
    }

    #[test]
    fn test_title_from_title_tag() {
        let doc = Html::parse_document(ARTICLE_PAGE);
        assert_eq!(
            extract_title(&doc).as_deref(),
            Some("Researchers shrink language models")
        );
    }

    #[test]
    fn test_title_prefers_og_title() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="Open Graph headline"><title>Tag | Site</title></head><body></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("Open Graph headline"));
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let doc = Html::parse_document("<html><body><h1> Only a heading </h1></body></html>");
        assert_eq!(extract_title(&doc).as_deref(), Some("Only a heading"));
    }

    #[test]
    fn test_body_skips_chrome_and_link_paragraphs() {
        let doc = Html::parse_document(ARTICLE_PAGE);
        let text = extract_text(&doc, en()).unwrap();

        assert!(text.starts_with("Researchers at the lab said on Tuesday"));
        assert!(text.contains("The method prunes the weights"));
        assert!(text.contains("It is not yet clear"));
        assert!(!text.contains("Home and the world"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("Read more"));
        assert!(!text.contains("Another story"));
        assert_eq!(text.split("\n\n").count(), 3);
    }

    #[test]
    fn test_body_from_jsonld_article_body() {
        let body = "The lab said that the new model is faster than the old one. ".repeat(5);
        let html = format!(
            r#"<html><head><script type="application/ld+json">
{{"@context":"https://schema.org","@graph":[{{"@type":"WebPage"}},{{"@type":"NewsArticle","headline":"Graph headline","articleBody":"{body}"}}]}}
</script></head><body><p>tiny</p></body></html>"#
        );
        let doc = Html::parse_document(&html);

        assert_eq!(extract_title(&doc).as_deref(), Some("Graph headline"));
        let text = extract_text(&doc, en()).unwrap();
        assert!(text.starts_with("The lab said that the new model"));
    }

    #[test]
    fn test_short_jsonld_body_ignored() {
        let html = r#"<html><head><script type="application/ld+json">{"articleBody":"Too short."}</script></head>
<body><div><p>This is the real body of the article and it is in the page.</p></div></body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(
            extract_text(&doc, en()).as_deref(),
            Some("This is the real body of the article and it is in the page.")
        );
    }

    #[test]
    fn test_no_body_found() {
        let doc = Html::parse_document(
            "<html><body><div>Login</div><p>Subscribe</p><nav><p>the and of it is</p></nav></body></html>",
        );
        assert!(extract_text(&doc, en()).is_none());
    }

    #[test]
    fn test_invalid_jsonld_is_ignored() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">{not json</script><title>Fine</title></head></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("Fine"));
    }

    const COUNCIL: &str = "The council said that it will vote on the plan at the end of the month.";
    const MAYOR: &str = "The mayor said that it will vote on the bill at the end of the month.";
    const LONG: &str = "Members of the council said that they would not be able to support the plan unless it was changed, and that they had told the mayor as much.";

    #[test]
    fn test_body_class_does_not_mark_page_as_chrome() {
        let html = format!(
            r#"<html><body class="post-template has-sidebar"><div id="page"><article>
<p>{COUNCIL}</p><p>{LONG}</p>
</article></div></body></html>"#
        );
        let doc = Html::parse_document(&html);
        assert_eq!(extract_text(&doc, en()), Some(format!("{COUNCIL}\n\n{LONG}")));
    }

    #[test]
    fn test_sidebar_block_is_still_skipped() {
        let html = format!(
            r#"<html><body><article><p>{COUNCIL}</p><p>{LONG}</p></article>
<div class="widget sidebar"><p>{MAYOR}</p></div></body></html>"#
        );
        let doc = Html::parse_document(&html);
        let text = extract_text(&doc, en()).unwrap();
        assert!(text.contains(COUNCIL));
        assert!(!text.contains(MAYOR));
    }

    #[test]
    fn test_chrome_tokens_match_whole_class_names() {
        assert!(is_chrome_token("sidebar"));
        assert!(is_chrome_token("comments"));
        assert!(is_chrome_token("share-bar"));
        assert!(is_chrome_token("Related_Links"));
        assert!(!is_chrome_token("has-sidebar"));
        assert!(!is_chrome_token("shared"));
        assert!(!is_chrome_token("article-body"));
    }

    #[test]
    fn test_wrapped_paragraphs_are_kept_together() {
        for second in [MAYOR, LONG] {
            let html = format!(
                r#"<html><body><div class="story"><div><p>{COUNCIL}</p></div><div><p>{second}</p></div></div></body></html>"#
            );
            let doc = Html::parse_document(&html);
            assert_eq!(
                extract_text(&doc, en()),
                Some(format!("{COUNCIL}\n\n{second}"))
            );
        }
    }

    #[test]
    fn test_equal_scores_resolve_the_same_way_every_time() {
        let html = format!(
            r#"<html><body><section><p>{COUNCIL}</p><p>{COUNCIL}</p></section><section><p>{MAYOR}</p><p>{MAYOR}</p></section></body></html>"#
        );
        let first = extract_text(&Html::parse_document(&html), en()).unwrap();
        assert!(first.starts_with(COUNCIL));
        for _ in 0..50 {
            assert_eq!(extract_text(&Html::parse_document(&html), en()).unwrap(), first);
        }
    }
}
