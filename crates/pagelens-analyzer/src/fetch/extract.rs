//! HTML parsing and main-content extraction.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::types::{FetchResult, Image, Link, PageMeta, Script, Stylesheet};

/// Tags whose text never counts as visible.
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid static selector")
}

static BOILERPLATE: LazyLock<Selector> =
    LazyLock::new(|| css("script, style, nav, header, footer, aside"));
static ARTICLE_OR_MAIN: LazyLock<Selector> = LazyLock::new(|| css("article, main"));

/// Content containers recognized by convention, tried in order once no
/// `<article>` or `<main>` is present.
static CONTENT_CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "[role='main']",
        "div.content",
        ".post-content",
        ".entry-content",
        ".article-content",
        "#content",
    ]
    .into_iter()
    .map(css)
    .collect()
});

static TITLE: LazyLock<Selector> = LazyLock::new(|| css("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| css("meta[name='description']"));
static HEADINGS: LazyLock<Vec<(String, Selector)>> = LazyLock::new(|| {
    (1..=6)
        .map(|level| {
            let tag = format!("h{level}");
            let selector = css(&tag);
            (tag, selector)
        })
        .collect()
});
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| css("img"));
static EXTERNAL_SCRIPTS: LazyLock<Selector> = LazyLock::new(|| css("script[src]"));
static STYLESHEETS: LazyLock<Selector> = LazyLock::new(|| css("link[rel~='stylesheet']"));

/// Parses `html` and extracts every structured field of a [`FetchResult`].
///
/// `raw_html` keeps the input verbatim. Structured fields (meta, headings,
/// links, images, scripts, styles) and `full_text` come from the unmodified
/// document; `content` comes from the document with boilerplate removed.
#[must_use]
pub fn extract_page(html: &str) -> FetchResult {
    let document = Html::parse_document(html);

    FetchResult {
        content: extract_main_content(html),
        full_text: visible_text(document.root_element()),
        meta: extract_meta(&document),
        headings: extract_headings(&document),
        links: document
            .select(&ANCHORS)
            .map(|a| Link {
                text: element_text(a),
                href: a.value().attr("href").unwrap_or_default().to_string(),
            })
            .collect(),
        images: document
            .select(&IMAGES)
            .map(|img| Image {
                src: img.value().attr("src").unwrap_or_default().to_string(),
                alt: img.value().attr("alt").unwrap_or_default().to_string(),
                loading: img.value().attr("loading").map(str::to_string),
            })
            .collect(),
        scripts: document
            .select(&EXTERNAL_SCRIPTS)
            .map(|script| Script {
                src: script.value().attr("src").unwrap_or_default().to_string(),
                is_async: script.value().attr("async").is_some(),
                defer: script.value().attr("defer").is_some(),
            })
            .collect(),
        styles: document
            .select(&STYLESHEETS)
            .map(|link| Stylesheet {
                href: link.value().attr("href").unwrap_or_default().to_string(),
            })
            .collect(),
        raw_html: html.to_string(),
    }
}

/// Extracts the main article/body text of a page.
///
/// Removes `script`, `style`, `nav`, `header`, `footer` and `aside` subtrees,
/// then returns the text of the first `<article>`/`<main>`, else the first
/// conventional content container, else the whole remaining document.
#[must_use]
pub fn extract_main_content(html: &str) -> String {
    let mut document = Html::parse_document(html);

    let boilerplate: Vec<_> = document.select(&BOILERPLATE).map(|el| el.id()).collect();
    for id in boilerplate {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    // Detached nodes stay in the arena, so search from the root rather than
    // over every node of the document.
    let root = document.root_element();

    if let Some(main) = root.select(&ARTICLE_OR_MAIN).next() {
        return visible_text(main);
    }

    for selector in CONTENT_CONTAINERS.iter() {
        if let Some(container) = root.select(selector).next() {
            return visible_text(container);
        }
    }

    visible_text(root)
}

fn extract_meta(document: &Html) -> PageMeta {
    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|c| c.trim().to_string());

    PageMeta { title, description }
}

fn extract_headings(document: &Html) -> BTreeMap<String, Vec<String>> {
    HEADINGS
        .iter()
        .map(|(tag, selector)| {
            let texts = document.select(selector).map(element_text).collect();
            (tag.clone(), texts)
        })
        .collect()
}

/// Whitespace-normalized text of `element`, skipping script/style content.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }
    clean_text(&parts.join(" "))
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Collapses every run of whitespace to a single space and trims the ends.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
