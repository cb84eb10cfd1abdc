use std::collections::BTreeMap;

use serde::Serialize;

/// Everything extracted from one fetched page.
///
/// Built once per cache miss and never mutated afterwards; the cache hands
/// out shared `Arc<FetchResult>` handles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchResult {
    /// Visible text of the main content region, whitespace-normalized.
    pub content: String,
    /// Visible text of the whole document, whitespace-normalized.
    pub full_text: String,
    pub meta: PageMeta,
    /// Heading text keyed by tag name (`h1`..`h6`). Every level is present.
    pub headings: BTreeMap<String, Vec<String>>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub scripts: Vec<Script>,
    pub styles: Vec<Stylesheet>,
    /// The HTML exactly as received.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_html: String,
}

impl FetchResult {
    /// Heading texts for `level` (1-6). Out-of-range levels yield an empty slice.
    #[must_use]
    pub fn headings_at(&self, level: u8) -> &[String] {
        self.headings
            .get(&format!("h{level}"))
            .map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub loading: Option<String>,
}

/// An external `<script src=...>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    pub src: String,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub defer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    pub href: String,
}
