//! Page records produced by the crawler
//!
//! A [`PageRecord`] is one fetched page. Root records may carry nested
//! subcontent pages; a subcontent slot whose fetch failed is kept as
//! [`SubPage::Missing`] so positions line up with the sitemap that
//! produced them. On the wire a missing slot is JSON `null`.

use crate::crawler::parser::ParsedPage;
use serde::{Deserialize, Serialize};

/// A single fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Normalized page URL; empty only for malformed input records
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// Visible text, one space between text nodes
    #[serde(default)]
    pub text: String,

    /// Same-site links in first-seen order, no duplicates
    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default)]
    pub subcontent: Vec<SubPage>,
}

impl PageRecord {
    /// Builds a record for `url` from a parsed page, with empty subcontent
    pub fn from_parsed(url: impl Into<String>, parsed: ParsedPage) -> Self {
        Self {
            url: url.into(),
            title: parsed.title,
            text: parsed.text,
            links: parsed.links,
            subcontent: Vec::new(),
        }
    }

    /// Returns true if the record carries a usable URL
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Iterates over the subcontent pages that are present
    pub fn present_subpages(&self) -> impl Iterator<Item = &PageRecord> {
        self.subcontent.iter().filter_map(SubPage::as_present)
    }
}

/// One subcontent slot of a root page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<PageRecord>", into = "Option<PageRecord>")]
pub enum SubPage {
    /// The page was fetched
    Present(PageRecord),
    /// The fetch failed, or the input held `null`
    Missing,
}

impl SubPage {
    pub fn as_present(&self) -> Option<&PageRecord> {
        match self {
            SubPage::Present(record) => Some(record),
            SubPage::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SubPage::Missing)
    }
}

impl From<Option<PageRecord>> for SubPage {
    fn from(value: Option<PageRecord>) -> Self {
        match value {
            Some(record) => SubPage::Present(record),
            None => SubPage::Missing,
        }
    }
}

impl From<SubPage> for Option<PageRecord> {
    fn from(value: SubPage) -> Self {
        match value {
            SubPage::Present(record) => Some(record),
            SubPage::Missing => None,
        }
    }
}
