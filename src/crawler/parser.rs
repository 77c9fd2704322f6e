//! Markup extractors for member listings and leaderboards
//!
//! This module turns fetched pages into handles:
//! - Avatar links of a film's members listing
//! - The pagination control of the first members page
//! - Name links of a popular-members leaderboard
//!
//! Parsing happens synchronously so the parsed tree never lives across an
//! await point.

use crate::crawler::fetcher::Document;
use crate::url::Handle;
use scraper::{Html, Selector};

/// Avatar links inside member summaries
const MEMBER_AVATAR_SELECTOR: &str = "div.person-summary a.avatar";

/// Page links of the pagination control
const PAGINATION_SELECTOR: &str = "div.pagination div.paginate-pages ul li a";

/// Name links inside the leaderboard table
const POPULAR_NAME_SELECTOR: &str = "table.person-table a.name";

/// Handles and page count extracted from the first page of a members listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPage {
    pub handles: Vec<Handle>,

    /// Total number of pages in the listing, at least 1
    pub page_count: u32,
}

impl MemberPage {
    /// Parses a first page once, extracting both handles and page count
    pub fn parse(document: &Document) -> Self {
        let html = Html::parse_document(&document.body);
        Self {
            handles: select_handles(&html, MEMBER_AVATAR_SELECTOR),
            page_count: page_count_of(&html),
        }
    }
}

/// Extracts member handles from a members listing page
///
/// # Example
///
/// ```
/// use letterboxd_harvest::crawler::{extract_members, Document};
/// use url::Url;
///
/// let html = r#"<div class="person-summary"><a class="avatar" href="/bob/"></a></div>"#;
/// let doc = Document::new(Url::parse("https://letterboxd.com/").unwrap(), html);
///
/// let handles = extract_members(&doc);
/// assert_eq!(handles[0].as_str(), "bob");
/// ```
pub fn extract_members(document: &Document) -> Vec<Handle> {
    let html = Html::parse_document(&document.body);
    select_handles(&html, MEMBER_AVATAR_SELECTOR)
}

/// Extracts the total page count from the first page of a members listing
///
/// Returns the largest numeric label of the pagination control, or 1 when
/// the page has no numeric labels.
pub fn extract_page_count(document: &Document) -> u32 {
    let html = Html::parse_document(&document.body);
    page_count_of(&html)
}

/// Extracts member handles from a popular-members leaderboard page
pub fn extract_popular(document: &Document) -> Vec<Handle> {
    let html = Html::parse_document(&document.body);
    select_handles(&html, POPULAR_NAME_SELECTOR)
}

/// Collects the handles behind every matching link, skipping unusable targets
fn select_handles(html: &Html, selector: &str) -> Vec<Handle> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    html.select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(Handle::from_href)
        .collect()
}

fn page_count_of(html: &Html) -> u32 {
    let Ok(selector) = Selector::parse(PAGINATION_SELECTOR) else {
        return 1;
    };

    html.select(&selector)
        .filter_map(|element| {
            let label = element.text().collect::<String>();
            let label = label.trim();
            if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
                label.parse::<u32>().ok()
            } else {
                None
            }
        })
        .max()
        .unwrap_or(1)
        .max(1)
}
