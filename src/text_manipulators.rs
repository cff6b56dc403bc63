use scraper::ElementRef;

use crate::Year;

/// Text of `node` with each text fragment trimmed and the non-empty ones
/// joined by a single space.
pub fn extract_text(node: ElementRef) -> String {
    node.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`extract_text`], with interior non-breaking spaces turned into plain spaces.
pub fn extract_plain_text(node: ElementRef) -> String {
    extract_text(node).replace('\u{a0}', " ")
}

pub fn get_holidays_index_url(base_url: &str) -> String {
    format!("{}/holidays/", base_url.trim_end_matches('/'))
}

pub fn get_year_page_url(base_url: &str, country: &str, year: Year) -> String {
    format!("{}/holidays/{}/{}", base_url.trim_end_matches('/'), country, year)
}
