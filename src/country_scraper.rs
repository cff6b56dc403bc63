use std::collections::BTreeSet;

use log::info;
use regex::Regex;
use scraper::{Html, Selector};

use crate::{
    errors::HarvestError, scraping_context::ScrapingContext,
    text_manipulators::get_holidays_index_url,
};

/// Recognises holiday-site links that point at a country page.
pub struct CountryLinkMatcher {
    // `/holidays/<slug>/` or `/holidays/<slug>`
    index_regex: Regex,
    // `/holidays/<slug>/<year>`
    year_page_regex: Regex,
}

impl CountryLinkMatcher {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            index_regex: Regex::new(r"^/holidays/([a-z0-9\-]+)/?$")?,
            year_page_regex: Regex::new(r"^/holidays/([a-z0-9\-]+)/\d{4}$")?,
        })
    }

    pub fn extract_slug<'h>(&self, href: &'h str) -> Option<&'h str> {
        let caps = self
            .index_regex
            .captures(href)
            .or_else(|| self.year_page_regex.captures(href))?;
        caps.get(1).map(|m| m.as_str())
    }
}

/// Collects the country slugs linked from the index page, sorted and without
/// the excluded aggregate pages.
pub fn parse_country_slugs(
    html: &str,
    matcher: &CountryLinkMatcher,
    skip_slugs: &[String],
) -> Result<Vec<String>, HarvestError> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("a[href]").map_err(|_| HarvestError::Selector("a[href]".to_string()))?;

    let slugs: BTreeSet<&str> = document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| matcher.extract_slug(href))
        .filter(|slug| !skip_slugs.iter().any(|skip| skip.as_str() == *slug))
        .collect();

    Ok(slugs.into_iter().map(String::from).collect())
}

/// Fetches the holiday index and returns every country it links to.
/// Any fetch failure here aborts the run.
pub async fn discover_countries(ctx: &ScrapingContext) -> Result<Vec<String>, HarvestError> {
    let url = get_holidays_index_url(&ctx.config.base_url);
    let html = ctx.request_client.fetch_url_body(&url).await?;
    let countries = parse_country_slugs(&html, &ctx.link_matcher, &ctx.config.skip_slugs)?;
    info!("Countries: {}", countries.len());
    Ok(countries)
}
