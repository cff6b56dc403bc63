use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::{
    Year,
    errors::HarvestError,
    scraping_context::ScrapingContext,
    text_manipulators::{extract_plain_text, extract_text, get_year_page_url},
    type_classifier::TypeClassifier,
};

/// One accepted holiday, as written to the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayRecord {
    /// `"<year> <month day as shown on the page>"`, not a parsed date.
    pub date: String,
    pub country: String,
    pub holiday_name: String,
    pub holiday_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    MissingDate,
    TooFewCells(usize),
    UnknownType,
    RejectedType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(HolidayRecord),
    Skipped(SkipReason),
}

impl RowOutcome {
    pub fn accepted(self) -> Option<HolidayRecord> {
        match self {
            RowOutcome::Accepted(record) => Some(record),
            RowOutcome::Skipped(_) => None,
        }
    }
}

/// Maps the header row texts to the index of the type cell among a body
/// row's `<td>` cells.
///
/// Body rows render the date as a leading `<th>`, so their `<td>` cells start
/// one column later than the header cells: a "type" header at position `p`
/// lands on `<td>` number `p - 1`. A "type" header in the date position has
/// no `<td>` counterpart and resolves to `None`.
pub fn resolve_type_column<S: AsRef<str>>(headers: &[S]) -> Option<usize> {
    let position = headers
        .iter()
        .position(|header| header.as_ref().trim().eq_ignore_ascii_case("type"))?;
    position.checked_sub(1)
}

struct HolidayTableSelectors {
    table: Selector,
    head: Selector,
    head_cell: Selector,
    body_row: Selector,
    link: Selector,
    date_cell: Selector,
    data_cell: Selector,
}

impl HolidayTableSelectors {
    fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            table: parse_selector("table#holidays-table")?,
            head: parse_selector("thead")?,
            head_cell: parse_selector("th, td")?,
            body_row: parse_selector("tbody tr")?,
            link: parse_selector("a")?,
            date_cell: parse_selector("th")?,
            data_cell: parse_selector("td")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|_| HarvestError::Selector(selector.to_string()))
}

/// Classifies every body row of the holiday table on a year page, in
/// document order. A page without the table yields no rows.
pub fn parse_year_page(
    html: &str,
    country: &str,
    year: Year,
    classifier: &TypeClassifier,
) -> Result<Vec<RowOutcome>, HarvestError> {
    let selectors = HolidayTableSelectors::new()?;
    let document = Html::parse_document(html);

    let Some(table) = document.select(&selectors.table).next() else {
        return Ok(vec![]);
    };

    let type_column = table.select(&selectors.head).next().and_then(|head| {
        let headers: Vec<String> = head
            .select(&selectors.head_cell)
            .map(extract_text)
            .collect();
        resolve_type_column(headers.as_slice())
    });

    // html5ever wraps bare `<tr>` rows in an implied `<tbody>`, so every
    // parsed table has a body.
    Ok(table
        .select(&selectors.body_row)
        .map(|row| classify_row(row, &selectors, type_column, country, year, classifier))
        .collect())
}

fn classify_row(
    row: ElementRef,
    selectors: &HolidayTableSelectors,
    type_column: Option<usize>,
    country: &str,
    year: Year,
    classifier: &TypeClassifier,
) -> RowOutcome {
    let Some(name_link) = row.select(&selectors.link).next() else {
        return RowOutcome::Skipped(SkipReason::MissingName);
    };
    let Some(date_cell) = row.select(&selectors.date_cell).next() else {
        return RowOutcome::Skipped(SkipReason::MissingDate);
    };
    let cells: Vec<String> = row.select(&selectors.data_cell).map(extract_text).collect();
    if cells.len() < 2 {
        return RowOutcome::Skipped(SkipReason::TooFewCells(cells.len()));
    }

    let holiday_type = match type_column {
        Some(index) if index < cells.len() => Some(cells[index].clone()),
        // No usable type column, so take the first cell that looks like a type.
        _ => cells
            .iter()
            .find(|text| text.to_lowercase().contains("holiday"))
            .cloned(),
    };

    let holiday_type = match holiday_type {
        Some(label) if !label.is_empty() => label,
        _ => return RowOutcome::Skipped(SkipReason::UnknownType),
    };
    if !classifier.is_accepted(&holiday_type) {
        return RowOutcome::Skipped(SkipReason::RejectedType(holiday_type));
    }

    RowOutcome::Accepted(HolidayRecord {
        date: format!("{} {}", year, extract_plain_text(date_cell)),
        country: country.to_string(),
        holiday_name: extract_text(name_link),
        holiday_type,
    })
}

/// Scrapes the accepted holidays of one country for one year.
///
/// A 404 from the site means the country has no page for that year and
/// yields an empty list. Any other fetch failure is returned.
pub async fn scrape_country_year(
    ctx: &ScrapingContext,
    country: &str,
    year: Year,
) -> Result<Vec<HolidayRecord>, HarvestError> {
    let url = get_year_page_url(&ctx.config.base_url, country, year);
    let html = match ctx.request_client.fetch_url_body(&url).await {
        Ok(html) => html,
        Err(err) if err.is_not_found() => {
            debug!("no holiday page for {country} {year}");
            return Ok(vec![]);
        }
        Err(err) => return Err(err.into()),
    };

    let outcomes = parse_year_page(&html, country, year, &ctx.classifier)?;
    Ok(outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            RowOutcome::Accepted(record) => Some(record),
            RowOutcome::Skipped(reason) => {
                debug!("{country} {year}: skipped row ({reason:?})");
                None
            }
        })
        .collect())
}
