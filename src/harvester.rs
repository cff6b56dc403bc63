use std::path::PathBuf;

use log::info;

use crate::{
    country_scraper::discover_countries, errors::HarvestError, holiday_writer::HolidayCsvWriter,
    scraping_context::ScrapingContext, year_table_scraper::scrape_country_year,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub output_path: PathBuf,
    pub countries: usize,
    pub pages: usize,
    pub total_rows: usize,
}

pub struct HolidayHarvester<'a> {
    ctx: &'a ScrapingContext,
}

impl<'a> HolidayHarvester<'a> {
    pub fn new(ctx: &'a ScrapingContext) -> Self {
        Self { ctx }
    }

    /// Scrapes every discovered country for every configured year, one page
    /// at a time, appending accepted rows to the output as they arrive.
    ///
    /// A fatal fetch error stops the run; rows written before it stay on disk.
    pub async fn run(&self) -> Result<HarvestSummary, HarvestError> {
        let config = &self.ctx.config;
        let countries = discover_countries(self.ctx).await?;
        let mut writer = HolidayCsvWriter::create(&config.output_path())?;
        let delay = config.inter_request_delay();

        let mut pages = 0;
        let mut total = 0;
        for (i, country) in countries.iter().enumerate() {
            for year in config.years() {
                let rows = scrape_country_year(self.ctx, country, year).await?;
                writer.write_batch(&rows)?;
                total += rows.len();
                pages += 1;

                info!(
                    "[{}/{}] {} {}: {} rows (total={})",
                    i + 1,
                    countries.len(),
                    country,
                    year,
                    rows.len(),
                    total
                );
                tokio::time::sleep(delay).await;
            }
        }

        info!("Saved to: {}", writer.path().display());
        info!("TOTAL rows: {}", total);

        Ok(HarvestSummary {
            output_path: writer.path().to_path_buf(),
            countries: countries.len(),
            pages,
            total_rows: writer.rows_written(),
        })
    }
}
