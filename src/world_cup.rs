//! Daily World Cup calendars for host countries.
//!
//! Joins the tournament and match tables of the Fjelstul World Cup database
//! and expands each host's match window into one row per calendar day.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;

use crate::{Year, config::WorldCupConfig, errors::WorldCupError, requests::RequestClient};

pub type CsvRow = HashMap<String, String>;

pub const WORLD_CUP_HEADERS: [&str; 7] = [
    "country",
    "date",
    "year",
    "month",
    "is_world_cup_day",
    "is_match_day",
    "matches_that_day",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldCupDayRow {
    pub country: String,
    pub date: String,
    pub year: Year,
    pub month: String,
    pub is_world_cup_day: u8,
    pub is_match_day: u8,
    pub matches_that_day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldCupSummary {
    pub output_path: PathBuf,
    pub hosts: usize,
    pub rows: usize,
}

/// Match counts per host and day, plus each host's first and last match day.
#[derive(Debug, Default)]
pub struct HostCalendar {
    match_count: BTreeMap<(String, NaiveDate), u32>,
    windows: BTreeMap<String, (NaiveDate, NaiveDate)>,
}

impl HostCalendar {
    fn record_match(&mut self, host: String, date: NaiveDate) {
        *self.match_count.entry((host.clone(), date)).or_insert(0) += 1;
        self.windows
            .entry(host)
            .and_modify(|(first, last)| {
                if date < *first {
                    *first = date;
                }
                if date > *last {
                    *last = date;
                }
            })
            .or_insert((date, date));
    }

    pub fn hosts(&self) -> usize {
        self.windows.len()
    }

    /// Every day of every host's window, hosts in sorted order.
    pub fn daily_rows(&self) -> Vec<WorldCupDayRow> {
        let mut rows = Vec::new();
        for (host, (first, last)) in &self.windows {
            for day in first.iter_days().take_while(|day| day <= last) {
                let matches = self
                    .match_count
                    .get(&(host.clone(), day))
                    .copied()
                    .unwrap_or(0);
                rows.push(WorldCupDayRow {
                    country: host.clone(),
                    date: day.format("%Y-%m-%d").to_string(),
                    year: day.year(),
                    month: day.format("%B").to_string(),
                    is_world_cup_day: 1,
                    is_match_day: u8::from(matches > 0),
                    matches_that_day: matches,
                });
            }
        }
        rows
    }
}

/// Parses a CSV table into rows keyed by header. Fields missing from a short
/// row read as `""`; fields beyond the header are dropped.
pub fn parse_csv_rows(text: &str) -> Result<Vec<CsvRow>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    reader
        .records()
        .map(|record| -> Result<CsvRow, csv::Error> {
            let record = record?;
            Ok(headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    (header.to_string(), record.get(i).unwrap_or("").to_string())
                })
                .collect())
        })
        .collect()
}

/// First non-empty value among `keys`, or `""`.
fn get_field<'r>(row: &'r CsvRow, keys: &[&str]) -> &'r str {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .map(|value| value.as_str())
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Splits a multi-host string such as "Japan & South Korea" into its hosts.
pub fn split_hosts(raw: &str) -> Vec<String> {
    raw.replace('&', ",")
        .replace(" and ", ",")
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(String::from)
        .collect()
}

/// Men's FIFA World Cup editions in the configured year range, as
/// tournament id -> raw host string.
pub fn select_tournaments(
    tournaments: &[CsvRow],
    config: &WorldCupConfig,
) -> Result<BTreeMap<String, String>, WorldCupError> {
    let mut hosts = BTreeMap::new();
    for tournament in tournaments {
        let id = get_field(tournament, &["tournament_id", "id"]);
        let year = get_field(tournament, &["year"]);
        if id.is_empty() || year.is_empty() {
            continue;
        }
        let Ok(year) = year.trim().parse::<Year>() else {
            continue;
        };
        if year < config.start_year || year > config.end_year {
            continue;
        }
        let name = get_field(tournament, &["tournament_name", "name", "tournament"]);
        if !name.to_lowercase().contains("fifa world cup") {
            continue;
        }
        let host = get_field(
            tournament,
            &["host_country", "host_countries", "country", "host"],
        );
        if host.is_empty() {
            continue;
        }
        hosts.insert(id.to_string(), host.to_string());
    }

    if hosts.is_empty() {
        return Err(WorldCupError::NoTournaments);
    }
    Ok(hosts)
}

pub fn build_host_calendar(
    matches: &[CsvRow],
    tournament_hosts: &BTreeMap<String, String>,
    config: &WorldCupConfig,
) -> Result<HostCalendar, WorldCupError> {
    let mut calendar = HostCalendar::default();
    for game in matches {
        let tournament_id = get_field(game, &["tournament_id", "tournament"]);
        let Some(raw_hosts) = tournament_hosts.get(tournament_id) else {
            continue;
        };
        let date = get_field(game, &["match_date", "date"]);
        if date.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|source| {
            WorldCupError::Date {
                value: date.to_string(),
                source,
            }
        })?;
        if date.year() < config.start_year || date.year() > config.end_year {
            continue;
        }

        for host in split_hosts(raw_hosts) {
            let host = config.country_remap.get(&host).cloned().unwrap_or(host);
            calendar.record_match(host, date);
        }
    }
    Ok(calendar)
}

fn write_rows(path: &Path, rows: &[WorldCupDayRow]) -> Result<(), WorldCupError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(WORLD_CUP_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Downloads both tables, builds the daily host calendars and writes them out.
pub async fn collect(config: &WorldCupConfig) -> Result<WorldCupSummary, WorldCupError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/csv"));
    let client = RequestClient::with_headers(
        &config.user_agent,
        headers,
        config.request_timeout,
        config.max_retries,
        config.retry_backoff,
    )?;

    let tournaments = parse_csv_rows(&client.fetch_url_body(&config.tournaments_url).await?)?;
    let matches = parse_csv_rows(&client.fetch_url_body(&config.matches_url).await?)?;

    let tournament_hosts = select_tournaments(&tournaments, config)?;
    let calendar = build_host_calendar(&matches, &tournament_hosts, config)?;
    let rows = calendar.daily_rows();

    let output_path = config.output_path();
    write_rows(&output_path, &rows)?;

    info!("Saved to: {}", output_path.display());
    info!("Hosts: {}", calendar.hosts());
    info!("Rows: {}", rows.len());

    Ok(WorldCupSummary {
        output_path,
        hosts: calendar.hosts(),
        rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOURNAMENTS: &str = "\
tournament_id,tournament_name,year,host_country,winner
WC-2006,2006 FIFA World Cup,2006,Germany,Italy
WC-2010,2010 FIFA World Cup,2010,South Africa,Spain
WC-2011,2011 FIFA Women's World Cup,2011,Germany,Japan
WC-2014,2014 FIFA World Cup,2014,Brazil,Germany
WC-2002,2002 FIFA World Cup,2002,Japan & South Korea,Brazil
WC-X,FIFA World Cup,not-a-year,Nowhere,
";

    const MATCHES: &str = "\
match_id,tournament_id,match_date,home_team_name
M-1,WC-2010,2010-06-11,South Africa
M-2,WC-2010,2010-06-11,Uruguay
M-3,WC-2010,2010-06-13,Germany
M-4,WC-2011,2011-06-26,Germany
M-5,WC-2006,2006-06-09,Germany
M-6,WC-2014,,Brazil
";

    #[test]
    fn hosts_are_split_on_common_separators() {
        assert_eq!(split_hosts("Japan & South Korea"), vec!["Japan", "South Korea"]);
        assert_eq!(
            split_hosts("Canada, Mexico and United States"),
            vec!["Canada", "Mexico", "United States"]
        );
        assert_eq!(split_hosts("Brazil"), vec!["Brazil"]);
        assert!(split_hosts(" , ").is_empty());
    }

    #[test]
    fn only_mens_editions_in_range_are_selected() {
        let config = WorldCupConfig::default();
        let tournaments = parse_csv_rows(TOURNAMENTS).unwrap();
        let selected = select_tournaments(&tournaments, &config).unwrap();
        assert_eq!(
            selected.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["WC-2010", "WC-2014"]
        );
    }

    #[test]
    fn no_matching_tournament_is_an_error() {
        let config = WorldCupConfig {
            start_year: 1900,
            end_year: 1920,
            ..Default::default()
        };
        let tournaments = parse_csv_rows(TOURNAMENTS).unwrap();
        assert!(matches!(
            select_tournaments(&tournaments, &config),
            Err(WorldCupError::NoTournaments)
        ));
    }

    #[test]
    fn windows_expand_to_one_row_per_day() {
        let mut config = WorldCupConfig::default();
        config
            .country_remap
            .insert("South Africa".to_string(), "RSA".to_string());
        let tournaments = parse_csv_rows(TOURNAMENTS).unwrap();
        let matches = parse_csv_rows(MATCHES).unwrap();
        let hosts = select_tournaments(&tournaments, &config).unwrap();
        let calendar = build_host_calendar(&matches, &hosts, &config).unwrap();

        assert_eq!(calendar.hosts(), 1);
        let rows = calendar.daily_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            WorldCupDayRow {
                country: "RSA".to_string(),
                date: "2010-06-11".to_string(),
                year: 2010,
                month: "June".to_string(),
                is_world_cup_day: 1,
                is_match_day: 1,
                matches_that_day: 2,
            }
        );
        assert_eq!(rows[1].date, "2010-06-12");
        assert_eq!(rows[1].is_match_day, 0);
        assert_eq!(rows[1].matches_that_day, 0);
        assert_eq!(rows[2].matches_that_day, 1);
    }

    #[test]
    fn short_rows_read_missing_fields_as_empty() {
        let rows = parse_csv_rows(
            "tournament_id,match_date,stage_name\nWC-2010,2010-06-11\nWC-2010,2010-06-12,group stage,extra\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["match_date"], "2010-06-11");
        assert_eq!(rows[0]["stage_name"], "");
        assert_eq!(rows[1]["stage_name"], "group stage");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn short_match_row_still_counts() {
        let config = WorldCupConfig::default();
        let hosts = BTreeMap::from([("WC-2010".to_string(), "South Africa".to_string())]);
        let matches = parse_csv_rows(
            "match_id,tournament_id,match_date,home_team_name\nM-1,WC-2010,2010-06-11\nM-2,WC-2010\n",
        )
        .unwrap();
        let calendar = build_host_calendar(&matches, &hosts, &config).unwrap();
        let rows = calendar.daily_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].matches_that_day, 1);
    }

    #[test]
    fn malformed_match_date_is_reported() {
        let config = WorldCupConfig::default();
        let hosts = BTreeMap::from([("WC-2010".to_string(), "South Africa".to_string())]);
        let matches = parse_csv_rows("tournament_id,match_date\nWC-2010,11/06/2010\n").unwrap();
        assert!(matches!(
            build_host_calendar(&matches, &hosts, &config),
            Err(WorldCupError::Date { .. })
        ));
    }
}
