use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use serde::{Deserialize, de::DeserializeOwned};

use crate::{Year, errors::ConfigError};

pub const DEFAULT_BASE_URL: &str = "https://www.timeanddate.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

pub const DEFAULT_SKIP_SLUGS: [&str; 3] = ["world", "un", "fun"];

/// Holiday type labels that count as "official", matched as lowercase substrings.
pub const DEFAULT_ACCEPT_TYPE_KEYWORDS: [&str; 12] = [
    "public holiday",
    "national holiday",
    "bank holiday",
    "government holiday",
    "statutory holiday",
    "national/legal holiday",
    "gazetted holiday",
    "legal holiday",
    "federal holiday",
    "official holiday",
    "regular holiday",
    "special non-working holiday",
];

pub const WORLD_CUP_TOURNAMENTS_URL: &str =
    "https://raw.githubusercontent.com/jfjelstul/worldcup/master/data-csv/tournaments.csv";
pub const WORLD_CUP_MATCHES_URL: &str =
    "https://raw.githubusercontent.com/jfjelstul/worldcup/master/data-csv/matches.csv";
pub const WORLD_CUP_USER_AGENT: &str = "calendar-harvest-worldcup/0.1";

/// The env vars that can override the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct HarvestEnv {
    pub base_url: Option<String>,
    pub start_year: Option<Year>,
    pub end_year: Option<Year>,
    pub sleep_seconds: Option<f64>,
    pub max_retries: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<Vec<String>>,
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    const PREFIX: &'static str;

    fn load_from_env() -> Result<Self, ConfigError> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config = envy::prefixed(Self::PREFIX).from_env::<Self>()?;
        Ok(config)
    }
}

impl LoadFromEnv for HarvestEnv {
    const PREFIX: &'static str = "HARVEST_";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Holidays,
    WorldCup,
}

impl Job {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "holidays" => Ok(Job::Holidays),
            "worldcup" | "world_cup" => Ok(Job::WorldCup),
            other => Err(ConfigError::UnknownJob(other.to_string())),
        }
    }
}

/// Settings for the holiday scraper. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: String,
    pub user_agent: String,
    pub start_year: Year,
    pub end_year: Year,
    pub sleep_seconds: f64,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub request_timeout: Duration,
    pub skip_slugs: Vec<String>,
    pub accept_type_keywords: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            start_year: 2018,
            end_year: 2026,
            sleep_seconds: 0.5,
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            skip_slugs: DEFAULT_SKIP_SLUGS.iter().map(|s| s.to_string()).collect(),
            accept_type_keywords: DEFAULT_ACCEPT_TYPE_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl HarvestConfig {
    pub fn from_env(env: &HarvestEnv) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = &env.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(start_year) = env.start_year {
            config.start_year = start_year;
        }
        if let Some(end_year) = env.end_year {
            config.end_year = end_year;
        }
        if let Some(sleep_seconds) = env.sleep_seconds {
            config.sleep_seconds = sleep_seconds;
        }
        if let Some(max_retries) = env.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(output_dir) = &env.output_dir {
            config.output_dir = output_dir.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if Duration::try_from_secs_f64(self.sleep_seconds).is_err() {
            return Err(ConfigError::InvalidSleep(self.sleep_seconds));
        }
        Ok(())
    }

    pub fn years(&self) -> impl Iterator<Item = Year> {
        self.start_year..=self.end_year
    }

    /// Pause between two year pages. Zero if `sleep_seconds` fails [`Self::validate`].
    pub fn inter_request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.sleep_seconds).unwrap_or(Duration::ZERO)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("holidays_{}_{}.csv", self.start_year, self.end_year))
    }
}

/// Settings for the World Cup match-day aggregator.
#[derive(Debug, Clone)]
pub struct WorldCupConfig {
    pub tournaments_url: String,
    pub matches_url: String,
    pub start_year: Year,
    pub end_year: Year,
    /// Rename host countries, e.g. "United States" -> "USA".
    pub country_remap: BTreeMap<String, String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub output_dir: PathBuf,
}

impl Default for WorldCupConfig {
    fn default() -> Self {
        Self {
            tournaments_url: WORLD_CUP_TOURNAMENTS_URL.to_string(),
            matches_url: WORLD_CUP_MATCHES_URL.to_string(),
            start_year: 2010,
            end_year: 2026,
            country_remap: BTreeMap::new(),
            user_agent: WORLD_CUP_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(60),
            max_retries: 1,
            retry_backoff: Duration::from_secs(1),
            output_dir: PathBuf::from("."),
        }
    }
}

impl WorldCupConfig {
    pub fn from_env(env: &HarvestEnv) -> Self {
        let mut config = Self::default();
        if let Some(output_dir) = &env.output_dir {
            config.output_dir = output_dir.clone();
        }
        config
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join("worldcup_daily_features.csv")
    }
}

pub fn jobs_from_env(env: &HarvestEnv) -> Result<Vec<Job>, ConfigError> {
    match &env.jobs {
        Some(names) => names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| Job::parse(name))
            .collect(),
        None => Ok(vec![Job::Holidays, Job::WorldCup]),
    }
}
