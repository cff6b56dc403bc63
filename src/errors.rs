use thiserror::Error;

/// Why a single GET attempt failed.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// A fetch that failed on every attempt. Carries the last failure seen.
#[derive(Debug, Error)]
#[error("failed fetching {url} after {attempts} attempt(s): {last}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub last: AttemptFailure,
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self.last {
            AttemptFailure::Status(code) => Some(code),
            AttemptFailure::Transport(ref err) => err.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failure to set up a [`crate::RequestClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid user agent `{0}`")]
    UserAgent(String),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },
    #[error("max retries must be at least 1")]
    ZeroRetries,
    #[error("sleep seconds must be a non-negative, representable duration, got {0}")]
    InvalidSleep(f64),
    #[error("unknown job `{0}` (expected `holidays` or `worldcup`)")]
    UnknownJob(String),
    #[error("failed to load env variables into config")]
    Env(#[from] envy::Error),
    #[error("invalid country link pattern")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Fatal failures of a holiday harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid CSS selector `{0}`")]
    Selector(String),
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum WorldCupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid match date `{value}`")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("no tournaments found, check tournaments.csv schema/filters")]
    NoTournaments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected_from_last_status() {
        let err = FetchError {
            url: "https://example.com/holidays/xx/2020".to_string(),
            attempts: 3,
            last: AttemptFailure::Status(404),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("after 3 attempt(s)"));

        let err = FetchError {
            url: "https://example.com/".to_string(),
            attempts: 3,
            last: AttemptFailure::Status(503),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(503));
    }
}
