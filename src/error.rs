use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Feature, Season};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Problems with the generator configuration. All of these are raised before
/// any sampling happens and none of them are retryable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("season {season}: no range declared for feature `{feature}`")]
    MissingFeatureRange { season: Season, feature: Feature },

    #[error("season {season}: range for `{feature}` has min {min} > max {max}")]
    InvertedRange {
        season: Season,
        feature: Feature,
        min: f64,
        max: f64,
    },

    #[error("season {season}: range for `{feature}` is not finite ({min}, {max})")]
    NonFiniteRange {
        season: Season,
        feature: Feature,
        min: f64,
        max: f64,
    },

    #[error("season {season}: month `{month}` has negative day count {days}")]
    NegativeDayCount {
        season: Season,
        month: String,
        days: i32,
    },

    #[error("no profile configured for season {0}")]
    MissingSeason(Season),

    #[error("season {0} is configured more than once")]
    DuplicateSeason(Season),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown season `{0}` (expected summer, monsoon or winter)")]
pub struct ParseSeasonError(pub String);
