pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod sampler;
pub mod scoring;
pub mod types;

pub use analysis::{
    available_months, column_values, correlation_matrix, describe, histogram, key_metrics,
    kwh_bounds, monthly_average_kwh, pearson, quantile, season_kwh_spread, summarize_column,
    ColumnSummary, CorrelationMatrix, DatasetFilter, HistogramBin, KeyMetrics, Metric,
    MonthlyAverage, SeasonSpread,
};

pub use config::load_config;

pub use error::{ConfigError, ExportError, ParseSeasonError};

pub use export::{export_csv_file, to_csv_string, write_csv, CSV_HEADER, DEFAULT_EXPORT_FILE};

pub use generator::{
    generate_all, generate_all_random, generate_all_seeded, generate_profile, generate_season,
    validate_config, validate_profile, DatasetCache,
};

pub use sampler::{FeatureSampler, MidpointSampler, RngSampler};

pub use scoring::{
    calc_kwh_monsoon, calc_kwh_summer, calc_kwh_winter, coefficients, kwh, round2,
    tilt_deviation, yield_fn, YieldCoefficients, YieldFn, OPTIMAL_TILT_DEG,
};

pub use types::{
    Dataset, DatasetMetadata, Feature, FeatureRange, FeatureRanges, FeatureValues,
    GeneratorConfig, MonthDays, NumericColumn, Observation, Season, SeasonProfile,
};
