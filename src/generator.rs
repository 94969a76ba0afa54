use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::sampler::{FeatureSampler, RngSampler};
use crate::scoring;
use crate::types::{
    Dataset, Feature, FeatureRange, FeatureRanges, FeatureValues, GeneratorConfig, MonthDays,
    Observation, Season, SeasonProfile,
};

fn resolve_ranges(season: Season, ranges: &FeatureRanges) -> Result<[FeatureRange; 5]> {
    let mut resolved = [FeatureRange::new(0.0, 0.0); 5];
    for (slot, feature) in resolved.iter_mut().zip(Feature::ALL) {
        let range = ranges
            .get(feature)
            .ok_or(ConfigError::MissingFeatureRange { season, feature })?;
        if !range.min.is_finite() || !range.max.is_finite() {
            return Err(ConfigError::NonFiniteRange {
                season,
                feature,
                min: range.min,
                max: range.max,
            });
        }
        if range.min > range.max {
            return Err(ConfigError::InvertedRange {
                season,
                feature,
                min: range.min,
                max: range.max,
            });
        }
        *slot = range;
    }
    Ok(resolved)
}

fn validate_calendar(season: Season, calendar: &[MonthDays]) -> Result<()> {
    match calendar.iter().find(|m| m.days < 0) {
        Some(m) => Err(ConfigError::NegativeDayCount {
            season,
            month: m.month.clone(),
            days: m.days,
        }),
        None => Ok(()),
    }
}

pub fn validate_profile(profile: &SeasonProfile) -> Result<()> {
    resolve_ranges(profile.season, &profile.ranges)?;
    validate_calendar(profile.season, &profile.calendar)
}

/// Every season must appear exactly once and every profile must be valid.
pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    for season in Season::ALL {
        match config.profiles.iter().filter(|p| p.season == season).count() {
            0 => return Err(ConfigError::MissingSeason(season)),
            1 => {}
            _ => return Err(ConfigError::DuplicateSeason(season)),
        }
    }
    config.profiles.iter().try_for_each(validate_profile)
}

fn sample_features<S: FeatureSampler>(ranges: &[FeatureRange; 5], sampler: &mut S) -> FeatureValues {
    let [irr, hum, wind, temp, tilt] = ranges;
    FeatureValues {
        irradiance: scoring::round2(sampler.sample(*irr)),
        humidity: scoring::round2(sampler.sample(*hum)),
        wind_speed: scoring::round2(sampler.sample(*wind)),
        ambient_temperature: scoring::round2(sampler.sample(*temp)),
        tilt_angle: scoring::round2(sampler.sample(*tilt)),
    }
}

/// One observation per declared day, months in calendar order. Features are
/// rounded to two decimals before `kwh` is computed from them.
pub fn generate_season<S: FeatureSampler>(
    season: Season,
    ranges: &FeatureRanges,
    calendar: &[MonthDays],
    sampler: &mut S,
) -> Result<Vec<Observation>> {
    let resolved = resolve_ranges(season, ranges)?;
    validate_calendar(season, calendar)?;

    let total: usize = calendar.iter().map(|m| m.days as usize).sum();
    let mut observations = Vec::with_capacity(total);

    for entry in calendar {
        for _ in 0..entry.days {
            let values = sample_features(&resolved, sampler);
            let kwh = scoring::round2(scoring::kwh(season, &values));
            observations.push(Observation {
                irradiance: values.irradiance,
                humidity: values.humidity,
                wind_speed: values.wind_speed,
                ambient_temperature: values.ambient_temperature,
                tilt_angle: values.tilt_angle,
                kwh,
                season,
                month: entry.month.clone(),
            });
        }
    }

    debug!(%season, rows = observations.len(), "generated season");
    Ok(observations)
}

pub fn generate_profile<S: FeatureSampler>(
    profile: &SeasonProfile,
    sampler: &mut S,
) -> Result<Vec<Observation>> {
    generate_season(profile.season, &profile.ranges, &profile.calendar, sampler)
}

fn generate_with<S: FeatureSampler>(
    config: &GeneratorConfig,
    sampler: &mut S,
    seed: Option<u64>,
) -> Result<Dataset> {
    validate_config(config)?;

    let mut observations = Vec::with_capacity(config.total_days());
    for season in Season::ALL {
        let profile = config
            .profile(season)
            .ok_or(ConfigError::MissingSeason(season))?;
        observations.extend(generate_profile(profile, sampler)?);
    }

    info!(rows = observations.len(), ?seed, "generated dataset");
    Ok(Dataset::new(observations, Utc::now().to_rfc3339(), seed))
}

/// Summer, monsoon and winter blocks concatenated in that order.
pub fn generate_all<S: FeatureSampler>(config: &GeneratorConfig, sampler: &mut S) -> Result<Dataset> {
    generate_with(config, sampler, None)
}

pub fn generate_all_seeded(config: &GeneratorConfig, seed: u64) -> Result<Dataset> {
    generate_with(config, &mut RngSampler::seeded(seed), Some(seed))
}

pub fn generate_all_random(config: &GeneratorConfig) -> Result<Dataset> {
    generate_with(config, &mut RngSampler::thread(), None)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProfileKey {
    season: Season,
    ranges: Vec<(Feature, u64, u64)>,
    calendar: Vec<MonthDays>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConfigKey(Vec<ProfileKey>);

impl ConfigKey {
    fn of(config: &GeneratorConfig) -> Self {
        ConfigKey(
            config
                .profiles
                .iter()
                .map(|p| ProfileKey {
                    season: p.season,
                    ranges: p
                        .ranges
                        .iter()
                        .map(|(f, r)| (f, r.min.to_bits(), r.max.to_bits()))
                        .collect(),
                    calendar: p.calendar.clone(),
                })
                .collect(),
        )
    }
}

/// Memoized datasets keyed by the full generator configuration. Entries
/// live until the owner invalidates them; nothing expires on its own.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<ConfigKey, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config: &GeneratorConfig) -> Option<Arc<Dataset>> {
        self.entries.get(&ConfigKey::of(config)).cloned()
    }

    pub fn get_or_generate<S: FeatureSampler>(
        &mut self,
        config: &GeneratorConfig,
        sampler: &mut S,
    ) -> Result<Arc<Dataset>> {
        let key = ConfigKey::of(config);
        if let Some(dataset) = self.entries.get(&key) {
            info!(rows = dataset.len(), "dataset cache hit");
            return Ok(Arc::clone(dataset));
        }
        info!("dataset cache miss");
        let dataset = Arc::new(generate_all(config, sampler)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Samples a fresh dataset and replaces any cached entry for `config`.
    /// On error the previous entry is kept.
    pub fn regenerate<S: FeatureSampler>(
        &mut self,
        config: &GeneratorConfig,
        sampler: &mut S,
    ) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(generate_all(config, sampler)?);
        self.entries.insert(ConfigKey::of(config), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn invalidate(&mut self, config: &GeneratorConfig) -> bool {
        self.entries.remove(&ConfigKey::of(config)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
