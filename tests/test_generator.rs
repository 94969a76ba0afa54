use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use solar_dataset::error::ConfigError;
use solar_dataset::generator::*;
use solar_dataset::sampler::{FeatureSampler, MidpointSampler, RngSampler};
use solar_dataset::scoring::{calc_kwh_summer, kwh, round2};
use solar_dataset::types::*;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

#[derive(Default)]
struct CountingSampler {
    calls: usize,
}

impl FeatureSampler for CountingSampler {
    fn sample(&mut self, range: FeatureRange) -> f64 {
        self.calls += 1;
        range.midpoint()
    }
}

static SEEDED: LazyLock<Dataset> =
    LazyLock::new(|| generate_all_seeded(&GeneratorConfig::default(), 42).unwrap());

fn summer() -> SeasonProfile {
    SeasonProfile::default_for(Season::Summer)
}

// ── Default configuration ──

#[test]
fn test_default_config_tables() {
    let c = GeneratorConfig::default();
    let seasons: Vec<Season> = c.profiles.iter().map(|p| p.season).collect();
    assert_eq!(seasons, Season::ALL.to_vec());
    assert_eq!(c.profile(Season::Summer).unwrap().total_days(), 122);
    assert_eq!(c.profile(Season::Monsoon).unwrap().total_days(), 123);
    assert_eq!(c.profile(Season::Winter).unwrap().total_days(), 120);
    assert_eq!(c.total_days(), 365);

    let winter = c.profile(Season::Winter).unwrap();
    assert_eq!(winter.calendar.last().unwrap(), &MonthDays::new("February", 28));
    assert_eq!(
        winter.ranges.get(Feature::AmbientTemperature),
        Some(FeatureRange::new(5.0, 20.0))
    );
}

#[test]
fn test_default_config_validates() {
    assert!(validate_config(&GeneratorConfig::default()).is_ok());
}

// ── Row counts and ordering ──

#[test]
fn test_generate_season_row_counts() {
    let mut sampler = RngSampler::seeded(3);
    for season in Season::ALL {
        let p = SeasonProfile::default_for(season);
        let rows = generate_season(season, &p.ranges, &p.calendar, &mut sampler).unwrap();
        assert_eq!(rows.len(), p.total_days(), "{}", season);
        assert!(rows.iter().all(|o| o.season == season));
    }
}

#[test]
fn test_generate_all_365_rows() {
    assert_eq!(SEEDED.len(), 365);
    assert_eq!(SEEDED.metadata().total_rows, 365);
    assert_eq!(SEEDED.metadata().seed, Some(42));
}

#[test]
fn test_generate_all_season_blocks_in_order() {
    let rows = SEEDED.observations();
    assert!(rows[..122].iter().all(|o| o.season == Season::Summer));
    assert!(rows[122..245].iter().all(|o| o.season == Season::Monsoon));
    assert!(rows[245..].iter().all(|o| o.season == Season::Winter));
}

#[test]
fn test_months_follow_calendar_order() {
    let config = GeneratorConfig::default();
    let mut expected: Vec<&str> = Vec::new();
    for p in &config.profiles {
        for m in &p.calendar {
            expected.extend(std::iter::repeat(m.month.as_str()).take(m.days as usize));
        }
    }
    let got: Vec<&str> = SEEDED.observations().iter().map(|o| o.month.as_str()).collect();
    assert_eq!(got, expected);
}

// ── Value properties ──

#[test]
fn test_features_within_declared_ranges() {
    let config = GeneratorConfig::default();
    for o in SEEDED.observations() {
        let ranges = &config.profile(o.season).unwrap().ranges;
        let values = o.features();
        for feature in Feature::ALL {
            let r = ranges.get(feature).unwrap();
            let v = values.get(feature);
            assert!(r.contains(v, 0.01), "{} {}={} outside {:?}", o.season, feature, v, r);
        }
    }
}

#[test]
fn test_values_rounded_to_two_decimals() {
    for o in SEEDED.observations() {
        for v in [o.irradiance, o.humidity, o.wind_speed, o.ambient_temperature, o.tilt_angle, o.kwh] {
            assert_approx!(v * 100.0, (v * 100.0).round(), 1e-6);
        }
    }
}

#[test]
fn test_kwh_computed_from_rounded_features() {
    for o in SEEDED.observations() {
        assert_eq!(o.kwh, round2(kwh(o.season, &o.features())));
    }
}

// ── Determinism ──

#[test]
fn test_same_seed_same_rows() {
    let config = GeneratorConfig::default();
    let a = generate_all_seeded(&config, 9).unwrap();
    let b = generate_all_seeded(&config, 9).unwrap();
    assert_eq!(a.observations(), b.observations());
}

#[test]
fn test_different_seeds_differ() {
    let config = GeneratorConfig::default();
    let a = generate_all_seeded(&config, 1).unwrap();
    let b = generate_all_seeded(&config, 2).unwrap();
    assert_ne!(a.observations(), b.observations());
}

#[test]
fn test_unseeded_runs_share_shape() {
    let config = GeneratorConfig::default();
    let a = generate_all_random(&config).unwrap();
    let b = generate_all_random(&config).unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.metadata().seed, None);

    let labels = |d: &Dataset| {
        let mut counts: BTreeMap<(Season, String), usize> = BTreeMap::new();
        for o in d.observations() {
            *counts.entry((o.season, o.month.clone())).or_default() += 1;
        }
        counts
    };
    assert_eq!(labels(&a), labels(&b));
}

#[test]
fn test_midpoint_sampler_single_day() {
    let p = summer();
    let rows = generate_season(
        Season::Summer,
        &p.ranges,
        &[MonthDays::new("March", 1)],
        &mut MidpointSampler,
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    let o = &rows[0];
    assert_eq!(o.month, "March");
    assert_eq!(o.irradiance, 800.0);
    assert_eq!(o.humidity, 30.0);
    assert_eq!(o.wind_speed, 2.5);
    assert_eq!(o.ambient_temperature, 37.5);
    assert_eq!(o.tilt_angle, 25.0);
    assert_eq!(o.kwh, round2(calc_kwh_summer(800.0, 30.0, 2.5, 37.5, 25.0)));
    assert_approx!(o.kwh, 202.15, 1e-9);
}

#[test]
fn test_degenerate_range_is_constant() {
    let mut p = summer();
    p.ranges.insert(Feature::TiltAngle, FeatureRange::new(30.0, 30.0));
    let rows = generate_profile(&p, &mut RngSampler::seeded(5)).unwrap();
    assert!(rows.iter().all(|o| o.tilt_angle == 30.0));
}

// ── Boundaries ──

#[test]
fn test_zero_day_month_contributes_nothing() {
    let p = summer();
    let calendar = vec![
        MonthDays::new("March", 2),
        MonthDays::new("April", 0),
        MonthDays::new("May", 1),
    ];
    let rows = generate_season(Season::Summer, &p.ranges, &calendar, &mut MidpointSampler).unwrap();
    let months: Vec<&str> = rows.iter().map(|o| o.month.as_str()).collect();
    assert_eq!(months, vec!["March", "March", "May"]);
}

#[test]
fn test_empty_calendar() {
    let p = summer();
    let rows = generate_season(Season::Summer, &p.ranges, &[], &mut MidpointSampler).unwrap();
    assert!(rows.is_empty());
}

// ── Configuration errors ──

#[test]
fn test_inverted_range_fails_before_sampling() {
    let mut p = summer();
    p.ranges.insert(Feature::Humidity, FeatureRange::new(50.0, 10.0));
    let mut sampler = CountingSampler::default();
    let err = generate_profile(&p, &mut sampler).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvertedRange { season: Season::Summer, feature: Feature::Humidity, .. }
    ));
    assert_eq!(sampler.calls, 0);
}

#[test]
fn test_generate_all_validates_every_season_first() {
    let mut config = GeneratorConfig::default();
    config
        .profile_mut(Season::Winter)
        .unwrap()
        .ranges
        .insert(Feature::Irradiance, FeatureRange::new(700.0, 300.0));
    let mut sampler = CountingSampler::default();
    assert!(generate_all(&config, &mut sampler).is_err());
    assert_eq!(sampler.calls, 0);
}

#[test]
fn test_missing_feature_range() {
    let mut p = summer();
    p.ranges.remove(Feature::WindSpeed);
    let err = validate_profile(&p).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingFeatureRange { feature: Feature::WindSpeed, .. }
    ));
}

#[test]
fn test_non_finite_range() {
    let mut p = summer();
    p.ranges.insert(Feature::Irradiance, FeatureRange::new(f64::NAN, 10.0));
    assert!(matches!(
        validate_profile(&p).unwrap_err(),
        ConfigError::NonFiniteRange { .. }
    ));
}

#[test]
fn test_negative_day_count() {
    let mut p = summer();
    p.calendar.push(MonthDays::new("Smarch", -1));
    let mut sampler = CountingSampler::default();
    let err = generate_profile(&p, &mut sampler).unwrap_err();
    match err {
        ConfigError::NegativeDayCount { month, days, .. } => {
            assert_eq!(month, "Smarch");
            assert_eq!(days, -1);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(sampler.calls, 0);
}

#[test]
fn test_missing_season() {
    let mut config = GeneratorConfig::default();
    config.profiles.retain(|p| p.season != Season::Monsoon);
    assert!(matches!(
        validate_config(&config).unwrap_err(),
        ConfigError::MissingSeason(Season::Monsoon)
    ));
}

#[test]
fn test_duplicate_season() {
    let mut config = GeneratorConfig::default();
    config.profiles.push(SeasonProfile::default_for(Season::Winter));
    assert!(matches!(
        validate_config(&config).unwrap_err(),
        ConfigError::DuplicateSeason(Season::Winter)
    ));
}

// ── Cache ──

#[test]
fn test_cache_returns_memoized_dataset() {
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();
    let mut sampler = CountingSampler::default();

    let first = cache.get_or_generate(&config, &mut sampler).unwrap();
    let calls = sampler.calls;
    assert_eq!(calls, 365 * 5);

    let second = cache.get_or_generate(&config, &mut sampler).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(sampler.calls, calls);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_keyed_by_config() {
    let config = GeneratorConfig::default();
    let mut other = config.clone();
    other.profile_mut(Season::Summer).unwrap().calendar[0].days = 1;

    let mut cache = DatasetCache::new();
    let mut sampler = RngSampler::seeded(11);
    let a = cache.get_or_generate(&config, &mut sampler).unwrap();
    let b = cache.get_or_generate(&other, &mut sampler).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(a.len(), 365);
    assert_eq!(b.len(), 335);
    assert!(cache.get(&config).is_some());
}

#[test]
fn test_cache_regenerate_replaces_entry() {
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();
    let old = cache.get_or_generate(&config, &mut RngSampler::seeded(1)).unwrap();
    let new = cache.regenerate(&config, &mut RngSampler::seeded(2)).unwrap();
    assert_ne!(old.observations(), new.observations());
    let cached = cache.get(&config).unwrap();
    assert!(Arc::ptr_eq(&cached, &new));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_invalidate_and_clear() {
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();
    cache.get_or_generate(&config, &mut MidpointSampler).unwrap();
    assert!(cache.invalidate(&config));
    assert!(!cache.invalidate(&config));
    assert!(cache.is_empty());

    cache.get_or_generate(&config, &mut MidpointSampler).unwrap();
    cache.clear();
    assert!(cache.get(&config).is_none());
}

#[test]
fn test_cache_does_not_store_invalid_config() {
    let mut config = GeneratorConfig::default();
    config.profiles.pop();
    let mut cache = DatasetCache::new();
    assert!(cache.get_or_generate(&config, &mut MidpointSampler).is_err());
    assert!(cache.is_empty());
}
