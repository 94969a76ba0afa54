use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseSeasonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Summer, Season::Monsoon, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Monsoon => "monsoon",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Season::Summer),
            "monsoon" => Ok(Season::Monsoon),
            "winter" => Ok(Season::Winter),
            _ => Err(ParseSeasonError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Irradiance,
    Humidity,
    WindSpeed,
    AmbientTemperature,
    TiltAngle,
}

impl Feature {
    /// Column order of the generated table.
    pub const ALL: [Feature; 5] = [
        Feature::Irradiance,
        Feature::Humidity,
        Feature::WindSpeed,
        Feature::AmbientTemperature,
        Feature::TiltAngle,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Feature::Irradiance => "irradiance",
            Feature::Humidity => "humidity",
            Feature::WindSpeed => "wind_speed",
            Feature::AmbientTemperature => "ambient_temperature",
            Feature::TiltAngle => "tilt_angle",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Feature(Feature),
    Kwh,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Feature(Feature::Irradiance),
        NumericColumn::Feature(Feature::Humidity),
        NumericColumn::Feature(Feature::WindSpeed),
        NumericColumn::Feature(Feature::AmbientTemperature),
        NumericColumn::Feature(Feature::TiltAngle),
        NumericColumn::Kwh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Feature(feature) => feature.column_name(),
            NumericColumn::Kwh => "kwh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRanges(BTreeMap<Feature, FeatureRange>);

impl FeatureRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: Feature, min: f64, max: f64) -> Self {
        self.insert(feature, FeatureRange::new(min, max));
        self
    }

    pub fn insert(&mut self, feature: Feature, range: FeatureRange) -> Option<FeatureRange> {
        self.0.insert(feature, range)
    }

    pub fn remove(&mut self, feature: Feature) -> Option<FeatureRange> {
        self.0.remove(&feature)
    }

    pub fn get(&self, feature: Feature) -> Option<FeatureRange> {
        self.0.get(&feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, FeatureRange)> + '_ {
        self.0.iter().map(|(f, r)| (*f, *r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthDays {
    pub month: String,
    pub days: i32,
}

impl MonthDays {
    pub fn new(month: impl Into<String>, days: i32) -> Self {
        Self {
            month: month.into(),
            days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
    pub season: Season,
    pub ranges: FeatureRanges,
    pub calendar: Vec<MonthDays>,
}

impl SeasonProfile {
    /// Sum of declared day counts, ignoring negative entries.
    pub fn total_days(&self) -> usize {
        self.calendar.iter().map(|m| m.days.max(0) as usize).sum()
    }

    pub fn default_for(season: Season) -> Self {
        match season {
            Season::Summer => SeasonProfile {
                season,
                ranges: FeatureRanges::new()
                    .with(Feature::Irradiance, 600.0, 1000.0)
                    .with(Feature::Humidity, 10.0, 50.0)
                    .with(Feature::WindSpeed, 0.0, 5.0)
                    .with(Feature::AmbientTemperature, 30.0, 45.0)
                    .with(Feature::TiltAngle, 10.0, 40.0),
                calendar: vec![
                    MonthDays::new("March", 31),
                    MonthDays::new("April", 30),
                    MonthDays::new("May", 31),
                    MonthDays::new("June", 30),
                ],
            },
            Season::Monsoon => SeasonProfile {
                season,
                ranges: FeatureRanges::new()
                    .with(Feature::Irradiance, 100.0, 600.0)
                    .with(Feature::Humidity, 70.0, 100.0)
                    .with(Feature::WindSpeed, 2.0, 8.0)
                    .with(Feature::AmbientTemperature, 20.0, 35.0)
                    .with(Feature::TiltAngle, 10.0, 40.0),
                calendar: vec![
                    MonthDays::new("July", 31),
                    MonthDays::new("August", 31),
                    MonthDays::new("September", 30),
                    MonthDays::new("October", 31),
                ],
            },
            // February is fixed at 28 days, leap years are not modelled.
            Season::Winter => SeasonProfile {
                season,
                ranges: FeatureRanges::new()
                    .with(Feature::Irradiance, 300.0, 700.0)
                    .with(Feature::Humidity, 30.0, 70.0)
                    .with(Feature::WindSpeed, 1.0, 6.0)
                    .with(Feature::AmbientTemperature, 5.0, 20.0)
                    .with(Feature::TiltAngle, 10.0, 40.0),
                calendar: vec![
                    MonthDays::new("November", 30),
                    MonthDays::new("December", 31),
                    MonthDays::new("January", 31),
                    MonthDays::new("February", 28),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub profiles: Vec<SeasonProfile>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            profiles: Season::ALL
                .iter()
                .map(|&s| SeasonProfile::default_for(s))
                .collect(),
        }
    }
}

impl GeneratorConfig {
    pub fn profile(&self, season: Season) -> Option<&SeasonProfile> {
        self.profiles.iter().find(|p| p.season == season)
    }

    pub fn profile_mut(&mut self, season: Season) -> Option<&mut SeasonProfile> {
        self.profiles.iter_mut().find(|p| p.season == season)
    }

    pub fn total_days(&self) -> usize {
        self.profiles.iter().map(SeasonProfile::total_days).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureValues {
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub ambient_temperature: f64,
    pub tilt_angle: f64,
}

impl FeatureValues {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Irradiance => self.irradiance,
            Feature::Humidity => self.humidity,
            Feature::WindSpeed => self.wind_speed,
            Feature::AmbientTemperature => self.ambient_temperature,
            Feature::TiltAngle => self.tilt_angle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub ambient_temperature: f64,
    pub tilt_angle: f64,
    pub kwh: f64,
    pub season: Season,
    pub month: String,
}

impl Observation {
    pub fn features(&self) -> FeatureValues {
        FeatureValues {
            irradiance: self.irradiance,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            ambient_temperature: self.ambient_temperature,
            tilt_angle: self.tilt_angle,
        }
    }

    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::Feature(feature) => self.features().get(feature),
            NumericColumn::Kwh => self.kwh,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    pub generated_at: String,
    pub total_rows: usize,
    pub seed: Option<u64>,
}

/// The combined table. Rows are only reachable through shared borrows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
    metadata: DatasetMetadata,
}

impl Dataset {
    pub(crate) fn new(observations: Vec<Observation>, generated_at: String, seed: Option<u64>) -> Self {
        let total_rows = observations.len();
        Self {
            observations,
            metadata: DatasetMetadata {
                generated_at,
                total_rows,
                seed,
            },
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn season_rows(&self, season: Season) -> impl Iterator<Item = &Observation> + '_ {
        self.observations.iter().filter(move |o| o.season == season)
    }
}
