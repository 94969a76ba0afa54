use crate::types::{FeatureValues, Season};

pub const OPTIMAL_TILT_DEG: f64 = 30.0;

pub type YieldFn = fn(f64, f64, f64, f64, f64) -> f64;

/// Weights of the linear yield model. The tilt weight applies to
/// `|tilt - OPTIMAL_TILT_DEG|` and is subtracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldCoefficients {
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub ambient_temperature: f64,
    pub tilt_penalty: f64,
}

pub const SUMMER_COEFFICIENTS: YieldCoefficients = YieldCoefficients {
    irradiance: 0.25,
    humidity: 0.05,
    wind_speed: 0.02,
    ambient_temperature: 0.1,
    tilt_penalty: 0.03,
};

pub const MONSOON_COEFFICIENTS: YieldCoefficients = YieldCoefficients {
    irradiance: 0.15,
    humidity: 0.1,
    wind_speed: 0.01,
    ambient_temperature: 0.05,
    tilt_penalty: 0.04,
};

pub const WINTER_COEFFICIENTS: YieldCoefficients = YieldCoefficients {
    irradiance: 0.18,
    humidity: 0.03,
    wind_speed: 0.015,
    ambient_temperature: 0.08,
    tilt_penalty: 0.02,
};

impl YieldCoefficients {
    pub fn apply(
        &self,
        irradiance: f64,
        humidity: f64,
        wind_speed: f64,
        ambient_temp: f64,
        tilt_angle: f64,
    ) -> f64 {
        self.irradiance * irradiance - self.humidity * humidity + self.wind_speed * wind_speed
            + self.ambient_temperature * ambient_temp
            - self.tilt_penalty * tilt_deviation(tilt_angle)
    }
}

pub fn tilt_deviation(tilt_angle: f64) -> f64 {
    (tilt_angle - OPTIMAL_TILT_DEG).abs()
}

pub fn calc_kwh_summer(
    irradiance: f64,
    humidity: f64,
    wind_speed: f64,
    ambient_temp: f64,
    tilt_angle: f64,
) -> f64 {
    SUMMER_COEFFICIENTS.apply(irradiance, humidity, wind_speed, ambient_temp, tilt_angle)
}

pub fn calc_kwh_monsoon(
    irradiance: f64,
    humidity: f64,
    wind_speed: f64,
    ambient_temp: f64,
    tilt_angle: f64,
) -> f64 {
    MONSOON_COEFFICIENTS.apply(irradiance, humidity, wind_speed, ambient_temp, tilt_angle)
}

pub fn calc_kwh_winter(
    irradiance: f64,
    humidity: f64,
    wind_speed: f64,
    ambient_temp: f64,
    tilt_angle: f64,
) -> f64 {
    WINTER_COEFFICIENTS.apply(irradiance, humidity, wind_speed, ambient_temp, tilt_angle)
}

pub fn coefficients(season: Season) -> &'static YieldCoefficients {
    match season {
        Season::Summer => &SUMMER_COEFFICIENTS,
        Season::Monsoon => &MONSOON_COEFFICIENTS,
        Season::Winter => &WINTER_COEFFICIENTS,
    }
}

pub fn yield_fn(season: Season) -> YieldFn {
    match season {
        Season::Summer => calc_kwh_summer,
        Season::Monsoon => calc_kwh_monsoon,
        Season::Winter => calc_kwh_winter,
    }
}

/// Unclamped: low irradiance with high humidity can go negative.
pub fn kwh(season: Season, values: &FeatureValues) -> f64 {
    yield_fn(season)(
        values.irradiance,
        values.humidity,
        values.wind_speed,
        values.ambient_temperature,
        values.tilt_angle,
    )
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
