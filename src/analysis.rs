//! Read-only views over generated observations: row filtering plus the
//! aggregates a dashboard front-end plots. Every function accepts an empty
//! slice and reports undefined statistics as `None`.

use tracing::warn;

use crate::types::{NumericColumn, Observation, Season};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetFilter {
    /// `None` keeps every season, `Some(vec![])` keeps nothing.
    pub seasons: Option<Vec<Season>>,
    pub months: Option<Vec<String>>,
    /// Inclusive on both ends.
    pub kwh_range: Option<(f64, f64)>,
}

impl DatasetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seasons(mut self, seasons: impl IntoIterator<Item = Season>) -> Self {
        self.seasons = Some(seasons.into_iter().collect());
        self
    }

    pub fn months<M: Into<String>>(mut self, months: impl IntoIterator<Item = M>) -> Self {
        self.months = Some(months.into_iter().map(Into::into).collect());
        self
    }

    pub fn kwh_between(mut self, min: f64, max: f64) -> Self {
        self.kwh_range = Some((min, max));
        self
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        let season_ok = self
            .seasons
            .as_ref()
            .map_or(true, |s| s.contains(&observation.season));
        let month_ok = self
            .months
            .as_ref()
            .map_or(true, |m| m.iter().any(|name| *name == observation.month));
        let kwh_ok = self
            .kwh_range
            .map_or(true, |(lo, hi)| observation.kwh >= lo && observation.kwh <= hi);
        season_ok && month_ok && kwh_ok
    }

    pub fn apply(&self, rows: &[Observation]) -> Vec<Observation> {
        let kept: Vec<Observation> = rows.iter().filter(|o| self.matches(o)).cloned().collect();
        if kept.is_empty() && !rows.is_empty() {
            warn!(input_rows = rows.len(), "filter removed every row");
        }
        kept
    }
}

/// Distinct month labels of the selected seasons, in first-seen order.
pub fn available_months(rows: &[Observation], seasons: &[Season]) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for o in rows.iter().filter(|o| seasons.contains(&o.season)) {
        if !months.iter().any(|m| *m == o.month) {
            months.push(o.month.clone());
        }
    }
    months
}

pub fn kwh_bounds(rows: &[Observation]) -> Option<(f64, f64)> {
    let values = column_values(rows, NumericColumn::Kwh);
    Some((min(&values)?, max(&values)?))
}

pub fn column_values(rows: &[Observation], column: NumericColumn) -> Vec<f64> {
    rows.iter().map(|o| o.value(column)).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear interpolation between closest ranks. `sorted` must be ascending.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub value: Option<f64>,
    pub delta: Option<f64>,
}

impl Metric {
    fn against(filtered: Option<f64>, full: Option<f64>) -> Self {
        let delta = match (filtered, full) {
            (Some(f), Some(a)) => Some(f - a),
            _ => None,
        };
        Self {
            value: filtered,
            delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMetrics {
    pub total_points: usize,
    pub points_delta: i64,
    pub average_kwh: Metric,
    pub peak_kwh: Metric,
    pub average_irradiance: Metric,
}

pub fn key_metrics(filtered: &[Observation], full: &[Observation]) -> KeyMetrics {
    let kwh_f = column_values(filtered, NumericColumn::Kwh);
    let kwh_a = column_values(full, NumericColumn::Kwh);
    let irr = NumericColumn::Feature(crate::types::Feature::Irradiance);
    let irr_f = column_values(filtered, irr);
    let irr_a = column_values(full, irr);

    KeyMetrics {
        total_points: filtered.len(),
        points_delta: filtered.len() as i64 - full.len() as i64,
        average_kwh: Metric::against(mean(&kwh_f), mean(&kwh_a)),
        peak_kwh: Metric::against(max(&kwh_f), max(&kwh_a)),
        average_irradiance: Metric::against(mean(&irr_f), mean(&irr_a)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAverage {
    pub month: String,
    pub count: usize,
    pub mean_kwh: f64,
}

/// Mean kwh per month label, ordered by first appearance in `rows`.
pub fn monthly_average_kwh(rows: &[Observation]) -> Vec<MonthlyAverage> {
    let mut acc: Vec<(String, usize, f64)> = Vec::new();
    for o in rows {
        match acc.iter_mut().find(|(m, _, _)| *m == o.month) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += o.kwh;
            }
            None => acc.push((o.month.clone(), 1, o.kwh)),
        }
    }
    acc.into_iter()
        .map(|(month, count, sum)| MonthlyAverage {
            month,
            count,
            mean_kwh: sum / count as f64,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonSpread {
    pub season: Season,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Five-number kwh summary for each season present in `rows`.
pub fn season_kwh_spread(rows: &[Observation]) -> Vec<SeasonSpread> {
    Season::ALL
        .iter()
        .filter_map(|&season| {
            let values: Vec<f64> = rows
                .iter()
                .filter(|o| o.season == season)
                .map(|o| o.kwh)
                .collect();
            let s = sorted(&values);
            Some(SeasonSpread {
                season,
                count: s.len(),
                min: *s.first()?,
                q1: quantile(&s, 0.25)?,
                median: quantile(&s, 0.5)?,
                q3: quantile(&s, 0.75)?,
                max: *s.last()?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize_column(rows: &[Observation], column: NumericColumn) -> ColumnSummary {
    let values = column_values(rows, column);
    let s = sorted(&values);
    ColumnSummary {
        column,
        count: values.len(),
        mean: mean(&values),
        std: std_dev(&values),
        min: s.first().copied(),
        q25: quantile(&s, 0.25),
        median: quantile(&s, 0.5),
        q75: quantile(&s, 0.75),
        max: s.last().copied(),
    }
}

pub fn describe(rows: &[Observation]) -> Vec<ColumnSummary> {
    NumericColumn::ALL
        .iter()
        .map(|&c| summarize_column(rows, c))
        .collect()
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: [NumericColumn; 6],
    pub values: [[Option<f64>; 6]; 6],
}

impl CorrelationMatrix {
    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(rows: &[Observation]) -> CorrelationMatrix {
    let columns = NumericColumn::ALL;
    let data: Vec<Vec<f64>> = columns.iter().map(|&c| column_values(rows, c)).collect();
    let mut values = [[None; 6]; 6];
    for i in 0..6 {
        for j in i..6 {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix { columns, values }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(lo), Some(hi)) = (min(values), max(values)) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if lo == hi {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
