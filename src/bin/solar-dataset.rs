use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use tracing::info;

use solar_dataset::{
    correlation_matrix, describe, export_csv_file, generate_all_random, generate_all_seeded,
    histogram, key_metrics, kwh_bounds, load_config, monthly_average_kwh, season_kwh_spread,
    Dataset, DatasetFilter, GeneratorConfig, KeyMetrics, Metric, NumericColumn, Observation,
    Season, DEFAULT_EXPORT_FILE,
};

#[derive(Parser)]
#[command(name = "solar-dataset")]
#[command(author, version, about = "Synthetic seasonal solar-panel energy dataset")]
#[command(
    long_about = "Generate a synthetic solar-panel dataset (one row per calendar day for summer,\n\
    monsoon and winter), filter it, and print summary tables or export it as CSV.\n\
    \nExamples:\n  \
    solar-dataset summary\n  \
    solar-dataset summary --seed 42 --season summer --season winter\n  \
    solar-dataset export --kwh-min 100 --output high_yield.csv"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print key metrics and summary tables for the filtered dataset
    Summary(SummaryArgs),

    /// Write the filtered dataset as CSV
    Export(ExportArgs),
}

#[derive(Args)]
struct DatasetArgs {
    /// TOML generator config (defaults to the built-in season tables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible sampling; unseeded when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only these seasons (repeatable)
    #[arg(long = "season")]
    seasons: Vec<Season>,

    /// Keep only these month labels (repeatable)
    #[arg(long = "month")]
    months: Vec<String>,

    /// Lower kwh bound, inclusive
    #[arg(long)]
    kwh_min: Option<f64>,

    /// Upper kwh bound, inclusive
    #[arg(long)]
    kwh_max: Option<f64>,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Number of kwh histogram bins
    #[arg(long, default_value_t = 10)]
    bins: usize,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[arg(long, short, default_value = DEFAULT_EXPORT_FILE)]
    output: PathBuf,
}

impl DatasetArgs {
    fn load(&self) -> Result<Dataset> {
        let config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        let dataset = match self.seed {
            Some(seed) => generate_all_seeded(&config, seed)?,
            None => generate_all_random(&config)?,
        };
        Ok(dataset)
    }

    fn filter(&self, dataset: &Dataset) -> DatasetFilter {
        let mut filter = DatasetFilter::new();
        if !self.seasons.is_empty() {
            filter = filter.seasons(self.seasons.iter().copied());
        }
        if !self.months.is_empty() {
            filter = filter.months(self.months.iter().cloned());
        }
        if self.kwh_min.is_some() || self.kwh_max.is_some() {
            if let Some((lo, hi)) = kwh_bounds(dataset.observations()) {
                filter = filter.kwh_between(self.kwh_min.unwrap_or(lo), self.kwh_max.unwrap_or(hi));
            }
        }
        filter
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn fmt_metric(metric: &Metric, precision: usize) -> String {
    match (metric.value, metric.delta) {
        (Some(v), Some(d)) => format!("{:.*} ({:+.*})", precision, v, precision, d),
        (v, _) => fmt_opt(v, precision),
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn metrics_table(m: &KeyMetrics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Metric", "Value (delta vs all)"]));
    table.add_row(vec![
        Cell::new("Total data points"),
        Cell::new(format!("{} ({:+})", m.total_points, m.points_delta)),
    ]);
    table.add_row(vec![Cell::new("Average kWh"), Cell::new(fmt_metric(&m.average_kwh, 2))]);
    table.add_row(vec![Cell::new("Peak kWh"), Cell::new(fmt_metric(&m.peak_kwh, 2))]);
    table.add_row(vec![
        Cell::new("Average irradiance"),
        Cell::new(fmt_metric(&m.average_irradiance, 1)),
    ]);
    table
}

fn monthly_table(rows: &[Observation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Month", "Days", "Average kWh"]));
    for m in monthly_average_kwh(rows) {
        table.add_row(vec![
            Cell::new(&m.month),
            Cell::new(m.count),
            Cell::new(format!("{:.2}", m.mean_kwh)),
        ]);
    }
    table
}

fn spread_table(rows: &[Observation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Season", "Count", "Min", "Q1", "Median", "Q3", "Max"]));
    for s in season_kwh_spread(rows) {
        table.add_row(vec![
            Cell::new(s.season),
            Cell::new(s.count),
            Cell::new(format!("{:.2}", s.min)),
            Cell::new(format!("{:.2}", s.q1)),
            Cell::new(format!("{:.2}", s.median)),
            Cell::new(format!("{:.2}", s.q3)),
            Cell::new(format!("{:.2}", s.max)),
        ]);
    }
    table
}

fn describe_table(rows: &[Observation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&[
        "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max",
    ]));
    for c in describe(rows) {
        table.add_row(vec![
            Cell::new(c.column.name()),
            Cell::new(c.count),
            Cell::new(fmt_opt(c.mean, 2)),
            Cell::new(fmt_opt(c.std, 2)),
            Cell::new(fmt_opt(c.min, 2)),
            Cell::new(fmt_opt(c.q25, 2)),
            Cell::new(fmt_opt(c.median, 2)),
            Cell::new(fmt_opt(c.q75, 2)),
            Cell::new(fmt_opt(c.max, 2)),
        ]);
    }
    table
}

fn correlation_table(rows: &[Observation]) -> Table {
    let matrix = correlation_matrix(rows);
    let mut names = vec![""];
    names.extend(matrix.columns.iter().map(NumericColumn::name));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&names));
    for (i, col) in matrix.columns.iter().enumerate() {
        let mut cells = vec![Cell::new(col.name()).add_attribute(Attribute::Bold)];
        cells.extend(matrix.values[i].iter().map(|v| Cell::new(fmt_opt(*v, 2))));
        table.add_row(cells);
    }
    table
}

fn histogram_table(rows: &[Observation], bins: usize) -> Table {
    let kwh: Vec<f64> = rows.iter().map(|o| o.kwh).collect();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["kWh range", "Count"]));
    for b in histogram(&kwh, bins) {
        table.add_row(vec![
            Cell::new(format!("{:.2} - {:.2}", b.lower, b.upper)),
            Cell::new(b.count),
        ]);
    }
    table
}

fn run_summary(args: &SummaryArgs) -> Result<()> {
    let dataset = args.dataset.load()?;
    let filtered = args.dataset.filter(&dataset).apply(dataset.observations());
    info!(rows = filtered.len(), total = dataset.len(), "filtered dataset");

    println!("Generated at {}", dataset.metadata().generated_at);
    if let Some(seed) = dataset.metadata().seed {
        println!("Seed: {}", seed);
    }
    println!("\nKey performance metrics\n{}", metrics_table(&key_metrics(&filtered, dataset.observations())));
    println!("\nAverage kWh by month\n{}", monthly_table(&filtered));
    println!("\nkWh distribution by season\n{}", spread_table(&filtered));
    println!("\nkWh histogram\n{}", histogram_table(&filtered, args.bins));
    println!("\nFeature correlation matrix\n{}", correlation_table(&filtered));
    println!("\nSummary statistics\n{}", describe_table(&filtered));
    Ok(())
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let dataset = args.dataset.load()?;
    let filtered = args.dataset.filter(&dataset).apply(dataset.observations());
    export_csv_file(&filtered, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {} rows to {}", filtered.len(), args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Summary(args) => run_summary(args),
        Commands::Export(args) => run_export(args),
    }
}
