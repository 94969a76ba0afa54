use solar_dataset::{
    generate_all_seeded, key_metrics, monthly_average_kwh, DatasetFilter, GeneratorConfig, Season,
};

fn main() {
    let config = GeneratorConfig::default();
    let dataset = match generate_all_seeded(&config, 42) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("invalid config: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== Synthetic Solar Dataset ===");
    println!("Generated at: {}", dataset.metadata().generated_at);
    println!("Rows: {}", dataset.len());
    for season in Season::ALL {
        println!("  {:<8} {} rows", season, dataset.season_rows(season).count());
    }
    println!();

    let summer = DatasetFilter::new()
        .seasons([Season::Summer])
        .apply(dataset.observations());
    let m = key_metrics(&summer, dataset.observations());
    println!("--- Summer only ---");
    println!("Data points: {} ({:+})", m.total_points, m.points_delta);
    if let (Some(avg), Some(delta)) = (m.average_kwh.value, m.average_kwh.delta) {
        println!("Average kWh: {:.2} ({:+.2} vs all seasons)", avg, delta);
    }
    println!();

    println!("--- Average kWh by month ---");
    for month in monthly_average_kwh(dataset.observations()) {
        println!("{:<10} {:>8.2}", month.month, month.mean_kwh);
    }
}
