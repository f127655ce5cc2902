use anyhow::Result;
use chrono::{Duration, Utc};
use std::path::Path;

use telemetry_api::config::Config;
use telemetry_api::db;
use telemetry_api::models::telemetry::NewTelemetry;
use telemetry_api::repository::telemetry::TelemetryRepository;

const SATELLITES: [&str; 3] = ["SAT001", "SAT002", "SAT003"];

/// Insert synthetic readings through the regular repository path.
///
/// Satellites are cycled, statuses alternate, and timestamps step back
/// in 15-minute intervals from now.
pub async fn execute(config_path: &Path, count: u32) -> Result<()> {
    let config = Config::load(config_path);
    telemetry_api::init_tracing(&config.server.log_level);

    let pool = db::create_pool(&config.database.url).await?;
    let repository = TelemetryRepository::new(pool);

    println!("Seeding database with {} telemetry readings...", count);

    let now = Utc::now();
    for i in 0..i64::from(count) {
        let reading = NewTelemetry {
            satellite_id: SATELLITES[i as usize % SATELLITES.len()].to_string(),
            timestamp: (now - Duration::minutes(15 * i)).to_rfc3339(),
            altitude: 400.0 + (i as f64 * 1.5) % 120.0,
            velocity: 7.5 + (i as f64 * 0.01) % 0.4,
            status: if i % 2 == 0 { "healthy" } else { "critical" }.to_string(),
        };

        repository.insert(&reading).await?;
    }

    println!(
        "Inserted {} readings across {} satellites",
        count,
        SATELLITES.len()
    );
    Ok(())
}
