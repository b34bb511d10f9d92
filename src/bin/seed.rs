// src/bin/seed.rs
// DOCUMENTATION: Sample data loader
// PURPOSE: Populate an empty resources table with Dallas-area rows

use anyhow::Context;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

/// (name, type, address, longitude, latitude)
const SAMPLE_RESOURCES: &[(&str, &str, &str, f64, f64)] = &[
    (
        "Central City Library",
        "LIBRARY",
        "1515 Young St, Dallas, TX 75201",
        -96.7970,
        32.7767,
    ),
    (
        "Oak Lawn Branch Library",
        "LIBRARY",
        "4100 Cedar Springs Rd, Dallas, TX 75219",
        -96.8000,
        32.8000,
    ),
    (
        "Parkland Health Center",
        "CLINIC",
        "5200 Harry Hines Blvd, Dallas, TX 75235",
        -96.8500,
        32.8200,
    ),
    (
        "Baylor Scott & White Medical Center",
        "CLINIC",
        "3500 Gaston Ave, Dallas, TX 75246",
        -96.7800,
        32.7900,
    ),
    (
        "North Texas Food Bank",
        "FOOD_BANK",
        "4500 S Cockrell Hill Rd, Dallas, TX 75236",
        -96.8500,
        32.7500,
    ),
    (
        "Crossroads Community Services",
        "FOOD_BANK",
        "4500 S Lancaster Rd, Dallas, TX 75216",
        -96.7500,
        32.7500,
    ),
    (
        "Highland Park Library",
        "LIBRARY",
        "4700 Drexel Dr, Highland Park, TX 75205",
        -96.8000,
        32.8200,
    ),
    (
        "Children's Medical Center Dallas",
        "CLINIC",
        "1935 Medical District Dr, Dallas, TX 75235",
        -96.8400,
        32.8100,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
        .fetch_one(&pool)
        .await
        .context("failed to count resources")?;

    // Only populate if the table is empty
    if count.0 > 0 {
        println!(
            "resources table already holds {} rows, nothing to do",
            count.0
        );
        return Ok(());
    }

    for (name, type_, address, lon, lat) in SAMPLE_RESOURCES {
        sqlx::query(
            r#"
            INSERT INTO resources (name, type, address, location, created_at, updated_at)
            VALUES (
                $1, $2, $3,
                ST_SetSRID(ST_MakePoint($4, $5), 4326),
                NOW(), NOW()
            )
            "#,
        )
        .bind(name)
        .bind(type_)
        .bind(address)
        .bind(lon)
        .bind(lat)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to insert {}", name))?;
    }

    println!(
        "Sample data loaded successfully! ({} resources)",
        SAMPLE_RESOURCES.len()
    );
    Ok(())
}
