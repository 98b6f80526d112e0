//! # Seed Data Generator
//!
//! Populates the database with sample countries and price rules for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./geoprice_dev.db
//! cargo run -p geoprice-db --bin seed
//!
//! # Specify database path
//! cargo run -p geoprice-db --bin seed -- --db ./data/geoprice.db
//! ```
//!
//! ## Sample Data
//! | Country        | Code | Rule                           |
//! |----------------|------|--------------------------------|
//! | Turkey         | TR   | +5% on everything, priority 10 |
//! | United States  | US   | +0% on everything, priority 10 |
//! | Germany        | DE   | +7% on everything, priority 10 |

use std::env;

use geoprice_core::{CountryDraft, PriceRuleDraft, RuleType, ALL_CATEGORIES};
use geoprice_db::{Database, DbConfig};

/// (name, code, percentage markup)
const SAMPLE_COUNTRIES: &[(&str, &str, f64)] = &[
    ("Turkey", "TR", 5.0),
    ("United States", "US", 0.0),
    ("Germany", "DE", 7.0),
];

const SAMPLE_PRIORITY: i64 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./geoprice_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("GeoPrice Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./geoprice_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 GeoPrice Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.countries().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} countries", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    for (name, code, markup) in SAMPLE_COUNTRIES {
        let country = db
            .countries()
            .create(&CountryDraft {
                name: name.to_string(),
                code: code.to_string(),
                active: true,
            })
            .await?;

        let rule = db
            .price_rules()
            .create(&PriceRuleDraft {
                country_id: country.id,
                rule_type: RuleType::Percentage,
                value: *markup,
                product_category: ALL_CATEGORIES.to_string(),
                product_id: None,
                min_order_value: 0.0,
                active: true,
                description: Some(format!("Default {} pricing", code)),
                priority: SAMPLE_PRIORITY,
            })
            .await?;

        println!(
            "  ✓ {} ({}) rule #{}: {}% on all products",
            name, code, rule.rule.id, markup
        );
    }

    println!();
    println!("✓ Seed complete");

    db.close().await;
    Ok(())
}
