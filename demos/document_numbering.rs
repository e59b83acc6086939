//! Document numbering examples

use chrono::NaiveDate;
use purchasing_core::{
    utils::JsonFileCounterStore, DocumentType, NumberGenerator, NumberingConfig, ResetPeriod,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("🔢 Purchasing Core - Document Numbering Examples\n");

    // 1. Standard document types
    println!("📋 Standard document types:");
    for document_type in DocumentType::ALL.iter() {
        println!(
            "  {:<25} {:<20} resets {}",
            document_type.key(),
            document_type.default_format(),
            document_type.default_reset_period()
        );
    }
    println!();

    // 2. Numbers persisted to a JSON file under a namespaced key
    let path = std::env::temp_dir().join("purchasing-core-demo.json");
    let config = NumberingConfig::default()
        .with_root_key("demo_counters")
        .with_document_type("credit-note", "CN/{YYYY}/{###}", ResetPeriod::Yearly);
    let store = JsonFileCounterStore::from_config(&path, &config);
    let mut generator = NumberGenerator::from_config(store, &config)?;

    println!("🧾 Issuing numbers (stored in {}):", path.display());
    let december = NaiveDate::from_ymd_opt(2024, 12, 31)
        .and_then(|d| d.and_hms_opt(17, 0, 0))
        .ok_or("invalid date")?;
    let january = NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or("invalid date")?;

    for document_type in ["purchase-order", "goods-receiving-voucher", "credit-note"] {
        let first = generator.generate_at(document_type, december).await?;
        let second = generator.generate_at(document_type, december).await?;
        let after_new_year = generator.generate_at(document_type, january).await?;
        println!("  {}: {}, {}, then {}", document_type, first, second, after_new_year);
    }
    println!();

    // 3. Parsing numbers back
    println!("🔍 Parsing:");
    let number = generator.generate_at("goods-receiving-voucher", january).await?;
    let parsed = generator.parse("goods-receiving-voucher", &number).await?;
    println!(
        "  {} -> year {:?}, month {:?}, sequence {}",
        number, parsed.year, parsed.month, parsed.sequence
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
