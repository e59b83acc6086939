//! Purchase order tax and totals examples

use bigdecimal::BigDecimal;
use purchasing_core::{
    format_currency, number_to_words, LineItem, PurchaseDocument, TaxSettings, TaxType,
};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Purchasing Core - Purchase Order Totals\n");

    let items = vec![
        LineItem::new(
            "PAPER",
            "A4 paper ream",
            BigDecimal::from(10),
            BigDecimal::from_str("850.00")?,
            None,
        ),
        LineItem::new(
            "TONER",
            "Laser toner",
            BigDecimal::from(2),
            BigDecimal::from_str("4499.99")?,
            None,
        ),
        LineItem::new(
            "MAIZE",
            "Maize flour 2kg",
            BigDecimal::from(6),
            BigDecimal::from_str("189.50")?,
            Some(BigDecimal::from(0)),
        ),
    ];

    let rate = BigDecimal::from(16);
    for tax_type in [
        TaxType::Exclusive,
        TaxType::Inclusive,
        TaxType::PerItem,
        TaxType::Overall,
    ] {
        let mut order = PurchaseDocument::new("KES", TaxSettings::new(tax_type, rate.clone()))?
            .with_number("PO-2024-0001");
        for item in &items {
            order.add_item(item.clone())?;
        }

        let totals = order.totals();
        println!("📊 {:?} tax at {}%:", tax_type, rate);
        for item in order.items() {
            println!(
                "  {:<16} tax {:>14}  total {:>16}",
                item.description,
                format_currency(&item.tax_amount, &order.currency),
                format_currency(&item.total, &order.currency)
            );
        }
        println!("  Subtotal: {}", format_currency(&totals.subtotal, &order.currency));
        println!("  Tax:      {}", format_currency(&totals.tax_amount, &order.currency));
        println!("  Total:    {}", format_currency(&totals.total, &order.currency));
        println!("  In words: {}", number_to_words(&totals.total)?);
        println!();
    }

    Ok(())
}
