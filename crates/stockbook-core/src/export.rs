//! # CSV Export
//!
//! Serializes sales to CSV, one row per sale in input order.
//!
//! ```text
//! Item Name,Quantity Sold,Sold Price,Sold At
//! Claw Hammer,2,36.00,2024-01-15T10:30:00Z
//! "Bolts, M6",100,12.50,2024-01-15T11:02:10Z
//! ```
//!
//! `Sold At` is RFC 3339 in UTC, independent of the machine's locale.

use std::io::Write;

use chrono::SecondsFormat;

use crate::error::{CoreError, CoreResult};
use crate::types::Sale;

/// Header row of every export.
pub const EXPORT_HEADER: [&str; 4] = ["Item Name", "Quantity Sold", "Sold Price", "Sold At"];

/// Streams `sales` as CSV to `writer`.
///
/// ## Errors
/// - `EmptyExport` if `sales` is empty (nothing is written)
/// - `Export` if the writer fails
pub fn write_csv(sales: &[Sale], writer: impl Write) -> CoreResult<()> {
    if sales.is_empty() {
        return Err(CoreError::EmptyExport);
    }

    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(EXPORT_HEADER)
        .map_err(|e| CoreError::Export(format!("CSV write error: {e}")))?;

    for sale in sales {
        csv.write_record(&[
            sale.item_name.clone(),
            sale.quantity_sold.to_string(),
            sale.sold_price.to_decimal_string(),
            sale.sold_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ])
        .map_err(|e| CoreError::Export(format!("CSV write error: {e}")))?;
    }

    csv.flush()
        .map_err(|e| CoreError::Export(format!("CSV flush error: {e}")))?;
    Ok(())
}

/// Renders `sales` as CSV text.
///
/// ## Example
/// ```rust
/// use stockbook_core::export::export_csv;
/// use stockbook_core::CoreError;
///
/// assert!(matches!(export_csv(&[]), Err(CoreError::EmptyExport)));
/// ```
pub fn export_csv(sales: &[Sale]) -> CoreResult<String> {
    let mut buf = Vec::new();
    write_csv(sales, &mut buf)?;
    String::from_utf8(buf).map_err(|e| CoreError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::TenantId;

    fn sale(name: &str, qty: i64, cents: i64, at: &str) -> Sale {
        Sale {
            id: "id".into(),
            item_id: "X".into(),
            item_name: name.into(),
            brand_name: "Acme".into(),
            quantity_sold: qty,
            sold_price: Money::from_cents(cents),
            item_cost: Money::zero(),
            rate_with_tax: Money::zero(),
            sold_at: at.parse().unwrap(),
            owner_id: TenantId::new("a"),
        }
    }

    #[test]
    fn test_export_line_count_and_fields() {
        let sales: Vec<Sale> = (1..=5)
            .map(|i| sale(&format!("Item {i}"), i, i * 100, "2024-01-15T10:30:00Z"))
            .collect();

        let text = export_csv(&sales).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), sales.len() + 1);
        assert_eq!(lines[0], "Item Name,Quantity Sold,Sold Price,Sold At");
        assert_eq!(lines[3], "Item 3,3,3.00,2024-01-15T10:30:00Z");
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 4);
        }
    }

    #[test]
    fn test_export_keeps_input_order() {
        let sales = vec![
            sale("B", 1, 100, "2024-02-01T00:00:00Z"),
            sale("A", 1, 100, "2024-01-01T00:00:00Z"),
        ];
        let text = export_csv(&sales).unwrap();
        let names: Vec<&str> = text.lines().skip(1).map(|l| &l[..1]).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_export_quotes_commas() {
        let text = export_csv(&[sale("Bolts, M6", 100, 1250, "2024-01-15T11:02:10Z")]).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "\"Bolts, M6\",100,12.50,2024-01-15T11:02:10Z"
        );
    }

    #[test]
    fn test_export_empty_is_error() {
        assert!(matches!(export_csv(&[]), Err(CoreError::EmptyExport)));

        let mut buf = Vec::new();
        assert!(write_csv(&[], &mut buf).is_err());
        assert!(buf.is_empty());
    }
}
