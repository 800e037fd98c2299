//! # Report Aggregation
//!
//! Rolls a tenant's sale history up into daily and period totals.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &[Sale] (already tenant-scoped)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  period filter ── local calendar date in (month, year)?                │
//! │       │               local = sold_at at the caller's UTC offset        │
//! │       ▼                                                                 │
//! │  group by local date ──► DailySummary { date, sales, profit }          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  totals ──► running_average_sale = total_sales / #dates (0 if none)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums are exact in cents. The average is the only division and is
//! rounded half away from zero.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::sale_profit;
use crate::types::{DateRange, Sale};
use crate::validation::ValidationResult;

// =============================================================================
// Period
// =============================================================================

/// A calendar month in the caller's reference time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct ReportPeriod {
    month: u32,
    year: i32,
}

#[derive(Deserialize)]
struct RawPeriod {
    month: u32,
    year: i32,
}

impl TryFrom<RawPeriod> for ReportPeriod {
    type Error = ValidationError;

    fn try_from(raw: RawPeriod) -> ValidationResult<Self> {
        ReportPeriod::new(raw.month, raw.year)
    }
}

impl ReportPeriod {
    /// ## Errors
    /// `OutOfRange` if `month` is not 1-12 or `year` is not 1-9999.
    pub fn new(month: u32, year: i32) -> ValidationResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            });
        }
        if !(1..=9999).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "year".to_string(),
                min: 1,
                max: 9999,
            });
        }
        Ok(ReportPeriod { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether a local calendar date falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// The UTC instants covering this month at `offset`, as `[start, end)`.
    pub fn date_range(&self, offset: FixedOffset) -> ValidationResult<DateRange> {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        let first = |year: i32, month: u32| {
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ValidationError::overflow("year"))
        };

        let start = local_midnight(first(self.year, self.month)?, offset)?;
        let end = local_midnight(first(next_year, next_month)?, offset)?;
        Ok(DateRange::new(start, end))
    }

    /// `Sales_History_<month>_<year>.csv`.
    pub fn export_file_name(&self) -> String {
        format!("Sales_History_{}_{}.csv", self.month, self.year)
    }
}

/// Download name for an export, `Sales_History_all.csv` when unfiltered.
pub fn export_file_name(period: Option<&ReportPeriod>) -> String {
    match period {
        Some(p) => p.export_file_name(),
        None => "Sales_History_all.csv".to_string(),
    }
}

/// UTC instants from local midnight of `from` to local midnight after `to`,
/// i.e. both days inclusive.
///
/// ## Errors
/// `InvalidFormat` if `to` is before `from`.
pub fn day_range(from: NaiveDate, to: NaiveDate, offset: FixedOffset) -> ValidationResult<DateRange> {
    if to < from {
        return Err(ValidationError::InvalidFormat {
            field: "to".to_string(),
            reason: "must not be before `from`".to_string(),
        });
    }

    let after = to.succ_opt().ok_or_else(|| ValidationError::overflow("to"))?;
    Ok(DateRange::new(
        local_midnight(from, offset)?,
        local_midnight(after, offset)?,
    ))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> ValidationResult<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::overflow("date"))
}

/// Calendar date of a sale at the caller's offset.
pub fn local_date(sale: &Sale, offset: FixedOffset) -> NaiveDate {
    sale.sold_at.with_timezone(&offset).date_naive()
}

// =============================================================================
// Report Structures
// =============================================================================

/// Totals for one local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sales: Money,
    pub profit: Money,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub running_average_sale: Money,
    pub total_sales: Money,
    pub total_profit: Money,
    /// Ascending by date.
    pub daily_report: Vec<DailySummary>,
}

impl SalesReport {
    pub fn empty() -> Self {
        SalesReport {
            running_average_sale: Money::zero(),
            total_sales: Money::zero(),
            total_profit: Money::zero(),
            daily_report: Vec::new(),
        }
    }
}

/// Sales revenue per item name, for the dashboard breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSalesTotal {
    pub item_name: String,
    pub quantity_sold: i64,
    pub total: Money,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Filters `sales` to `period` (if any) and rolls them up.
///
/// ## Example
/// ```rust
/// use chrono::FixedOffset;
/// use stockbook_core::report::aggregate;
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let report = aggregate(&[], None, utc).unwrap();
/// assert_eq!(report.running_average_sale.to_decimal_string(), "0.00");
/// assert!(report.daily_report.is_empty());
/// ```
pub fn aggregate(
    sales: &[Sale],
    period: Option<ReportPeriod>,
    offset: FixedOffset,
) -> CoreResult<SalesReport> {
    let mut days: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();
    let mut total_sales = Money::zero();
    let mut total_profit = Money::zero();

    for sale in sales {
        let date = local_date(sale, offset);
        if let Some(p) = period {
            if !p.contains(date) {
                continue;
            }
        }

        let profit = sale_profit(sale.sold_price, sale.rate_with_tax, sale.quantity_sold)?;

        total_sales = add("total_sales", total_sales, sale.sold_price)?;
        total_profit = add("total_profit", total_profit, profit)?;

        let day = days.entry(date).or_insert((Money::zero(), Money::zero()));
        day.0 = add("sales", day.0, sale.sold_price)?;
        day.1 = add("profit", day.1, profit)?;
    }

    if days.is_empty() {
        return Ok(SalesReport::empty());
    }

    let running_average_sale = total_sales
        .div_rounded(days.len() as u64)
        .ok_or_else(|| ValidationError::overflow("running_average_sale"))?;

    let daily_report = days
        .into_iter()
        .map(|(date, (sales, profit))| DailySummary { date, sales, profit })
        .collect();

    Ok(SalesReport {
        running_average_sale,
        total_sales,
        total_profit,
        daily_report,
    })
}

/// Revenue per item name, highest first (ties by name).
pub fn sales_by_item(sales: &[Sale]) -> CoreResult<Vec<ItemSalesTotal>> {
    let mut by_name: HashMap<&str, (i64, Money)> = HashMap::new();

    for sale in sales {
        let entry = by_name
            .entry(sale.item_name.as_str())
            .or_insert((0, Money::zero()));
        entry.0 = entry
            .0
            .checked_add(sale.quantity_sold)
            .ok_or_else(|| ValidationError::overflow("quantity_sold"))?;
        entry.1 = add("total", entry.1, sale.sold_price)?;
    }

    let mut totals: Vec<ItemSalesTotal> = by_name
        .into_iter()
        .map(|(name, (quantity_sold, total))| ItemSalesTotal {
            item_name: name.to_string(),
            quantity_sold,
            total,
        })
        .collect();

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.item_name.cmp(&b.item_name)));
    Ok(totals)
}

fn add(field: &str, a: Money, b: Money) -> Result<Money, ValidationError> {
    a.checked_add(b).ok_or_else(|| ValidationError::overflow(field))
}

// =============================================================================
// Unit Tests
// =============================================================================
