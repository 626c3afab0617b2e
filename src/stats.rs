use crate::catalog::Catalog;
use crate::models::{Category, Claim};

/// One category's row in the monthly breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: i64,
    pub amount_cents: i64,
}

/// Per-category totals for one month, in catalog order, plus the grand
/// total. Every catalog category gets a row even when it was never
/// claimed, so the breakdown keeps a stable shape month over month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub rows: Vec<CategoryTotal>,
    pub total_cents: i64,
}

impl MonthlyStats {
    /// Bar lengths for the amount series, 0..=100 per row.
    pub fn amount_percents(&self) -> Vec<i64> {
        let values: Vec<i64> = self.rows.iter().map(|r| r.amount_cents).collect();
        bar_percents(&values)
    }

    /// Bar lengths for the count series, 0..=100 per row.
    pub fn count_percents(&self) -> Vec<i64> {
        let values: Vec<i64> = self.rows.iter().map(|r| r.count).collect();
        bar_percents(&values)
    }
}

/// Tally one month's claims per category.
///
/// Counts accumulate `qty`, amounts accumulate `qty * amount_each`; the
/// amount is taken from the claim itself, so a later catalog rate change
/// never rewrites history. Claims whose category no longer exists are
/// left out of the breakdown.
pub fn monthly_stats(claims: &[Claim], catalog: &Catalog) -> MonthlyStats {
    let mut rows: Vec<CategoryTotal> = catalog
        .categories()
        .iter()
        .map(|cat| CategoryTotal {
            category: cat.clone(),
            count: 0,
            amount_cents: 0,
        })
        .collect();

    for claim in claims {
        if let Some(row) = rows.iter_mut().find(|r| r.category.key == claim.cat_key) {
            row.count += claim.qty;
            row.amount_cents += claim.qty * claim.amount_each_cents;
        }
    }

    let total_cents = rows.iter().map(|r| r.amount_cents).sum();
    MonthlyStats { rows, total_cents }
}

/// Scale a series against its own maximum, rounding to whole percent.
/// An all-zero series yields all zero bars rather than dividing by zero.
pub fn bar_percents(values: &[i64]) -> Vec<i64> {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    values
        .iter()
        .map(|&v| ((v as f64 / max as f64) * 100.0).round() as i64)
        .collect()
}
