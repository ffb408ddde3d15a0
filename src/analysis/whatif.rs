//! "What if you control your wants?" projection.

use crate::error::{LedgerError, Result};
use crate::models::{Ledger, TxnKind, WhatIfProjection};
use std::collections::HashSet;

/// Project monthly and yearly savings from cutting "Want" spending by
/// `reduction_percent`.
///
/// The monthly average divides by the number of distinct calendar months in
/// the whole ledger (not only the Want rows), floored at 1. Fails when the
/// ledger has no `type` column.
pub fn what_if_wants(ledger: &Ledger, reduction_percent: u8) -> Result<WhatIfProjection> {
    if !ledger.has_type_column() {
        return Err(LedgerError::MissingColumn("type"));
    }
    if reduction_percent > 100 {
        return Err(LedgerError::InvalidReduction(reduction_percent));
    }

    let month_count = ledger
        .transactions()
        .iter()
        .map(|t| t.month_key())
        .collect::<HashSet<_>>()
        .len()
        .max(1);

    let want_total: f64 = ledger
        .transactions()
        .iter()
        .filter(|t| t.kind == Some(TxnKind::Want))
        .map(|t| t.amount.abs())
        .sum();

    let monthly_avg_wants = want_total / month_count as f64;
    let monthly_savings = monthly_avg_wants * (f64::from(reduction_percent) / 100.0);

    Ok(WhatIfProjection {
        reduction_percent,
        month_count,
        monthly_avg_wants,
        monthly_savings,
        yearly_savings: monthly_savings * 12.0,
    })
}
