//! Summary metrics and spending views.
//!
//! Every function here is a single pass over the ledger and is
//! recomputed on each request; nothing is cached.

use crate::models::{CategorySpend, Ledger, MonthlySpend, Summary};
use std::collections::BTreeMap;

/// Compute income, expenses, net savings and savings rate.
///
/// The savings rate is a percentage of income and is defined as 0 when
/// there is no income.
pub fn summarize(ledger: &Ledger) -> Summary {
    let mut total_income = 0.0;
    let mut expense_sum = 0.0;

    for txn in ledger.transactions() {
        if txn.is_income() {
            total_income += txn.amount;
        } else if txn.is_expense() {
            expense_sum += txn.amount;
        }
    }

    let total_expenses = expense_sum.abs();
    let net_savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    Summary {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
    }
}

/// Absolute expense totals per category, ordered by category name.
pub fn category_breakdown(ledger: &Ledger) -> Vec<CategorySpend> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for txn in ledger.expenses() {
        *totals.entry(txn.category.as_str()).or_default() += txn.amount;
    }

    totals
        .into_iter()
        .map(|(category, total)| CategorySpend {
            category: category.to_string(),
            total: total.abs(),
        })
        .collect()
}

/// The `n` largest categories by spend, descending. Ties keep name order.
pub fn top_categories(categories: &[CategorySpend], n: usize) -> Vec<CategorySpend> {
    let mut sorted = categories.to_vec();
    sorted.sort_by(|a, b| b.total.total_cmp(&a.total));
    sorted.truncate(n);
    sorted
}

/// Absolute expense totals per calendar month, in chronological order.
///
/// Months without expense rows are omitted unless `fill_gaps` is set, in
/// which case every month between the first and last expense month is
/// present (with a zero total where nothing was spent).
pub fn monthly_trend(ledger: &Ledger, fill_gaps: bool) -> Vec<MonthlySpend> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for txn in ledger.expenses() {
        *totals.entry(txn.month_key()).or_default() += txn.amount;
    }

    if fill_gaps {
        let bounds = totals.keys().next().copied().zip(totals.keys().last().copied());
        if let Some((first, last)) = bounds {
            let mut cursor = first;
            while cursor < last {
                cursor = next_month(cursor);
                totals.entry(cursor).or_insert(0.0);
            }
        }
    }

    totals
        .into_iter()
        .map(|((year, month), total)| MonthlySpend {
            year,
            month,
            total: total.abs(),
        })
        .collect()
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Mean of the monthly totals, or `None` when there are no months.
pub fn average_monthly_spend(trend: &[MonthlySpend]) -> Option<f64> {
    if trend.is_empty() {
        return None;
    }
    Some(trend.iter().map(|m| m.total).sum::<f64>() / trend.len() as f64)
}

/// Total of the most recent month, or `None` when there are no months.
pub fn last_month_spend(trend: &[MonthlySpend]) -> Option<f64> {
    trend.last().map(|m| m.total)
}
