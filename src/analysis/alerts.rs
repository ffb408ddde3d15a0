//! Rule-based alerts.
//!
//! Each detector is independent and stateless. [`collect_alerts`] runs
//! them in display order: spike, recurring, fees, cash flow.

use crate::config::AnalysisConfig;
use crate::models::{Alert, AlertKind, Ledger, MonthlySpend, Summary, Transaction};
use std::collections::HashMap;
use tracing::debug;

/// Amount rendered the way alerts show it: absolute, truncated to whole units.
fn whole_amount(amount: f64) -> i64 {
    amount.abs().trunc() as i64
}

/// Percentage by which the latest month exceeds the mean of all months.
///
/// Returns `None` when there are no months. A zero mean yields 0.
pub fn spike_percent(trend: &[MonthlySpend]) -> Option<f64> {
    let last = trend.last()?.total;
    let mean = trend.iter().map(|m| m.total).sum::<f64>() / trend.len() as f64;

    if mean > 0.0 {
        Some((last - mean) / mean * 100.0)
    } else {
        Some(0.0)
    }
}

/// Flag the latest month when it exceeds the monthly mean by more than
/// `threshold_percent`. Skipped entirely when there is no monthly data.
pub fn detect_spike(trend: &[MonthlySpend], threshold_percent: f64) -> Option<Alert> {
    let rise = spike_percent(trend)?;
    debug!("Latest month is {:.1}% vs. mean", rise);

    (rise > threshold_percent).then(|| {
        Alert::new(
            AlertKind::Spike,
            format!(
                "Spike Alert: Last month's spending is {:.1}% higher than usual.",
                rise
            ),
        )
    })
}

/// One alert per (category, exact amount) expense group seen at least
/// `min_count` times. Groups are ordered by category, then amount.
pub fn detect_recurring(ledger: &Ledger, min_count: usize, currency: &str) -> Vec<Alert> {
    let mut groups: HashMap<(&str, u64), (f64, usize)> = HashMap::new();

    for txn in ledger.expenses() {
        let entry = groups
            .entry((txn.category.as_str(), txn.amount.to_bits()))
            .or_insert((txn.amount, 0));
        entry.1 += 1;
    }

    let mut recurring: Vec<(&str, f64, usize)> = groups
        .into_iter()
        .filter(|(_, (_, count))| *count >= min_count)
        .map(|((category, _), (amount, count))| (category, amount, count))
        .collect();

    recurring.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.total_cmp(&b.1)));

    recurring
        .into_iter()
        .map(|(category, amount, count)| {
            Alert::new(
                AlertKind::Recurring,
                format!(
                    "{} repeated {} times ({}{})",
                    category,
                    count,
                    currency,
                    whole_amount(amount)
                ),
            )
        })
        .collect()
}

/// Text a fee keyword is matched against.
///
/// Uses the description when the ledger has that column (an empty cell
/// never matches), otherwise the category.
fn fee_haystack<'a>(ledger: &Ledger, txn: &'a Transaction) -> Option<&'a str> {
    if ledger.has_description_column() {
        txn.description.as_deref()
    } else {
        Some(txn.category.as_str())
    }
}

/// Expense rows whose text contains any fee keyword, case-insensitively.
pub fn fee_matches<'a>(ledger: &'a Ledger, keywords: &[String]) -> Vec<&'a Transaction> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    ledger
        .expenses()
        .filter(|txn| {
            fee_haystack(ledger, txn)
                .map(|text| {
                    let text = text.to_lowercase();
                    keywords.iter().any(|k| text.contains(k.as_str()))
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Header plus one line for each of the last `limit` fee matches, by row order.
pub fn detect_fees(
    ledger: &Ledger,
    keywords: &[String],
    limit: usize,
    currency: &str,
) -> Vec<Alert> {
    let matches = fee_matches(ledger, keywords);
    if matches.is_empty() {
        return Vec::new();
    }

    let mut alerts = vec![Alert::new(
        AlertKind::Fees,
        "Possible Unnecessary Fees detected:",
    )];

    let skip = matches.len().saturating_sub(limit);
    alerts.extend(matches.into_iter().skip(skip).map(|txn| {
        Alert::new(
            AlertKind::Fees,
            format!(
                "{} — {} ({}{})",
                txn.date.format("%Y-%m-%d"),
                txn.category,
                currency,
                whole_amount(txn.amount)
            ),
        )
    }));

    alerts
}

/// Warn when spending exceeds income.
pub fn detect_cash_flow_warning(summary: &Summary) -> Option<Alert> {
    (summary.savings_rate < 0.0).then(|| {
        Alert::new(
            AlertKind::CashFlow,
            "Cash Flow Warning: You are spending more than you earn.",
        )
    })
}

/// Run every detector in display order.
pub fn collect_alerts(
    ledger: &Ledger,
    summary: &Summary,
    trend: &[MonthlySpend],
    config: &AnalysisConfig,
    currency: &str,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    alerts.extend(detect_spike(trend, config.spike_threshold_percent));
    alerts.extend(detect_recurring(
        ledger,
        config.recurring_min_count,
        currency,
    ));
    alerts.extend(detect_fees(
        ledger,
        &config.fee_keywords,
        config.fee_display_limit,
        currency,
    ));
    alerts.extend(detect_cash_flow_warning(summary));

    debug!("Collected {} alerts", alerts.len());
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: &str, amount: f64, category: &str, description: Option<&str>) -> Transaction {
        Transaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            category: category.to_string(),
            description: description.map(String::from),
            kind: None,
        }
    }

    fn month(year: i32, month: u32, total: f64) -> MonthlySpend {
        MonthlySpend { year, month, total }
    }

    fn keywords() -> Vec<String> {
        AnalysisConfig::default().fee_keywords
    }

    #[test]
    fn test_spike_fires_above_threshold() {
        let trend = vec![month(2024, 1, 100.0), month(2024, 2, 100.0), month(2024, 3, 250.0)];
        // mean 150, last 250 -> 66.7%
        let alert = detect_spike(&trend, 30.0).unwrap();
        assert_eq!(alert.kind, AlertKind::Spike);
        assert_eq!(
            alert.message,
            "Spike Alert: Last month's spending is 66.7% higher than usual."
        );
    }

    #[test]
    fn test_spike_quiet_below_threshold() {
        let trend = vec![month(2024, 1, 100.0), month(2024, 2, 120.0)];
        assert!(detect_spike(&trend, 30.0).is_none());
    }

    #[test]
    fn test_spike_single_month_never_fires() {
        let trend = vec![month(2024, 1, 500.0)];
        assert_eq!(spike_percent(&trend), Some(0.0));
        assert!(detect_spike(&trend, 30.0).is_none());
    }

    #[test]
    fn test_spike_skipped_without_data() {
        assert_eq!(spike_percent(&[]), None);
        assert!(detect_spike(&[], 30.0).is_none());
    }

    #[test]
    fn test_recurring_single_group() {
        let ledger = Ledger::new(
            vec![
                txn("2024-01-01", -50.0, "Food", None),
                txn("2024-01-02", -50.0, "Food", None),
                txn("2024-01-03", -50.0, "Food", None),
            ],
            false,
            false,
        );

        let alerts = detect_recurring(&ledger, 3, "₹");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "Food repeated 3 times (₹50)");
    }

    #[test]
    fn test_recurring_requires_exact_amount_and_category() {
        let ledger = Ledger::new(
            vec![
                txn("2024-01-01", -50.0, "Food", None),
                txn("2024-01-02", -50.0, "Food", None),
                txn("2024-01-03", -50.01, "Food", None),
                txn("2024-01-04", -50.0, "Fun", None),
                txn("2024-01-05", 50.0, "Food", None),
            ],
            false,
            false,
        );

        assert!(detect_recurring(&ledger, 3, "₹").is_empty());
    }

    #[test]
    fn test_recurring_one_line_per_group_sorted() {
        let mut rows = Vec::new();
        for day in 1..=4 {
            rows.push(txn(&format!("2024-01-0{day}"), -9.99, "Streaming", None));
            rows.push(txn(&format!("2024-02-0{day}"), -120.5, "Gym", None));
            rows.push(txn(&format!("2024-03-0{day}"), -4.5, "Gym", None));
        }
        let ledger = Ledger::new(rows, false, false);

        let messages: Vec<String> = detect_recurring(&ledger, 3, "$")
            .into_iter()
            .map(|a| a.message)
            .collect();

        assert_eq!(
            messages,
            vec![
                "Gym repeated 4 times ($120)",
                "Gym repeated 4 times ($4)",
                "Streaming repeated 4 times ($9)",
            ]
        );
    }

    #[test]
    fn test_fees_match_description_case_insensitive() {
        let ledger = Ledger::new(
            vec![
                txn("2024-01-01", -25.0, "Bank", Some("Monthly FEE")),
                txn("2024-01-02", -10.0, "Food", Some("Lunch")),
                txn("2024-01-03", -15.0, "Card", Some("LATE payment")),
                txn("2024-01-04", -5.0, "Fee", None),
                txn("2024-01-05", 30.0, "Refund", Some("fee refund")),
            ],
            true,
            false,
        );

        let alerts = detect_fees(&ledger, &keywords(), 5, "₹");
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].message, "Possible Unnecessary Fees detected:");
        assert_eq!(alerts[1].message, "2024-01-01 — Bank (₹25)");
        assert_eq!(alerts[2].message, "2024-01-03 — Card (₹15)");
    }

    #[test]
    fn test_fees_fall_back_to_category() {
        let ledger = Ledger::new(
            vec![
                txn("2024-01-01", -7.9, "Bank Charges", None),
                txn("2024-01-02", -10.0, "Food", None),
            ],
            false,
            false,
        );

        let alerts = detect_fees(&ledger, &keywords(), 5, "₹");
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].message, "2024-01-01 — Bank Charges (₹7)");
    }

    #[test]
    fn test_fees_keep_last_rows_by_position() {
        let rows: Vec<Transaction> = (1..=7)
            .rev()
            .map(|day| txn(&format!("2024-01-0{day}"), -(day as f64), "Bank fee", None))
            .collect();
        let ledger = Ledger::new(rows, false, false);

        let alerts = detect_fees(&ledger, &keywords(), 5, "₹");
        assert_eq!(alerts.len(), 6);
        // Rows are in reverse date order; the last five by position are days 5..1
        assert_eq!(alerts[1].message, "2024-01-05 — Bank fee (₹5)");
        assert_eq!(alerts[5].message, "2024-01-01 — Bank fee (₹1)");
    }

    #[test]
    fn test_no_fees_no_header() {
        let ledger = Ledger::new(vec![txn("2024-01-01", -10.0, "Food", None)], false, false);
        assert!(detect_fees(&ledger, &keywords(), 5, "₹").is_empty());
    }

    #[test]
    fn test_cash_flow_warning() {
        let negative = Summary {
            total_income: 1000.0,
            total_expenses: 1200.0,
            net_savings: -200.0,
            savings_rate: -20.0,
        };
        let positive = Summary {
            total_income: 1000.0,
            total_expenses: 800.0,
            net_savings: 200.0,
            savings_rate: 20.0,
        };

        assert_eq!(
            detect_cash_flow_warning(&negative).map(|a| a.kind),
            Some(AlertKind::CashFlow)
        );
        assert!(detect_cash_flow_warning(&positive).is_none());
    }

    #[test]
    fn test_collect_alerts_order() {
        let ledger = Ledger::new(
            vec![
                txn("2024-01-01", 100.0, "Salary", None),
                txn("2024-01-02", -10.0, "Food", None),
                txn("2024-02-02", -10.0, "Food", None),
                txn("2024-03-02", -10.0, "Food", None),
                txn("2024-03-05", -300.0, "Late fee", None),
            ],
            false,
            false,
        );
        let summary = crate::analysis::summarize(&ledger);
        let trend = crate::analysis::monthly_trend(&ledger, false);

        let kinds: Vec<AlertKind> =
            collect_alerts(&ledger, &summary, &trend, &AnalysisConfig::default(), "₹")
                .into_iter()
                .map(|a| a.kind)
                .collect();

        assert_eq!(
            kinds,
            vec![
                AlertKind::Spike,
                AlertKind::Recurring,
                AlertKind::Fees,
                AlertKind::Fees,
                AlertKind::CashFlow,
            ]
        );
    }
}
