//! Dashboard report generation.
//!
//! This module renders a [`Dashboard`] as plain terminal text, Markdown or
//! JSON. Charts become sorted tables with proportional text bars.

use crate::models::{Alert, AlertKind, CategorySpend, ChatTurn, Dashboard, Role, WhatIfOutcome};
use anyhow::Result;
use num_format::{Locale, ToFormattedString};

const BAR_WIDTH: usize = 30;

/// Format money as whole units with thousands separators, e.g. `₹12,500`.
pub fn format_money(symbol: &str, value: f64) -> String {
    let whole = value.round() as i64;
    if whole < 0 {
        format!("-{}{}", symbol, whole.unsigned_abs().to_formatted_string(&Locale::en))
    } else {
        format!("{}{}", symbol, whole.to_formatted_string(&Locale::en))
    }
}

/// Proportional text bar, at most `BAR_WIDTH` blocks.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

/// Categories sorted by spend, largest first.
fn sorted_categories(categories: &[CategorySpend]) -> Vec<&CategorySpend> {
    let mut sorted: Vec<_> = categories.iter().collect();
    sorted.sort_by(|a, b| b.total.total_cmp(&a.total));
    sorted
}

/// Flatten alerts into display lines, adding the recurring heading and
/// indenting detail rows.
pub fn alert_lines(alerts: &[Alert]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous: Option<AlertKind> = None;

    for alert in alerts {
        let continues = previous == Some(alert.kind);
        match alert.kind {
            AlertKind::Recurring => {
                if !continues {
                    lines.push(format!(
                        "{} Recurring Payments detected:",
                        AlertKind::Recurring.emoji()
                    ));
                }
                lines.push(format!("   • {}", alert.message));
            }
            AlertKind::Fees if continues => lines.push(format!("   • {}", alert.message)),
            kind => lines.push(format!("{} {}", kind.emoji(), alert.message)),
        }
        previous = Some(alert.kind);
    }

    lines
}

const ALL_CLEAR: &str = "🎉 Everything looks good! No major financial risks detected.";

fn transcript_speaker(turn: &ChatTurn) -> &'static str {
    match turn.role {
        Role::Assistant => "🤖 Coach",
        Role::User => "🧑 You",
    }
}

/// Generate a plain-text report for the terminal.
pub fn generate_text_report(dashboard: &Dashboard) -> String {
    let symbol = dashboard.currency_symbol.as_str();
    let summary = &dashboard.summary;
    let mut out = String::new();

    out.push_str("💰 AI Personal Finance Coach\n");
    out.push_str(&format!(
        "Source: {} ({} transactions)\n\n",
        dashboard.source, dashboard.transaction_count
    ));

    out.push_str(&format!(
        "  Total Income    {}\n",
        format_money(symbol, summary.total_income)
    ));
    out.push_str(&format!(
        "  Total Expenses  {}\n",
        format_money(symbol, summary.total_expenses)
    ));
    out.push_str(&format!("  Savings Rate    {:.2}%\n\n", summary.savings_rate));

    out.push_str("Spending by Category\n");
    let categories = sorted_categories(&dashboard.categories);
    if categories.is_empty() {
        out.push_str("  No expenses recorded.\n");
    }
    let max = categories.first().map(|c| c.total).unwrap_or(0.0);
    let width = categories
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);
    for c in &categories {
        let share = if summary.total_expenses > 0.0 {
            c.total / summary.total_expenses * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "  {:<width$}  {:>12}  {:>5.1}%  {}\n",
            c.category,
            format_money(symbol, c.total),
            share,
            bar(c.total, max),
            width = width
        ));
    }
    out.push('\n');

    out.push_str("Monthly Spending Trend\n");
    if dashboard.monthly_trend.is_empty() {
        out.push_str("  No monthly data.\n");
    }
    let max = dashboard
        .monthly_trend
        .iter()
        .map(|m| m.total)
        .fold(0.0, f64::max);
    let mut current_year = None;
    for m in &dashboard.monthly_trend {
        if current_year != Some(m.year) {
            out.push_str(&format!("  {}\n", m.year));
            current_year = Some(m.year);
        }
        out.push_str(&format!(
            "    {}  {:>12}  {}\n",
            m.label(),
            format_money(symbol, m.total),
            bar(m.total, max)
        ));
    }
    out.push('\n');

    out.push_str("🔔 Insights & Alerts\n");
    if dashboard.alerts.is_empty() {
        out.push_str(&format!("  {}\n", ALL_CLEAR));
    }
    for line in alert_lines(&dashboard.alerts) {
        out.push_str(&format!("  {}\n", line));
    }
    out.push('\n');

    out.push_str("🎯 What If You Control Your Wants?\n");
    match &dashboard.what_if {
        WhatIfOutcome::Projection(p) => {
            out.push_str(&format!(
                "  Reduce 'Want' spending by {}%\n",
                p.reduction_percent
            ));
            out.push_str(&format!(
                "  Monthly Savings  {}\n",
                format_money(symbol, p.monthly_savings)
            ));
            out.push_str(&format!(
                "  Yearly Impact    {}\n",
                format_money(symbol, p.yearly_savings)
            ));
        }
        WhatIfOutcome::Unavailable { reason } => {
            out.push_str(&format!("  ❌ {}\n", reason));
        }
    }

    if !dashboard.transcript.is_empty() {
        out.push_str("\n🤖 Chat with Your AI Finance Coach\n");
        for turn in &dashboard.transcript {
            out.push_str(&format!("  {}: {}\n", transcript_speaker(turn), turn.content));
        }
    }

    out
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let symbol = dashboard.currency_symbol.as_str();
    let summary = &dashboard.summary;
    let mut output = String::new();

    output.push_str("# 💰 AI Personal Finance Coach\n\n");
    output.push_str(&format!("- **Source:** `{}`\n", dashboard.source));
    output.push_str(&format!(
        "- **Transactions:** {}\n",
        dashboard.transaction_count
    ));
    output.push_str(&format!(
        "- **Generated:** {}\n\n",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // KPIs
    output.push_str("## Summary\n\n");
    output.push_str("| Total Income | Total Expenses | Savings Rate |\n");
    output.push_str("|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {:.2}% |\n\n",
        format_money(symbol, summary.total_income),
        format_money(symbol, summary.total_expenses),
        summary.savings_rate
    ));

    output.push_str("## Spending by Category\n\n");
    let categories = sorted_categories(&dashboard.categories);
    if categories.is_empty() {
        output.push_str("No expenses recorded.\n\n");
    } else {
        output.push_str("| Category | Spend | Share |\n");
        output.push_str("|:---|---:|---:|\n");
        for c in categories {
            let share = if summary.total_expenses > 0.0 {
                c.total / summary.total_expenses * 100.0
            } else {
                0.0
            };
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                c.category,
                format_money(symbol, c.total),
                share
            ));
        }
        output.push('\n');
    }

    output.push_str("## Monthly Spending Trend\n\n");
    if dashboard.monthly_trend.is_empty() {
        output.push_str("No monthly data.\n\n");
    } else {
        output.push_str("| Year | Month | Spend |\n");
        output.push_str("|:---:|:---:|---:|\n");
        for m in &dashboard.monthly_trend {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                m.year,
                m.label(),
                format_money(symbol, m.total)
            ));
        }
        output.push('\n');
    }

    output.push_str("## 🔔 Insights & Alerts\n\n");
    if dashboard.alerts.is_empty() {
        output.push_str(&format!("{}\n\n", ALL_CLEAR));
    } else {
        for line in alert_lines(&dashboard.alerts) {
            match line.strip_prefix("   • ") {
                Some(detail) => output.push_str(&format!("  - {}\n", detail)),
                None => output.push_str(&format!("- {}\n", line)),
            }
        }
        output.push('\n');
    }

    output.push_str("## 🎯 What If You Control Your Wants?\n\n");
    match &dashboard.what_if {
        WhatIfOutcome::Projection(p) => {
            output.push_str(&format!(
                "Reducing 'Want' spending by **{}%**:\n\n",
                p.reduction_percent
            ));
            output.push_str("| Monthly Savings | Yearly Impact |\n");
            output.push_str("|:---:|:---:|\n");
            output.push_str(&format!(
                "| {} | {} |\n\n",
                format_money(symbol, p.monthly_savings),
                format_money(symbol, p.yearly_savings)
            ));
        }
        WhatIfOutcome::Unavailable { reason } => {
            output.push_str(&format!("> ❌ {}\n\n", reason));
        }
    }

    if !dashboard.transcript.is_empty() {
        output.push_str("## 🤖 Chat with Your AI Finance Coach\n\n");
        for turn in &dashboard.transcript {
            output.push_str(&format!(
                "**{}:** {}\n\n",
                transcript_speaker(turn),
                turn.content
            ));
        }
    }

    output
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_dashboard;
    use crate::config::Config;
    use crate::ledger::parse_ledger;

    fn fixture_dashboard() -> Dashboard {
        let ledger =
            parse_ledger(include_str!("../../fixtures/transactions.csv").as_bytes()).unwrap();
        build_dashboard(&ledger, "transactions.csv", &Config::default())
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("₹", 202000.0), "₹202,000");
        assert_eq!(format_money("$", 999.6), "$1,000");
        assert_eq!(format_money("₹", 0.0), "₹0");
        assert_eq!(format_money("₹", -1234.0), "-₹1,234");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0.001, 10.0).chars().count(), 1);
        assert!(bar(0.0, 10.0).is_empty());
        assert!(bar(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_alert_lines_grouping() {
        let alerts = vec![
            Alert::new(AlertKind::Spike, "Spike Alert: x"),
            Alert::new(AlertKind::Recurring, "Food repeated 3 times (₹50)"),
            Alert::new(AlertKind::Recurring, "Gym repeated 3 times (₹20)"),
            Alert::new(AlertKind::Fees, "Possible Unnecessary Fees detected:"),
            Alert::new(AlertKind::Fees, "2024-01-01 — Bank (₹5)"),
            Alert::new(AlertKind::CashFlow, "Cash Flow Warning: y"),
        ];

        assert_eq!(
            alert_lines(&alerts),
            vec![
                "⚠️ Spike Alert: x",
                "🔁 Recurring Payments detected:",
                "   • Food repeated 3 times (₹50)",
                "   • Gym repeated 3 times (₹20)",
                "💸 Possible Unnecessary Fees detected:",
                "   • 2024-01-01 — Bank (₹5)",
                "🔴 Cash Flow Warning: y",
            ]
        );
    }

    #[test]
    fn test_text_report_sections() {
        let text = generate_text_report(&fixture_dashboard());

        assert!(text.contains("Total Income    ₹202,000"));
        assert!(text.contains("Spending by Category"));
        assert!(text.contains("Monthly Spending Trend"));
        assert!(text.contains("  2024\n    Jan"));
        assert!(text.contains("🔁 Recurring Payments detected:"));
        assert!(text.contains("Reduce 'Want' spending by 20%"));
        assert!(!text.contains("Chat with Your AI Finance Coach"));
    }

    #[test]
    fn test_markdown_report_sections() {
        let mut dashboard = fixture_dashboard();
        dashboard.transcript = vec![
            ChatTurn::assistant("Hi!"),
            ChatTurn::user("How am I doing?"),
            ChatTurn::assistant("Great."),
        ];
        let markdown = generate_markdown_report(&dashboard);

        assert!(markdown.contains("# 💰 AI Personal Finance Coach"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| Rent | ₹60,000 |"));
        assert!(markdown.contains("| 2024 | Apr |"));
        assert!(markdown.contains("  - Subscriptions repeated 4 times (₹499)"));
        assert!(markdown.contains("**🧑 You:** How am I doing?"));
    }

    #[test]
    fn test_all_clear_and_unavailable_what_if() {
        let ledger = parse_ledger("date,amount,category\n2024-01-01,100,Salary\n".as_bytes())
            .unwrap();
        let dashboard = build_dashboard(&ledger, "inline", &Config::default());

        let text = generate_text_report(&dashboard);
        assert!(text.contains(ALL_CLEAR));
        assert!(text.contains("❌ CSV must have a 'type' column (Want/Need)."));
        assert!(text.contains("No expenses recorded."));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&fixture_dashboard()).unwrap();

        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"monthly_trend\""));
        assert!(json.contains("\"alerts\""));
        assert!(json.contains("\"status\": \"projection\""));
        assert!(!json.contains("\"transcript\""));
    }
}
