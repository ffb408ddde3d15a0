//! Ledger analysis.
//!
//! This module turns a [`Ledger`] into a [`Dashboard`]: headline metrics,
//! category and monthly views, alerts and the what-if projection. It is a
//! pure function of the ledger and settings; every request recomputes it.

pub mod alerts;
pub mod metrics;
pub mod whatif;

pub use alerts::collect_alerts;
pub use metrics::{
    average_monthly_spend, category_breakdown, last_month_spend, monthly_trend, summarize,
    top_categories,
};
pub use whatif::what_if_wants;

use crate::config::Config;
use crate::error::LedgerError;
use crate::models::{Dashboard, Ledger, WhatIfOutcome};
use chrono::Utc;
use tracing::{info, warn};

/// Run one full analysis pass.
pub fn build_dashboard(ledger: &Ledger, source: &str, config: &Config) -> Dashboard {
    let currency = config.general.currency_symbol.as_str();
    if ledger.is_empty() {
        warn!("Ledger {} has no transactions", source);
    }

    let summary = summarize(ledger);
    let categories = category_breakdown(ledger);
    let monthly_trend = monthly_trend(ledger, config.analysis.fill_month_gaps);
    let alerts = collect_alerts(ledger, &summary, &monthly_trend, &config.analysis, currency);

    let what_if = match what_if_wants(ledger, config.general.default_reduction) {
        Ok(projection) => WhatIfOutcome::Projection(projection),
        Err(LedgerError::MissingColumn(column)) => {
            warn!("What-if projection disabled: no '{}' column", column);
            WhatIfOutcome::Unavailable {
                reason: format!("CSV must have a '{}' column (Want/Need).", column),
            }
        }
        Err(e) => {
            warn!("What-if projection disabled: {}", e);
            WhatIfOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    };

    info!(
        "Analyzed {} transactions: {} categories, {} months, {} alerts",
        ledger.len(),
        categories.len(),
        monthly_trend.len(),
        alerts.len()
    );

    Dashboard {
        source: source.to_string(),
        generated_at: Utc::now(),
        transaction_count: ledger.len(),
        currency_symbol: currency.to_string(),
        summary,
        categories,
        monthly_trend,
        alerts,
        what_if,
        transcript: Vec::new(),
    }
}
