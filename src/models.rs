//! Data models for the finance coach.
//!
//! This module contains the core data structures used throughout
//! the application: ledger rows, computed aggregates, alerts, the
//! what-if projection, chat turns and the assembled dashboard.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-assigned classification of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxnKind {
    Want,
    Need,
}

impl TxnKind {
    /// Parse a `type` cell. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "want" => Some(TxnKind::Want),
            "need" => Some(TxnKind::Need),
            _ => None,
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnKind::Want => write!(f, "Want"),
            TxnKind::Need => write!(f, "Need"),
        }
    }
}

/// A single ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    /// Signed amount: positive is income, negative is expense.
    pub amount: f64,
    /// Free-text category label.
    pub category: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Want/Need classification, if present and recognised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TxnKind>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Calendar month key `(year, month)`.
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// An immutable, in-memory ledger for one analysis session.
///
/// Column presence is tracked separately from cell values because fee
/// matching and the what-if projection depend on whether the column
/// exists at all.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    has_description: bool,
    has_type: bool,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>, has_description: bool, has_type: bool) -> Self {
        Self {
            transactions,
            has_description,
            has_type,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Expense rows (amount < 0) in row order.
    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn has_description_column(&self) -> bool {
        self.has_description
    }

    pub fn has_type_column(&self) -> bool {
        self.has_type
    }
}

/// Headline financial metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of positive amounts.
    pub total_income: f64,
    /// Absolute sum of negative amounts.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_savings: f64,
    /// Net savings as a percentage of income; 0 when there is no income.
    pub savings_rate: f64,
}

/// Total spend for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: f64,
}

/// Total spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpend {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthlySpend {
    /// Short month name for display, e.g. "Jan".
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_else(|| format!("{:02}", self.month))
    }
}

/// Classification tag of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Spike,
    Recurring,
    Fees,
    CashFlow,
}

impl AlertKind {
    /// Returns an emoji representation of the alert kind.
    pub fn emoji(&self) -> &'static str {
        match self {
            AlertKind::Spike => "⚠️",
            AlertKind::Recurring => "🔁",
            AlertKind::Fees => "💸",
            AlertKind::CashFlow => "🔴",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Spike => write!(f, "Spike"),
            AlertKind::Recurring => write!(f, "Recurring"),
            AlertKind::Fees => write!(f, "Fees"),
            AlertKind::CashFlow => write!(f, "Cash Flow"),
        }
    }
}

/// A rule-based insight shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Projected savings from trimming "Want" spending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhatIfProjection {
    pub reduction_percent: u8,
    /// Distinct calendar months in the whole ledger, floored at 1.
    pub month_count: usize,
    pub monthly_avg_wants: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
}

/// Result of the what-if feature for one dashboard pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WhatIfOutcome {
    Projection(WhatIfProjection),
    Unavailable { reason: String },
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Assistant => write!(f, "assistant"),
            Role::User => write!(f, "user"),
        }
    }
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Everything one analysis pass produces, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Input file the ledger was read from.
    pub source: String,
    /// When the pass ran.
    pub generated_at: DateTime<Utc>,
    pub transaction_count: usize,
    pub currency_symbol: String,
    pub summary: Summary,
    /// Category totals, ordered by category name.
    pub categories: Vec<CategorySpend>,
    /// Monthly expense totals in chronological order.
    pub monthly_trend: Vec<MonthlySpend>,
    /// Alerts in insertion order (spike, recurring, fees, cash flow).
    pub alerts: Vec<Alert>,
    pub what_if: WhatIfOutcome,
    /// Chat transcript, when the coach was used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<ChatTurn>,
}
