//! Advice formatting.
//!
//! Builds the fixed-shape financial summary the coach sees, and the full
//! prompt sent for each question.

use crate::analysis::{average_monthly_spend, last_month_spend, top_categories};
use crate::models::{ChatTurn, Dashboard};

/// Render the financial summary block for the coach.
///
/// Monthly figures read "n/a" when the ledger has no expense months.
pub fn build_context(dashboard: &Dashboard, top_n: usize) -> String {
    let summary = &dashboard.summary;

    let top = top_categories(&dashboard.categories, top_n)
        .iter()
        .map(|c| format!("{}: {:.2}", c.category, c.total))
        .collect::<Vec<_>>()
        .join(", ");

    let avg = average_monthly_spend(&dashboard.monthly_trend)
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string());
    let last = last_month_spend(&dashboard.monthly_trend)
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string());

    let mut context = String::new();
    context.push_str(&format!("Income: {:.2}\n", summary.total_income));
    context.push_str(&format!("Expenses: {:.2}\n", summary.total_expenses));
    context.push_str(&format!("Savings Rate: {:.2}%\n", summary.savings_rate));
    context.push_str(&format!("Top Categories: {{{}}}\n", top));
    context.push_str(&format!("Avg Monthly Spend: {}\n", avg));
    context.push_str(&format!("Last Month Spend: {}\n", last));
    context
}

/// Assemble the prompt for one question.
///
/// `transcript` is the conversation so far; the new question is listed as
/// the final user turn of the conversation and repeated on its own.
pub fn build_prompt(context: &str, transcript: &[ChatTurn], question: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a friendly personal finance coach.\n");
    prompt.push_str("Use the user's financial data to give clear, actionable, simple advice.\n\n");

    prompt.push_str("User Financial Summary:\n");
    prompt.push_str(context);
    prompt.push('\n');

    prompt.push_str("Conversation:\n");
    for turn in transcript {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
    prompt.push_str(&format!("user: {}\n\n", question));

    prompt.push_str("User Question:\n");
    prompt.push_str(question);
    prompt.push('\n');

    prompt
}
