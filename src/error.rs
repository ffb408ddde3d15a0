//! Error types for ledger ingest, analysis and the finance coach.

use thiserror::Error;

/// Errors raised while reading or analysing a ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV must have a '{0}' column")]
    MissingColumn(&'static str),

    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },

    #[error("Reduction must be between 0 and 100, got {0}")]
    InvalidReduction(u8),
}

/// Errors raised by the conversational coach.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("No API key configured; set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to the coach API at {0}")]
    Connect(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Coach API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Coach returned an empty response")]
    EmptyResponse,

    #[error("Question is empty")]
    EmptyQuestion,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
