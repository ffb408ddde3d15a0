//! Ledger CSV ingest.
//!
//! Reads a comma-separated, UTF-8 file whose first row is a header into an
//! immutable [`Ledger`]. Required columns are `date`, `amount` and
//! `category`; `description` and `type` are optional.

use crate::error::{LedgerError, Result};
use crate::models::{Ledger, Transaction, TxnKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    amount: usize,
    category: usize,
    description: Option<usize>,
    kind: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            date: find("date").ok_or(LedgerError::MissingColumn("date"))?,
            amount: find("amount").ok_or(LedgerError::MissingColumn("amount"))?,
            category: find("category").ok_or(LedgerError::MissingColumn("category"))?,
            description: find("description"),
            kind: find("type"),
        })
    }
}

/// Load a ledger from a CSV file on disk.
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    let file = std::fs::File::open(path)?;
    let ledger = parse_ledger(file)?;
    info!(
        "Loaded {} transactions from {}",
        ledger.len(),
        path.display()
    );
    Ok(ledger)
}

/// Parse a ledger from any CSV reader.
pub fn parse_ledger<R: Read>(reader: R) -> Result<Ledger> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers)?;
    debug!("Resolved columns: {:?}", columns);

    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is row 1
        let row = index + 2;

        let date_str = record.get(columns.date).unwrap_or("");
        let date = parse_date(date_str).ok_or_else(|| LedgerError::InvalidDate {
            row,
            value: date_str.to_string(),
        })?;

        let amount_str = record.get(columns.amount).unwrap_or("");
        let amount = parse_amount(amount_str).ok_or_else(|| LedgerError::InvalidAmount {
            row,
            value: amount_str.to_string(),
        })?;

        let category = record.get(columns.category).unwrap_or("").to_string();

        let description = columns
            .description
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let kind = columns
            .kind
            .and_then(|i| record.get(i))
            .and_then(TxnKind::parse);

        transactions.push(Transaction {
            date,
            amount,
            category,
            description,
            kind,
        });
    }

    Ok(Ledger::new(
        transactions,
        columns.description.is_some(),
        columns.kind.is_some(),
    ))
}

/// Parse a date cell in one of the accepted layouts.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a signed amount, tolerating thousands separators.
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_ledger() {
        let csv = "date,amount,category\n2024-01-05,1000,Salary\n2024-01-06,-50.5,Food\n";
        let ledger = parse_ledger(csv.as_bytes()).unwrap();

        assert_eq!(ledger.len(), 2);
        assert!(!ledger.has_description_column());
        assert!(!ledger.has_type_column());

        let food = &ledger.transactions()[1];
        assert_eq!(food.amount, -50.5);
        assert_eq!(food.category, "Food");
        assert_eq!(food.date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn test_parse_optional_columns() {
        let csv = "Date, Amount ,Category,Description,Type\n\
                   2024-02-01,-20,Fun,Movie night,Want\n\
                   2024-02-02,-80,Rent,,need\n\
                   2024-02-03,-5,Misc,Snack,other\n";
        let ledger = parse_ledger(csv.as_bytes()).unwrap();

        assert!(ledger.has_description_column());
        assert!(ledger.has_type_column());

        let rows = ledger.transactions();
        assert_eq!(rows[0].description.as_deref(), Some("Movie night"));
        assert_eq!(rows[0].kind, Some(TxnKind::Want));
        assert_eq!(rows[1].description, None);
        assert_eq!(rows[1].kind, Some(TxnKind::Need));
        assert_eq!(rows[2].kind, None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,amount\n2024-01-01,10\n";
        let err = parse_ledger(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::MissingColumn("category")));
    }

    #[test]
    fn test_invalid_date_reports_row() {
        let csv = "date,amount,category\n2024-01-01,10,A\nyesterday,5,B\n";
        let err = parse_ledger(csv.as_bytes()).unwrap_err();
        match err {
            LedgerError::InvalidDate { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_amount() {
        let csv = "date,amount,category\n2024-01-01,ten,A\n";
        let err = parse_ledger(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { row: 2, .. }));
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("2024/03/09"), Some(expected));
        assert_eq!(parse_date("03/09/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-09 14:30:00"), Some(expected));
        assert_eq!(parse_date("2024-03-09T23:59:59+05:30"), Some(expected));
        assert_eq!(parse_date("9th March"), None);
    }

    #[test]
    fn test_parse_amount_thousands() {
        assert_eq!(parse_amount("1,250.75"), Some(1250.75));
        assert_eq!(parse_amount(" -42 "), Some(-42.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("₹40"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_load_ledger_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "date,amount,category\n2024-01-01,-10,Food\n").unwrap();

        let ledger = load_ledger(file.path()).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_fixture_parses() {
        let ledger = parse_ledger(include_str!("../fixtures/transactions.csv").as_bytes()).unwrap();
        assert!(ledger.len() > 20);
        assert!(ledger.has_description_column());
        assert!(ledger.has_type_column());
    }
}
