// 📤 CSV export of a query result

use crate::query::QueryResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    description: &'a str,
    category: &'a str,
    date: &'a str,
    amount: String,
    comment: &'a str,
}

/// Write rows (in result order) as CSV with a header line
pub fn write_csv<W: Write>(writer: W, result: &QueryResult) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    for expense in &result.rows {
        wtr.serialize(CsvRow {
            id: expense.id,
            description: &expense.description,
            category: &expense.category,
            date: &expense.date,
            amount: expense.amount_display(),
            comment: &expense.comment,
        })?;
    }

    // Header only appears with the first record; keep it for empty results too
    if result.rows.is_empty() {
        wtr.write_record(["id", "description", "category", "date", "amount", "comment"])?;
    }

    wtr.flush()?;
    Ok(result.rows.len())
}

pub fn export_csv(path: &Path, result: &QueryResult) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    let written = write_csv(file, result)?;
    tracing::info!(path = %path.display(), rows = written, "query exported");

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::Expense;

    fn sample() -> QueryResult {
        QueryResult {
            rows: vec![
                Expense {
                    id: 1,
                    description: "Lunch".into(),
                    category: "Food".into(),
                    date: "2024-03-15".into(),
                    amount: 12.5,
                    comment: String::new(),
                },
                Expense {
                    id: 2,
                    description: "Train, return".into(),
                    category: "Transport".into(),
                    date: "2024-03-20".into(),
                    amount: 8.0,
                    comment: "work".into(),
                },
            ],
            total: 20.5,
        }
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        let written = write_csv(&mut out, &sample()).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,description,category,date,amount,comment\n\
             1,Lunch,Food,2024-03-15,12.50,\n\
             2,\"Train, return\",Transport,2024-03-20,8.00,work\n"
        );
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut out = Vec::new();
        write_csv(&mut out, &QueryResult::default()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,description,category,date,amount,comment\n"
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.csv");

        export_csv(&path, &sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
