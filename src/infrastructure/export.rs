use crate::domain::{DATE_FORMAT, LoanRecord};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

pub struct CsvExporter;

impl CsvExporter {
    pub const HEADER: [&'static str; 6] = ["id", "title", "student", "borrowDate", "returnDate", "status"];

    /// Writes `records` to `filename` with a header row. Returns the filename on success.
    ///
    /// # Errors
    ///
    /// File creation or CSV encoding failures.
    pub fn export_records(records: &[&LoanRecord], filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(Path::new(filename))?;
        writer.write_record(Self::HEADER)?;

        for record in records {
            writer.write_record([
                record.id.to_string(),
                record.title.clone(),
                record.student.clone(),
                record.borrow_date.format(DATE_FORMAT).to_string(),
                record.return_date.format(DATE_FORMAT).to_string(),
                record.status.label().to_string(),
            ])?;
        }

        writer.flush().map_err(|source| ExportError::Io {
            path: filename.to_string(),
            source,
        })?;
        tracing::info!(file = filename, count = records.len(), "exported loans to CSV");
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanStatus;
    use chrono::NaiveDate;

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loans.csv");
        let path_str = path.to_str().unwrap();

        let record = LoanRecord {
            id: 2,
            title: "Chí Phèo, tập 1".to_string(),
            student: "Tú".to_string(),
            borrow_date: NaiveDate::from_ymd_opt(2099, 2, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2099, 2, 14).unwrap(),
            status: LoanStatus::Returned,
        };

        let written = CsvExporter::export_records(&[&record], path_str).unwrap();
        assert_eq!(written, path_str);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "id,title,student,borrowDate,returnDate,status");
        assert_eq!(lines[1], "2,\"Chí Phèo, tập 1\",Tú,2099-02-01,2099-02-14,Returned");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("loans.csv");
        assert!(CsvExporter::export_records(&[], path.to_str().unwrap()).is_err());
    }
}
