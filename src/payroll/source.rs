use bytes::Bytes;
use csv::{ReaderBuilder, StringRecord};

use crate::error::PayslipError;

/// How many leading lines are scanned when looking for the header row.
/// Exported payroll sheets often carry a title/metadata preamble.
pub const HEADER_SCAN_WINDOW: usize = 10;

/// Columns every payroll table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Employee", "Rate", "Net Pay"];

/// Label used when the metadata line does not carry a pay period.
pub const PAY_PERIOD_FALLBACK: &str = "Not Specified";

/// The uploaded CSV, buffered whole. Every read opens a fresh reader over
/// the buffer, so callers can never leave a shared cursor mid-file.
pub struct PayrollSource {
    data: Bytes,
}

impl PayrollSource {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    fn reader(&self) -> csv::Reader<&[u8]> {
        // flexible: preamble and metadata lines rarely match the header width
        ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.data.as_ref())
    }

    /// Up to `limit` leading records, as raw cells.
    pub fn preview(&self, limit: usize) -> Result<Vec<StringRecord>, PayslipError> {
        let mut rows = Vec::with_capacity(limit);
        for record in self.reader().records().take(limit) {
            rows.push(record?);
        }
        Ok(rows)
    }

    /// Every record in the file, as raw cells.
    pub fn all_records(&self) -> Result<Vec<StringRecord>, PayslipError> {
        let mut rows = Vec::new();
        for record in self.reader().records() {
            rows.push(record?);
        }
        Ok(rows)
    }
}

/// Pay-period label from the metadata line: the second cell of the first
/// record, verbatim. Anything short of two cells (including an unreadable
/// file) yields the fallback label rather than an error.
pub fn extract_pay_period(source: &PayrollSource) -> String {
    source
        .preview(1)
        .ok()
        .and_then(|rows| rows.into_iter().next())
        .and_then(|first| {
            if first.len() >= 2 {
                first.get(1).map(str::to_string)
            } else {
                None
            }
        })
        .unwrap_or_else(|| PAY_PERIOD_FALLBACK.to_string())
}

/// Index of the first row (within `window`) whose non-empty cells are a
/// superset of `required`. `None` means no row qualified and the caller
/// should fall back to treating the first line as the header.
pub fn locate_header(rows: &[StringRecord], window: usize, required: &[&str]) -> Option<usize> {
    rows.iter().take(window).position(|row| {
        required
            .iter()
            .all(|name| row.iter().any(|cell| !cell.is_empty() && cell == *name))
    })
}

/// Convenience wrapper running the bounded scan against a source.
pub fn find_header_row(source: &PayrollSource) -> Result<Option<usize>, PayslipError> {
    let rows = source.preview(HEADER_SCAN_WINDOW)?;
    Ok(locate_header(&rows, HEADER_SCAN_WINDOW, &REQUIRED_COLUMNS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> PayrollSource {
        PayrollSource::new(Bytes::copy_from_slice(text.as_bytes()))
    }

    #[test]
    fn pay_period_from_second_cell() {
        let src = source("Payroll Export,March 2024\nEmployee,Rate,Net Pay\n");
        assert_eq!(extract_pay_period(&src), "March 2024");
    }

    #[test]
    fn pay_period_falls_back_on_single_cell() {
        let src = source("Payroll Export\nEmployee,Rate,Net Pay\n");
        assert_eq!(extract_pay_period(&src), PAY_PERIOD_FALLBACK);
    }

    #[test]
    fn pay_period_falls_back_on_empty_file() {
        let src = source("");
        assert_eq!(extract_pay_period(&src), PAY_PERIOD_FALLBACK);
    }

    #[test]
    fn header_found_at_every_offset_in_window() {
        for k in [0usize, 3, 9] {
            let mut text = String::new();
            for i in 0..k {
                text.push_str(&format!("preamble {i},x\n"));
            }
            text.push_str("Employee,Rate,Net Pay,Bonus\n");
            text.push_str("Jane Doe,20,1000,50\n");
            let src = source(&text);
            assert_eq!(find_header_row(&src).unwrap(), Some(k), "offset {k}");
        }
    }

    #[test]
    fn header_beyond_window_is_not_found() {
        let mut text = String::new();
        for i in 0..HEADER_SCAN_WINDOW {
            text.push_str(&format!("preamble {i},x\n"));
        }
        text.push_str("Employee,Rate,Net Pay\n");
        let src = source(&text);
        assert_eq!(find_header_row(&src).unwrap(), None);
    }

    #[test]
    fn header_requires_all_three_columns() {
        let src = source("Employee,Rate,Gross Pay\nJane,20,1200\n");
        assert_eq!(find_header_row(&src).unwrap(), None);
    }

    #[test]
    fn locate_header_ignores_empty_cells() {
        let rows = vec![
            StringRecord::from(vec!["", "", ""]),
            StringRecord::from(vec!["Employee", "Rate", "Net Pay"]),
        ];
        assert_eq!(locate_header(&rows, 10, &REQUIRED_COLUMNS), Some(1));
    }

    #[test]
    fn source_rewinds_between_reads() {
        let src = source("meta,April 2024\nEmployee,Rate,Net Pay\nJane,20,900\n");
        // each call reads from the top regardless of prior reads
        assert_eq!(extract_pay_period(&src), "April 2024");
        assert_eq!(find_header_row(&src).unwrap(), Some(1));
        assert_eq!(extract_pay_period(&src), "April 2024");
        assert_eq!(src.all_records().unwrap().len(), 3);
    }
}
