use crate::error::PayslipError;
use crate::payroll::source::{PayrollSource, REQUIRED_COLUMNS};

/// One employee's row, keyed by column name in table order.
#[derive(Debug, Clone)]
pub struct PayrollRecord {
    fields: Vec<(String, String)>,
}

impl PayrollRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Archive entries and error messages are keyed by this value.
    pub fn employee(&self) -> &str {
        self.get("Employee").unwrap_or("")
    }

    /// (column, value) pairs in table order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// The parsed payroll table: the located header row plus everything below it.
#[derive(Debug)]
pub struct PayrollTable {
    columns: Vec<String>,
    rows: Vec<PayrollRecord>,
}

impl PayrollTable {
    /// Parse the full source using row `header_row` as the column headers.
    /// `None` falls back to the first line. The schema check runs before any
    /// record is handed out, so missing required columns fail the batch here.
    pub fn load(source: &PayrollSource, header_row: Option<usize>) -> Result<Self, PayslipError> {
        let records = source.all_records()?;
        let header_idx = header_row.unwrap_or(0);

        let columns: Vec<String> = records
            .get(header_idx)
            .map(|header| header.iter().map(str::to_string).collect())
            .unwrap_or_default();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|column| column == *required))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(PayslipError::Schema {
                missing: missing.join(", "),
            });
        }

        let mut rows = Vec::new();
        for (idx, record) in records.iter().enumerate().skip(header_idx + 1) {
            if record.len() > columns.len() {
                return Err(PayslipError::MalformedRow {
                    row: idx + 1,
                    cells: record.len(),
                    columns: columns.len(),
                });
            }
            // short rows are padded with the empty marker
            let fields = columns
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    (
                        name.clone(),
                        record.get(col).unwrap_or_default().to_string(),
                    )
                })
                .collect();
            rows.push(PayrollRecord { fields });
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[PayrollRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn source(text: &str) -> PayrollSource {
        PayrollSource::new(Bytes::copy_from_slice(text.as_bytes()))
    }

    #[test]
    fn loads_rows_below_located_header() {
        let src = source(
            "Acme Payroll,March 2024\n\
             Employee,Rate,Net Pay,Bonus\n\
             Jane Doe,20,1000,50\n\
             John Roe,22,1100,0\n",
        );
        let table = PayrollTable::load(&src, Some(1)).unwrap();
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].employee(), "Jane Doe");
        assert_eq!(table.rows()[0].get("Bonus"), Some("50"));
        assert_eq!(table.rows()[1].get("Net Pay"), Some("1100"));
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let src = source("Employee,Rate,Gross\nJane,20,1200\n");
        let err = PayrollTable::load(&src, Some(0)).unwrap_err();
        match err {
            PayslipError::Schema { missing } => assert_eq!(missing, "Net Pay"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn default_header_inference_uses_first_line() {
        let src = source("Employee,Rate,Net Pay\nJane,20,900\n");
        let table = PayrollTable::load(&src, None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("Rate"), Some("20"));
    }

    #[test]
    fn short_rows_are_padded_with_empty_values() {
        let src = source("Employee,Rate,Net Pay,Bonus\nJane,20,900\n");
        let table = PayrollTable::load(&src, Some(0)).unwrap();
        assert_eq!(table.rows()[0].get("Bonus"), Some(""));
    }

    #[test]
    fn overlong_rows_fail_the_batch() {
        let src = source("Employee,Rate,Net Pay\nJane,20,900,extra\n");
        let err = PayrollTable::load(&src, Some(0)).unwrap_err();
        assert!(matches!(err, PayslipError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn empty_table_after_header_is_ok() {
        let src = source("Employee,Rate,Net Pay\n");
        let table = PayrollTable::load(&src, Some(0)).unwrap();
        assert!(table.is_empty());
    }
}
