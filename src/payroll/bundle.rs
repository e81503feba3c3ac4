use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PayslipError;
use crate::payroll::table::PayrollTable;
use crate::render::logo::Logo;
use crate::render::payslip::{FooterContact, render_payslip};

/// Render every row and pack the PDFs into one zip buffer. A render failure
/// aborts the whole batch naming the employee; a half-filled archive looks
/// complete and that is worse than no archive.
pub fn build_archive(
    table: &PayrollTable,
    pay_period: &str,
    logo: &Logo,
    footer: &FooterContact,
) -> Result<Vec<u8>, PayslipError> {
    let mut entries: Vec<(String, Vec<u8>)> = Vec::with_capacity(table.len());
    for record in table.rows() {
        let employee = record.employee().to_string();
        let pdf = render_payslip(record, pay_period, logo, footer).map_err(|source| {
            PayslipError::Render {
                employee: employee.clone(),
                source,
            }
        })?;

        // duplicate employee names: last write wins, one entry per name
        let name = format!("Payslip_{employee}.pdf");
        match entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                tracing::warn!(entry = %name, "duplicate employee name, keeping the later row");
                entry.1 = pdf;
            }
            None => entries.push((name, pdf)),
        }
    }

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, pdf) in &entries {
        archive.start_file(name, options)?;
        archive
            .write_all(pdf)
            .map_err(zip::result::ZipError::from)?;
    }
    Ok(archive.finish()?.into_inner())
}
