use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Everything that can fail while turning an uploaded payroll CSV into a
/// zip of payslips. Parse and Schema are detected before any rendering, so
/// a rejected upload never produces partial output.
#[derive(Debug, Error)]
pub enum PayslipError {
    #[error("could not parse payroll file: {0}")]
    Parse(#[from] csv::Error),

    #[error("row {row} has {cells} cells but the table has {columns} columns")]
    MalformedRow {
        row: usize,
        cells: usize,
        columns: usize,
    },

    #[error("CSV must contain Employee, Rate, and Net Pay columns (missing: {missing})")]
    Schema { missing: String },

    #[error("failed to render payslip for {employee}: {source}")]
    Render {
        employee: String,
        source: RenderError,
    },

    #[error("failed to build payslip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("upload error: {0}")]
    Upload(String),
}

/// Failure while constructing one document. Logo problems are not here:
/// they degrade to a text placeholder inside the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("field `{field}` has non-numeric value {value:?}")]
    BadAmount { field: String, value: String },

    #[error("pdf construction failed: {0}")]
    Pdf(String),
}

impl ResponseError for PayslipError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayslipError::Parse(_)
            | PayslipError::MalformedRow { .. }
            | PayslipError::Schema { .. }
            | PayslipError::Upload(_) => StatusCode::BAD_REQUEST,
            PayslipError::Render { .. } | PayslipError::Archive(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}
