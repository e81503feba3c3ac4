use actix_multipart::Multipart;
use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, Responder, web};
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::PayslipError;
use crate::payroll::bundle::build_archive;
use crate::payroll::source::{self, PayrollSource};
use crate::payroll::table::PayrollTable;
use crate::render::payslip::FooterContact;
use crate::utils::logo_cache;

#[derive(Serialize, ToSchema)]
pub struct InspectResponse {
    #[schema(example = 12)]
    pub employees: usize,

    #[schema(example = "March 2024")]
    pub pay_period: String,
}

/// Buffer the `file` field of a multipart upload.
async fn read_upload(mut payload: Multipart) -> Result<Bytes, PayslipError> {
    let mut buf = BytesMut::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| PayslipError::Upload(e.to_string()))?;
        if field.name() != "file" {
            continue;
        }
        found = true;
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| PayslipError::Upload(e.to_string()))?;
            buf.extend_from_slice(&chunk);
        }
    }

    if !found {
        return Err(PayslipError::Upload(
            "upload must contain a `file` field".to_string(),
        ));
    }
    Ok(buf.freeze())
}

/// Pay period + header scan + full parse, shared by both endpoints. Parse
/// and schema problems surface here, before anything is rendered.
fn parse_table(data: Bytes) -> Result<(PayrollTable, String), PayslipError> {
    let src = PayrollSource::new(data);
    let pay_period = source::extract_pay_period(&src);
    let header_row = source::find_header_row(&src)?;
    let table = PayrollTable::load(&src, header_row)?;
    Ok((table, pay_period))
}

#[utoipa::path(
    post,
    path = "/api/v1/payslips/inspect",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Payroll CSV in a `file` field"),
    responses(
        (status = 200, body = InspectResponse),
        (status = 400, description = "Unreadable CSV or missing required columns")
    ),
    tag = "Payslips"
)]
pub async fn inspect(payload: Multipart) -> Result<impl Responder, PayslipError> {
    let data = read_upload(payload).await?;
    let (table, pay_period) = parse_table(data)?;

    info!(employees = table.len(), pay_period = %pay_period, "payroll file accepted");

    Ok(HttpResponse::Ok().json(InspectResponse {
        employees: table.len(),
        pay_period,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/payslips/generate",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Payroll CSV in a `file` field"),
    responses(
        (status = 200, description = "Zip of one PDF per employee",
            content_type = "application/zip"),
        (status = 400, description = "Unreadable CSV or missing required columns"),
        (status = 500, description = "A payslip failed to render; no archive is produced")
    ),
    tag = "Payslips"
)]
pub async fn generate(
    payload: Multipart,
    config: web::Data<Config>,
    client: web::Data<reqwest::Client>,
) -> Result<impl Responder, PayslipError> {
    let data = read_upload(payload).await?;
    let (table, pay_period) = parse_table(data)?;

    let logo = logo_cache::logo_for(client.get_ref(), &config.logo_url).await;
    let footer = FooterContact {
        website: config.footer_website.clone(),
        email: config.footer_email.clone(),
        phone: config.footer_phone.clone(),
    };

    // one upload = one blocking batch, archive only returned when complete
    let archive = build_archive(&table, &pay_period, &logo, &footer)?;

    info!(
        employees = table.len(),
        pay_period = %pay_period,
        bytes = archive.len(),
        "payslip archive generated"
    );

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition::attachment("Payslips.zip"))
        .body(archive))
}
