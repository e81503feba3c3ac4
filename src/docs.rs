use crate::api::payslip::InspectResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payslip Generator API",
        version = "1.0.0",
        description = r#"
## Employee Payslip Generator

Turns an uploaded payroll CSV into one PDF payslip per employee, delivered
as a single `Payslips.zip`.

### 🔹 How it works
- **Inspect**
  - Upload the CSV and get back the employee count and detected pay period
- **Generate**
  - Upload the same CSV and download the zip of rendered payslips

### 📦 Input format
- First line: metadata, second cell read as the pay period label
- Header row auto-located within the first 10 lines; must contain
  `Employee`, `Rate`, and `Net Pay`
- Every other column is treated as an earning/deduction line item

---
Built with **Rust**, **Actix Web**, **printpdf**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payslip::inspect,
        crate::api::payslip::generate
    ),
    components(
        schemas(
            InspectResponse
        )
    ),
    tags(
        (name = "Payslips", description = "Payroll CSV upload and payslip generation APIs"),
    )
)]
pub struct ApiDoc;
