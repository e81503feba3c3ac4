use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod config;
mod docs;
mod error;
mod payroll;
mod render;
mod routes;
mod utils;

use config::Config;

use crate::utils::logo_cache;
use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()

/// Minimal browser front end: upload control, status line, generate button
/// that turns into the zip download. Everything real happens in /api.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Employee Payslip Generator</title>
<style>
  body { font-family: sans-serif; max-width: 640px; margin: 3em auto; }
  #status { margin: 1em 0; }
  #status.error { color: #b00020; }
  #generate { display: none; }
</style></head>
<body>
<h1>Employee Payslip Generator</h1>
<input type="file" id="file" accept=".csv">
<p id="status"></p>
<button id="generate">Generate Payslips ZIP</button>
<script>
const fileInput = document.getElementById('file');
const status = document.getElementById('status');
const generate = document.getElementById('generate');

function formData() {
  const fd = new FormData();
  fd.append('file', fileInput.files[0]);
  return fd;
}

fileInput.addEventListener('change', async () => {
  generate.style.display = 'none';
  if (!fileInput.files.length) return;
  const resp = await fetch('/api/v1/payslips/inspect', { method: 'POST', body: formData() });
  const body = await resp.json();
  if (!resp.ok) {
    status.className = 'error';
    status.textContent = body.error;
    return;
  }
  status.className = '';
  status.textContent = `Found ${body.employees} employees. Pay Period: ${body.pay_period}`;
  generate.style.display = 'inline';
});

generate.addEventListener('click', async () => {
  const resp = await fetch('/api/v1/payslips/generate', { method: 'POST', body: formData() });
  if (!resp.ok) {
    const body = await resp.json();
    status.className = 'error';
    status.textContent = body.error;
    return;
  }
  const url = URL.createObjectURL(await resp.blob());
  const a = document.createElement('a');
  a.href = url;
  a.download = 'Payslips.zip';
  a.click();
  URL.revokeObjectURL(url);
});
</script>
</body>
</html>
"#;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build http client");

    let client_for_warmup = client.clone();
    let logo_url = config.logo_url.clone();
    // 👇 clone what you need BEFORE moving config
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = logo_cache::warmup_logo_cache(&client_for_warmup, &logo_url).await {
            eprintln!("Failed to warmup logo cache: {:?}", e);
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(client.clone()))
            .service(index)
            // Payslip endpoints with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
