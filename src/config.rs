use std::env;
use dotenvy::dotenv;
#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    /// Remote company logo drawn on every payslip.
    pub logo_url: String,

    // Payslip footer contact block
    pub footer_website: String,
    pub footer_email: String,
    pub footer_phone: String,

    // Rate limiting
    pub rate_inspect_per_min: u32,
    pub rate_generate_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),

            logo_url: env::var("LOGO_URL").unwrap_or_else(|_| {
                "https://raw.githubusercontent.com/Music-Admin/mini-tools/refs/heads/main/streamlit-apps/logo-large.png"
                    .to_string()
            }),

            footer_website: env::var("FOOTER_WEBSITE")
                .unwrap_or_else(|_| "https://musicadmin.com/".to_string()),
            footer_email: env::var("FOOTER_EMAIL")
                .unwrap_or_else(|_| "hello@musicadmin.com".to_string()),
            footer_phone: env::var("FOOTER_PHONE")
                .unwrap_or_else(|_| "615-200-0122".to_string()),

            rate_inspect_per_min: env::var("RATE_INSPECT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_generate_per_min: env::var("RATE_GENERATE_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
