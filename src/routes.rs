use crate::{api::payslip, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let inspect_limiter = Arc::new(build_limiter(config.rate_inspect_per_min));
    // zip generation is the expensive path, keep its limit tighter
    let generate_limiter = Arc::new(build_limiter(config.rate_generate_per_min));

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/payslips")
                // /payslips/inspect
                .service(
                    web::resource("/inspect")
                        .wrap(inspect_limiter.clone())
                        .route(web::post().to(payslip::inspect)),
                )
                // /payslips/generate
                .service(
                    web::resource("/generate")
                        .wrap(generate_limiter.clone())
                        .route(web::post().to(payslip::generate)),
                ),
        ),
    );
}
