use crate::{api::leave_request, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst are non-zero");
        Governor::new(&cfg)
    }

    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .configure(leave_routes),
    );
}

/// Leave endpoints, relative to the API prefix.
pub fn leave_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/leave")
            .app_data(web::JsonConfig::default().error_handler(leave_request::json_error_handler))
            .app_data(web::PathConfig::default().error_handler(leave_request::path_error_handler))
            // /leave
            .service(
                web::resource("")
                    .route(web::get().to(leave_request::leave_view))
                    .route(web::post().to(leave_request::create_leave)),
            )
            // fixed segments first so they never reach /{id}
            .service(
                web::resource("/history").route(web::get().to(leave_request::leave_history)),
            )
            .service(
                web::resource("/balance").route(web::get().to(leave_request::leave_balance)),
            )
            .service(
                web::resource("/filters")
                    .route(web::get().to(leave_request::get_filters))
                    .route(web::put().to(leave_request::set_filters)),
            )
            // /leave/{id}
            .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
            // /leave/{id}/status
            .service(
                web::resource("/{id}/status").route(web::put().to(leave_request::set_status)),
            )
            // /leave/{id}/approve
            .service(
                web::resource("/{id}/approve")
                    .route(web::put().to(leave_request::approve_leave)),
            )
            // /leave/{id}/reject
            .service(
                web::resource("/{id}/reject").route(web::put().to(leave_request::reject_leave)),
            ),
    );
}
