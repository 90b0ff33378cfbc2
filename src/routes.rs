use crate::api::{attendance, employee};
use crate::error::ApiError;
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::anyhow;

pub type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` requests, refilled evenly over a minute
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<LimiterConfig> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiter: &LimiterConfig) {
    cfg.service(
        web::scope(api_prefix)
            .wrap(Governor::new(limiter)) // rate limiting
            .configure(resources),
    );
}

/// Employee and attendance resources, mounted relative to the API prefix
pub fn resources(cfg: &mut web::ServiceConfig) {
    // extractor failures use the same `{"message": ...}` body as everything else
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );

    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::patch().to(employee::partial_update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::create_attendance)),
            )
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(attendance::get_attendance))
                    .route(web::put().to(attendance::update_attendance))
                    .route(web::patch().to(attendance::partial_update_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemoryStore, services};
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::middleware::NormalizePath;
    use actix_web::web::Data;
    use actix_web::{App, test};
    use serde_json::json;
    use std::net::SocketAddr;

    macro_rules! server_app {
        ($requests_per_min:expr) => {{
            let (registry, ledger) = services(InMemoryStore::shared());
            let limiter = build_limiter($requests_per_min).unwrap();
            test::init_service(
                App::new()
                    .wrap(NormalizePath::trim())
                    .app_data(Data::new(registry))
                    .app_data(Data::new(ledger))
                    .configure(|cfg| configure(cfg, "/api", &limiter)),
            )
            .await
        }};
    }

    fn peer(addr: &str) -> SocketAddr {
        addr.parse().unwrap()
    }

    /// Status of a response, including errors raised by middleware
    async fn status_of<S, R, B>(app: &S, req: R) -> StatusCode
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    {
        match app.call(req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    }

    #[actix_web::test]
    async fn api_is_served_under_prefix_with_trailing_slashes() {
        let app = server_app!(1000);

        let req = test::TestRequest::post()
            .uri("/api/employees/")
            .peer_addr(peer("10.0.0.1:4000"))
            .set_json(json!({ "empId": 7, "fullName": "Jane", "email": "jane@x.com", "department": "Eng" }))
            .to_request();
        assert_eq!(status_of(&app, req).await, StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/attendance/?department=e")
            .peer_addr(peer("10.0.0.1:4000"))
            .to_request();
        assert_eq!(status_of(&app, req).await, StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/employees")
            .peer_addr(peer("10.0.0.1:4000"))
            .to_request();
        assert_eq!(status_of(&app, req).await, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn requests_over_the_quota_are_limited_per_ip() {
        let app = server_app!(1);

        let get = |addr: &str| {
            test::TestRequest::get()
                .uri("/api/employees")
                .peer_addr(peer(addr))
                .to_request()
        };

        assert_eq!(status_of(&app, get("10.0.0.1:4000")).await, StatusCode::OK);
        assert_eq!(
            status_of(&app, get("10.0.0.1:4001")).await,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(status_of(&app, get("10.0.0.2:4000")).await, StatusCode::OK);
    }

    #[::core::prelude::v1::test]
    fn limiter_accepts_configured_rates() {
        assert!(build_limiter(1000).is_ok());
        assert!(build_limiter(120_000).is_ok());
    }

    #[::core::prelude::v1::test]
    fn zero_rate_still_builds_a_limiter() {
        assert!(build_limiter(0).is_ok());
    }
}
