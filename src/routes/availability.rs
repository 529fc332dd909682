use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::AvailabilityFilter;
use crate::models::{ErrorResponse, FilterRequest, FilterResponse, HealthResponse, AVAILABILITY_FACET};
use crate::services::InMemoryCatalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub filter: AvailabilityFilter,
}

/// Configure availability facet routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/facets/types", web::get().to(facet_types))
        .route("/availability/filter", web::post().to(filter_availability));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        products: state.catalog.product_count(),
    })
}

/// Facet types this service registers
async fn facet_types() -> impl Responder {
    HttpResponse::Ok().json([AVAILABILITY_FACET])
}

/// Availability filter endpoint
///
/// POST /api/v1/availability/filter
///
/// Request body:
/// ```json
/// {
///   "selectedValues": ["2021-03-01", "2021-03-03", 2],
///   "candidates": [10, 11, 12]
/// }
/// ```
async fn filter_availability(
    state: web::Data<AppState>,
    req: web::Json<FilterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for availability request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let selection = req.selection();
    let candidates = req
        .candidates
        .as_deref()
        .unwrap_or_else(|| state.catalog.post_ids());

    tracing::info!(
        "Filtering {} candidates for {} ({} persons)",
        candidates.len(),
        selection.label(),
        selection.quantity
    );

    let result = state.filter.filter(&*state.catalog, candidates, &selection);

    HttpResponse::Ok().json(FilterResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
        checked: result.checked,
        engine_errors: result.engine_errors,
        truncated: result.truncated,
        selection_label: selection.label(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    const CATALOG: &str = r#"
[[posts]]
id = 1
post_type = "product"

[posts.product]
product_type = "booking"

[[posts]]
id = 2
post_type = "product"

[posts.product]
product_type = "simple"

[[posts]]
id = 3
post_type = "product"

[posts.product]
product_type = "accommodation-booking"
"#;

    fn state() -> AppState {
        AppState {
            catalog: Arc::new(InMemoryCatalog::from_toml_str(CATALOG).unwrap()),
            filter: AvailabilityFilter::new(),
        }
    }

    #[actix_web::test]
    async fn test_filter_defaults_to_all_posts() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/availability/filter")
            .set_json(serde_json::json!({ "selectedValues": ["2021-03-01", "2021-03-03", 2] }))
            .to_request();
        let resp: FilterResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches, vec![1, 3]);
        assert_eq!(resp.total_candidates, 3);
        assert_eq!(resp.selection_label, "2021-03-01 - 2021-03-03");
    }

    #[actix_web::test]
    async fn test_validation_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/availability/filter")
            .set_json(serde_json::json!({ "selectedValues": ["a", "b", 1, 2] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_facet_types() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::get().uri("/facets/types").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body[0]["name"], "availability");
        assert_eq!(body[0]["label"], "Availability");
    }
}
