use std::sync::Arc;

use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpResponse, web};

use crate::config::AppConfig;
use crate::conversion::ConversionService;
use crate::error::ErrorBody;
use crate::handler;
use crate::store::TransactionStore;
use crate::treasury::RateFeed;

pub const TRANSACTIONS_PATH: &str = "/transactions";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub conversions: ConversionService,
    pub date_format: String,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn TransactionStore>,
        feed: Arc<dyn RateFeed>,
    ) -> Self {
        Self {
            conversions: ConversionService::new(store.clone(), feed),
            store,
            date_format: config.date_format.clone(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource(TRANSACTIONS_PATH).route(web::post().to(handler::store_transaction)),
        )
        .service(
            web::resource(format!("{TRANSACTIONS_PATH}/{{id}}/exchange-rate/{{country}}"))
                .route(web::get().to(handler::retrieve_converted_transaction)),
        );
}

/// Malformed bodies get the same `{"error": ...}` shape as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorBody {
            error: err.to_string(),
        };
        log::info!("transaction refused. StatusCode 400: {err}");
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("X-XSS-Protection", "1; mode=block"))
        .add(("Referrer-Policy", "no-referrer"))
}

/// Any origin may call the API; preflights for other methods or headers
/// are refused.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(["GET", "POST"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
