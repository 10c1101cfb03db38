use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod db;
pub mod email;
pub mod health;
pub mod renderer;

pub use crate::db::AppState;

use crate::certificate::ValidationError;
use crate::config::AppConfig;

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message: None,
            required: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_required(mut self, fields: &[&str]) -> Self {
        self.required = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        let mut response = Self::new(&err.error);
        if let Some(message) = err.message {
            response = response.with_message(message);
        }
        if let Some(required) = err.required {
            response = response.with_required(&required);
        }
        response
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::handlers::generate_certificate,
        crate::health::index,
        crate::health::health
    ),
    components(
        schemas(
            certificate::model::CertificatePayload,
            certificate::model::CertificateResponse,
            certificate::model::CertificateResponseData,
            certificate::model::CertificateFiles,
            certificate::model::CertificateRecord,
            health::IndexResponse,
            health::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Certificate", description = "Certificate generation endpoint."),
        (name = "Health", description = "Service status endpoints.")
    )
)]
pub struct ApiDoc;

fn cors_for(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, check your .env file: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new_with_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialize certificate services: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("gst_certificate_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors_for(&origins))
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(health::config)
            .service(web::scope("/api").configure(certificate::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
