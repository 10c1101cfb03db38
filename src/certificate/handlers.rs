use actix_web::{error, web, Either, HttpRequest, HttpResponse, Responder};

use super::model::{CertificatePayload, CertificateResponse};
use super::service::issue_certificate;
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    post,
    path = "/api/certificate/generate",
    tag = "Certificate",
    request_body(
        content = CertificatePayload,
        description = "JSON object or URL-encoded form with the five certificate fields"
    ),
    responses(
        (status = 200, description = "Certificate generated, saved and emailed", body = CertificateResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Rendering, persistence or email failed", body = ErrorResponse)
    )
)]
pub async fn generate_certificate(
    state: web::Data<AppState>,
    payload: Either<web::Json<CertificatePayload>, web::Form<CertificatePayload>>,
) -> impl Responder {
    let payload = match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    let request = match payload.validate() {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected certificate request: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::from(e));
        }
    };

    log::info!("All validations passed. Generating certificate...");

    match issue_certificate(&state, request.normalize()).await {
        Ok(record) => HttpResponse::Ok().json(CertificateResponse::issued(&record)),
        Err(e) => {
            log::error!(
                "Certificate pipeline failed at {} stage: {}",
                e.stage(),
                e.cause()
            );
            HttpResponse::InternalServerError().json(
                ErrorResponse::new("Failed to process certificate").with_message(e.to_string()),
            )
        }
    }
}

/// Malformed bodies get the same JSON error shape as validation failures.
///
/// When neither the JSON nor the form extractor accepts a body, actix reports
/// the JSON error, so an unsupported content type also ends up here.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let body = match &err {
        error::JsonPayloadError::ContentType => {
            log::warn!("Rejected request body with unsupported content type");
            ErrorResponse::new("Invalid request body").with_message(
                "Expected application/json or application/x-www-form-urlencoded",
            )
        }
        _ => {
            log::warn!("Rejected malformed JSON payload: {}", err);
            ErrorResponse::new("Invalid JSON payload").with_message(err.to_string())
        }
    };
    let response = HttpResponse::BadRequest().json(body);
    error::InternalError::from_response(err, response).into()
}

fn form_error_handler(err: error::UrlencodedError, _req: &HttpRequest) -> error::Error {
    log::warn!("Rejected malformed form payload: {}", err);
    let response = HttpResponse::BadRequest()
        .json(ErrorResponse::new("Invalid form payload").with_message(err.to_string()));
    error::InternalError::from_response(err, response).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/certificate")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .route("/generate", web::post().to(generate_certificate)),
    );
}
