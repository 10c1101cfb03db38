use gst_certificate_server::ApiDoc;
use utoipa::OpenApi;

#[test]
fn test_openapi_lists_all_routes() {
    let doc = ApiDoc::openapi();
    for path in ["/api/certificate/generate", "/", "/health"] {
        assert!(doc.paths.paths.contains_key(path), "missing {}", path);
    }
}

#[test]
fn test_openapi_registers_error_schema() {
    let doc = ApiDoc::openapi();
    let components = doc.components.expect("components should be generated");
    assert!(components.schemas.contains_key("ErrorResponse"));
    assert!(components.schemas.contains_key("CertificatePayload"));
}
