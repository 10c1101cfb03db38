#[cfg(test)]
mod error_handling_tests {
    use gst_certificate_server::certificate::model::CertificatePayload;
    use gst_certificate_server::certificate::{ProcessError, ValidationError};
    use gst_certificate_server::db::StoreError;
    use gst_certificate_server::renderer::RenderError;
    use gst_certificate_server::ErrorResponse;

    #[test]
    fn test_validation_error_converts_to_response() {
        let response = ErrorResponse::from(ValidationError::invalid_name());
        assert!(!response.success);
        assert_eq!(response.error, "Invalid name");
        assert_eq!(
            response.message.as_deref(),
            Some("Name must be between 2 and 100 characters")
        );
        assert!(response.required.is_none());
    }

    #[test]
    fn test_missing_fields_response_omits_message() {
        let response = ErrorResponse::from(ValidationError::missing_fields());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing required fields");
        assert!(json.get("message").is_none());
        assert_eq!(json["required"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_error_response_round_trips() {
        let response = ErrorResponse::new("Failed to process certificate")
            .with_message("Failed to send email");
        let json = serde_json::to_string(&response).unwrap();
        let deserialized: ErrorResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.error, "Failed to process certificate");
        assert_eq!(deserialized.message.as_deref(), Some("Failed to send email"));
        assert!(chrono::DateTime::parse_from_rfc3339(&deserialized.timestamp).is_ok());
    }

    #[test]
    fn test_process_error_hides_cause_from_display() {
        let err = ProcessError::Store(StoreError::Rejected {
            status: 401,
            body: "secret api key invalid".to_string(),
        });
        assert_eq!(err.to_string(), "Failed to save certificate record");
        assert!(err.cause().contains("401"));
    }

    #[test]
    fn test_render_timeout_message() {
        let err = ProcessError::Render(RenderError::Timeout(60));
        assert_eq!(err.to_string(), "Failed to generate certificate");
        assert_eq!(err.cause(), "browser did not finish within 60 seconds");
    }

    #[test]
    fn test_empty_body_is_missing_fields() {
        let payload: CertificatePayload = serde_json::from_str("{}").unwrap();
        let err = payload.validate().unwrap_err();
        assert_eq!(err, ValidationError::missing_fields());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let payload: CertificatePayload = serde_json::from_str(
            r#"{
                "name": "Asha Verma",
                "email": "asha@example.com",
                "gstNumber": "29ABCDE1234F1Z5",
                "businessName": "Verma Traders",
                "businessAddress": "12 MG Road, Bengaluru",
                "phone": "+91 98450 00000"
            }"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_special_characters_pass_through_validation() {
        let payload: CertificatePayload = serde_json::from_value(serde_json::json!({
            "name": "O'Brien & <Sons>",
            "email": "obrien@example.com",
            "gstNumber": "27AAPFU0939F1ZV",
            "businessName": "Ünïcødé Traders 🚀",
            "businessAddress": "Flat 4B, \"Sunrise\" Apts\nPune"
        }))
        .unwrap();

        let data = payload.validate().unwrap().normalize();
        assert_eq!(data.name, "O'Brien & <Sons>");
        assert_eq!(data.gst_number, "27AAPFU0939F1ZV");
    }
}
