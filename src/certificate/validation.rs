//! Input validation for certificate requests.
//!
//! Checks run in a fixed order and stop at the first failure, so a client
//! always gets exactly one field-specific error back.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::model::{CertificatePayload, CertificateRequest};

pub const REQUIRED_FIELDS: [&str; 5] = [
    "name",
    "email",
    "gstNumber",
    "businessName",
    "businessAddress",
];

pub const MAX_EMAIL_LENGTH: usize = 254;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .unwrap();

    // 2 digit state code, 10 character PAN, entity number, 'Z', checksum
    static ref GST_RE: Regex =
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").unwrap();
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed, `None` for whole-payload checks
    pub field: Option<&'static str>,
    /// Short error title returned as `error`
    pub error: String,
    /// Longer explanation returned as `message`
    pub message: Option<String>,
    /// Field list returned when required fields are missing
    pub required: Option<Vec<&'static str>>,
}

impl ValidationError {
    pub fn new(field: &'static str, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            error: error.into(),
            message: Some(message.into()),
            required: None,
        }
    }

    pub fn missing_fields() -> Self {
        Self {
            field: None,
            error: "Missing required fields".to_string(),
            message: None,
            required: Some(REQUIRED_FIELDS.to_vec()),
        }
    }

    pub fn not_strings() -> Self {
        Self {
            field: None,
            error: "All fields must be strings".to_string(),
            message: None,
            required: None,
        }
    }

    pub fn invalid_name() -> Self {
        Self::new(
            "name",
            "Invalid name",
            "Name must be between 2 and 100 characters",
        )
    }

    pub fn invalid_email() -> Self {
        Self::new(
            "email",
            "Invalid email format",
            "Please provide a valid email address",
        )
    }

    pub fn invalid_gst_number() -> Self {
        Self::new(
            "gstNumber",
            "Invalid GST number format",
            "GST number must be in format: 22AAAAA0000A1Z5 (e.g., 29ABCDE1234F1Z5)",
        )
    }

    pub fn invalid_business_name() -> Self {
        Self::new(
            "businessName",
            "Invalid business name",
            "Business name must be between 2 and 200 characters",
        )
    }

    pub fn invalid_business_address() -> Self {
        Self::new(
            "businessAddress",
            "Invalid business address",
            "Business address must be between 10 and 500 characters",
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = self.field {
            write!(f, "[{}] ", field)?;
        }
        write!(f, "{}", self.error)?;
        if let Some(ref message) = self.message {
            write!(f, ". {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Field checks
// ============================================================================

/// Whitespace as browsers and JSON clients trim it: Unicode `Zs`, the line
/// terminators, tab, vertical tab, form feed and the byte order mark.
/// NEL (U+0085) is not part of the set.
pub fn is_trim_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

pub fn trim_whitespace(value: &str) -> &str {
    value.trim_matches(is_trim_whitespace)
}

/// Length in UTF-16 code units, so an astral character counts as two.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn trimmed_len_between(value: &str, min: usize, max: usize) -> bool {
    let len = utf16_len(trim_whitespace(value));
    len >= min && len <= max
}

pub fn is_valid_name(name: &str) -> bool {
    trimmed_len_between(name, 2, 100)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email) && utf16_len(email) <= MAX_EMAIL_LENGTH
}

/// Indian GSTIN shape check. Case sensitive: lower-case letters are rejected.
pub fn is_valid_gst_number(gst: &str) -> bool {
    GST_RE.is_match(gst)
}

pub fn is_valid_business_name(business_name: &str) -> bool {
    trimmed_len_between(business_name, 2, 200)
}

pub fn is_valid_business_address(address: &str) -> bool {
    trimmed_len_between(address, 10, 500)
}

/// A value counts as absent when it is missing, null, or falsy.
fn is_blank(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

fn as_string(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

impl CertificatePayload {
    fn fields(&self) -> [&Option<Value>; 5] {
        [
            &self.name,
            &self.email,
            &self.gst_number,
            &self.business_name,
            &self.business_address,
        ]
    }

    /// Run every check in order and return the typed request on success.
    pub fn validate(&self) -> Result<CertificateRequest, ValidationError> {
        if self.fields().iter().any(|value| is_blank(value)) {
            return Err(ValidationError::missing_fields());
        }

        let (name, email, gst_number, business_name, business_address) = match (
            as_string(&self.name),
            as_string(&self.email),
            as_string(&self.gst_number),
            as_string(&self.business_name),
            as_string(&self.business_address),
        ) {
            (Some(a), Some(b), Some(c), Some(d), Some(e)) => (a, b, c, d, e),
            _ => return Err(ValidationError::not_strings()),
        };

        if !is_valid_name(&name) {
            return Err(ValidationError::invalid_name());
        }
        if !is_valid_email(&email) {
            return Err(ValidationError::invalid_email());
        }
        if !is_valid_gst_number(&gst_number) {
            return Err(ValidationError::invalid_gst_number());
        }
        if !is_valid_business_name(&business_name) {
            return Err(ValidationError::invalid_business_name());
        }
        if !is_valid_business_address(&business_address) {
            return Err(ValidationError::invalid_business_address());
        }

        Ok(CertificateRequest {
            name,
            email,
            gst_number,
            business_name,
            business_address,
        })
    }
}
