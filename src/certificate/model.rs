use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::validation::trim_whitespace;

/// Raw request body. Fields stay untyped until validation so that a missing
/// field and a field of the wrong type produce different errors.
///
/// Only an object body carries fields. Any other JSON value (array, string,
/// number) yields an empty payload, which then fails the presence check.
#[derive(Debug, Default, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CertificatePayload {
    #[schema(value_type = String, example = "Asha Verma")]
    pub name: Option<Value>,
    #[schema(value_type = String, example = "asha@example.com")]
    pub email: Option<Value>,
    #[schema(value_type = String, example = "29ABCDE1234F1Z5")]
    pub gst_number: Option<Value>,
    #[schema(value_type = String, example = "Verma Traders")]
    pub business_name: Option<Value>,
    #[schema(value_type = String, example = "12 MG Road, Bengaluru, Karnataka 560001")]
    pub business_address: Option<Value>,
}

impl CertificatePayload {
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            name: map.remove("name"),
            email: map.remove("email"),
            gst_number: map.remove("gstNumber"),
            business_name: map.remove("businessName"),
            business_address: map.remove("businessAddress"),
        }
    }
}

impl From<Value> for CertificatePayload {
    fn from(body: Value) -> Self {
        match body {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }
}

// Goes through `Value` so the same impl serves JSON and urlencoded bodies.
impl<'de> Deserialize<'de> for CertificatePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Request fields after the presence and type checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateRequest {
    pub name: String,
    pub email: String,
    pub gst_number: String,
    pub business_name: String,
    pub business_address: String,
}

impl CertificateRequest {
    /// Trim every field, lower-case the email and upper-case the GST number.
    pub fn normalize(&self) -> CertificateData {
        CertificateData {
            name: trim_whitespace(&self.name).to_string(),
            email: trim_whitespace(&self.email).to_lowercase(),
            gst_number: trim_whitespace(&self.gst_number).to_uppercase(),
            business_name: trim_whitespace(&self.business_name).to_string(),
            business_address: trim_whitespace(&self.business_address).to_string(),
        }
    }
}

/// Normalized certificate contents handed to the renderer, store and mailer.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateData {
    pub name: String,
    pub email: String,
    pub gst_number: String,
    pub business_name: String,
    pub business_address: String,
}

/// Row written to the `certificates` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CertificateRecord {
    pub name: String,
    pub email: String,
    pub gst_number: String,
    pub business_name: String,
    pub business_address: String,
    pub pdf_path: String,
    pub jpg_path: String,
}

impl CertificateRecord {
    pub fn new(data: &CertificateData, pdf_path: String, jpg_path: String) -> Self {
        Self {
            name: data.name.clone(),
            email: data.email.clone(),
            gst_number: data.gst_number.clone(),
            business_name: data.business_name.clone(),
            business_address: data.business_address.clone(),
            pdf_path,
            jpg_path,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CertificateFiles {
    pub pdf: String,
    pub jpg: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponseData {
    pub email: String,
    pub gst_number: String,
    pub files: CertificateFiles,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CertificateResponse {
    pub success: bool,
    pub message: String,
    pub data: CertificateResponseData,
}

impl CertificateResponse {
    pub fn issued(record: &CertificateRecord) -> Self {
        Self {
            success: true,
            message: "Certificate generated, saved to database, and sent successfully"
                .to_string(),
            data: CertificateResponseData {
                email: record.email.clone(),
                gst_number: record.gst_number.clone(),
                files: CertificateFiles {
                    pdf: record.pdf_path.clone(),
                    jpg: record.jpg_path.clone(),
                },
            },
        }
    }
}
