//! Certificate template helpers.

use std::path::{Path, PathBuf};

use chrono::Utc;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::certificate::model::CertificateData;

pub const TEMPLATE_FILE: &str = "certificate.html";

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{\{(NAME|EMAIL|GST_NUMBER|BUSINESS_NAME|BUSINESS_ADDRESS)\}\}").unwrap();
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

pub fn default_template_path() -> PathBuf {
    get_static_dir().join(TEMPLATE_FILE)
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Substitute every placeholder in the template with the escaped field value.
///
/// Runs in a single pass over the template, so placeholder text inside a
/// field value is emitted literally.
pub fn fill_template(template: &str, data: &CertificateData) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let value = match &caps[1] {
                "NAME" => &data.name,
                "EMAIL" => &data.email,
                "GST_NUMBER" => &data.gst_number,
                "BUSINESS_NAME" => &data.business_name,
                _ => &data.business_address,
            };
            escape_html(value)
        })
        .into_owned()
}

/// Unique file stem for a render, e.g. `certificate-1760486400000-3f2a9c1b`.
pub fn output_stem() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("certificate-{}-{}", millis, &suffix[..8])
}
