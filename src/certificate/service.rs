//! The issuing pipeline: render, persist, email.
//!
//! Stages run strictly in sequence. A failure stops the pipeline but does not
//! undo earlier stages, so a record may exist for a certificate whose email
//! was never delivered.

use thiserror::Error;

use super::model::{CertificateData, CertificateRecord};
use crate::db::{AppState, StoreError};
use crate::email::EmailError;
use crate::renderer::RenderError;

/// Stage failures. `Display` is the client-facing message; the cause is only
/// logged.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to generate certificate")]
    Render(#[source] RenderError),
    #[error("Failed to save certificate record")]
    Store(#[source] StoreError),
    #[error("Failed to send email")]
    Email(#[source] EmailError),
}

impl ProcessError {
    pub fn stage(&self) -> &'static str {
        match self {
            ProcessError::Render(_) => "render",
            ProcessError::Store(_) => "store",
            ProcessError::Email(_) => "email",
        }
    }

    pub fn cause(&self) -> String {
        match self {
            ProcessError::Render(e) => e.to_string(),
            ProcessError::Store(e) => e.to_string(),
            ProcessError::Email(e) => e.to_string(),
        }
    }
}

pub async fn issue_certificate(
    state: &AppState,
    data: CertificateData,
) -> Result<CertificateRecord, ProcessError> {
    log::info!("Generating certificate for {}", data.email);
    let rendered = state
        .renderer
        .render(&data)
        .await
        .map_err(ProcessError::Render)?;

    log::info!("Certificate generated, saving to database...");
    let record = CertificateRecord::new(
        &data,
        rendered.pdf_path_string(),
        rendered.jpg_path_string(),
    );
    state
        .store
        .save_certificate_record(&record)
        .await
        .map_err(ProcessError::Store)?;

    log::info!("Sending email to {}...", data.email);
    state
        .mailer
        .send_certificate(&data.email, &data.name, &rendered.pdf_path, &rendered.jpg_path)
        .await
        .map_err(ProcessError::Email)?;

    log::info!("Certificate generated, saved, and emailed successfully");
    Ok(record)
}
