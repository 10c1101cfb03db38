//! Renderer module - turns certificate data into PDF and JPEG files.
//!
//! - `template` - HTML template loading and placeholder substitution
//! - `engine` - headless Chromium driver and JPEG conversion

pub mod engine;
pub mod template;

pub use engine::ChromiumRenderEngine;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::certificate::model::CertificateData;

/// Errors that can occur while rendering a certificate.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load certificate template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write certificate HTML: {0}")]
    WriteHtml(#[source] std::io::Error),
    #[error("cannot build a file URL for {0}")]
    PageUrl(String),
    #[error("failed to create output directory: {0}")]
    OutputDir(#[source] std::io::Error),
    #[error("failed to launch browser: {0}")]
    BrowserIo(#[source] std::io::Error),
    #[error("browser exited with status {code}: {stderr}")]
    BrowserExit { code: i32, stderr: String },
    #[error("browser did not finish within {0} seconds")]
    Timeout(u64),
    #[error("failed to read rendered output: {0}")]
    ReadOutput(#[source] std::io::Error),
    #[error("failed to write rendered output: {0}")]
    WriteOutput(#[source] std::io::Error),
    #[error("failed to convert screenshot to JPEG: {0}")]
    Image(#[from] image::ImageError),
    #[error("image conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Paths of the files produced for one certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCertificate {
    pub pdf_path: PathBuf,
    pub jpg_path: PathBuf,
}

impl RenderedCertificate {
    pub fn pdf_path_string(&self) -> String {
        self.pdf_path.display().to_string()
    }

    pub fn jpg_path_string(&self) -> String {
        self.jpg_path.display().to_string()
    }
}

#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    async fn render(&self, data: &CertificateData) -> Result<RenderedCertificate, RenderError>;
}
