//! Headless Chromium rendering engine.
//!
//! Handles writing the filled HTML template to a temporary directory, invoking
//! the browser for the PDF and the screenshot, and re-encoding the screenshot
//! as JPEG.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use tempfile::tempdir;
use tokio::process::Command;
use url::Url;

use super::template::{fill_template, output_stem};
use super::{CertificateRenderer, RenderError, RenderedCertificate};
use crate::certificate::model::CertificateData;
use crate::config::RendererConfig;

const BROWSER_ARGS: [&str; 7] = [
    "--headless",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--hide-scrollbars",
    "--run-all-compositor-stages-before-draw",
];

// Gives web fonts and images in the template time to settle before capture.
const VIRTUAL_TIME_BUDGET_MS: u32 = 5000;

/// Renders certificates by driving a headless Chromium binary.
pub struct ChromiumRenderEngine {
    config: RendererConfig,
    template: String,
}

impl ChromiumRenderEngine {
    /// Create an engine, loading the template from `config.template_path`.
    pub fn new(config: RendererConfig) -> Result<Self, RenderError> {
        let template =
            std::fs::read_to_string(&config.template_path).map_err(RenderError::TemplateIo)?;
        Ok(Self::with_template(config, template))
    }

    pub fn with_template(config: RendererConfig, template: String) -> Self {
        Self { config, template }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Arguments shared by both browser invocations.
    fn base_args(&self) -> Vec<String> {
        let mut args: Vec<String> = BROWSER_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(format!(
            "--window-size={},{}",
            self.config.viewport_width, self.config.viewport_height
        ));
        args.push(format!("--virtual-time-budget={}", VIRTUAL_TIME_BUDGET_MS));
        args
    }

    pub fn pdf_args(&self, pdf_path: &Path, page_url: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.push("--no-pdf-header-footer".to_string());
        args.push(format!("--print-to-pdf={}", pdf_path.display()));
        args.push(page_url.to_string());
        args
    }

    pub fn screenshot_args(&self, png_path: &Path, page_url: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.push(format!("--screenshot={}", png_path.display()));
        args.push(page_url.to_string());
        args
    }

    async fn run_browser(&self, args: Vec<String>) -> Result<(), RenderError> {
        log::debug!("Running {} {}", self.config.chrome_executable, args.join(" "));

        let child = Command::new(&self.config.chrome_executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RenderError::BrowserIo)?;

        let output = child
            .wait_with_output()
            .await
            .map_err(RenderError::BrowserIo)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::BrowserExit { code, stderr });
        }

        Ok(())
    }

    async fn render_files(&self, data: &CertificateData) -> Result<RenderedCertificate, RenderError> {
        let html = fill_template(&self.template, data);

        // Temp directory holds the page and the raw PNG; dropped on return
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let html_path = temp_dir.path().join("certificate.html");
        tokio::fs::write(&html_path, html)
            .await
            .map_err(RenderError::WriteHtml)?;
        let page_url = file_url(&html_path)?;

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(RenderError::OutputDir)?;

        let stem = output_stem();
        let pdf_path = self.config.output_dir.join(format!("{}.pdf", stem));
        let jpg_path = self.config.output_dir.join(format!("{}.jpeg", stem));

        self.run_browser(self.pdf_args(&absolute(&pdf_path), &page_url))
            .await?;

        let png_path = temp_dir.path().join("certificate.png");
        self.run_browser(self.screenshot_args(&png_path, &page_url))
            .await?;

        let png = tokio::fs::read(&png_path)
            .await
            .map_err(RenderError::ReadOutput)?;
        let quality = self.config.jpeg_quality;
        let jpeg = tokio::task::spawn_blocking(move || png_to_jpeg(&png, quality)).await??;
        tokio::fs::write(&jpg_path, jpeg)
            .await
            .map_err(RenderError::WriteOutput)?;

        Ok(RenderedCertificate { pdf_path, jpg_path })
    }
}

#[async_trait]
impl CertificateRenderer for ChromiumRenderEngine {
    async fn render(&self, data: &CertificateData) -> Result<RenderedCertificate, RenderError> {
        let timeout = self.config.timeout;
        let rendered = tokio::time::timeout(timeout, self.render_files(data))
            .await
            .map_err(|_| RenderError::Timeout(timeout.as_secs()))??;

        log::info!(
            "Certificate generated successfully: pdf={} jpg={}",
            rendered.pdf_path.display(),
            rendered.jpg_path.display()
        );
        Ok(rendered)
    }
}

/// Re-encode a PNG screenshot as JPEG at the given quality.
pub fn png_to_jpeg(png: &[u8], quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = image::load_from_memory(png)?.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
    Ok(out.into_inner())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Percent-encoded `file://` URL, so spaces, `#` and `%` in the temp path
/// reach the browser intact.
fn file_url(path: &Path) -> Result<String, RenderError> {
    let path = absolute(path);
    Url::from_file_path(&path)
        .map(String::from)
        .map_err(|_| RenderError::PageUrl(path.display().to_string()))
}
