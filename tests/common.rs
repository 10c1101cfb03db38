use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use gst_certificate_server::certificate::model::{CertificateData, CertificateRecord};
use gst_certificate_server::db::{AppState, CertificateStore, StoreError};
use gst_certificate_server::email::{EmailError, Mailer};
use gst_certificate_server::renderer::{CertificateRenderer, RenderError, RenderedCertificate};

pub const PDF_PATH: &str = "output/certificate-1760486400000-0a1b2c3d.pdf";
pub const JPG_PATH: &str = "output/certificate-1760486400000-0a1b2c3d.jpeg";

/// Which stage, if any, should fail.
#[derive(Clone, Copy, PartialEq, Default)]
pub enum FailAt {
    #[default]
    Nothing,
    Render,
    Store,
    Email,
}

/// Mock implementation of CertificateRenderer for testing
pub struct MockRenderer {
    fail: bool,
    rendered: tokio::sync::Mutex<Vec<CertificateData>>,
}

#[async_trait]
impl CertificateRenderer for MockRenderer {
    async fn render(&self, data: &CertificateData) -> Result<RenderedCertificate, RenderError> {
        self.rendered.lock().await.push(data.clone());
        if self.fail {
            return Err(RenderError::BrowserExit {
                code: 1,
                stderr: "chromium crashed".to_string(),
            });
        }
        Ok(RenderedCertificate {
            pdf_path: PathBuf::from(PDF_PATH),
            jpg_path: PathBuf::from(JPG_PATH),
        })
    }
}

/// Mock implementation of CertificateStore for testing
pub struct MockStore {
    fail: bool,
    records: tokio::sync::Mutex<Vec<CertificateRecord>>,
}

#[async_trait]
impl CertificateStore for MockStore {
    async fn save_certificate_record(&self, record: &CertificateRecord) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Request("connection refused".to_string()));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Mock implementation of Mailer for testing
pub struct MockMailer {
    fail: bool,
    sent: tokio::sync::Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_certificate(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        pdf_path: &Path,
        _jpg_path: &Path,
    ) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Attachment {
                path: pdf_path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        self.sent
            .lock()
            .await
            .push((recipient_email.to_string(), recipient_name.to_string()));
        Ok(())
    }
}

pub struct TestServices {
    pub renderer: Arc<MockRenderer>,
    pub store: Arc<MockStore>,
    pub mailer: Arc<MockMailer>,
}

impl TestServices {
    pub fn new(fail_at: FailAt) -> Self {
        Self {
            renderer: Arc::new(MockRenderer {
                fail: fail_at == FailAt::Render,
                rendered: tokio::sync::Mutex::new(Vec::new()),
            }),
            store: Arc::new(MockStore {
                fail: fail_at == FailAt::Store,
                records: tokio::sync::Mutex::new(Vec::new()),
            }),
            mailer: Arc::new(MockMailer {
                fail: fail_at == FailAt::Email,
                sent: tokio::sync::Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new_with_services(
            self.renderer.clone(),
            self.store.clone(),
            self.mailer.clone(),
        )
    }

    pub async fn rendered(&self) -> Vec<CertificateData> {
        self.renderer.rendered.lock().await.clone()
    }

    pub async fn records(&self) -> Vec<CertificateRecord> {
        self.store.records.lock().await.clone()
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.mailer.sent.lock().await.clone()
    }
}

pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "  Asha Verma  ",
        "email": "Asha.Verma@Example.com",
        "gstNumber": "29ABCDE1234F1Z5",
        "businessName": " Verma Traders ",
        "businessAddress": "12 MG Road, Bengaluru, Karnataka 560001"
    })
}
