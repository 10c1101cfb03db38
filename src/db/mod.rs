//! Database module - AppState and certificate persistence
//!
//! - `certificate` - `CertificateStore` trait and the Supabase-backed store

pub mod certificate;

pub use certificate::{CertificateStore, StoreError, SupabaseCertificateStore};

use std::sync::Arc;

use crate::config::AppConfig;
use crate::email::{Mailer, SmtpMailer};
use crate::renderer::{CertificateRenderer, ChromiumRenderEngine};

/// Shared handles to the three collaborators of the issuing pipeline.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn CertificateRenderer>,
    pub store: Arc<dyn CertificateStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new_with_config(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let renderer = ChromiumRenderEngine::new(config.renderer.clone())?;
        log::info!(
            "Renderer ready: browser={} output_dir={}",
            renderer.config().chrome_executable,
            renderer.config().output_dir.display()
        );

        let store = SupabaseCertificateStore::new(&config.supabase);
        let mailer = SmtpMailer::new(config.smtp.clone())?;

        Ok(Self::new_with_services(
            Arc::new(renderer),
            Arc::new(store),
            Arc::new(mailer),
        ))
    }

    pub fn new_with_services(
        renderer: Arc<dyn CertificateRenderer>,
        store: Arc<dyn CertificateStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            renderer,
            store,
            mailer,
        }
    }
}
