//! Certificate record persistence

use async_trait::async_trait;
use postgrest::Postgrest;
use thiserror::Error;

use crate::certificate::model::CertificateRecord;
use crate::config::SupabaseConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize certificate record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("request to database failed: {0}")]
    Request(String),
    #[error("database rejected insert with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Write-once storage for issued certificates.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    async fn save_certificate_record(&self, record: &CertificateRecord) -> Result<(), StoreError>;
}

/// Inserts certificate rows through the Supabase PostgREST API.
pub struct SupabaseCertificateStore {
    client: Postgrest,
    table: String,
}

impl SupabaseCertificateStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = Postgrest::new(config.rest_url())
            .insert_header("apikey", &config.supabase_key)
            .insert_header("Authorization", format!("Bearer {}", config.supabase_key));

        Self {
            client,
            table: config.table.clone(),
        }
    }
}

#[async_trait]
impl CertificateStore for SupabaseCertificateStore {
    async fn save_certificate_record(&self, record: &CertificateRecord) -> Result<(), StoreError> {
        let body = serde_json::to_string(&[record])?;

        let response = self
            .client
            .from(&self.table)
            .insert(body)
            .execute()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("Certificate record saved to table '{}'", self.table);
        Ok(())
    }
}
