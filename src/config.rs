//! Environment-driven configuration.
//!
//! Values are read from the process environment after `.env` has been loaded
//! with `dotenvy`. Secrets have no defaults; everything else does.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub table: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_key: required("SUPABASE_KEY")?,
            table: optional("SUPABASE_TABLE").unwrap_or_else(|| "certificates".to_string()),
        })
    }

    /// PostgREST base URL for the project.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url.trim_end_matches('/'))
    }
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
}

// Hand-written so the password never ends up in logs.
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port: parsed("SMTP_PORT", 587)?,
            username: required("EMAIL_USER")?,
            password: required("EMAIL_PASS")?,
            from_name: optional("EMAIL_FROM_NAME")
                .unwrap_or_else(|| "Certificate System".to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub chrome_executable: String,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub jpeg_quality: u8,
    pub timeout: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            chrome_executable: "chromium".to_string(),
            template_path: crate::renderer::template::default_template_path(),
            output_dir: PathBuf::from("output"),
            viewport_width: 1200,
            viewport_height: 800,
            jpeg_quality: 90,
            timeout: Duration::from_secs(60),
        }
    }
}

impl RendererConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            chrome_executable: optional("CHROME_EXECUTABLE_PATH")
                .or_else(|| optional("PUPPETEER_EXECUTABLE_PATH"))
                .unwrap_or(defaults.chrome_executable),
            template_path: optional("CERTIFICATE_TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_path),
            output_dir: optional("CERTIFICATE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            timeout: Duration::from_secs(parsed("RENDER_TIMEOUT_SECS", 60)?),
            ..defaults
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub supabase: SupabaseConfig,
    pub smtp: SmtpConfig,
    pub renderer: RendererConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 3000)?,
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),
            supabase: SupabaseConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            renderer: RendererConfig::from_env()?,
        })
    }
}

/// Split a comma separated origin list, dropping blanks.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
