//! Certificate delivery over SMTP.

use std::path::Path;

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::header::{ContentType, ContentTypeErr};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::SmtpConfig;
use crate::renderer::template::escape_html;

pub const PDF_ATTACHMENT_NAME: &str = "certificate.pdf";
pub const JPG_ATTACHMENT_NAME: &str = "certificate.jpeg";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Address(#[from] AddressError),
    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] ContentTypeErr),
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_certificate(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        pdf_path: &Path,
        jpg_path: &Path,
    ) -> Result<(), EmailError>;
}

/// Sends certificates through an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        let from = sender_mailbox(&config)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_certificate(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        pdf_path: &Path,
        jpg_path: &Path,
    ) -> Result<(), EmailError> {
        let pdf = read_attachment(pdf_path).await?;
        let jpg = read_attachment(jpg_path).await?;

        let message = build_certificate_message(
            self.from.clone(),
            recipient_email,
            recipient_name,
            pdf,
            jpg,
        )?;

        let response = self.transport.send(message).await?;
        log::info!(
            "Email sent successfully to {} (SMTP {})",
            recipient_email,
            response.code()
        );
        Ok(())
    }
}

/// `"Certificate System" <EMAIL_USER>`
pub fn sender_mailbox(config: &SmtpConfig) -> Result<Mailbox, EmailError> {
    Ok(Mailbox::new(
        Some(config.from_name.clone()),
        config.username.parse()?,
    ))
}

pub fn certificate_subject(recipient_name: &str) -> String {
    format!("Certificate for {}", recipient_name)
}

pub fn certificate_html_body(recipient_name: &str) -> String {
    format!(
        r#"<h2>Congratulations {}!</h2>
<p>Your certificate has been generated successfully.</p>
<p>Please find your certificate attached in both PDF and JPG formats.</p>
<br>
<p>Best regards,<br>Certificate Generation System</p>
"#,
        escape_html(recipient_name)
    )
}

/// Assemble the HTML message with both rendered files attached.
pub fn build_certificate_message(
    from: Mailbox,
    recipient_email: &str,
    recipient_name: &str,
    pdf: Vec<u8>,
    jpg: Vec<u8>,
) -> Result<Message, EmailError> {
    let to = Mailbox::new(None, recipient_email.parse()?);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(certificate_subject(recipient_name))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(certificate_html_body(recipient_name)))
                .singlepart(
                    Attachment::new(PDF_ATTACHMENT_NAME.to_string())
                        .body(pdf, ContentType::parse("application/pdf")?),
                )
                .singlepart(
                    Attachment::new(JPG_ATTACHMENT_NAME.to_string())
                        .body(jpg, ContentType::parse("image/jpeg")?),
                ),
        )?;

    Ok(message)
}

async fn read_attachment(path: &Path) -> Result<Vec<u8>, EmailError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| EmailError::Attachment {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            from_name: "Certificate System".to_string(),
        }
    }

    #[test]
    fn test_sender_mailbox() {
        let mailbox = sender_mailbox(&smtp_config()).unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Certificate System"));
        assert_eq!(mailbox.email.to_string(), "sender@example.com");
    }

    #[test]
    fn test_sender_mailbox_rejects_bad_username() {
        let config = SmtpConfig {
            username: "not an address".to_string(),
            ..smtp_config()
        };
        assert!(matches!(sender_mailbox(&config), Err(EmailError::Address(_))));
    }

    #[test]
    fn test_html_body_escapes_name() {
        let body = certificate_html_body("<script>x</script>");
        assert!(body.contains("Congratulations &lt;script&gt;x&lt;/script&gt;!"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_build_message_has_subject_and_attachments() {
        let from = sender_mailbox(&smtp_config()).unwrap();
        let message = build_certificate_message(
            from,
            "asha@example.com",
            "Asha Verma",
            b"%PDF-1.7".to_vec(),
            vec![0xFF, 0xD8, 0xFF],
        )
        .unwrap();

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: Certificate for Asha Verma"));
        assert!(raw.contains("To: asha@example.com"));
        assert!(raw.contains(PDF_ATTACHMENT_NAME));
        assert!(raw.contains(JPG_ATTACHMENT_NAME));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("image/jpeg"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let from = sender_mailbox(&smtp_config()).unwrap();
        let result = build_certificate_message(from, "nope", "Asha", Vec::new(), Vec::new());
        assert!(matches!(result, Err(EmailError::Address(_))));
    }

    #[tokio::test]
    async fn test_missing_attachment_is_reported() {
        let err = read_attachment(Path::new("/nonexistent/certificate.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/certificate.pdf"));
    }

    #[tokio::test]
    async fn test_new_mailer_builds_transport() {
        assert!(SmtpMailer::new(smtp_config()).is_ok());
    }
}
