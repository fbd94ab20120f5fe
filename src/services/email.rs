//! Email service for circulation notices and the contact form

use chrono::{DateTime, Utc};
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Tell a member their reserved book is ready for pickup
    pub async fn send_reservation_available(
        &self,
        to: &str,
        book_title: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let subject = format!("'{}' is ready for pickup", book_title);
        let deadline = expiry
            .map(|e| format!("Please collect it before {}.", e.format("%B %e, %Y")))
            .unwrap_or_else(|| "Please collect it at your earliest convenience.".to_string());
        let body = format!(
            r#"
Good news! The book you reserved is now available at the circulation desk:

    {book_title}

{deadline}

If you no longer need the book, please cancel your reservation so the next
person in the queue can collect it.
"#
        );

        self.send_email(to, &subject, &body).await
    }

    /// Relay a contact form submission to the library inbox
    pub async fn send_contact_message(
        &self,
        name: &str,
        reply_to: &str,
        subject: &str,
        message: &str,
    ) -> AppResult<()> {
        let body = format!(
            r#"
Contact form submission from {name} <{reply_to}>:

{message}
"#
        );
        let subject = format!("[Contact] {}", subject);

        self.send_email(&self.config.library_address, &subject, &body)
            .await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("University Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
