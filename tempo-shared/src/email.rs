/// Outbound email
///
/// Two notification kinds leave the system: task reminders and project
/// invitations. Delivery goes through SMTP via lettre. When the SMTP
/// environment variables are absent the mailer runs disabled and logs what
/// it would have sent, so local setups don't need a relay.

use chrono::{DateTime, Utc};
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl Mailer {
    /// Builds a mailer from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD`, and `SMTP_FROM`. Without `SMTP_HOST` the mailer is
    /// disabled.
    pub fn from_env() -> Result<Self, MailError> {
        let from: Mailbox = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| "Tempo <no-reply@tempo.local>".to_string())
            .parse()?;

        let Ok(host) = std::env::var("SMTP_HOST") else {
            info!("SMTP_HOST not set, email delivery disabled");
            return Ok(Self {
                transport: None,
                from,
            });
        };

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?.port(port);

        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        info!(host = %host, port, "SMTP transport configured");

        Ok(Self {
            transport: Some(builder.build()),
            from,
        })
    }

    /// A mailer that never sends, for tests
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from: Mailbox::new(None, "no-reply@tempo.local".parse().unwrap()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends a reminder that a task is due
    pub async fn send_task_reminder(
        &self,
        to: &str,
        recipient_name: &str,
        task_title: &str,
        start_time: DateTime<Utc>,
    ) -> Result<(), MailError> {
        let subject = format!("Reminder: {}", task_title);
        let body = format!(
            "<p>Hi {},</p>\
             <p>Your task <strong>{}</strong> is scheduled for {}.</p>\
             <p>&mdash; Tempo</p>",
            recipient_name,
            task_title,
            start_time.format("%Y-%m-%d %H:%M UTC"),
        );

        self.send(to, &subject, &body).await
    }

    /// Sends a project invitation notice
    pub async fn send_project_invitation(
        &self,
        to: &str,
        inviter_name: &str,
        project_name: &str,
        frontend_url: &str,
    ) -> Result<(), MailError> {
        let subject = format!("{} added you to {}", inviter_name, project_name);
        let body = format!(
            "<p>{} added you to the project <strong>{}</strong>.</p>\
             <p><a href=\"{}\">Open Tempo</a> to see the board.</p>",
            inviter_name, project_name, frontend_url,
        );

        self.send(to, &subject, &body).await
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            debug!(to, subject, "email delivery disabled, dropping message");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?;

        transport.send(message).await?;
        debug!(to, subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mailer_drops_silently() {
        let mailer = Mailer::disabled();
        assert!(!mailer.is_enabled());

        let result = mailer
            .send_task_reminder("user@example.com", "Sam", "Write report", Utc::now())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_mailer_still_validates_nothing() {
        // No transport, so even a bad address is never parsed
        let mailer = Mailer::disabled();
        let result = mailer
            .send_project_invitation("not-an-address", "Sam", "Launch", "http://localhost")
            .await;
        assert!(result.is_ok());
    }
}
