use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use documo_core::SmtpConfig;

use super::{MailOutcome, Mailer};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("Invalid SMTP_FROM address: {}", e))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_document_invalidated(
        &self,
        to: &str,
        reason: &str,
        upload_url: &str,
    ) -> MailOutcome {
        let recipient = match to.parse::<Mailbox>() {
            Ok(mailbox) => mailbox,
            Err(e) => return MailOutcome::failed(format!("Invalid recipient address: {}", e)),
        };

        let body = format!(
            "One of the documents you submitted was refused.\n\n\
             Reason: {}\n\n\
             Please upload a replacement here:\n{}\n",
            reason, upload_url
        );

        let message = match Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject("A document you submitted needs to be replaced")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
        {
            Ok(message) => message,
            Err(e) => return MailOutcome::failed(format!("Failed to build email: {}", e)),
        };

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::debug!(to = %to, "Invalidation email sent");
                MailOutcome::sent()
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "Invalidation email send failed");
                MailOutcome::failed(e.to_string())
            }
        }
    }
}
