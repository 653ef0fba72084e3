use crate::notify::{ALERT_SUBJECT, Notifier};
use crate::variable::SmtpConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// 通过 SMTP 发送告警邮件，发件人为 smtp 用户
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .context("Failed to create SMTP transport")?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();

        Ok(Self {
            transport,
            from: config.user.clone(),
        })
    }

    /// 构造一封发给全部收件人的纯文本邮件
    fn build_message(&self, recipients: &[String], message: &str) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("Invalid from email address '{}'", self.from))?;

        let mut builder = Message::builder().from(from).subject(ALERT_SUBJECT);
        for recipient in recipients {
            let to: Mailbox = recipient
                .parse()
                .with_context(|| format!("Invalid recipient email address '{}'", recipient))?;
            builder = builder.to(to);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .context("Failed to build email message")
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, recipients: &[String], message: &str) -> Result<()> {
        if recipients.is_empty() {
            return Ok(());
        }

        let email = self.build_message(recipients, message)?;
        self.transport
            .send(email)
            .await
            .context("Failed to send email via SMTP")?;

        tracing::info!(recipients = recipients.len(), "alert email sent");
        Ok(())
    }

    fn channel_type(&self) -> &str {
        "email"
    }
}
