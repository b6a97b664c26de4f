use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("invalid mail message: {0}")]
    InvalidMessage(String),

    #[error("mail transport error: {0}")]
    Transport(String),
}

/// メール送信トランスポート
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// ログ出力のみのトランスポート（開発環境用）
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        // 開発モード: 実際には送信しない
        tracing::info!(to = %to, subject = %subject, "メール送信（開発モード）");
        tracing::debug!("本文: {}", body);
        Ok(())
    }
}

#[cfg(feature = "email")]
pub use smtp::SmtpMailSender;

#[cfg(feature = "email")]
mod smtp {
    use async_trait::async_trait;
    use lettre::message::{Mailbox, header::ContentType};
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

    use super::{MailError, MailSender};

    /// SMTP (STARTTLS) トランスポート
    #[derive(Clone)]
    pub struct SmtpMailSender {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    }

    impl SmtpMailSender {
        pub fn new(
            host: &str,
            port: u16,
            username: &str,
            password: &str,
            from_address: &str,
        ) -> Result<Self, MailError> {
            let from = from_address
                .parse::<Mailbox>()
                .map_err(|e| MailError::InvalidAddress(e.to_string()))?;

            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::Transport(e.to_string()))?
                .port(port)
                .credentials(Credentials::new(username.to_string(), password.to_string()))
                .build();

            Ok(Self { transport, from })
        }
    }

    #[async_trait]
    impl MailSender for SmtpMailSender {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
            let to = to
                .parse::<Mailbox>()
                .map_err(|e| MailError::InvalidAddress(e.to_string()))?;

            let message = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .header(ContentType::TEXT_HTML)
                .body(body.to_string())
                .map_err(|e| MailError::InvalidMessage(e.to_string()))?;

            self.transport
                .send(message)
                .await
                .map_err(|e| MailError::Transport(e.to_string()))?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let sender = LogMailSender;
        let result = sender
            .send("test@example.com", "subject", "body")
            .await;
        assert!(result.is_ok());
    }
}
