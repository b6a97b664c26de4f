use std::sync::Arc;

#[cfg(feature = "email")]
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::error::AppError;
use crate::services::mail::{LogMailSender, MailError, MailSender};

const OTP_SUBJECT: &str = "One time password";

/// メール送信サービス
///
/// 送信手段は `MailSender` に委譲する。SMTP は `email` feature 有効時のみ。
#[derive(Clone)]
pub struct EmailService {
    sender: Arc<dyn MailSender>,
}

impl EmailService {
    pub fn new(sender: Arc<dyn MailSender>) -> Self {
        Self { sender }
    }

    /// 設定に応じてトランスポートを選択
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        if let Some(sender) = smtp_sender(config)? {
            return Ok(Self::new(sender));
        }

        if config.smtp_host.is_some() {
            tracing::warn!("SMTP設定が不完全、または email feature が無効です（ログ出力のみ）");
        } else {
            tracing::info!("SMTP未設定（ログ出力のみ）");
        }

        Ok(Self::new(Arc::new(LogMailSender)))
    }

    /// 認証コードメールを送信
    pub async fn send_otp_email(&self, to: &str, code: &str) -> Result<(), MailError> {
        let body = format!("Code for verify account <h1>{}</h1>", code);
        self.sender.send(to, OTP_SUBJECT, &body).await
    }
}

/// SMTP設定が揃っていれば SMTP トランスポートを構築
#[cfg(feature = "email")]
fn smtp_sender(config: &Config) -> Result<Option<Arc<dyn MailSender>>, AppError> {
    let (Some(host), Some(username), Some(password), Some(from)) = (
        &config.smtp_host,
        &config.smtp_username,
        &config.smtp_password,
        &config.smtp_from_address,
    ) else {
        return Ok(None);
    };

    let sender = crate::services::mail::SmtpMailSender::new(
        host,
        config.smtp_port,
        username.expose_secret(),
        password.expose_secret(),
        from,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "SMTPトランスポートの初期化に失敗");
        AppError::Internal(anyhow::anyhow!("smtp transport error: {}", e))
    })?;

    tracing::info!(smtp_host = %host, port = config.smtp_port, "SMTPメール送信を使用");

    Ok(Some(Arc::new(sender)))
}

#[cfg(not(feature = "email"))]
fn smtp_sender(_config: &Config) -> Result<Option<Arc<dyn MailSender>>, AppError> {
    Ok(None)
}
