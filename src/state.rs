use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::{Config, OtpSettings};
use crate::error::AppError;
use crate::repositories::UserRepository;
use crate::services::{AccountService, EmailService, OtpService, TokenService};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL コネクションプール
    pub db_pool: PgPool,
    /// ユーザーリポジトリ
    pub user_repo: UserRepository,
    /// メールサービス
    pub email_service: EmailService,
    /// OTPサービス
    pub otp_service: OtpService,
    /// アクセストークン発行サービス
    pub token_service: TokenService,
}

impl AppState {
    /// 新しい AppState を作成
    ///
    /// `Config` はここでのみ参照し、各サービスへ必要な値だけを渡す。
    pub fn new(db_pool: PgPool, config: Config) -> Result<Self, AppError> {
        let user_repo = UserRepository::new(db_pool.clone());
        let email_service = EmailService::from_config(&config)?;

        // OTP設定は起動時に一度だけ構築する
        let otp_settings = Arc::new(OtpSettings::from_config(&config)?);
        tracing::info!(
            step_secs = otp_settings.step_secs,
            digits = otp_settings.digits,
            skew = otp_settings.skew,
            "OTPサービスを初期化"
        );
        let otp_service = OtpService::new(otp_settings);

        let token_service =
            TokenService::new(config.jwt_secret.expose_secret(), config.jwt_ttl_secs);

        Ok(Self {
            db_pool,
            user_repo,
            email_service,
            otp_service,
            token_service,
        })
    }

    /// リクエスト単位のアカウントサービス
    pub fn account_service(&self) -> AccountService<UserRepository> {
        AccountService::new(
            self.user_repo.clone(),
            self.otp_service.clone(),
            self.email_service.clone(),
        )
    }
}
