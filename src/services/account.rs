use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::repositories::UserStore;
use crate::services::auth::{AuthService, hash_password};
use crate::services::{EmailService, OtpService};

/// アカウント有効化・パスワード再設定フロー
///
/// OTPの発行/検証結果に応じてユーザーストアを更新する。
pub struct AccountService<U> {
    users: U,
    otp_service: OtpService,
    email_service: EmailService,
}

impl<U: UserStore + Clone> AccountService<U> {
    /// 新しい AccountService を作成
    pub fn new(users: U, otp_service: OtpService, email_service: EmailService) -> Self {
        Self {
            users,
            otp_service,
            email_service,
        }
    }

    /// ユーザー登録（無効状態で作成し、認証コードを送信）
    ///
    /// # Note
    /// メール送信失敗は登録自体を失敗させない（send-otp で再送可能）
    pub async fn register(&self, new_user: &NewUser, password: &str) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;
        let user = self.users.create_user(new_user, &password_hash).await?;

        tracing::info!(email = %user.email, "ユーザー登録成功");

        if let Err(e) = self
            .otp_service
            .issue(&user.email, &self.email_service)
            .await
        {
            tracing::warn!(email = %user.email, error = %e, "登録時の認証コード送信に失敗（続行）");
        }

        Ok(user)
    }

    /// 認証コードを送信
    pub async fn request_otp(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.otp_service
            .issue(&user.email, &self.email_service)
            .await?;

        Ok(())
    }

    /// 認証コードを検証してアカウントを有効化
    ///
    /// # Security
    /// コード不一致の理由は区別しない
    pub async fn verify_account(&self, email: &str, code: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !self.otp_service.verify(&user.email, code) {
            tracing::warn!(email = %email, "認証コード検証失敗");
            return Err(AppError::OtpInvalid);
        }

        if !user.is_active {
            self.users.activate(user.id).await?;
            tracing::info!(user_id = %user.id, "アカウント有効化完了");
        }

        Ok(())
    }

    /// 認証コードを検証してパスワードを再設定
    ///
    /// # Security
    /// - ユーザー不在とコード不一致は同じエラーを返す
    /// - コード・新パスワードはログに出力しない
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !self.otp_service.verify(email, code) {
            tracing::warn!(email = %email, "パスワード再設定: 認証コード検証失敗");
            return Err(AppError::OtpInvalid);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::OtpInvalid)?;

        let password_hash = hash_password(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "パスワード再設定完了");

        Ok(())
    }

    /// ログイン（有効化済みアカウントのみ）
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = AuthService::new(self.users.clone())
            .authenticate(email, password)
            .await?;

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "ログイン拒否: アカウント未有効化");
            return Err(AppError::AccountInactive);
        }

        Ok(user)
    }
}
