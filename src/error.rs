use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::mail::MailError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("認証エラー: {0}")]
    Authentication(String),

    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),

    #[error("このメールアドレスは既に使用されています")]
    EmailAlreadyExists,

    #[error("ユーザーが見つかりません")]
    UserNotFound,

    #[error("アカウントが有効化されていません")]
    AccountInactive,

    /// 期限切れ・コード不一致・別メールアドレスを区別しない
    #[error("認証コードが無効です")]
    OtpInvalid,

    #[error("メール送信に失敗しました")]
    MailDispatchFailed(#[from] MailError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Authentication(_) => (
                StatusCode::BAD_REQUEST,
                "メールアドレスまたはパスワードが正しくありません".to_string(),
            ),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部エラーが発生しました".to_string(),
                )
            }
            Self::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "このメールアドレスは既に使用されています".to_string(),
            ),
            Self::UserNotFound => (
                StatusCode::NOT_FOUND,
                "ユーザーが見つかりません".to_string(),
            ),
            Self::AccountInactive => (
                StatusCode::FORBIDDEN,
                "アカウントが有効化されていません。メールの認証コードで有効化してください".to_string(),
            ),
            Self::OtpInvalid => (
                StatusCode::BAD_REQUEST,
                "認証コードまたはメールアドレスが正しくありません".to_string(),
            ),
            Self::MailDispatchFailed(e) => {
                tracing::error!(error = %e, "メール送信エラー");
                (
                    StatusCode::BAD_GATEWAY,
                    "認証コードのメール送信に失敗しました".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
