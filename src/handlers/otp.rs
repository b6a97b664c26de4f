use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::handlers::validation::{validate_email, validate_otp};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// === 認証コード送信 ===

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

/// POST /api/users/send-otp
///
/// メール送信に失敗した場合は 502 を返す
pub async fn send_otp(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_email(&request.email)?;

    state
        .account_service()
        .request_otp(request.email.trim())
        .await?;

    Ok(Json(MessageResponse {
        message: "認証コードをメールで送信しました".to_string(),
    }))
}

// === 認証コード検証（アカウント有効化） ===

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// POST /api/users/verify-otp
///
/// # Security
/// - コードはログ出力禁止
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_email(&request.email)?;
    validate_otp(&request.otp)?;

    state
        .account_service()
        .verify_account(request.email.trim(), request.otp.trim())
        .await?;

    Ok(Json(MessageResponse {
        message: "アカウントが有効化されました".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_verify_request() {
        let request: VerifyOtpRequest =
            serde_json::from_str(r#"{"email":"a@example.com","otp":"01234"}"#).unwrap();
        assert_eq!(request.email, "a@example.com");
        // 先頭ゼロを保持する
        assert_eq!(request.otp, "01234");
    }

    #[test]
    fn test_serialize_message_response() {
        let response = MessageResponse {
            message: "ok".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"message":"ok"}"#
        );
    }
}
