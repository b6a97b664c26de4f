use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::AppError;
use crate::handlers::otp::MessageResponse;
use crate::handlers::validation::{validate_email, validate_otp, validate_password};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// POST /api/users/reset-password
///
/// # Security
/// - otp, new_password はログに出力しない
/// - ユーザー不在とコード不一致は同じ 400 を返す
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_reset_password_request(&request)?;

    state
        .account_service()
        .reset_password(
            request.email.trim(),
            request.otp.trim(),
            &request.new_password,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "パスワードが更新されました".to_string(),
    }))
}

/// リセットパスワードリクエストのバリデーション
fn validate_reset_password_request(request: &ResetPasswordRequest) -> Result<(), AppError> {
    validate_email(&request.email)?;
    validate_otp(&request.otp)?;
    validate_password(&request.new_password)?;
    Ok(())
}
