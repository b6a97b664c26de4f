use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::AppError;
use crate::handlers::validation::{validate_email, validate_password};
use crate::models::{NewUser, User, UserRole};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String, // SecretBox不要（Deserialize後すぐハッシュ化）
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub image: Option<String>,
}

/// ユーザー登録ハンドラー
///
/// POST /api/users/register
///
/// 無効状態でユーザーを作成し、認証コードをメール送信する。
///
/// # Security
/// - パスワードはログに出力しない
/// - パスワードは即座にハッシュ化
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    // バリデーション
    validate_register_request(&request)?;

    let new_user = NewUser {
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        email: request.email.trim().to_string(),
        phone: request.phone.trim().to_string(),
        role: request.role,
        image: request.image,
    };

    let user = state
        .account_service()
        .register(&new_user, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// 登録リクエストのバリデーション
fn validate_register_request(request: &RegisterRequest) -> Result<(), AppError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::Validation("氏名は必須です".to_string()));
    }
    validate_email(&request.email)?;
    if request.phone.trim().is_empty() {
        return Err(AppError::Validation("電話番号は必須です".to_string()));
    }
    validate_password(&request.password)?;
    // admin は登録で作成できない
    if request.role == UserRole::Admin {
        return Err(AppError::Validation(
            "このロールでは登録できません".to_string(),
        ));
    }
    Ok(())
}
