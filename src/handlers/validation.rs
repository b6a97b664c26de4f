use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

/// メールアドレスのバリデーション
pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("メールアドレスは必須です".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation(
            "有効なメールアドレスを入力してください".to_string(),
        ));
    }
    Ok(())
}

/// パスワードのバリデーション
pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "パスワードは8文字以上で入力してください".to_string(),
        ));
    }
    Ok(())
}

/// 認証コードの必須チェック（形式の不一致は検証失敗として扱う）
pub(crate) fn validate_otp(otp: &str) -> Result<(), AppError> {
    if otp.trim().is_empty() {
        return Err(AppError::Validation("認証コードは必須です".to_string()));
    }
    Ok(())
}
