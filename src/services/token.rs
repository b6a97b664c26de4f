use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::models::User;

/// アクセストークンのクレーム
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// JWT (HS256) 発行サービス
///
/// # Security
/// トークン・シークレットはログに出力しない
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// ユーザーのアクセストークンを発行
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now as usize,
            exp: (now + self.ttl_secs) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = ?e, "トークン生成エラー");
            AppError::Internal(anyhow::anyhow!("token encode error"))
        })
    }

    /// トークンを検証してクレームを返す
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!(error = %e, "トークン検証失敗");
                AppError::Authentication("invalid_token".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            first_name: "Alisher".to_string(),
            last_name: "Sharipov".to_string(),
            email: "a@example.com".to_string(),
            phone: "998953901313".to_string(),
            password_hash: String::new(),
            role: "seo".to_string(),
            image: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_contains_user_claims() {
        let service = TokenService::new("jwtsecret", 3600);
        let user = test_user();

        let token = service.issue(&user).unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, "seo");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_decode_rejects_other_secret() {
        let token = TokenService::new("jwtsecret", 3600)
            .issue(&test_user())
            .unwrap();
        let result = TokenService::new("another-secret", 3600).decode(&token);
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        // 検証時の許容誤差（60秒）を超えて期限切れ
        let service = TokenService::new("jwtsecret", -3600);
        let token = service.issue(&test_user()).unwrap();
        assert!(service.decode(&token).is_err());
    }
}
