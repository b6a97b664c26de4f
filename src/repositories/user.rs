#![allow(async_fn_in_trait)]

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, User};

/// ユーザー永続化の境界
///
/// OTPフローはこのトレイト経由でユーザーを参照・更新する。
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// # Errors
    /// メールアドレス重複時は `AppError::EmailAlreadyExists`
    async fn create_user(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, AppError>;

    /// アカウントを有効化
    async fn activate(&self, user_id: Uuid) -> Result<(), AppError>;

    /// # Note
    /// password_hash はログに出力しないこと
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError>;
}

impl<T: UserStore> UserStore for Arc<T> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        (**self).find_by_email(email).await
    }

    async fn create_user(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, AppError> {
        (**self).create_user(new_user, password_hash).await
    }

    async fn activate(&self, user_id: Uuid) -> Result<(), AppError> {
        (**self).activate(user_id).await
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError> {
        (**self).update_password(user_id, password_hash).await
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, role, image, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, role, image, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(password_hash)
        .bind(new_user.role.as_str())
        .bind(&new_user.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // UNIQUE制約違反チェック
            if let sqlx::Error::Database(db_err) = &e
                && db_err.constraint() == Some("users_email_key")
            {
                return AppError::EmailAlreadyExists;
            }
            AppError::Database(e)
        })
    }

    async fn activate(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_active = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
