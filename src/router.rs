use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Router の構築
///
/// ユーザー関連のエンドポイントは `/api/users` 配下。
pub fn create_router(state: AppState) -> Router {
    let users = Router::new()
        .route("/register", post(handlers::register))
        .route("/send-otp", post(handlers::send_otp))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/login", post(handlers::login))
        .route("/reset-password", post(handlers::reset_password));

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .nest("/api/users", users)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    // DBに接続しない（遅延接続）
    fn test_router() -> Router {
        let config: Config = serde_json::from_value(serde_json::json!({
            "database_url": "postgres://localhost/admissions_test",
            "jwt_secret": "jwtsecret",
            "otpkey": "otpsecret",
        }))
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/admissions_test")
            .unwrap();
        create_router(AppState::new(pool, config).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_send_otp_rejects_invalid_email() {
        let response = test_router()
            .oneshot(post_json("/api/users/send-otp", r#"{"email":"invalid"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verify_otp_requires_code() {
        let response = test_router()
            .oneshot(post_json(
                "/api/users/verify-otp",
                r#"{"email":"a@example.com","otp":""}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_password_rejects_short_password() {
        let response = test_router()
            .oneshot(post_json(
                "/api/users/reset-password",
                r#"{"email":"a@example.com","otp":"12345","newPassword":"short"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_requires_password() {
        let response = test_router()
            .oneshot(post_json(
                "/api/users/login",
                r#"{"email":"a@example.com","password":""}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_router()
            .oneshot(post_json("/api/users/unknown", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
