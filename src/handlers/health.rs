use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PoolState {
    pub connections: u32,
    pub idle_connections: usize,
}

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_pool: PoolState,
}

/// GET /api/health
///
/// プロセスの稼働状況とDBコネクションプールの状態を返す（DBへの問い合わせはしない）。
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        db_pool: PoolState {
            connections: state.db_pool.size(),
            idle_connections: state.db_pool.num_idle(),
        },
    })
}
