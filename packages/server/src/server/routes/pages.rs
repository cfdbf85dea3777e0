//! Member-facing page endpoints

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::error;

use crate::common::auth::AuthError;
use crate::domains::pages::actions::{get_member_page, list_member_pages};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

use super::{auth_failure, message};

fn read_failure(error: AuthError) -> (StatusCode, Json<serde_json::Value>) {
    match error {
        AuthError::DatabaseError(_) | AuthError::InternalError(_) => {
            error!("Page read failed: {error}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "読み込みに失敗しました。")
        }
        other => auth_failure(&other),
    }
}

pub async fn list_pages_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let Some(Extension(auth)) = auth else {
        return message(StatusCode::UNAUTHORIZED, "認証が必要です。");
    };

    match list_member_pages(&auth, &state.deps).await {
        Ok(pages) => (StatusCode::OK, Json(json!({ "pages": pages }))),
        Err(error) => read_failure(error),
    }
}

pub async fn page_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let Some(Extension(auth)) = auth else {
        return message(StatusCode::UNAUTHORIZED, "認証が必要です。");
    };

    match get_member_page(&auth, &slug, &state.deps).await {
        Ok(Some(page)) => (StatusCode::OK, Json(json!({ "page": page }))),
        Ok(None) => message(StatusCode::NOT_FOUND, "ページが見つかりませんでした。"),
        Err(error) => read_failure(error),
    }
}
