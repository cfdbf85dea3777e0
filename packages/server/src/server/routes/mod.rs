// HTTP routes
pub mod admin;
pub mod apply;
pub mod auth;
pub mod health;
pub mod pages;

pub use admin::*;
pub use apply::*;
pub use auth::*;
pub use health::*;
pub use pages::*;

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::common::auth::AuthError;

/// Fixed user-facing message body: `{ "message": "..." }`
pub(crate) fn message(
    status: StatusCode,
    text: &str,
) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(json!({ "message": text })))
}

/// Map an authorization failure to its fixed response
pub(crate) fn auth_failure(error: &AuthError) -> (StatusCode, Json<serde_json::Value>) {
    match error {
        AuthError::AuthenticationRequired | AuthError::InvalidToken => {
            message(StatusCode::UNAUTHORIZED, "認証が必要です。")
        }
        AuthError::AdminRequired => {
            message(StatusCode::FORBIDDEN, "管理者のみ操作できます。")
        }
        AuthError::NotApproved => message(StatusCode::FORBIDDEN, "承認されていません。"),
        AuthError::DatabaseError(_) | AuthError::InternalError(_) => {
            message(StatusCode::INTERNAL_SERVER_ERROR, "処理に失敗しました。")
        }
    }
}
