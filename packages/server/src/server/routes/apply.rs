//! Public join-application endpoint

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::domains::members::actions::{apply, ApplyError};
use crate::server::app::AppState;

use super::message;

#[derive(Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

pub async fn apply_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<ApplyRequest>,
) -> impl IntoResponse {
    match apply(&body.name, &body.email, &state.deps).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(ApplyError::MissingFields) => {
            message(StatusCode::BAD_REQUEST, "名前とGmailを入力してください。")
        }
        Err(ApplyError::NotGmail) => {
            message(StatusCode::BAD_REQUEST, "Gmailアドレスのみ受け付けています。")
        }
        Err(ApplyError::Internal(e)) => {
            error!("Apply failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "申請の保存に失敗しました。")
        }
    }
}
