//! Admin endpoints: spreadsheet import/re-sync, page and member management
//!
//! Every handler requires an authenticated caller and defers the admin
//! check to the action layer; failures map onto fixed user-facing
//! messages, never raw error text.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::common::auth::{Actor, AdminCapability, AuthError};
use crate::domains::auth::models::LoginEvent;
use crate::domains::members::actions::{
    delete_member, import_members, reject_application, upsert_member, ImportMembersError,
    ReviewError,
};
use crate::domains::members::actions::approve_application;
use crate::domains::members::models::{Application, ApprovedMember, MemberStatus};
use crate::domains::pages::actions::{
    delete_page, generate_page, list_admin_pages, save_page, DeleteError, GenerateError,
    SaveError,
};
use crate::domains::pages::Page;
use crate::domains::sheets::{import_sheet, refresh_sheets, ImportSource, SheetError};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

use super::{auth_failure, message};

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<AuthUser, ApiResponse> {
    match auth {
        Some(Extension(auth)) => Ok(auth),
        None => Err(message(StatusCode::UNAUTHORIZED, "認証が必要です。")),
    }
}

/// Auth failures keep their fixed responses; everything else collapses to
/// the route's own generic message.
fn auth_or(error: AuthError, fallback: &str) -> ApiResponse {
    match error {
        AuthError::DatabaseError(_) | AuthError::InternalError(_) => {
            error!("Admin operation failed: {error}");
            message(StatusCode::INTERNAL_SERVER_ERROR, fallback)
        }
        other => auth_failure(&other),
    }
}

// =============================================================================
// Spreadsheet import / re-sync
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSheetRequest {
    #[serde(default)]
    pub sheet_url: Option<String>,
    #[serde(default)]
    pub csv_text: Option<String>,
}

pub async fn import_sheet_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<ImportSheetRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let source = match (body.sheet_url, body.csv_text) {
        (Some(url), _) if !url.trim().is_empty() => ImportSource::Url(url),
        (_, Some(text)) if !text.trim().is_empty() => ImportSource::CsvText(text),
        _ => return message(StatusCode::BAD_REQUEST, "必要な情報が不足しています。"),
    };

    match import_sheet(&auth, source, &state.deps).await {
        Ok(page) => (StatusCode::OK, Json(json!({ "page": page }))),
        Err(SheetError::Auth(e)) => auth_or(e, "取り込みに失敗しました。"),
        Err(SheetError::BadUrl) => {
            message(StatusCode::BAD_REQUEST, "スプレッドシートURLが正しくありません。")
        }
        Err(SheetError::FetchFailed) => {
            message(StatusCode::BAD_REQUEST, "スプレッドシートを読み込めませんでした。")
        }
        Err(SheetError::EmptyTable) => {
            message(StatusCode::BAD_REQUEST, "データが見つかりませんでした。")
        }
        Err(SheetError::Internal(e)) => {
            error!("Sheet import failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "取り込みに失敗しました。")
        }
    }
}

pub async fn refresh_sheets_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    match refresh_sheets(&auth, &state.deps).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "message": report.message,
                "updated": report.updated,
                "details": report.details,
            })),
        ),
        Err(SheetError::Auth(e)) => auth_or(e, "更新チェックに失敗しました。"),
        Err(e) => {
            error!("Sheet re-sync failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "更新チェックに失敗しました。")
        }
    }
}

// =============================================================================
// Page management
// =============================================================================

pub async fn admin_pages_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    match list_admin_pages(&auth, &state.deps).await {
        Ok(pages) => (StatusCode::OK, Json(json!({ "pages": pages }))),
        Err(e) => auth_or(e, "読み込みに失敗しました。"),
    }
}

#[derive(Deserialize)]
pub struct SavePageRequest {
    pub page: Page,
}

pub async fn save_page_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<SavePageRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    match save_page(&auth, body.page, &state.deps).await {
        Ok(page) => (StatusCode::OK, Json(json!({ "ok": true, "page": page }))),
        Err(SaveError::Auth(e)) => auth_or(e, "ページの保存に失敗しました。"),
        Err(SaveError::MissingSlug) => {
            message(StatusCode::BAD_REQUEST, "必要な情報が不足しています。")
        }
        Err(SaveError::Internal(e)) => {
            error!("Page save failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "ページの保存に失敗しました。")
        }
    }
}

pub async fn delete_page_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    match delete_page(&auth, &slug, &state.deps).await {
        Ok(removed) => (StatusCode::OK, Json(json!({ "ok": true, "removed": removed }))),
        Err(DeleteError::Auth(e)) => auth_or(e, "削除に失敗しました。"),
        Err(DeleteError::NotFound) => {
            message(StatusCode::NOT_FOUND, "ページが見つかりません。")
        }
        Err(DeleteError::Internal(e)) => {
            error!("Page deletion failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "削除に失敗しました。")
        }
    }
}

#[derive(Deserialize)]
pub struct GeneratePageRequest {
    #[serde(default)]
    pub instruction: String,
}

pub async fn generate_page_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<GeneratePageRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    match generate_page(&auth, &body.instruction, &state.deps).await {
        Ok(page) => (StatusCode::OK, Json(json!({ "page": page }))),
        Err(GenerateError::EmptyInstruction) => {
            message(StatusCode::BAD_REQUEST, "指示文が空です。")
        }
        Err(GenerateError::Auth(e)) => auth_or(e, "生成に失敗しました。"),
    }
}

// =============================================================================
// Member management
// =============================================================================

#[derive(Deserialize, Default)]
pub struct MemberPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct MembersRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub member: MemberPayload,
}

pub async fn members_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<MembersRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if body.action.is_empty() {
        return message(StatusCode::BAD_REQUEST, "必要な情報が不足しています。");
    }
    let email = body.member.email.trim().to_lowercase();
    if email.is_empty() {
        return message(StatusCode::BAD_REQUEST, "メールアドレスが必要です。");
    }

    let result = if body.action == "delete" {
        delete_member(&auth, &email, &state.deps).await.map(|_| ())
    } else {
        let status = body
            .member
            .status
            .as_deref()
            .and_then(|value| MemberStatus::from_str(value).ok())
            .unwrap_or(MemberStatus::Approved);
        upsert_member(&auth, &email, &body.member.name, status, &state.deps)
            .await
            .map(|_| ())
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => auth_or(e, "会員操作に失敗しました。"),
    }
}

pub async fn admin_members_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if let Err(e) = Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(state.deps.as_ref())
        .await
    {
        return auth_or(e, "読み込みに失敗しました。");
    }

    match ApprovedMember::find_all(&state.db_pool).await {
        Ok(members) => (StatusCode::OK, Json(json!({ "members": members }))),
        Err(e) => {
            error!("Roster listing failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "読み込みに失敗しました。")
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMembersRequest {
    #[serde(default)]
    pub csv_text: String,
}

pub async fn import_members_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<ImportMembersRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if body.csv_text.trim().is_empty() {
        return message(StatusCode::BAD_REQUEST, "必要な情報が不足しています。");
    }

    match import_members(&auth, &body.csv_text, &state.deps).await {
        Ok(count) => (StatusCode::OK, Json(json!({ "ok": true, "count": count }))),
        Err(ImportMembersError::Auth(e)) => auth_or(e, "CSV取り込みに失敗しました。"),
        Err(ImportMembersError::Empty) => {
            message(StatusCode::BAD_REQUEST, "CSVに有効なデータがありません。")
        }
        Err(ImportMembersError::Internal(e)) => {
            error!("Roster import failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "CSV取り込みに失敗しました。")
        }
    }
}

pub async fn admin_login_events_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if let Err(e) = Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(state.deps.as_ref())
        .await
    {
        return auth_or(e, "読み込みに失敗しました。");
    }

    match LoginEvent::find_recent(200, &state.db_pool).await {
        Ok(events) => {
            let events: Vec<serde_json::Value> = events
                .into_iter()
                .map(|event| {
                    json!({
                        "id": event.id,
                        "uid": event.uid,
                        "email": event.email,
                        "ip": event.ip,
                        "userAgent": event.user_agent,
                        "createdAt": event.created_at,
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "events": events })))
        }
        Err(e) => {
            error!("Login event listing failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "読み込みに失敗しました。")
        }
    }
}

// =============================================================================
// Application review
// =============================================================================

pub async fn admin_applications_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    if let Err(e) = Actor::new(&auth.uid, &auth.email)
        .can(AdminCapability::ManageMembers)
        .check(state.deps.as_ref())
        .await
    {
        return auth_or(e, "読み込みに失敗しました。");
    }

    match Application::find_all(&state.db_pool).await {
        Ok(applications) => (
            StatusCode::OK,
            Json(json!({ "applications": applications })),
        ),
        Err(e) => {
            error!("Application listing failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "読み込みに失敗しました。")
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewApplicationRequest {
    #[serde(default)]
    pub application_id: String,
}

fn parse_application_id(raw: &str) -> Result<Uuid, ApiResponse> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| message(StatusCode::BAD_REQUEST, "必須情報が不足しています。"))
}

pub async fn approve_application_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<ReviewApplicationRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let application_id = match parse_application_id(&body.application_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match approve_application(&auth, application_id, &state.deps).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(ReviewError::Auth(e)) => auth_or(e, "承認処理に失敗しました。"),
        Err(ReviewError::NotFound) => {
            message(StatusCode::NOT_FOUND, "申請が見つかりません。")
        }
        Err(ReviewError::Internal(e)) => {
            error!("Application approval failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "承認処理に失敗しました。")
        }
    }
}

pub async fn reject_application_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<ReviewApplicationRequest>,
) -> impl IntoResponse {
    let auth = match require_auth(auth) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let application_id = match parse_application_id(&body.application_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match reject_application(&auth, application_id, &state.deps).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(ReviewError::Auth(e)) => auth_or(e, "却下処理に失敗しました。"),
        Err(ReviewError::NotFound) => {
            message(StatusCode::NOT_FOUND, "申請が見つかりません。")
        }
        Err(ReviewError::Internal(e)) => {
            error!("Application rejection failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "却下処理に失敗しました。")
        }
    }
}
