//! Login approval and login audit endpoints

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::domains::auth::actions::{approve_login, log_login, LoginError, LoginIdentity};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

use super::message;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApproveLoginRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

pub async fn approve_login_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    body: Option<Json<ApproveLoginRequest>>,
) -> impl IntoResponse {
    let Some(Extension(auth)) = auth else {
        return message(StatusCode::UNAUTHORIZED, "認証が必要です。");
    };
    let body = body.map(|Json(body)| body).unwrap_or_default();

    let identity = LoginIdentity {
        uid: auth.uid.clone(),
        email: auth.email.clone(),
        display_name: body.display_name,
        photo_url: body.photo_url,
    };

    match approve_login(identity, &state.deps).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "approved": true })),
        ),
        Err(LoginError::NotGmail) => {
            message(StatusCode::FORBIDDEN, "Gmail以外は許可されていません。")
        }
        Err(LoginError::NotApproved) => message(StatusCode::FORBIDDEN, "承認されていません。"),
        Err(LoginError::Internal(e)) => {
            error!("Login approval failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "承認チェックに失敗しました。")
        }
    }
}

/// Best-effort client IP: proxy headers first, then unknown
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|value| value.to_str().ok()) {
        return real_ip.to_string();
    }
    "unknown".to_string()
}

pub async fn log_login_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(Extension(auth)) = auth else {
        return message(StatusCode::UNAUTHORIZED, "認証が必要です。");
    };

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    let ip = client_ip(&headers);

    match log_login(&auth.uid, &auth.email, &ip, user_agent, &state.deps).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            error!("Login logging failed: {e:#}");
            message(StatusCode::INTERNAL_SERVER_ERROR, "ログ記録に失敗しました。")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_header_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.5, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), "203.0.113.5");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.7".parse().unwrap());
        assert_eq!(client_ip(&headers), "198.51.100.7");
    }

    #[test]
    fn unknown_without_proxy_headers() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
