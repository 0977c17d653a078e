//! Tests for views module
//!
//! Router-level tests driving the whole app through `tower::ServiceExt`:
//! - setup screens when the backend is not configured
//! - sign-in, screens and sign-out for one browser session
//! - the create wizard through to the preview screen
//! - the email confirmation callback

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::{AppState, BackendFactory};
    use crate::sessions::SessionRegistry;
    use crate::supabase::mock::{test_lead_magnet, MockBackend};
    use crate::supabase::{Backend, BackendError};
    use crate::wizard::SimulatedGenerator;
    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderMap, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    fn app_with(backend_factory: Option<BackendFactory>) -> (Router, SessionRegistry) {
        let sessions = SessionRegistry::new();
        let state = AppState {
            config_error: backend_factory
                .is_none()
                .then(|| "Missing Supabase environment variables".to_string()),
            backend_factory,
            sessions: sessions.clone(),
            generator: Arc::new(SimulatedGenerator::new(Duration::ZERO)),
            secure_cookies: false,
        };
        (crate::app(Arc::new(RwLock::new(state)), &[]), sessions)
    }

    fn unconfigured_app() -> Router {
        app_with(None).0
    }

    fn mock_app(backend: Arc<MockBackend>) -> (Router, SessionRegistry) {
        let factory: BackendFactory = Arc::new(move || backend.clone() as Arc<dyn Backend>);
        app_with(Some(factory))
    }

    fn account_backend() -> Arc<MockBackend> {
        Arc::new(
            MockBackend::new()
                .with_account("ada@example.com", "hunter22")
                .with_rows(vec![
                    test_lead_magnet("lm-1", "user-ada@example.com", "2024-01-01T00:00:00Z"),
                    test_lead_magnet("lm-2", "user-ada@example.com", "2024-02-01T00:00:00Z"),
                ]),
        )
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, value)
    }

    fn session_cookie(headers: &HeaderMap) -> String {
        headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .expect("missing session cookie")
            .to_string()
    }

    fn location(headers: &HeaderMap) -> &str {
        headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    async fn sign_in(app: &Router) -> String {
        let (status, headers, body) = send(
            app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_authenticated"], true);
        session_cookie(&headers)
    }

    // ========================================================================
    // Unconfigured backend
    // ========================================================================

    #[tokio::test]
    async fn test_unconfigured_dashboard_renders_setup() {
        let app = unconfigured_app();

        let (status, _, body) = send(&app, "GET", "/dashboard", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "setup");
        assert_eq!(body["env_vars"], json!(["SUPABASE_URL", "SUPABASE_ANON_KEY"]));
        assert_eq!(body["error"], "Missing Supabase environment variables");
    }

    #[tokio::test]
    async fn test_unconfigured_auth_renders_setup() {
        let app = unconfigured_app();
        let (_, _, body) = send(&app, "GET", "/auth", None, None).await;
        assert_eq!(body["screen"], "setup");
    }

    #[tokio::test]
    async fn test_unconfigured_api_returns_not_configured() {
        let app = unconfigured_app();

        let (status, _, body) = send(&app, "GET", "/api/lead-magnets", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "NOT_CONFIGURED");

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_unconfigured_connection_test_reports_error() {
        let app = unconfigured_app();
        let (status, _, body) = send(&app, "GET", "/api/setup/connection-test", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_env_snippet() {
        let app = unconfigured_app();

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/setup/env",
            None,
            Some(json!({ "url": "https://abc.supabase.co", "anon_key": "public-key" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["env"],
            "SUPABASE_URL=https://abc.supabase.co\nSUPABASE_ANON_KEY=public-key"
        );
        assert_eq!(body["valid_url"], true);

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/setup/env",
            None,
            Some(json!({ "url": "https://abc.supabase.co" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    // ========================================================================
    // Screens and auth
    // ========================================================================

    #[tokio::test]
    async fn test_home_screen() {
        let (app, _) = mock_app(account_backend());
        let (_, _, body) = send(&app, "GET", "/", None, None).await;
        assert_eq!(body["screen"], "home");
        assert_eq!(body["primary_action"]["href"], "/auth");
    }

    #[tokio::test]
    async fn test_home_forwards_confirmation_code() {
        let (app, _) = mock_app(account_backend());
        let (status, headers, _) = send(&app, "GET", "/?code=abc", None, None).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), "/auth/callback?code=abc");
    }

    #[tokio::test]
    async fn test_home_ignores_lookalike_query_keys() {
        let (app, _) = mock_app(account_backend());
        let (status, _, body) =
            send(&app, "GET", "/?promocode=spring&utm=error", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "home");
    }

    #[test]
    fn test_callback_query_matches_exact_keys() {
        use handlers::is_callback_query;

        assert!(is_callback_query("code=abc"));
        assert!(is_callback_query("lang=en&error=access_denied"));
        assert!(is_callback_query("error"));
        assert!(!is_callback_query("promocode=spring"));
        assert!(!is_callback_query("barcode=123&myerror=x"));
        assert!(!is_callback_query(""));
    }

    #[tokio::test]
    async fn test_auth_screen_without_session() {
        let (app, _) = mock_app(account_backend());

        let (_, _, body) = send(&app, "GET", "/auth?error=Link%20expired", None, None).await;

        assert_eq!(body["screen"], "auth");
        assert_eq!(body["error"], "Link expired");
        assert_eq!(body["logo"]["monogram"], "LM");
        assert_eq!(body["logo"]["sources"].as_array().map(|s| s.len()), Some(3));
        assert_eq!(body["tabs"], json!(["signin", "signup"]));
    }

    #[tokio::test]
    async fn test_signed_out_dashboard_redirects_to_auth() {
        let (app, _) = mock_app(account_backend());
        let (_, _, body) = send(&app, "GET", "/dashboard", None, None).await;
        assert_eq!(body["screen"], "redirect");
        assert_eq!(body["to"], "/auth");

        let (_, _, body) = send(&app, "GET", "/create", None, None).await;
        assert_eq!(body["to"], "/auth");
    }

    #[tokio::test]
    async fn test_sign_in_then_dashboard() {
        let (app, sessions) = mock_app(account_backend());
        let cookie = sign_in(&app).await;
        assert_eq!(sessions.len().await, 1);

        let (status, _, list) = send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["items"][0]["id"], "lm-2");

        let (_, _, body) = send(&app, "GET", "/dashboard", Some(&cookie), None).await;
        assert_eq!(body["screen"], "dashboard");
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["stats"]["total_lead_magnets"], 2);
        assert_eq!(body["stats"]["total_downloads"], 0);
        assert_eq!(body["actions"].as_array().map(|a| a.len()), Some(3));
        assert_eq!(body["getting_started"].as_array().map(|a| a.len()), Some(4));

        let (_, _, body) = send(&app, "GET", "/auth", Some(&cookie), None).await;
        assert_eq!(body["screen"], "redirect");
        assert_eq!(body["to"], "/dashboard");

        let (_, _, body) = send(&app, "GET", "/library", Some(&cookie), None).await;
        assert_eq!(body["screen"], "not_implemented");
    }

    #[tokio::test]
    async fn test_sign_in_with_bad_password_keeps_no_session() {
        let (app, sessions) = mock_app(account_backend());

        let (status, headers, body) = send(
            &app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BACKEND_REJECTED");
        assert_eq!(body["error"], "Invalid login credentials");
        assert!(headers.get(header::SET_COOKIE).is_none());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_sign_in_validation() {
        let (app, _) = mock_app(account_backend());
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "nope", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_sign_out_while_signed_out_is_an_error() {
        let backend = account_backend();
        let (app, sessions) = mock_app(backend.clone());

        let (status, _, _) = send(&app, "POST", "/api/auth/sign-out", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, headers, body) = send(
            &app,
            "POST",
            "/api/auth/sign-up",
            None,
            Some(json!({ "email": "new@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_authenticated"], false);
        let cookie = session_cookie(&headers);

        let (status, _, body) = send(&app, "POST", "/api/auth/sign-out", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "No user logged in");
        assert_eq!(backend.calls("sign_out"), 1);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_sign_out_discards_browser_session() {
        let (app, sessions) = mock_app(account_backend());
        let cookie = sign_in(&app).await;

        let (status, headers, _) =
            send(&app, "POST", "/api/auth/sign-out", Some(&cookie), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(session_cookie(&headers).starts_with("lm_session="));
        assert_eq!(sessions.len().await, 0);

        let (_, _, body) = send(&app, "GET", "/dashboard", Some(&cookie), None).await;
        assert_eq!(body["to"], "/auth");
    }

    #[tokio::test]
    async fn test_failed_provider_sign_out_discards_browser_session() {
        let backend = account_backend();
        let (app, sessions) = mock_app(backend.clone());
        let cookie = sign_in(&app).await;
        send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;

        backend.fail_next(BackendError::Http {
            status: 503,
            code: None,
            message: "Service Unavailable".to_string(),
        });
        let (status, _, body) =
            send(&app, "POST", "/api/auth/sign-out", Some(&cookie), None).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "REQUEST_FAILED");
        assert_eq!(sessions.len().await, 0);

        let (_, _, body) = send(&app, "GET", "/dashboard", Some(&cookie), None).await;
        assert_eq!(body["to"], "/auth");
    }

    #[tokio::test]
    async fn test_me_and_profile_require_user() {
        let backend = account_backend();
        let (app, _) = mock_app(backend.clone());

        let (status, _, _) = send(&app, "GET", "/api/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let cookie = sign_in(&app).await;
        let (status, _, body) = send(&app, "GET", "/api/me", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["user"]["id"], "user-ada@example.com");
        assert_eq!(backend.calls("get_user"), 1);

        let (status, _, body) = send(
            &app,
            "PUT",
            "/api/profile",
            Some(&cookie),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    // ========================================================================
    // Lead magnets API
    // ========================================================================

    #[tokio::test]
    async fn test_create_and_delete_lead_magnet() {
        let (app, _) = mock_app(account_backend());
        let cookie = sign_in(&app).await;
        send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/lead-magnets",
            Some(&cookie),
            Some(json!({ "title": "Webinar checklist", "topic": "Webinars", "type": "checklist" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["lead_magnet"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["lead_magnet"]["user_id"], "user-ada@example.com");

        let (_, _, list) = send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;
        assert_eq!(list["items"][0]["id"], id.as_str());
        assert_eq!(list["items"].as_array().map(|i| i.len()), Some(3));

        let (status, _, _) = send(
            &app,
            "PUT",
            "/api/ui/current",
            Some(&cookie),
            Some(json!({ "id": id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/api/lead-magnets/{}", id);
        let (status, _, _) = send(&app, "DELETE", &uri, Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, list) = send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;
        let items = list["items"].as_array().cloned().unwrap_or_default();
        assert!(items.iter().all(|item| item["id"] != id.as_str()));

        let (_, _, body) = send(&app, "GET", "/dashboard", Some(&cookie), None).await;
        assert!(body["current_lead_magnet"].is_null());

        let (status, _, _) = send(&app, "DELETE", &uri, Some(&cookie), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejected_create_keeps_backend_status() {
        let backend = account_backend();
        let (app, _) = mock_app(backend.clone());
        let cookie = sign_in(&app).await;
        send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;

        backend.fail_next(BackendError::Http {
            status: 403,
            code: Some("42501".to_string()),
            message: "new row violates row-level security policy".to_string(),
        });
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/lead-magnets",
            Some(&cookie),
            Some(json!({ "title": "Webinar checklist", "topic": "Webinars", "type": "checklist" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "BACKEND_REJECTED");
        assert_eq!(body["error"], "new row violates row-level security policy");

        let (_, _, list) = send(&app, "GET", "/api/lead-magnets", Some(&cookie), None).await;
        assert_eq!(list["items"].as_array().map(|i| i.len()), Some(2));
    }

    #[tokio::test]
    async fn test_create_lead_magnet_validation() {
        let (app, _) = mock_app(account_backend());
        let cookie = sign_in(&app).await;

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/lead-magnets",
            Some(&cookie),
            Some(json!({ "title": "", "topic": "Webinars", "type": "guide" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or("").contains("title"));
    }

    // ========================================================================
    // Create wizard
    // ========================================================================

    #[tokio::test]
    async fn test_wizard_through_preview() {
        let (app, _) = mock_app(account_backend());
        let cookie = sign_in(&app).await;

        let (_, _, body) = send(&app, "GET", "/preview", Some(&cookie), None).await;
        assert_eq!(body["to"], "/create");

        let (_, _, body) = send(&app, "GET", "/create", Some(&cookie), None).await;
        assert_eq!(body["screen"], "create");
        assert_eq!(body["step_number"], 1);
        assert_eq!(body["types"].as_array().map(|t| t.len()), Some(5));

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/create/type",
            Some(&cookie),
            Some(json!({ "type": "cheatsheet" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step_number"], 2);
        assert_eq!(body["can_generate"], false);

        let (status, _, _) = send(&app, "POST", "/api/create/generate", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, _, body) = send(
            &app,
            "PUT",
            "/api/create/fields",
            Some(&cookie),
            Some(json!({
                "title": "Keyboard shortcuts",
                "topic": "Productivity",
                "audience": "Developers",
                "tone": "casual",
            })),
        )
        .await;
        assert_eq!(body["can_generate"], true);

        let (status, _, body) =
            send(&app, "POST", "/api/create/generate", Some(&cookie), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["navigate_to"], "/preview");
        assert_eq!(body["lead_magnet_data"]["type"], "cheatsheet");
        assert!(body["content"].is_null());

        let (_, _, body) = send(&app, "GET", "/preview", Some(&cookie), None).await;
        assert_eq!(body["screen"], "preview");
        assert_eq!(body["lead_magnet_data"]["title"], "Keyboard shortcuts");

        let (_, _, body) = send(&app, "GET", "/create", Some(&cookie), None).await;
        assert_eq!(body["is_generating"], false);
    }

    // ========================================================================
    // Email confirmation callback
    // ========================================================================

    #[tokio::test]
    async fn test_callback_error_redirects_to_auth() {
        let (app, _) = mock_app(account_backend());

        let (status, headers, _) = send(
            &app,
            "GET",
            "/auth/callback?error=access_denied&error_description=Email%20link%20expired",
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), "/auth?error=Email%20link%20expired");
    }

    #[tokio::test]
    async fn test_callback_exchanges_valid_code() {
        let (app, sessions) = mock_app(account_backend());

        let (status, headers, _) =
            send(&app, "GET", "/auth/callback?code=valid-code", None, None).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), "/dashboard");
        assert!(session_cookie(&headers).starts_with("lm_session="));
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_callback_failed_exchange_redirects_with_message() {
        let (app, sessions) = mock_app(account_backend());

        let (status, headers, _) =
            send(&app, "GET", "/auth/callback?code=stale", None, None).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(location(&headers).starts_with("/auth?error=Email%20link"));
        assert_eq!(sessions.len().await, 0);
    }
}
