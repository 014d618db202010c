use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use fake::{Fake, faker::internet::en::SafeEmail};
use http_body_util::BodyExt;
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

use cashora_core::account::{Account, AccountStatus, NewAccount, Profile, Role};
use cashora_core::auth::hash_password;
use cashora_core::memory::MemoryPorts;
use cashora_core::{AccountStore, Services};
use cashora_shared::{JwtConfig, JwtService, TerminalPolicy};

use crate::{AppState, create_router};

const PASSWORD: &str = "correct-horse-battery";

struct TestApp {
    router: Router,
    memory: MemoryPorts,
    jwt: Arc<JwtService>,
}

impl TestApp {
    fn new() -> Self {
        let memory = MemoryPorts::default();
        let services = Services::new(memory.ports(), TerminalPolicy::Overwrite);
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            expires_in_secs: 600,
        }));
        let router = create_router(AppState {
            services: Arc::new(services),
            jwt_service: jwt.clone(),
        });
        Self {
            router,
            memory,
            jwt,
        }
    }

    async fn account(&self, role: Role, status: AccountStatus) -> Account {
        let email: String = SafeEmail().fake();
        let mut new = NewAccount::signup(
            &email,
            hash_password(PASSWORD).unwrap(),
            Profile {
                first_name: "Test".to_string(),
                last_name: "Person".to_string(),
                ..Profile::default()
            },
        );
        new.role = role;
        new.status = status;
        new.balance = dec!(1000);
        self.memory.accounts.insert(new).await.unwrap()
    }

    fn token(&self, account: &Account) -> String {
        self.jwt.issue(account.id).unwrap()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "cashora");
}

#[tokio::test]
async fn test_register_creates_pending_account_and_welcomes() {
    let app = TestApp::new();
    let email: String = SafeEmail().fake();

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "first_name": "Jane",
                "last_name": "Doe"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["account"]["status"], "pending");
    assert_eq!(body["account"]["role"], "user");
    assert!(body["account"].get("password_hash").is_none());
    assert_eq!(body["notification"]["status"], "sent");
    assert_eq!(app.memory.notifier.sent_with("welcome").len(), 1);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "short@example.com",
                "password": "abc",
                "first_name": "Jane",
                "last_name": "Doe"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[rstest]
#[case("place_of_birth", 256)]
#[case("residence", 256)]
#[case("nationality", 101)]
#[tokio::test]
async fn test_register_rejects_overlong_profile_field(#[case] field: &str, #[case] len: usize) {
    let app = TestApp::new();
    let mut form = json!({
        "email": "long@example.com",
        "password": "correct horse",
        "first_name": "Jane",
        "last_name": "Doe"
    });
    form[field] = Value::String("x".repeat(len));

    let (status, body) = app
        .call("POST", "/api/v1/auth/register", None, Some(form))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(app.memory.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_register_reports_partial_success_when_email_fails() {
    let app = TestApp::new();
    app.memory.notifier.set_failing(true);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "partial@example.com",
                "password": PASSWORD,
                "first_name": "Jane",
                "last_name": "Doe"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["notification"]["status"], "failed");
    assert_eq!(body["account"]["email"], "partial@example.com");
}

#[tokio::test]
async fn test_login_pending_account_is_forbidden() {
    let app = TestApp::new();
    let account = app.account(Role::User, AccountStatus::Pending).await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": account.email, "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_login_issues_usable_token() {
    let app = TestApp::new();
    let account = app.account(Role::User, AccountStatus::Approved).await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": account.email, "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");

    let token = body["access_token"].as_str().unwrap().to_string();
    let (status, me) = app.call("GET", "/api/v1/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["account"]["id"], account.id.to_string());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    let account = app.account(Role::User, AccountStatus::Approved).await;

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": account.email, "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/api/v1/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app
        .call("GET", "/api/v1/transactions", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deposit_creates_pending_transaction() {
    let app = TestApp::new();
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let token = app.token(&user);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/transactions/deposit",
            Some(&token),
            Some(json!({ "amount": "250.00", "receipt_url": "https://files.example.com/r/1.png" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction"]["type"], "deposit");
    assert_eq!(body["transaction"]["status"], "pending");
    assert_eq!(app.memory.notifier.sent_with("deposit_request").len(), 1);

    let (status, list) = app.call("GET", "/api/v1/transactions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_send_over_balance_is_refused() {
    let app = TestApp::new();
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let token = app.token(&user);

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/transactions/send",
            Some(&token),
            Some(json!({ "amount": "1000.00", "recipient": "jane.doe@example.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

#[rstest]
#[case("/api/v1/transactions/send", json!({ "amount": "79228162514264337593543950335", "recipient": "jane.doe@example.com" }))]
#[case("/api/v1/transactions/withdraw", json!({ "amount": "100000000000000000.00", "bank_name": "First Bank", "account_number": "0123456789" }))]
#[case("/api/v1/transactions/deposit", json!({ "amount": "0.001" }))]
#[tokio::test]
async fn test_unstorable_amount_is_bad_request(#[case] uri: &str, #[case] payload: Value) {
    let app = TestApp::new();
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let token = app.token(&user);

    let (status, body) = app.call("POST", uri, Some(&token), Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(app.memory.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_admin_approves_account() {
    let app = TestApp::new();
    let admin = app.account(Role::Admin, AccountStatus::Approved).await;
    let user = app.account(Role::User, AccountStatus::Pending).await;

    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/v1/admin/accounts/{}/status", user.id),
            Some(&app.token(&admin)),
            Some(json!({ "status": "approved" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["status"], "approved");
    assert_eq!(body["previous_status"], "pending");
    let sent = app.memory.notifier.sent_with("account_approval");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, user.email);
}

#[tokio::test]
async fn test_non_admin_cannot_change_status() {
    let app = TestApp::new();
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let other = app.account(Role::User, AccountStatus::Pending).await;

    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/v1/admin/accounts/{}/status", other.id),
            Some(&app.token(&user)),
            Some(json!({ "status": "approved" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    let stored = app.memory.accounts.find_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AccountStatus::Pending);
    assert!(app.memory.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let app = TestApp::new();
    let admin = app.account(Role::Admin, AccountStatus::Approved).await;
    let user = app.account(Role::User, AccountStatus::Pending).await;

    let (status, _) = app
        .call(
            "PUT",
            &format!("/api/v1/admin/accounts/{}/status", user.id),
            Some(&app.token(&admin)),
            Some(json!({ "status": "banned" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transaction_rejection_with_failing_email_is_partial() {
    let app = TestApp::new();
    let admin = app.account(Role::Admin, AccountStatus::Approved).await;
    let user = app.account(Role::User, AccountStatus::Approved).await;

    let (_, created) = app
        .call(
            "POST",
            "/api/v1/transactions/withdraw",
            Some(&app.token(&user)),
            Some(json!({
                "amount": "200.00",
                "bank_name": "First Bank",
                "account_number": "0123456789"
            })),
        )
        .await;
    let id = created["transaction"]["id"].as_str().unwrap().to_string();

    app.memory.notifier.set_failing(true);
    let (status, body) = app
        .call(
            "PUT",
            &format!("/api/v1/admin/transactions/{id}/status"),
            Some(&app.token(&admin)),
            Some(json!({ "status": "rejected" })),
        )
        .await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["transaction"]["status"], "rejected");
    assert_eq!(body["notification"]["status"], "failed");
}

#[tokio::test]
async fn test_admin_balance_override_rejects_negative() {
    let app = TestApp::new();
    let admin = app.account(Role::Admin, AccountStatus::Approved).await;
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let uri = format!("/api/v1/admin/accounts/{}/balance", user.id);

    let (status, _) = app
        .call("PUT", &uri, Some(&app.token(&admin)), Some(json!({ "balance": "-1.00" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("PUT", &uri, Some(&app.token(&admin)), Some(json!({ "balance": "0.001" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call("PUT", &uri, Some(&app.token(&admin)), Some(json!({ "balance": "42.50" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["balance"], "42.50");
}

#[tokio::test]
async fn test_bulk_email_reports_per_recipient() {
    let app = TestApp::new();
    let admin = app.account(Role::Admin, AccountStatus::Approved).await;
    let user = app.account(Role::User, AccountStatus::Approved).await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/admin/emails",
            Some(&app.token(&admin)),
            Some(json!({
                "recipients": [user.id, missing],
                "subject": "Scheduled maintenance",
                "html": "<p>We will be offline briefly.</p>"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["sent"], 1);
    assert_eq!(body["failed"], 1);
    assert_eq!(app.memory.notifier.sent_with("custom").len(), 1);
}
