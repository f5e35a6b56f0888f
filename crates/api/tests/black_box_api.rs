use chrono::{Duration as ChronoDuration, Utc};
use hure_api::config::{AppConfig, Environment};
use hure_auth::{JwtClaims, Role};
use hure_core::{AccountId, TenantId};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;

struct TestServer {
    base_url: String,
    services: Arc<hure_api::app::AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: AppConfig) -> Self {
        // Build the same router as prod, bound to an ephemeral port. The
        // services handle stands in for the verification email inbox.
        let (app, services) = hure_api::app::build_app_with_services(config).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    async fn spawn_dev(jwt_secret: &str) -> Self {
        Self::spawn(AppConfig {
            jwt_secret: jwt_secret.to_string(),
            environment: Environment::Development,
        })
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, tenant_id: TenantId, role: Role) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: AccountId::new(),
        tenant_id,
        role,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Sunrise Clinic",
        "town": "Nairobi",
        "country": "KE",
        "contactName": "Amina Odhiambo",
        "email": email,
        "phone": "+254700000001",
        "modules": ["staff", "scheduling"],
        "planKey": "essential",
        "planProduct": "core",
    })
}

async fn register(srv: &TestServer, client: &reqwest::Client, email: &str) -> String {
    let res = client
        .post(format!("{}/onboard/clinic", srv.base_url))
        .json(&register_body(email))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    body["clinicId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_onboarding_flow_reaches_pending_activation() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();
    let email = "owner@sunrise.example.com";

    let clinic_id = register(&srv, &client, email).await;

    let res = client
        .post(format!("{}/onboard/temp-password", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email, "password": "s3cret-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let code = srv
        .services
        .otp
        .last_code_for(email)
        .await
        .expect("an OTP should have been dispatched");

    let res = client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": code.as_str() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/onboard/skip-payment", srv.base_url))
        .json(&json!({ "clinicId": clinic_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/onboard/{}/status", srv.base_url, clinic_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: serde_json::Value = res.json().await.unwrap();
    assert_eq!(status["status"], json!("pending_activation"));
    assert_eq!(status["emailVerified"], json!(true));
    assert_eq!(status["complete"], json!(true));
}

#[tokio::test]
async fn malformed_registration_fails_before_any_state_change() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();

    let body = register_body("not-an-email");
    let res = client
        .post(format!("{}/onboard/clinic", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());

    // Nothing was registered for that address.
    assert!(srv
        .services
        .directory
        .find_by_email("not-an-email")
        .await
        .is_none());
}

#[tokio::test]
async fn short_temp_password_is_rejected() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();
    let email = "owner@shortpass.example.com";

    let clinic_id = register(&srv, &client, email).await;

    let res = client
        .post(format!("{}/onboard/temp-password", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email, "password": "abc" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn otp_rejections_distinguish_format_from_mismatch() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();
    let email = "owner@otp.example.com";

    let clinic_id = register(&srv, &client, email).await;
    client
        .post(format!("{}/onboard/temp-password", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email, "password": "s3cret-pass" }))
        .send()
        .await
        .unwrap();

    // Not six digits: a format failure, answered without touching state.
    let res = client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": "12ab" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Well-formed but wrong: rejected, and the stored code survives.
    let real = srv.services.otp.last_code_for(email).await.unwrap();
    let wrong = if real.as_str() == "000000" {
        "000001"
    } else {
        "000000"
    };
    let res = client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": wrong }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": real.as_str() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn resend_issues_a_fresh_code_without_moving_the_step() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();
    let email = "owner@resend.example.com";

    let clinic_id = register(&srv, &client, email).await;
    client
        .post(format!("{}/onboard/temp-password", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email, "password": "s3cret-pass" }))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/onboard/verify-email", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/onboard/{}/status", srv.base_url, clinic_id))
        .send()
        .await
        .unwrap();
    let status: serde_json::Value = res.json().await.unwrap();
    assert_eq!(status["step"], json!(4));

    // The resent code verifies.
    let code = srv.services.otp.last_code_for(email).await.unwrap();
    let res = client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": code.as_str() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn skip_payment_is_forbidden_in_production() {
    let srv = TestServer::spawn(AppConfig {
        jwt_secret: "test-secret".to_string(),
        environment: Environment::Production,
    })
    .await;
    let client = reqwest::Client::new();
    let email = "owner@prod.example.com";

    let clinic_id = register(&srv, &client, email).await;
    client
        .post(format!("{}/onboard/temp-password", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "email": email, "password": "s3cret-pass" }))
        .send()
        .await
        .unwrap();
    let code = srv.services.otp.last_code_for(email).await.unwrap();
    client
        .post(format!("{}/onboard/verify-otp", srv.base_url))
        .json(&json!({ "clinicId": clinic_id, "code": code.as_str() }))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/onboard/skip-payment", srv.base_url))
        .json(&json!({ "clinicId": clinic_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn resubmission_of_a_pending_registration_reuses_the_clinic_id() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();
    let email = "owner@twice.example.com";

    let first = register(&srv, &client, email).await;

    let mut body = register_body(email);
    body["planKey"] = json!("growth");
    let res = client
        .post(format!("{}/onboard/clinic", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let second: serde_json::Value = res.json().await.unwrap();
    assert_eq!(second["clinicId"].as_str().unwrap(), first);
}

#[tokio::test]
async fn plans_catalog_and_bundle_quote_are_public() {
    let srv = TestServer::spawn_dev("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/plans", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["plans"].as_array().unwrap().len(), 6);

    // essential (8000) + care_standard (10000) at the 20% bundle discount.
    let res = client
        .get(format!(
            "{}/plans/bundle-quote?core=essential&care=care_standard",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    let quote: serde_json::Value = res.json().await.unwrap();
    assert_eq!(quote["baseAmount"], json!(18000));
    assert_eq!(quote["discountPercent"], json!(20));
    assert_eq!(quote["finalAmount"], json!(14400));

    // Unknown core key: a zeroed quote, not an error.
    let res = client
        .get(format!(
            "{}/plans/bundle-quote?core=mystery",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    let quote: serde_json::Value = res.json().await.unwrap();
    assert_eq!(quote["finalAmount"], json!(0));

    let res = client
        .get(format!("{}/plans/core/mystery", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn_dev(jwt_secret).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/rbac/roles", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/rbac/roles", srv.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A token signed with the wrong secret is just as invalid.
    let forged = mint_jwt("other-secret", TenantId::new(), Role::Owner);
    let res = client
        .get(format!("{}/rbac/roles", srv.base_url))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rbac_check_answers_fail_closed() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn_dev(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, TenantId::new(), Role::Admin);

    let cases = [
        ("hr", "create_staff", false),
        ("hr", "approve_leave", true),
        ("employee", "view_schedule", true),
        ("employee", "edit_staff", false),
        ("owner", "manage_billing", true),
        ("ghost", "view_staff", false),
        ("admin", "summon_dragons", false),
    ];

    for (role, capability, expected) in cases {
        let res = client
            .get(format!(
                "{}/rbac/check?role={}&capability={}",
                srv.base_url, role, capability
            ))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["allowed"], json!(expected), "{role} x {capability}");
    }

    let res = client
        .get(format!("{}/rbac/roles/ghost", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tenant_limits_are_isolated_per_tenant() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn_dev(jwt_secret).await;
    let client = reqwest::Client::new();
    let email = "owner@limits.example.com";

    let clinic_id = register(&srv, &client, email).await;
    let tenant_id: TenantId = clinic_id.parse().unwrap();

    let token = mint_jwt(jwt_secret, tenant_id, Role::Owner);
    let res = client
        .get(format!("{}/tenants/{}/limits", srv.base_url, clinic_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["plan"], json!("essential"));
    assert_eq!(body["limits"]["staffWithinLimit"], json!(true));
    assert_eq!(body["limits"]["staffUsage"], json!(0.0));

    // A token for some other tenant cannot read these limits.
    let other = mint_jwt(jwt_secret, TenantId::new(), Role::Owner);
    let res = client
        .get(format!("{}/tenants/{}/limits", srv.base_url, clinic_id))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // An employee of the right tenant lacks the reporting capability.
    let employee = mint_jwt(jwt_secret, tenant_id, Role::Employee);
    let res = client
        .get(format!("{}/tenants/{}/limits", srv.base_url, clinic_id))
        .bearer_auth(&employee)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
