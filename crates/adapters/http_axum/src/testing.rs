//! Test wiring: real `SQLite` repositories over an in-memory database, a
//! captcha stub that refuses the token `"bad"`, and a plain-text hasher.

use std::net::IpAddr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use eodsa_adapter_crypto::HmacSessionTokens;
use eodsa_adapter_gateways::LoggingMailer;
use eodsa_adapter_storage_sqlite_sqlx::{
    Config, SqliteApplicationRepository, SqliteContestantRepository, SqliteDancerRepository,
    SqliteEntryRepository, SqliteEventRepository, SqliteJudgeRepository,
    SqlitePasswordResetRepository, SqliteScoreRepository, SqliteStudioRepository,
};
use eodsa_app::ports::{Backend, CaptchaVerifier, PasswordHasher, Ports};
use eodsa_app::rate_limit::SlidingWindowLimiter;
use eodsa_app::services::JudgeService;
use eodsa_domain::error::EodsaError;

use crate::router::build;
use crate::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@eodsa.org";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestBackend;

impl Backend for TestBackend {
    type Dancers = SqliteDancerRepository;
    type Studios = SqliteStudioRepository;
    type Applications = SqliteApplicationRepository;
    type Events = SqliteEventRepository;
    type Entries = SqliteEntryRepository;
    type Contestants = SqliteContestantRepository;
    type Judges = SqliteJudgeRepository;
    type Scores = SqliteScoreRepository;
    type Resets = SqlitePasswordResetRepository;
    type Mailer = LoggingMailer;
    type Captcha = StubCaptcha;
    type Hasher = PlainHasher;
    type Tokens = HmacSessionTokens;
    type Limiter = SlidingWindowLimiter;
}

#[derive(Clone, Default)]
pub struct StubCaptcha;

impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str, _remote_ip: Option<IpAddr>) -> Result<bool, EodsaError> {
        Ok(token != "bad")
    }
}

#[derive(Clone, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, EodsaError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

/// A router over a fresh database with a bootstrapped admin.
pub async fn app() -> Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap();
    let pool = db.pool().clone();
    let ports: Ports<TestBackend> = Ports {
        dancers: SqliteDancerRepository::new(pool.clone()),
        studios: SqliteStudioRepository::new(pool.clone()),
        applications: SqliteApplicationRepository::new(pool.clone()),
        events: SqliteEventRepository::new(pool.clone()),
        entries: SqliteEntryRepository::new(pool.clone()),
        contestants: SqliteContestantRepository::new(pool.clone()),
        judges: SqliteJudgeRepository::new(pool.clone()),
        scores: SqliteScoreRepository::new(pool.clone()),
        resets: SqlitePasswordResetRepository::new(pool),
        mailer: LoggingMailer,
        captcha: StubCaptcha,
        hasher: PlainHasher,
        tokens: HmacSessionTokens::new(
            "router-test-secret-that-is-long-enough",
            chrono::Duration::hours(1),
        )
        .unwrap(),
        limiter: SlidingWindowLimiter::for_registrations(),
    };
    JudgeService::new(&ports)
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    build(AppState::new(&ports).with_trusted_proxy(true))
}

/// Send one request and decode the JSON reply (`Value::Null` when empty).
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Sign the bootstrapped admin in and return the session token.
pub async fn admin_token(app: &Router) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/judge",
        None,
        Some(serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}
