//! Shared harness for the HTTP integration tests.
//!
//! Every test runs against its own Postgres schema so tests can run in
//! parallel against one database. Tests are skipped when no test database is
//! configured.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use futures::future::BoxFuture;
use roc_support::{api::create_router, config::Config, state::AppState};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::sync::atomic::{AtomicU32, Ordering};
use tower::ServiceExt;

static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Sends a request and returns status, headers and the raw body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        self.request_with_extra_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, headers, bytes.to_vec()))
    }

    /// Sends a JSON request, optionally with a bearer token, and parses the
    /// JSON response. Empty bodies parse as `null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let bearer = token.map(|t| format!("Bearer {t}"));
        let headers: Vec<(&str, &str)> = bearer
            .as_deref()
            .map(|b| vec![("authorization", b)])
            .unwrap_or_default();

        let (status, _headers, body) = self
            .request_with_extra_headers(method, uri, body, &headers)
            .await?;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };
        Ok((status, value))
    }

    pub fn pool(&self) -> &PgPool {
        &self.state.db_pool
    }
}

/// A signed-up account: its token and role id.
#[derive(Debug, Clone)]
pub struct Account {
    pub token: String,
    pub id: i32,
    pub user_id: i32,
}

fn test_database_url() -> Option<String> {
    std::env::var("ROC__DATABASE__TEST_DATABASE_URL")
        .or_else(|_| std::env::var("TEST_DATABASE_URL"))
        .ok()
}

fn unique_schema() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!(
        "roc_test_{}_{}_{}",
        std::process::id(),
        SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst),
        nanos
    )
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(&'a TestApp) -> BoxFuture<'a, anyhow::Result<()>>,
{
    with_test_app_with_config(|_| {}, f).await
}

pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(&'a TestApp) -> BoxFuture<'a, anyhow::Result<()>>,
{
    let Some(url) = test_database_url() else {
        eprintln!("skipping: set ROC__DATABASE__TEST_DATABASE_URL or TEST_DATABASE_URL");
        return Ok(());
    };

    let schema = unique_schema();
    let admin = PgPoolOptions::new().max_connections(1).connect(&url).await?;
    admin
        .execute(format!("CREATE SCHEMA \"{schema}\"").as_str())
        .await?;

    let search_path = schema.clone();
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .after_connect(move |conn, _meta| {
            let statement = format!("SET search_path TO \"{search_path}\"");
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await?;

    let mut config = Config::defaults();
    config.database.url = url.clone();
    config.auth.bcrypt_cost = 4;
    config.auth.jwt_secret = "integration-test-secret".to_string();
    configure(&mut config);

    let result = async {
        roc_support::state::run_migrations(&pool).await?;
        let state = AppState::from_pool(config, pool.clone());
        let app = TestApp {
            router: create_router(state.clone()),
            state,
        };
        f(&app).await
    }
    .await;

    pool.close().await;
    admin
        .execute(format!("DROP SCHEMA \"{schema}\" CASCADE").as_str())
        .await?;
    admin.close().await;

    result
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for {context}");
}

pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

pub fn address(city: &str) -> Value {
    json!({
        "street_address": "12 Main St",
        "apartment_number": "4B",
        "city": city,
        "state": "CO",
        "postal_code": "80202"
    })
}

pub fn phone() -> Value {
    json!({
        "country_code": "1",
        "area_code": "303",
        "phone_number": "5550100",
        "phone_type": "mobile"
    })
}

pub async fn signup_patient(app: &TestApp, name: &str, email: &str) -> anyhow::Result<Account> {
    let (status, body) = app
        .send(
            Method::POST,
            "/civilians/signup",
            Some(json!({
                "name": name,
                "email": email,
                "password": "password123",
                "address": address("Denver"),
                "phone": phone()
            })),
            None,
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "patient signup");
    account_from(&body, "patient_id")
}

pub async fn signup_provider(
    app: &TestApp,
    name: &str,
    email: &str,
    issues: &[&str],
) -> anyhow::Result<Account> {
    let (status, body) = app
        .send(
            Method::POST,
            "/provider/signup",
            Some(json!({
                "name": name,
                "email": email,
                "password": "password123",
                "provider_type": "Therapist",
                "bio": "Licensed counselor",
                "contact_information": "Weekdays 9-5",
                "address": address("Boulder"),
                "phone": phone(),
                "supported_health_issues": issues
            })),
            None,
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "provider signup");
    account_from(&body, "provider_id")
}

fn account_from(body: &Value, id_field: &str) -> anyhow::Result<Account> {
    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing token in {body}"))?
        .to_string();
    let id = body["user"][id_field]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("missing {id_field} in {body}"))? as i32;
    let user_id = body["user"]["user_id"]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("missing user_id in {body}"))? as i32;
    Ok(Account { token, id, user_id })
}
