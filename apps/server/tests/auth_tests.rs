#![allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::*;

#[tokio::test]
async fn signup_then_login_returns_role_ids() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let patient = signup_patient(app, "Ana", "ana@example.com").await?;

            let (status, body) = app
                .send(
                    Method::POST,
                    "/civilians/login",
                    Some(json!({ "email": "ANA@example.com", "password": "password123" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "patient login");
            assert_eq!(body["user"]["type"], "patient");
            assert_eq!(body["user"]["patient_id"], patient.id);
            assert_eq!(body["user"]["navigation_id"], patient.id);
            assert!(body["user"].get("password").is_none());
            assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

            let provider = signup_provider(app, "Dr. Lin", "lin@example.com", &[]).await?;
            let (status, body) = app
                .send(
                    Method::POST,
                    "/login",
                    Some(json!({ "email": "lin@example.com", "password": "password123" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "generic login");
            assert_eq!(body["user"]["type"], "provider");
            assert_eq!(body["user"]["provider_id"], provider.id);
            assert_eq!(body["user"]["provider_type"], "Therapist");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn bad_credentials_and_wrong_role_look_the_same() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            signup_patient(app, "Ana", "ana@example.com").await?;
            signup_provider(app, "Dr. Lin", "lin@example.com", &[]).await?;

            let attempts = [
                ("/civilians/login", "ana@example.com", "wrong-password"),
                ("/civilians/login", "nobody@example.com", "password123"),
                ("/civilians/login", "lin@example.com", "password123"),
                ("/provider/login", "ana@example.com", "password123"),
            ];

            for (path, email, password) in attempts {
                let (status, body) = app
                    .send(
                        Method::POST,
                        path,
                        Some(json!({ "email": email, "password": password })),
                        None,
                    )
                    .await?;
                assert_status(status, StatusCode::UNAUTHORIZED, path);
                assert_eq!(error_message(&body), "Invalid email or password");
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn duplicate_signup_email_is_rejected() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            signup_patient(app, "Ana", "ana@example.com").await?;

            let (status, body) = app
                .send(
                    Method::POST,
                    "/provider/signup",
                    Some(json!({
                        "name": "Other",
                        "email": "Ana@Example.com",
                        "password": "password123",
                        "provider_type": "Nurse",
                        "address": address("Denver"),
                        "phone": phone()
                    })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "duplicate signup");
            assert!(error_message(&body).contains("Duplicate email"));

            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(app.pool())
                .await?;
            assert_eq!(users, 1);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn provider_signup_with_unknown_issue_creates_nothing() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, body) = app
                .send(
                    Method::POST,
                    "/provider/signup",
                    Some(json!({
                        "name": "Dr. Nope",
                        "email": "nope@example.com",
                        "password": "password123",
                        "provider_type": "Therapist",
                        "address": address("Denver"),
                        "phone": phone(),
                        "supported_health_issues": ["Anxiety", "Lycanthropy"]
                    })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "unknown issue signup");
            assert_eq!(error_message(&body), "Health issue not found: Lycanthropy");

            for table in ["users", "providers", "addresses", "phone_numbers"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(app.pool())
                    .await?;
                assert_eq!(count, 0, "{table} must be empty after rollback");
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn profiles_are_owner_only() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let ana = signup_patient(app, "Ana", "ana@example.com").await?;
            let ben = signup_patient(app, "Ben", "ben@example.com").await?;
            let provider = signup_provider(app, "Dr. Lin", "lin@example.com", &[]).await?;
            let ana_path = format!("/civilians/profile/{}", ana.id);

            let (status, _) = app.send(Method::GET, &ana_path, None, None).await?;
            assert_status(status, StatusCode::UNAUTHORIZED, "no token");

            let (status, _) = app
                .send(Method::GET, &ana_path, None, Some("not-a-jwt"))
                .await?;
            assert_status(status, StatusCode::UNAUTHORIZED, "garbage token");

            let (status, _) = app
                .send(Method::GET, &ana_path, None, Some(&ben.token))
                .await?;
            assert_status(status, StatusCode::FORBIDDEN, "other patient");

            let (status, _) = app
                .send(Method::GET, &ana_path, None, Some(&provider.token))
                .await?;
            assert_status(status, StatusCode::FORBIDDEN, "provider on patient route");

            let (status, _) = app
                .send(
                    Method::PATCH,
                    &format!("/provider/profile/{}", provider.id),
                    Some(json!({ "bio": "hijacked" })),
                    Some(&ana.token),
                )
                .await?;
            assert_status(status, StatusCode::FORBIDDEN, "patient on provider route");

            let (status, body) = app
                .send(Method::GET, &ana_path, None, Some(&ana.token))
                .await?;
            assert_status(status, StatusCode::OK, "owner");
            assert_eq!(body["patient"]["patient_id"], ana.id);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn deleting_an_account_removes_owned_records() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let provider =
                signup_provider(app, "Dr. Lin", "lin@example.com", &["Anxiety"]).await?;
            let path = format!("/provider/profile/{}", provider.id);

            let (status, body) = app
                .send(Method::DELETE, &path, None, Some(&provider.token))
                .await?;
            assert_status(status, StatusCode::OK, "delete provider");
            assert_eq!(body["deleted"], provider.id);

            let (status, _) = app.send(Method::GET, &path, None, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "deleted profile");

            for table in ["users", "providers", "addresses", "phone_numbers", "provider_supported_issues"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(app.pool())
                    .await?;
                assert_eq!(count, 0, "{table} must be empty after delete");
            }

            let (status, _) = app
                .send(
                    Method::POST,
                    "/provider/login",
                    Some(json!({ "email": "lin@example.com", "password": "password123" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::UNAUTHORIZED, "login after delete");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn logout_requires_a_provider_token() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let provider = signup_provider(app, "Dr. Lin", "lin@example.com", &[]).await?;

            let (status, _) = app.send(Method::POST, "/provider/logout", None, None).await?;
            assert_status(status, StatusCode::UNAUTHORIZED, "logout without token");

            let (status, body) = app
                .send(Method::POST, "/provider/logout", None, Some(&provider.token))
                .await?;
            assert_status(status, StatusCode::OK, "logout");
            assert_eq!(body["message"], "Logged out");
            Ok(())
        })
    })
    .await
}
