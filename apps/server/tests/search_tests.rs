#![allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use support::*;

fn names(providers: &Value) -> Vec<String> {
    providers
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|p| p["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn search_by_issue_returns_providers_and_resources() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            signup_provider(app, "Dr. Blue", "blue@example.com", &["Depression", "Anxiety"]).await?;
            signup_provider(app, "Dr. Green", "green@example.com", &["Diabetes"]).await?;

            let (status, body) = app
                .send(Method::POST, "/search", Some(json!({ "issue_name": "depress" })), None)
                .await?;
            assert_status(status, StatusCode::OK, "search depression");
            assert_eq!(names(&body["providers"]), vec!["Dr. Blue"]);
            assert_eq!(
                body["providers"][0]["supported_health_issues"],
                json!(["Anxiety", "Depression"])
            );
            assert_eq!(body["providers"][0]["city"], "Boulder");

            let resources = body["emergencyResources"].as_array().cloned().unwrap_or_default();
            assert_eq!(resources.len(), 1);
            assert_eq!(resources[0]["phone_number"], "988");

            let (status, body) = app
                .send(Method::POST, "/search", Some(json!({ "issueName": "DIABETES" })), None)
                .await?;
            assert_status(status, StatusCode::OK, "case-insensitive");
            assert_eq!(names(&body["providers"]), vec!["Dr. Green"]);
            assert_eq!(body["emergencyResources"], json!([]));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn search_for_unknown_issue_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _) = app
                .send(Method::POST, "/search", Some(json!({ "issue_name": "Lycanthropy" })), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "unknown issue");

            let (status, _) = app
                .send(Method::POST, "/search", Some(json!({ "issue_name": "   " })), None)
                .await?;
            assert_status(status, StatusCode::BAD_REQUEST, "blank issue");

            let (status, _) = app
                .send(Method::POST, "/search", Some(json!({ "issue_name": "%" })), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "wildcards are literal");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn advanced_search_combines_filters() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            signup_provider(app, "Dr. Blue", "blue@example.com", &["PTSD"]).await?;
            signup_provider(app, "Dr. Green", "green@example.com", &["Asthma"]).await?;

            let (status, body) = app
                .send(
                    Method::POST,
                    "/search/advanced",
                    Some(json!({ "city": "boulder", "providerType": "therapist" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "city + type");
            assert_eq!(names(&body["providers"]), vec!["Dr. Blue", "Dr. Green"]);
            assert_eq!(body["emergencyResources"], json!([]));

            let (status, body) = app
                .send(
                    Method::POST,
                    "/search/advanced",
                    Some(json!({ "issue_name": "ptsd", "state": "CO" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "issue + state");
            assert_eq!(names(&body["providers"]), vec!["Dr. Blue"]);
            assert_eq!(
                body["emergencyResources"][0]["resource_name"],
                "Veterans Crisis Line"
            );

            let (status, body) = app
                .send(
                    Method::POST,
                    "/search/advanced",
                    Some(json!({ "city": "Nowhere" })),
                    None,
                )
                .await?;
            assert_status(status, StatusCode::OK, "no matches");
            assert_eq!(body["providers"], json!([]));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn directory_and_catalog_are_public() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            signup_provider(app, "Dr. Blue", "blue@example.com", &["Asthma"]).await?;

            let (status, body) = app.send(Method::GET, "/providers", None, None).await?;
            assert_status(status, StatusCode::OK, "directory");
            assert_eq!(names(&body["providers"]), vec!["Dr. Blue"]);
            assert!(body["providers"][0].get("password").is_none());

            let (status, body) = app.send(Method::GET, "/medical-issues", None, None).await?;
            assert_status(status, StatusCode::OK, "medical issues");
            let issues = body["medicalIssues"].as_array().cloned().unwrap_or_default();
            assert_eq!(issues.len(), 8);
            assert_eq!(issues[0]["issue_name"], "Anxiety");

            let (status, body) = app
                .send(Method::GET, "/emergency-resources", None, None)
                .await?;
            assert_status(status, StatusCode::OK, "resources");
            let resources = body["emergencyResources"].as_array().cloned().unwrap_or_default();
            assert_eq!(resources.len(), 4);

            let (status, body) = app
                .send(Method::GET, "/emergency-resources?issue=substance", None, None)
                .await?;
            assert_status(status, StatusCode::OK, "resources by issue");
            assert_eq!(
                body["emergencyResources"][0]["resource_name"],
                "SAMHSA National Helpline"
            );

            let id = resources[0]["resource_id"].as_i64().unwrap_or_default();
            let (status, body) = app
                .send(Method::GET, &format!("/emergency-resources/{id}"), None, None)
                .await?;
            assert_status(status, StatusCode::OK, "one resource");
            assert_eq!(body["emergencyResource"]["resource_id"], id);

            let (status, _) = app
                .send(Method::GET, "/emergency-resources/99999", None, None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "missing resource");
            Ok(())
        })
    })
    .await
}
