use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use learning_path_api::assistant::CompletionRequest;
use learning_path_api::{app, AppConfig, AppState, LanguageModel, LlmError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Answers every prompt with a fixed text; planner prompts get a JSON item list.
struct StubModel;

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let last = request.messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        if last.contains("JSON array") {
            return Ok(r#"Sure! [
                {"item_type": "video", "title": "Rust in 100 seconds", "description": "Overview", "resource_url": "", "estimated_duration": 2, "order": 0},
                {"item_type": "project", "title": "Build a CLI", "description": "Practice", "estimated_duration": 180, "order": 1},
                {"item_type": "podcast", "title": "Skip me", "description": "x", "estimated_duration": 30, "order": 2}
            ]"#
            .into());
        }
        Ok("Stub answer".into())
    }
}

/// One usable item and one whose title is far too long.
struct LongTitleModel;

#[async_trait]
impl LanguageModel for LongTitleModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Ok(format!(
            r#"[{{"item_type": "course", "title": "Good", "description": "Start here", "estimated_duration": 60, "order": 0}},
                {{"item_type": "article", "title": "{}", "description": "Too long", "estimated_duration": 20, "order": 1}}]"#,
            "x".repeat(250)
        ))
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status: 503,
            body: "overloaded".into(),
        })
    }
}

async fn test_app(llm: Option<Arc<dyn LanguageModel>>) -> Router {
    let env: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "sqlite::memory:"),
        ("SECRET_KEY", "integration-test-secret"),
    ]);
    let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
    let state = AppState::init(config, llm).await.unwrap();
    app(state)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "password123", "full_name": "Test Learner"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/token",
        None,
        Some(json!({"email": email, "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_profile(app: &Router, token: &str, skills: Value) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/profile",
        Some(token),
        Some(json!({
            "education_level": 4,
            "prior_skills": skills,
            "aspirations": "Work with data",
            "learning_pace": "normal"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_and_welcome() {
    let app = test_app(None).await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the Personalized Learning Path API");
    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    let (status, body) = send(&app, Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/recommend"].is_object());
}

#[tokio::test]
async fn auth_flow() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "ada@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("hashed_password").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ADA@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/token",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_validation_and_ownership() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "learner@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        Some(json!({"education_level": 11, "prior_skills": ["python"], "aspirations": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "education_level");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        Some(json!({"education_level": 4, "prior_skills": ["python"], "aspirations": "x", "learning_pace": "turbo"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "learning_pace");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/profile",
        Some(&token),
        Some(json!({"education_level": "four"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let id = create_profile(&app, &token, json!(["Python", "SQL"])).await;
    let (status, body) = send(&app, Method::GET, &format!("/api/profile/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["learning_pace"], "normal");
    assert_eq!(body["data"]["prior_skills"], json!(["Python", "SQL"]));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/profile/{}", id),
        Some(&token),
        Some(json!({"learning_pace": "fast"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["learning_pace"], "fast");
    assert!(body["data"]["updated_at"].is_string());

    let other = register_and_login(&app, "other@example.com").await;
    let (status, _) = send(&app, Method::GET, &format!("/api/profile/{}", id), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, Method::GET, "/api/profile", Some(&other), None).await;
    assert_eq!(body["meta"]["count"], 0);
}

#[tokio::test]
async fn recommend_by_id_inline_or_neither() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "rec@example.com").await;
    let id = create_profile(&app, &token, json!(["python", "sql", "statistics"])).await;

    let (status, body) = send(&app, Method::POST, "/api/recommend", Some(&token), Some(json!({"profile_id": id}))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let recommendation_id = body["data"]["recommendation_id"].as_i64().unwrap();
    let recs = body["data"]["recommendations"]["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["job_title"], "Data Analyst");
    let pathway = recs[0]["pathway"].as_array().unwrap();
    assert_eq!(pathway[0]["step"], "Foundational");
    assert_eq!(pathway[0]["level"], 5);
    assert_eq!(pathway.last().unwrap()["type"], "internship");
    assert_eq!(body["data"]["recommendations"]["profile"]["skills_count"], 3);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/recommendations/{}", recommendation_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profile_id"], id);
    let (_, body) = send(&app, Method::GET, &format!("/api/profile/{}/recommendations", id), Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/recommend",
        Some(&token),
        Some(json!({"profile": {"education_level": 6, "prior_skills": ["networking", "linux"], "aspirations": "ops", "learning_pace": "slow"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["recommendation_id"].is_null());
    assert_eq!(body["data"]["recommendations"]["profile"]["learning_pace"], "slow");

    let (status, body) = send(&app, Method::POST, "/api/recommend", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Either profile_id or profile must be provided"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/recommend",
        Some(&token),
        Some(json!({"profile": {"education_level": 3, "prior_skills": ["  "], "aspirations": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::POST, "/api/recommend", Some(&token), Some(json!({"profile_id": 9999}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn courses_are_public_and_filterable() {
    let app = test_app(None).await;
    let (status, body) = send(&app, Method::GET, "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 10);
    let levels: Vec<i64> = body["data"].as_array().unwrap().iter().map(|c| c["level"].as_i64().unwrap()).collect();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));

    let (_, body) = send(&app, Method::GET, "/api/courses?level=7", None, None).await;
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["qualification"], "Bachelor's Degree");

    let (_, body) = send(&app, Method::GET, "/api/courses?limit=2&offset=1", None, None).await;
    assert_eq!(body["data"][0]["level"], 2);
    assert_eq!(body["meta"]["count"], 2);

    let (status, _) = send(&app, Method::GET, "/api/courses/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, Method::GET, "/api/job-roles", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["meta"]["count"].as_u64().unwrap() >= 3);
}

#[tokio::test]
async fn chat_without_model_uses_context_and_logs() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "chat@example.com").await;
    let id = create_profile(&app, &token, json!(["python", "sql"])).await;
    send(&app, Method::POST, "/api/recommend", Some(&token), Some(json!({"profile_id": id}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(&token),
        Some(json!({"message": "Where am I?", "profile_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let data = &body["data"];
    assert_eq!(data["message"], "Where am I?");
    assert_eq!(data["context_used"], true);
    assert!(data["response"].as_str().unwrap().contains("I see you're interested in"));
    assert_eq!(data["suggested_responses"].as_array().unwrap().len(), 3);
    assert!(data["suggested_responses"][0]
        .as_str()
        .unwrap()
        .starts_with("What skills do I need to become a"));

    let (status, body) = send(&app, Method::POST, "/api/chat", Some(&token), Some(json!({"message": "hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["context_used"], false);
    assert!(body["data"]["response"].as_str().unwrap().starts_with("Hello!"));

    let (status, _) = send(&app, Method::POST, "/api/chat", Some(&token), Some(json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, Method::GET, "/api/chat/history", Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 2);
    assert_eq!(body["data"][0]["message"], "hello");
    let (_, body) = send(&app, Method::GET, &format!("/api/chat/history?profile_id={}", id), Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 1);
}

#[tokio::test]
async fn chat_with_model_and_with_failing_model() {
    let app = test_app(Some(Arc::new(StubModel))).await;
    let token = register_and_login(&app, "llm@example.com").await;
    let (_, body) = send(&app, Method::POST, "/api/chat", Some(&token), Some(json!({"message": "Any tips?"}))).await;
    assert_eq!(body["data"]["response"], "Stub answer");

    let app = test_app(Some(Arc::new(FailingModel))).await;
    let token = register_and_login(&app, "llm@example.com").await;
    let (status, body) = send(&app, Method::POST, "/api/chat", Some(&token), Some(json!({"message": "thanks!"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["response"],
        "You're welcome! Is there anything else I can help you with?"
    );
}

#[tokio::test]
async fn learning_path_crud() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "paths@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/learning-paths",
        Some(&token),
        Some(json!({
            "title": "Rust",
            "items": [
                {"item_type": "article", "title": "The Book", "order": 1},
                {"item_type": "video", "title": "Intro talk", "estimated_duration": 45, "order": 0}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["items"][0]["title"], "Intro talk");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/learning-paths/{}", id),
        Some(&token),
        Some(json!({"status": "in_progress", "description": "Systems programming"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_progress");
    assert_eq!(body["data"]["title"], "Rust");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/learning-paths/{}/items", id),
        Some(&token),
        Some(json!({"item_type": "project", "title": "Build a CLI", "order": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["learning_path_id"], id);

    let (_, body) = send(&app, Method::GET, "/api/learning-paths?status=in_progress", Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["items"].as_array().unwrap().len(), 3);
    let (_, body) = send(&app, Method::GET, "/api/learning-paths?status=archived", Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 0);

    let other = register_and_login(&app, "intruder@example.com").await;
    let (status, _) = send(&app, Method::DELETE, &format!("/api/learning-paths/{}", id), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/learning-paths/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/learning-paths/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::POST, "/api/learning-paths", Some(&token), Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "title");
}

#[tokio::test]
async fn learning_path_generation() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "gen@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/learning-paths/generate?topic=data%20science&current_level=guru",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["title"], "Data Science Learning Path");
    assert_eq!(
        body["data"]["description"],
        "A personalized learning path for data science at beginner level."
    );
    assert_eq!(body["data"]["items"][0]["estimated_duration"], 120);

    let (status, _) = send(&app, Method::POST, "/api/learning-paths/generate?topic=x", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = test_app(Some(Arc::new(StubModel))).await;
    let token = register_and_login(&app, "gen@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/learning-paths/generate?topic=rust&current_level=advanced&time_commitment=high",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["estimated_duration"], 5);
    assert_eq!(items[1]["item_type"], "project");

    let (_, body) = send(&app, Method::GET, "/api/learning-paths", Some(&token), None).await;
    assert_eq!(body["meta"]["count"], 1);
}

#[tokio::test]
async fn generation_skips_overlong_titles_and_bounds_topic() {
    let app = test_app(Some(Arc::new(LongTitleModel))).await;
    let token = register_and_login(&app, "long@example.com").await;
    let (status, body) = send(&app, Method::POST, "/api/learning-paths/generate?topic=rust", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Good");

    let topic = "a".repeat(190);
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/learning-paths/generate?topic={}", topic),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let topic = "a".repeat(180);
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/learning-paths/generate?topic={}", topic),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn empty_description_clears_it() {
    let app = test_app(None).await;
    let token = register_and_login(&app, "clear@example.com").await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/learning-paths",
        Some(&token),
        Some(json!({"title": "Go", "description": "Concurrency first"})),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/learning-paths/{}", id);

    let (_, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"title": "Go basics"}))).await;
    assert_eq!(body["data"]["description"], "Concurrency first");

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({"description": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["title"], "Go basics");
}
