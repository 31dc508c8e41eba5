//! Integration tests for the HTTP API.
//!
//! The full router is wired over in-memory repositories and a mock
//! reasoning engine, then driven with tower's `oneshot`. This covers
//! the register → create org → issue key → query flow plus the
//! authorization boundaries between organizations.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use ragnet::adapters::engine::MockReasoningEngine;
use ragnet::adapters::http::{app_router, AppState};
use ragnet::adapters::memory::{
    InMemoryApiKeyRepository, InMemoryConversationRepository, InMemoryOrganizationRepository,
    InMemoryPolicyRepository, InMemorySourceRepository, InMemoryUserRepository,
};
use ragnet::application::{
    IdentityService, InsightsService, OrganizationService, QueryPipeline, SourceService,
};
use ragnet::config::{AuthConfig, ServerConfig};

fn app(engine: MockReasoningEngine) -> Router {
    let users = Arc::new(InMemoryUserRepository::new());
    let organizations = Arc::new(InMemoryOrganizationRepository::new());
    let sources = Arc::new(InMemorySourceRepository::new());
    let conversations = Arc::new(InMemoryConversationRepository::new());
    let policies = Arc::new(InMemoryPolicyRepository::new());
    let api_keys = Arc::new(InMemoryApiKeyRepository::new());
    let engine = Arc::new(engine);

    let identity = Arc::new(IdentityService::new(
        users,
        organizations.clone(),
        api_keys,
        AuthConfig {
            jwt_secret: Secret::new("0123456789abcdef0123456789abcdef".to_string()),
            token_ttl_secs: 3600,
        },
    ));
    let state = AppState {
        identity: identity.clone(),
        organizations: Arc::new(OrganizationService::new(
            organizations.clone(),
            engine.clone(),
        )),
        sources: Arc::new(SourceService::new(sources, engine.clone())),
        pipeline: Arc::new(QueryPipeline::new(
            identity,
            organizations,
            conversations.clone(),
            policies.clone(),
            engine.clone(),
        )),
        insights: Arc::new(InsightsService::new(conversations.clone(), engine)),
        policies,
        conversations,
    };

    app_router(state, &ServerConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/register",
            None,
            json!({ "email": email, "password": "hunter22" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_org(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/organizations",
            Some(token),
            json!({ "name": name, "description": "docs" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_create_org_issue_key_and_query() {
    let app = app(MockReasoningEngine::answering("use the sdk"));

    let token = register(&app, "dev@example.com").await;
    let org_id = create_org(&app, &token, "acme").await;

    let (status, body) = send(&app, get(&format!("/api/generateApiKey/{}", org_id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let api_key = body["api_key"].as_str().unwrap().to_string();
    assert!(api_key.starts_with("rn_live_"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .header("x-api-key", &api_key)
        .body(Body::from(
            json!({ "org_id": org_id, "question": "how do I auth?" }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "use the sdk");
    assert!(body["conversation_id"].is_string());
    assert!(body["anonymous_id"].is_string());

    // Follow-up in the same conversation.
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .header("x-api-key", &api_key)
        .body(Body::from(
            json!({
                "org_id": org_id,
                "question": "and pagination?",
                "conversation_id": body["conversation_id"],
                "anonymous_id": body["anonymous_id"],
            })
            .to_string(),
        ))
        .unwrap();
    let (status, follow_up) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(follow_up["conversation_id"], body["conversation_id"]);

    // The dashboard now sees both exchanges.
    let (status, dashboard) =
        send(&app, get(&format!("/api/dashboard/{}", org_id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_queries"], 2);
    assert_eq!(dashboard["total_users"], 1);
}

#[tokio::test]
async fn query_without_credentials_is_unauthorized() {
    let app = app(MockReasoningEngine::answering("ok"));
    let token = register(&app, "dev@example.com").await;
    let org_id = create_org(&app, &token, "acme").await;

    let (status, _) = send(
        &app,
        post("/api/query", None, json!({ "org_id": org_id, "question": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn org_scoped_routes_reject_non_members() {
    let app = app(MockReasoningEngine::answering("ok"));
    let owner = register(&app, "owner@example.com").await;
    let outsider = register(&app, "outsider@example.com").await;
    let org_id = create_org(&app, &owner, "acme").await;

    for uri in [
        format!("/api/dashboard/{}", org_id),
        format!("/api/conversations/{}", org_id),
        format!("/api/generateApiKey/{}", org_id),
        format!("/api/guardrails/{}", org_id),
        format!("/api/sources/{}", org_id),
    ] {
        let (status, _) = send(&app, get(&uri, Some(&outsider))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} should be forbidden", uri);
    }

    let (status, _) = send(&app, get(&format!("/api/dashboard/{}", org_id), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guardrails_merge_and_reappear_in_the_prompt() {
    let app = app(MockReasoningEngine::answering("ok"));
    let token = register(&app, "dev@example.com").await;
    let org_id = create_org(&app, &token, "acme").await;

    let (status, body) = send(
        &app,
        post(
            "/api/guardrails",
            Some(&token),
            json!({ "org_id": org_id, "guardrails": ["no pricing", "no legal advice"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guardrails"].as_array().unwrap().len(), 2);

    // Merging an overlapping set does not duplicate.
    let (_, body) = send(
        &app,
        post(
            "/api/guardrails",
            Some(&token),
            json!({ "org_id": org_id, "guardrails": ["no pricing", "be concise"] }),
        ),
    )
    .await;
    assert_eq!(body["guardrails"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, get(&format!("/api/guardrails/{}", org_id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guardrails"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn duplicate_source_location_conflicts_within_an_org() {
    let app = app(MockReasoningEngine::answering("ok"));
    let token = register(&app, "dev@example.com").await;
    let org_id = create_org(&app, &token, "acme").await;

    let source = json!({
        "org_id": org_id,
        "name": "docs",
        "type": "webpage",
        "config": { "url": "https://docs.example.com" }
    });
    let (status, _) = send(&app, post("/api/sources", Some(&token), source.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post("/api/sources", Some(&token), source)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_SOURCE");

    let (status, body) = send(&app, get(&format!("/api/sources/{}", org_id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn engine_failure_surfaces_as_bad_gateway() {
    let app = app(MockReasoningEngine::failing());
    let token = register(&app, "dev@example.com").await;

    let (status, body) = send(
        &app,
        post(
            "/api/organizations",
            Some(&token),
            json!({ "name": "acme" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_FAILURE");

    // Nothing was persisted for the failed creation.
    let (_, orgs) = send(&app, get("/api/organizations", Some(&token))).await;
    assert!(orgs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn revoked_api_key_stops_working() {
    let app = app(MockReasoningEngine::answering("ok"));
    let token = register(&app, "dev@example.com").await;
    let org_id = create_org(&app, &token, "acme").await;

    let (_, body) = send(&app, get(&format!("/api/generateApiKey/{}", org_id), Some(&token))).await;
    let api_key = body["api_key"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/deleteApiKey/{}", api_key))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .header("x-api-key", &api_key)
        .body(Body::from(
            json!({ "org_id": org_id, "question": "hi" }).to_string(),
        ))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn added_member_gains_org_access() {
    let app = app(MockReasoningEngine::answering("ok"));
    let owner = register(&app, "owner@example.com").await;
    let member = register(&app, "member@example.com").await;
    let org_id = create_org(&app, &owner, "acme").await;

    let (status, _) = send(
        &app,
        post(
            &format!("/api/addAdminToOrg/{}", org_id),
            Some(&owner),
            json!({ "email": "member@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get(&format!("/api/sources/{}", org_id), Some(&member))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn version_and_health_are_public() {
    let app = app(MockReasoningEngine::answering("ok"));

    let (status, body) = send(&app, get("/version", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());

    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
