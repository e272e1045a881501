use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        agent::handle_action,
        chat::{chat, chat_stream},
        debug::debug,
        health::{healthz, livez},
        sessions::get_session,
        tools::{
            cost_analysis, cost_optimization, encryption_status, idle_resources,
            resource_details, resource_health, resource_inventory, security_assessment,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Tool routes
        .route("/cost-analysis", post(cost_analysis))
        .route("/idle-resources", post(idle_resources))
        .route("/cost-optimization", post(cost_optimization))
        .route("/resource-inventory", post(resource_inventory))
        .route("/resource-details", post(resource_details))
        .route("/resource-health", post(resource_health))
        .route("/security-assessment", post(security_assessment))
        .route("/encryption-status", post(encryption_status))
        // Chat routes
        .route("/chat", post(chat))
        .route("/chat/stream", post(chat_stream))
        .route("/sessions/{id}", get(get_session))
        // Bedrock Agent action group
        .route("/agent/actions", post(handle_action))
        .route("/debug", get(debug))
        .layer(cors);

    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_backends() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["cloud"], "demo");
        assert_eq!(json["storage"], "inmemory");
        assert_eq!(json["cache_entries"], 0);
    }

    #[tokio::test]
    async fn test_tool_endpoint_without_body() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/resource-inventory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["operation"], "getResourceInventory");
        assert_eq!(json["data"]["summary"]["total"], 11);
        assert_eq!(json["metadata"]["version"], "1.0");
    }

    #[tokio::test]
    async fn test_tool_endpoint_invalid_parameter() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(post_json("/api/idle-resources", json!({ "cpu_threshold": 250 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["type"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_tool_endpoint_malformed_body() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cost-analysis")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["type"], "InvalidInput");
    }

    #[tokio::test]
    async fn test_resource_details_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(post_json(
                "/api/resource-details",
                json!({ "resource_id": "i-missing", "resource_type": "EC2" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(post_json("/api/chat", json!({ "message": "   " })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["message"], "Message cannot be empty");
    }

    #[tokio::test]
    async fn test_chat_then_session_transcript() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/chat",
                json!({ "message": "hello", "sessionId": "session-app-test" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["sessionId"], "session-app-test");
        assert_eq!(json["data"]["trace"]["fallback"], true);
        assert!(json["metadata"]["model"]
            .as_str()
            .unwrap()
            .ends_with("(simulated)"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sessions/session-app-test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["session_id"], "session-app-test");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sessions/session-nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_stream_events() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(post_json("/api/chat/stream", json!({ "message": "hello" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("event: chunk"));
        assert!(text.contains("event: done"));
        assert!(!text.contains("event: error"));
    }

    #[tokio::test]
    async fn test_agent_action_envelope() {
        let app = create_app(AppState::default());

        let event = json!({
            "messageVersion": "1.0",
            "actionGroup": "",
            "apiPath": "/resource-health",
            "httpMethod": "POST",
            "parameters": [{ "name": "resource_type", "type": "string", "value": "RDS" }]
        });
        let response = app
            .oneshot(post_json("/api/agent/actions", event))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["messageVersion"], "1.0");
        assert_eq!(json["response"]["actionGroup"], "aws-ai-concierge-tools");
        assert_eq!(json["response"]["apiPath"], "/resource-health");
        assert_eq!(json["response"]["httpStatusCode"], 200);

        let body = json["response"]["responseBody"]["application/json"]["body"]
            .as_str()
            .unwrap();
        let tool: Value = serde_json::from_str(body).unwrap();
        assert_eq!(tool["success"], true);
        assert_eq!(tool["data"]["total"], 2);
    }

    #[tokio::test]
    async fn test_agent_unknown_operation() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(post_json(
                "/api/agent/actions",
                json!({ "actionGroup": "tools", "apiPath": "/launch-rockets" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["response"]["actionGroup"], "tools");
        assert_eq!(json["response"]["httpStatusCode"], 400);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chat")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
