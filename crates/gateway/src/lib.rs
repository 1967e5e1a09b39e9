//! HTTP API gateway for ProfileOS.
//!
//! Exposes REST endpoints for profiles, personalized investor queries,
//! interaction history, and thesis management.
//!
//! Built on Axum. Handlers stay thin: they deserialize, call into the
//! advisor crate, and map domain errors to status codes. All domain
//! rules live below this layer.

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use profileos_advisor::{ContextAssembler, QueryEngine, QueryOutcome, ThesisDraft, ThesisManager};
use profileos_core::error::Error;
use profileos_core::interaction::Interaction;
use profileos_core::profile::{NewProfile, Profile};
use profileos_core::store::{InteractionLog, ProfileStore, ThesisStore};
use profileos_core::thesis::{Thesis, ThesisPatch};

/// Requested page sizes above this are clamped, not rejected.
const MAX_LIST_LIMIT: usize = 100;

/// Shared application state for the gateway.
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub interactions: Arc<dyn InteractionLog>,
    pub engine: QueryEngine,
    pub theses: ThesisManager,
    pub interaction_list_limit: usize,
}

type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    // CORS: permissive on methods/headers, no credentials.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/users", post(create_user_handler))
        .route("/users/{id}", get(get_user_handler))
        .route("/users/{id}/interactions", get(list_interactions_handler))
        .route("/users/{id}/theses", get(list_theses_handler))
        .route("/investor/query", post(investor_query_handler))
        .route("/theses", post(create_thesis_handler))
        .route("/theses/{id}", patch(patch_thesis_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the storage backend and completion provider from config and
/// wires them into a single shared state.
pub async fn start(
    config: profileos_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let (profiles, interactions, theses_store): (
        Arc<dyn ProfileStore>,
        Arc<dyn InteractionLog>,
        Arc<dyn ThesisStore>,
    ) = match config.storage.backend.as_str() {
        "memory" => {
            let store = Arc::new(profileos_store::MemoryStore::new());
            (store.clone(), store.clone(), store)
        }
        _ => {
            let path = config.storage.sqlite_path();
            let store = Arc::new(profileos_store::SqliteStore::new(&path).await?);
            info!(path = %path, "SQLite storage ready");
            (store.clone(), store.clone(), store)
        }
    };

    let router = profileos_providers::router::build_from_config(&config);
    let provider = router
        .default()
        .ok_or("No default provider configured — set an API key")?;

    let assembler = ContextAssembler::new(profiles.clone(), interactions.clone())
        .with_history_window(config.context.history_window);

    let engine = QueryEngine::new(
        assembler,
        interactions.clone(),
        provider,
        &config.default_model,
    )
    .with_temperature(config.default_temperature)
    .with_max_tokens(Some(config.default_max_tokens));

    let state = Arc::new(AppState {
        profiles,
        interactions,
        engine,
        theses: ThesisManager::new(theses_store),
        interaction_list_limit: config.context.interaction_list_limit,
    });

    let app = build_router(state);

    info!(addr = %addr, backend = %config.storage.backend, "ProfileOS gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Error mapping ---

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Wraps the domain error so it can carry an HTTP status.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::InvalidInput { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Error::UserNotFound { .. } => (StatusCode::NOT_FOUND, "User not found".to_string()),
            Error::ThesisNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Thesis not found".to_string())
            }
            Error::Completion(e) => {
                error!(error = %e, "Completion service failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "Completion service unavailable".to_string(),
                )
            }
            e => {
                error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_user_handler(
    State(state): State<SharedState>,
    Json(new): Json<NewProfile>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let profile = state.profiles.create(new).await.map_err(Error::from)?;
    info!(user_id = %profile.id, "Created user profile");
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn get_user_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profiles
        .get(&id)
        .await
        .map_err(Error::from)?
        .ok_or(Error::UserNotFound { user_id: id })?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    limit: Option<usize>,
}

async fn list_interactions_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Interaction>>, ApiError> {
    // Unknown users get an empty list, same as users with no history.
    let limit = params
        .limit
        .unwrap_or(state.interaction_list_limit)
        .min(MAX_LIST_LIMIT);
    let interactions = state
        .interactions
        .recent(&id, limit)
        .await
        .map_err(Error::from)?;
    Ok(Json(interactions))
}

#[derive(Deserialize)]
struct InvestorQueryRequest {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    question: String,
}

async fn investor_query_handler(
    State(state): State<SharedState>,
    Json(req): Json<InvestorQueryRequest>,
) -> Result<Json<QueryOutcome>, ApiError> {
    let outcome = state.engine.ask(&req.user_id, &req.question).await?;
    Ok(Json(outcome))
}

async fn create_thesis_handler(
    State(state): State<SharedState>,
    Json(draft): Json<ThesisDraft>,
) -> Result<(StatusCode, Json<Thesis>), ApiError> {
    let thesis = state.theses.create(draft).await?;
    Ok((StatusCode::CREATED, Json(thesis)))
}

async fn list_theses_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Thesis>>, ApiError> {
    let theses = state.theses.list(&id).await?;
    Ok(Json(theses))
}

async fn patch_thesis_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(patch): Json<ThesisPatch>,
) -> Result<Json<Thesis>, ApiError> {
    let thesis = state.theses.patch(&id, patch).await?;
    Ok(Json(thesis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use profileos_core::completion::{CompletionProvider, CompletionRequest};
    use profileos_core::error::CompletionError;
    use profileos_store::MemoryStore;
    use tower::ServiceExt;

    struct StubProvider {
        reply: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            if self.fail {
                Err(CompletionError::Network("connection refused".into()))
            } else {
                Ok(self.reply.to_string())
            }
        }
    }

    fn test_app(provider: StubProvider) -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let assembler = ContextAssembler::new(store.clone(), store.clone());
        let engine = QueryEngine::new(assembler, store.clone(), Arc::new(provider), "test-model");

        let state = Arc::new(AppState {
            profiles: store.clone(),
            interactions: store.clone(),
            engine,
            theses: ThesisManager::new(store.clone()),
            interaction_list_limit: 20,
        });

        (build_router(state), store)
    }

    fn ok_app() -> (Router, Arc<MemoryStore>) {
        test_app(StubProvider {
            reply: "Yes, given your style.",
            fail: false,
        })
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = ok_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_and_fetch_user() {
        let (app, _) = ok_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/users",
                serde_json::json!({"risk_profile": "high", "style": "aggressive"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["risk_profile"], "high");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/users/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["style"], "aggressive");
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (app, _) = ok_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "User not found");
    }

    #[tokio::test]
    async fn investor_query_end_to_end() {
        let (app, store) = ok_app();

        let user = store
            .create(NewProfile {
                external_address: None,
                risk_profile: Some(profileos_core::profile::RiskProfile::High),
                time_horizon: Some(profileos_core::profile::TimeHorizon::Short),
                style: Some("aggressive".into()),
            })
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/investor/query",
                serde_json::json!({"user_id": user.id, "question": "Should I buy?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["answer"], "Yes, given your style.");
        assert_eq!(body["user_id"], user.id.as_str());
        assert!(!body["interaction_id"].as_str().unwrap().is_empty());

        let logged = store.recent(&user.id, 20).await.unwrap();
        assert_eq!(logged.len(), 1);
    }

    #[tokio::test]
    async fn blank_query_fields_are_400() {
        let (app, _) = ok_app();
        let response = app
            .oneshot(post_json(
                "/investor/query",
                serde_json::json!({"user_id": "", "question": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "user_id and question are required"
        );
    }

    #[tokio::test]
    async fn completion_failure_is_502_and_not_logged() {
        let (app, store) = test_app(StubProvider {
            reply: "",
            fail: true,
        });

        let user = store.create(NewProfile::default()).await.unwrap();
        let response = app
            .oneshot(post_json(
                "/investor/query",
                serde_json::json!({"user_id": user.id, "question": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(store.recent(&user.id, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn interaction_list_respects_limit_param() {
        let (app, store) = ok_app();
        let user = store.create(NewProfile::default()).await.unwrap();
        for i in 0..5 {
            store.append(&user.id, &format!("q{i}"), "a").await.unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/users/{}/interactions?limit=2", user.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["question"], "q4");
    }

    #[tokio::test]
    async fn thesis_create_list_patch_flow() {
        let (app, _) = ok_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/theses",
                serde_json::json!({
                    "user_id": "u1",
                    "asset_symbol": "nvda",
                    "title": "AI demand",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = json_body(response).await;
        assert_eq!(created["asset_symbol"], "NVDA");
        assert_eq!(created["status"], "open");
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/theses/{id}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"status":"closed"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "closed");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/u1/theses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patch_unknown_thesis_is_404() {
        let (app, _) = ok_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/theses/missing")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn thesis_missing_required_field_is_400() {
        let (app, _) = ok_app();
        let response = app
            .oneshot(post_json(
                "/theses",
                serde_json::json!({"user_id": "u1", "asset_symbol": " ", "title": "t"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
