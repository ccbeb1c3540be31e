//! HTTP Endpoints
//!
//! REST API for catalog refresh, recognizer vocabulary and order sessions.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use menu_voice_agent::{OrderDecision, Vocabulary};
use menu_voice_core::{MenuItem, RawMenuItem};

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        // Catalogs
        .route("/api/catalogs/:catalog_id", put(put_catalog))
        .route("/api/catalogs/:catalog_id/menu", get(get_menu))
        .route("/api/catalogs/:catalog_id/vocabulary", get(get_vocabulary))
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", axum::routing::delete(end_session))
        .route("/api/sessions/:id/allergies", post(declare_allergy))
        .route("/api/sessions/:id/resolve", post(resolve))
        // Health
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Empty origin list allows any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed.len());
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers(Any)
}

#[derive(Debug, Deserialize)]
struct CatalogRequest {
    items: Vec<RawMenuItem>,
}

#[derive(Debug, Serialize)]
struct CatalogResponse {
    catalog_id: String,
    items: usize,
    enrichment_started: bool,
}

/// Replace a catalog and start enrichment in the background
async fn put_catalog(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
    Json(request): Json<CatalogRequest>,
) -> Result<(StatusCode, Json<CatalogResponse>), ServerError> {
    let mut ids = HashSet::new();
    for item in &request.items {
        if item.id.trim().is_empty() || item.name.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "Every item needs a non-empty id and name".to_string(),
            ));
        }
        if !ids.insert(item.id.as_str()) {
            return Err(ServerError::InvalidRequest(format!(
                "Duplicate item id: {}",
                item.id
            )));
        }
    }

    let items = state.put_catalog(&catalog_id, request.items);
    tracing::info!(catalog_id = %catalog_id, items = items.len(), "Catalog stored");

    let enrichment_started = match &state.enrichment {
        Some(service) if !items.is_empty() => {
            // Detached; merge serves partial enrichment meanwhile
            drop(service.spawn_enrich(catalog_id.clone(), items.as_ref().clone()));
            true
        }
        _ => false,
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(CatalogResponse {
            catalog_id,
            items: items.len(),
            enrichment_started,
        }),
    ))
}

async fn get_menu(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
) -> Result<Json<Vec<MenuItem>>, ServerError> {
    Ok(Json(state.merged_menu(&catalog_id)?))
}

async fn get_vocabulary(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
) -> Result<Json<Vocabulary>, ServerError> {
    let menu = state.merged_menu(&catalog_id)?;
    Ok(Json(state.engine.vocabulary(&menu)))
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    catalog_id: String,
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServerError> {
    let session_id = state.create_session(&request.catalog_id)?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": session_id })),
    ))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.end_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct AllergyRequest {
    restriction: String,
}

#[derive(Debug, Serialize)]
struct AllergyResponse {
    added: bool,
    allergies: Vec<String>,
}

async fn declare_allergy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AllergyRequest>,
) -> Result<Json<AllergyResponse>, ServerError> {
    if request.restriction.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Restriction must not be empty".to_string(),
        ));
    }

    let session = state.session(&id)?;
    let mut session = session.lock();
    let added = session.declare_allergy(&request.restriction);

    Ok(Json(AllergyResponse {
        added,
        allergies: session.allergies().iter().map(str::to_string).collect(),
    }))
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    transcript: String,
}

/// Resolve an utterance against the session's merged catalog
async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<OrderDecision>, ServerError> {
    let session = state.session(&id)?;
    let session = session.lock();
    let menu = state.merged_menu(session.catalog_id())?;
    Ok(Json(session.evaluate(&request.transcript, &menu)))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "catalogs": state.catalog_count(),
        "sessions": state.session_count(),
        "enrichment": state.enrichment.is_some(),
    }))
}

/// Ready when the generative backend (if any) answers
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let llm = match &state.llm {
        Some(backend) => Some((
            backend.model_name().to_string(),
            backend.is_available().await,
        )),
        None => None,
    };

    let ready = llm.as_ref().map_or(true, |(_, available)| *available);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "ready": ready,
            "llm": llm.map(|(model, available)| serde_json::json!({
                "model": model,
                "available": available,
            })),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use menu_voice_config::Settings;
    use menu_voice_core::{EnrichmentRecord, MenuEnricher};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TagEverything;

    #[async_trait]
    impl MenuEnricher for TagEverything {
        async fn enrich_batch(
            &self,
            items: &[RawMenuItem],
        ) -> menu_voice_core::Result<Vec<EnrichmentRecord>> {
            Ok(items
                .iter()
                .map(|i| EnrichmentRecord {
                    original_name: Some(i.name.clone()),
                    dietary_tags: vec!["nuts".to_string()],
                    ..Default::default()
                })
                .collect())
        }

        fn name(&self) -> &str {
            "tag-everything"
        }
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn catalog_body() -> serde_json::Value {
        serde_json::json!({
            "items": [
                { "id": "mk", "name": "Malai Kofta", "price": 1299 },
                { "id": "gn", "name": "Garlic Naan", "price": 399 },
                { "id": "fc", "name": "Fish Curry", "price": 1399 }
            ]
        })
    }

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Settings::default()).unwrap();
        let _ = create_router(state);
    }

    #[tokio::test]
    async fn test_order_flow() {
        let app = create_router(AppState::new(Settings::default()).unwrap());

        let (status, body) =
            send(&app, json_request("PUT", "/api/catalogs/s1", catalog_body())).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["items"], 3);
        assert_eq!(body["enrichment_started"], false);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/sessions", serde_json::json!({ "catalog_id": "s1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let resolve_uri = format!("/api/sessions/{}/resolve", session_id);
        let (status, body) = send(
            &app,
            json_request("POST", &resolve_uri, serde_json::json!({ "transcript": "garlic naan" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "accept");
        assert_eq!(body["item"]["id"], "gn");

        // Gluten allergy blocks naan through the static name table
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/sessions/{}/allergies", session_id),
                serde_json::json!({ "restriction": "Gluten" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], true);
        assert_eq!(body["allergies"], serde_json::json!(["gluten"]));

        let (_, body) = send(
            &app,
            json_request("POST", &resolve_uri, serde_json::json!({ "transcript": "garlic naan" })),
        )
        .await;
        assert_eq!(body["decision"], "safety_blocked");

        let (_, body) = send(
            &app,
            json_request("POST", &resolve_uri, serde_json::json!({ "transcript": "checkout" })),
        )
        .await;
        assert_eq!(body["decision"], "no_result");

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/sessions/{}", session_id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            json_request("POST", &resolve_uri, serde_json::json!({ "transcript": "garlic naan" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let app = create_router(AppState::new(Settings::default()).unwrap());

        let duplicate = serde_json::json!({
            "items": [
                { "id": "a", "name": "Roti", "price": 199 },
                { "id": "a", "name": "Dal", "price": 599 }
            ]
        });
        let (status, _) = send(&app, json_request("PUT", "/api/catalogs/s1", duplicate)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/sessions", serde_json::json!({ "catalog_id": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let get = Request::builder()
            .uri("/api/catalogs/nope/menu")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, get).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_background_enrichment_reaches_menu() {
        let state = AppState::new(Settings::default())
            .unwrap()
            .with_enricher(Arc::new(TagEverything));
        let app = create_router(state);

        let (status, body) =
            send(&app, json_request("PUT", "/api/catalogs/s1", catalog_body())).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["enrichment_started"], true);

        let mut enriched = false;
        for _ in 0..50 {
            let get = Request::builder()
                .uri("/api/catalogs/s1/menu")
                .body(Body::empty())
                .unwrap();
            let (_, body) = send(&app, get).await;
            if body[2]["dietaryTags"] == serde_json::json!(["nuts"]) {
                enriched = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(enriched, "enrichment never reached the menu");

        let get = Request::builder()
            .uri("/api/catalogs/s1/vocabulary")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, get).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keywords"][0], "malai kofta");
        assert_eq!(body["boost_terms"][0], serde_json::json!(["malai kofta", 2.0]));
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = create_router(AppState::new(Settings::default()).unwrap());

        let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, health).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let ready = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(&app, ready).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
    }
}
