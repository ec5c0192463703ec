// Identity Inspector - Web Server
// Serves derived identity views and the chain type registry over REST

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use identity_inspector::{
    bundle_fingerprint, default_overlays, derive_identity_view, seed_demo_data,
    ApiCapabilities, ChainTypeRegistry, IdentityLookup, IdentityView, InMemoryIdentityStore,
    InMemoryRegistrarSet, InMemorySubidentityIndex, PanelState, RegistrarInfo,
    RegistrarLookup,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    registry: Arc<ChainTypeRegistry>,
    identities: Arc<InMemoryIdentityStore>,
    registrars: Arc<InMemoryRegistrarSet>,
    subs: Arc<InMemorySubidentityIndex>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.into()),
        }
    }
}

/// Chain listing entry
#[derive(Serialize)]
struct ChainResponse {
    name: String,
    fingerprint: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/chains - List the chain type registry
async fn get_chains(State(state): State<AppState>) -> impl IntoResponse {
    let chains: Vec<ChainResponse> = state
        .registry
        .chain_names()
        .into_iter()
        .filter_map(|name| {
            state.registry.get(&name).map(|bundle| ChainResponse {
                fingerprint: bundle_fingerprint(bundle),
                name,
            })
        })
        .collect();

    Json(ApiResponse::ok(chains))
}

/// GET /api/registrars - Current registrar set
async fn get_registrars(State(state): State<AppState>) -> impl IntoResponse {
    let registrars: Vec<RegistrarInfo> = state.registrars.registrars();
    Json(ApiResponse::ok(registrars))
}

/// View query options: who is looking, and whether the judgement panel is open
#[derive(Deserialize, Default)]
struct ViewQuery {
    viewer: Option<String>,
    panel: Option<String>,
}

/// GET /api/identity/:address - Derived identity view
async fn get_identity(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    // Decode URL-encoded address
    let decoded_address = urlencoding::decode(&address)
        .unwrap_or_else(|_| address.clone().into())
        .into_owned();

    let panel = match query.panel.as_deref() {
        Some("open") => PanelState::Open,
        _ => PanelState::Closed,
    };

    let identity = state.identities.identity_of(&decoded_address);
    let view: Option<IdentityView> = derive_identity_view(
        &decoded_address,
        identity.as_ref(),
        ApiCapabilities::with_identity_lookup(),
        state.registrars.as_ref(),
        state.subs.as_ref(),
        query.viewer.as_deref(),
        panel,
    );

    match view {
        Some(view) => (StatusCode::OK, Json(ApiResponse::ok(Some(view)))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(
                None::<IdentityView>,
                format!("No identity section for {}", decoded_address),
            )),
        )
            .into_response(),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Identity Inspector - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Build the registry once at startup; it is immutable afterwards
    let registry = ChainTypeRegistry::build(HashMap::new(), default_overlays());
    println!("✓ Chain registry built: {} chains", registry.len());

    let identities = InMemoryIdentityStore::new();
    let registrars = InMemoryRegistrarSet::new();
    let subs = InMemorySubidentityIndex::new();
    seed_demo_data(&identities, &registrars, &subs);
    println!("✓ Demo identity data seeded: {} identities", identities.len());

    // Create shared state
    let state = AppState {
        registry: Arc::new(registry),
        identities: Arc::new(identities),
        registrars: Arc::new(registrars),
        subs: Arc::new(subs),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/chains", get(get_chains))
        .route("/registrars", get(get_registrars))
        .route("/identity/:address", get(get_identity))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Views:  http://localhost:3000/api/identity/5Alice");
    println!("   Chains: http://localhost:3000/api/chains");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
