use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/api/health", get(public::health))
        .merge(auth_public_routes())
        // Protected (bearer token)
        .merge(auth_routes(state.clone()))
        .merge(note_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(public::signup))
        .route("/api/auth/login", post(public::login))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route(
            "/api/auth/me",
            get(auth::me_get).put(auth::me_put).delete(auth::me_delete),
        )
        .route("/api/auth/password", put(auth::password_put))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn note_routes(state: AppState) -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/api/notes", get(notes::notes_get).post(notes::notes_post))
        .route(
            "/api/notes/:id",
            get(notes::note_get)
                .put(notes::note_put)
                .delete(notes::note_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Only listed origins may call the API with credentials; an empty list
/// allows no cross-origin callers.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
