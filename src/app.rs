use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::task::JoinHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::state::AppState;

/// Builds the full HTTP application around `state`.
pub fn create_app(state: AppState) -> Router {
    let api = &state.config.api;
    let security = &state.config.security;

    let mut app = Router::new()
        // Public
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
        .merge(user_routes())
        .merge(store_routes())
        .merge(item_routes())
        .merge(tag_routes())
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));

    if security.enable_cors {
        app = app.layer(cors_layer(&security.cors_origins));
    }
    if api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn user_routes() -> Router<AppState> {
    use protected::{session, users};

    Router::new()
        .route("/register", post(public::auth::register))
        .route("/login", post(public::auth::login))
        .route("/refresh", post(session::refresh))
        .route("/logout", post(session::logout))
        .route("/user/:id", get(users::get_user).delete(users::delete_user))
}

fn store_routes() -> Router<AppState> {
    use protected::stores;

    Router::new()
        .route("/store", get(stores::list_stores).post(stores::create_store))
        .route("/store/:id", get(stores::get_store).delete(stores::delete_store))
}

fn item_routes() -> Router<AppState> {
    use protected::items;

    Router::new()
        .route("/item", get(items::list_items).post(items::create_item))
        .route(
            "/item/:id",
            get(items::get_item)
                .put(items::put_item)
                .delete(items::delete_item),
        )
}

fn tag_routes() -> Router<AppState> {
    use protected::tags;

    Router::new()
        .route(
            "/store/:id/tag",
            get(tags::list_store_tags).post(tags::create_store_tag),
        )
        .route("/tag/:id", get(tags::get_tag).delete(tags::delete_tag))
        .route(
            "/item/:id/tag/:tag_id",
            post(tags::link_tag).delete(tags::unlink_tag),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

/// Periodically drops revocations for tokens that have expired anyway.
pub fn spawn_blocklist_sweeper(state: AppState) -> JoinHandle<()> {
    let period = Duration::from_secs(state.config.security.blocklist_sweep_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = state.sweep_blocklist(chrono::Utc::now().timestamp()).await {
                tracing::warn!("Blocklist sweep failed: {}", e);
            }
        }
    })
}
