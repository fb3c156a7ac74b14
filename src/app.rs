use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, categories, collaborators, items, lists, meal_plans, pantry, recipes, stores};
use crate::middleware::session_auth_middleware;
use crate::state::AppState;

/// Assemble the full router. Auth routes are public; everything under
/// /api/v1 passes through the session gate before any handler runs.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router {
    Router::new()
        .nest("/api/v1", protected_routes())
        .route_layer(middleware::from_fn(session_auth_middleware))
}

fn protected_routes() -> Router {
    Router::new()
        // Session introspection
        .route("/auth/whoami", get(auth::whoami))
        // Shopping lists
        .route("/lists", get(lists::index).post(lists::create))
        .route(
            "/lists/:id",
            get(lists::show).patch(lists::update).delete(lists::destroy),
        )
        .route("/lists/:id/complete", post(lists::complete))
        .route("/lists/:id/duplicate", post(lists::duplicate))
        .route("/lists/:id/items", post(items::create))
        .route(
            "/lists/:id/collaborators",
            get(collaborators::index).post(collaborators::create),
        )
        .route(
            "/lists/:id/collaborators/:user_id",
            delete(collaborators::destroy),
        )
        // List items
        .route("/items/:item_id", patch(items::update).delete(items::destroy))
        .route("/items/:item_id/check", post(items::check))
        // Recipes
        .route("/recipes", get(recipes::index).post(recipes::create))
        .route(
            "/recipes/:id",
            get(recipes::show).patch(recipes::update).delete(recipes::destroy),
        )
        // Meal plans
        .route("/meal-plans", get(meal_plans::index).post(meal_plans::create))
        .route(
            "/meal-plans/:id",
            get(meal_plans::show)
                .patch(meal_plans::update)
                .delete(meal_plans::destroy),
        )
        // Stores and favorites. The favorites routes must be registered
        // before the :id matcher would otherwise shadow them.
        .route(
            "/stores/favorites",
            get(stores::favorites)
                .post(stores::add_favorite)
                .delete(stores::remove_favorite),
        )
        .route("/stores", get(stores::index).post(stores::create))
        .route(
            "/stores/:id",
            get(stores::show).patch(stores::update).delete(stores::destroy),
        )
        // Categories
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/search", get(categories::search))
        .route("/categories/usage-stats", get(categories::usage_stats))
        // Pantry
        .route("/pantry", get(pantry::index).post(pantry::create))
        .route(
            "/pantry/:id",
            get(pantry::show).patch(pantry::update).delete(pantry::destroy),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "basket-api",
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

async fn health(Extension(state): Extension<AppState>) -> (StatusCode, Json<Value>) {
    match crate::database::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"status": "healthy"}})),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": {"code": "SERVICE_UNAVAILABLE", "message": "Database is unreachable"}
                })),
            )
        }
    }
}
