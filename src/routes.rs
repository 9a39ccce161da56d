// src/routes.rs

use std::any::Any;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Router completo da API, sem CORS (que depende da configuração).
pub fn app(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas estáticas têm precedência sobre `/{id}`
    let employee_routes = Router::new()
        .route(
            "/",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route("/assign-role", post(handlers::employees::assign_role))
        .route("/unassign-role", delete(handlers::employees::unassign_role))
        .route(
            "/{id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        )
        .route("/{id}/roles", put(handlers::employees::set_roles));

    let department_routes = Router::new()
        .route(
            "/",
            get(handlers::departments::list_departments)
                .post(handlers::departments::create_department),
        )
        .route(
            "/{id}",
            put(handlers::departments::update_department)
                .delete(handlers::departments::delete_department),
        );

    let role_routes = Router::new()
        .route(
            "/",
            get(handlers::roles::list_roles).post(handlers::roles::create_role),
        )
        .route(
            "/{id}",
            put(handlers::roles::update_role).delete(handlers::roles::delete_role),
        );

    // Tudo que não é /auth exige o Bearer token
    let guard = || axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/employees", employee_routes.route_layer(guard()))
        .nest("/api/departments", department_routes.route_layer(guard()))
        .nest("/api/roles", role_routes.route_layer(guard()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// CORS: uma origem específica ou qualquer uma.
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(AnyOrigin).allow_headers(AnyOrigin);

    Ok(match allowed_origin {
        Some(origin) => layer.allow_origin(HeaderValue::from_str(origin)?),
        None => layer.allow_origin(AnyOrigin),
    })
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

// Último recurso: um panic em handler vira 500 no formato padrão
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
