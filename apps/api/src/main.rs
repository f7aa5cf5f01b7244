//! Deskhive API composition root.

#![forbid(unsafe_code)]

mod auth;
mod config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use deskhive_application::{
    AccessService, DepartmentService, DirectoryService, DocumentService, GrantService,
    ProfileService, ScopeCache, SessionResolver, TenantService,
};
use deskhive_core::AppError;
use deskhive_infrastructure::{
    HttpIdentityProvider, PostgresDepartmentRepository, PostgresDocumentRepository,
    PostgresGrantRepository, PostgresProfileRepository, PostgresRoleRepository,
    PostgresTenantRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let profile_repository = Arc::new(PostgresProfileRepository::new(pool.clone()));
    let grant_repository = Arc::new(PostgresGrantRepository::new(pool.clone()));
    let department_repository = Arc::new(PostgresDepartmentRepository::new(pool.clone()));
    let document_repository = Arc::new(PostgresDocumentRepository::new(pool.clone()));
    let tenant_repository = Arc::new(PostgresTenantRepository::new(pool.clone()));

    let identity_provider = Arc::new(HttpIdentityProvider::new(
        reqwest::Client::new(),
        &config.identity_provider_url,
    ));

    let access_service = AccessService::new(
        profile_repository.clone(),
        grant_repository.clone(),
        ScopeCache::new(),
    );
    let profile_service = ProfileService::new(
        identity_provider,
        profile_repository.clone(),
        access_service.clone(),
        SessionResolver::new(),
    );
    let directory_service = DirectoryService::new(
        profile_repository.clone(),
        role_repository,
        access_service.clone(),
    );
    let grant_service = GrantService::new(
        grant_repository,
        profile_repository.clone(),
        access_service.clone(),
    );
    let document_service =
        DocumentService::new(document_repository.clone(), access_service.clone());
    let department_service =
        DepartmentService::new(department_repository.clone(), access_service.clone());
    let tenant_service = TenantService::new(
        tenant_repository,
        profile_repository,
        department_repository,
        document_repository,
        access_service,
    );

    let app_state = AppState {
        profile_service,
        directory_service,
        grant_service,
        document_service,
        department_service,
        tenant_service,
        frontend_url: config.frontend_url.clone(),
    };

    let protected_routes = Router::new()
        .route(
            "/api/documents",
            get(handlers::documents::list_documents_handler)
                .post(handlers::documents::register_document_handler),
        )
        .route("/api/users", get(handlers::users::list_users_handler))
        .route("/api/users/invite", post(handlers::users::invite_user_handler))
        .route("/api/users/{user_id}", put(handlers::users::update_user_handler))
        .route(
            "/api/users/{user_id}/grants",
            get(handlers::grants::list_user_grants_handler)
                .post(handlers::grants::create_grant_handler),
        )
        .route(
            "/api/grants/{grant_id}",
            delete(handlers::grants::revoke_grant_handler),
        )
        .route("/api/roles", get(handlers::users::list_roles_handler))
        .route(
            "/api/departments",
            get(handlers::departments::list_departments_handler)
                .post(handlers::departments::create_department_handler),
        )
        .route(
            "/api/departments/{department_id}",
            put(handlers::departments::update_department_handler),
        )
        .route(
            "/api/companies",
            get(handlers::companies::list_companies_handler)
                .post(handlers::companies::create_company_handler),
        )
        .route("/api/dashboard", get(handlers::dashboard::dashboard_handler))
        .route(
            "/api/settings",
            get(handlers::settings::get_settings_handler)
                .put(handlers::settings::update_settings_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&config.api_host).map_err(|error| {
        AppError::Internal(format!("invalid API_HOST '{}': {error}", config.api_host))
    })?;
    let address = SocketAddr::from((host, config.api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "deskhive-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
