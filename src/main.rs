//! Unilib Server - University Library Management System

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unilib_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("unilib_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Unilib Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool.clone());
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.email.clone(),
        config.circulation.clone(),
    )
    .expect("Failed to create services");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        pool,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication and member account
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/dashboard", get(api::auth::dashboard))
        .route("/auth/profile", get(api::auth::get_profile))
        .route("/auth/profile", put(api::auth::update_profile))
        .route("/auth/loans", get(api::auth::my_loans))
        .route("/auth/reservations", get(api::auth::my_reservations))
        .route("/auth/fines", get(api::auth::my_fines))
        // Catalog
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/books/:id/copies", post(api::books::create_copy))
        .route("/books/:id/reserve", post(api::reservations::reserve_book))
        .route("/copies/:id", put(api::books::update_copy))
        .route("/copies/:id", delete(api::books::delete_copy))
        .route("/authors", get(api::books::list_authors))
        .route("/authors", post(api::books::create_author))
        .route("/authors/:id", get(api::books::get_author))
        .route("/genres", get(api::books::list_genres))
        .route("/genres", post(api::books::create_genre))
        .route("/genres/:slug", get(api::books::get_genre))
        .route("/publishers", get(api::books::list_publishers))
        .route("/publishers", post(api::books::create_publisher))
        // Users and staff directory
        .route("/users", get(api::users::list_users))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", put(api::users::update_user))
        .route("/users/:id", delete(api::users::deactivate_user))
        .route("/users/:id/loans", get(api::loans::get_user_loans))
        .route("/staff", get(api::users::list_staff))
        // Loans
        .route("/loans", get(api::loans::list_loans))
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/refresh-overdue", post(api::loans::refresh_overdue))
        .route("/loans/:id/return", post(api::loans::return_loan))
        .route("/loans/:id/renew", post(api::loans::renew_loan))
        .route("/loans/:id/lost", post(api::loans::mark_lost))
        // Reservations
        .route("/reservations", get(api::reservations::list_reservations))
        .route(
            "/reservations/expire-stale",
            post(api::reservations::expire_stale),
        )
        .route(
            "/reservations/:id/cancel",
            post(api::reservations::cancel_reservation),
        )
        .route(
            "/reservations/:id/fulfill",
            post(api::reservations::fulfill_reservation),
        )
        // Fines
        .route("/fines", get(api::fines::list_fines))
        .route("/fines", post(api::fines::create_fine))
        .route("/fines/:id/pay", post(api::fines::pay_fine))
        .route("/fines/:id/waive", post(api::fines::waive_fine))
        // Institutional repository
        .route("/documents", get(api::documents::list_documents))
        .route("/documents", post(api::documents::submit_document))
        .route("/documents/pending", get(api::documents::pending_documents))
        .route("/documents/:id", get(api::documents::get_document))
        .route(
            "/documents/:id/download",
            get(api::documents::download_document),
        )
        .route("/documents/:id/review", post(api::documents::review_document))
        .route("/collections", get(api::documents::list_collections))
        // Blog
        .route("/posts", get(api::blog::list_posts))
        .route("/posts", post(api::blog::create_post))
        .route("/posts/:slug", get(api::blog::get_post))
        .route("/posts/:id", put(api::blog::update_post))
        .route("/posts/:id", delete(api::blog::delete_post))
        .route("/posts/:slug/comments", post(api::blog::create_comment))
        .route("/comments/:id/approve", post(api::blog::approve_comment))
        .route("/comments/:id", delete(api::blog::reject_comment))
        .route("/categories", get(api::blog::list_categories))
        .route("/tags", get(api::blog::list_tags))
        // Events
        .route("/events", get(api::events::list_events))
        .route("/events", post(api::events::create_event))
        .route("/events/:slug", get(api::events::get_event))
        .route("/events/:slug", put(api::events::update_event))
        .route("/events/:slug/register", post(api::events::register_for_event))
        .route(
            "/events/:slug/register",
            delete(api::events::unregister_from_event),
        )
        .route(
            "/events/:slug/registrations",
            get(api::events::list_registrations),
        )
        .route("/registrations/:id/attend", post(api::events::mark_attended))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .route("/stats/popular-books", get(api::stats::popular_books))
        .route("/stats/top-searches", get(api::stats::top_searches))
        .route("/stats/activity", get(api::stats::activity_feed))
        // Contact form and newsletter
        .route("/contact", post(api::contact::send_message))
        .route(
            "/newsletter/subscribe",
            post(api::contact::subscribe_newsletter),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
