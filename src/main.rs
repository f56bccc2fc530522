mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::auth::services::TokenService;
use crate::features::auth::{routes as auth_routes, AuthService, SessionService};
use crate::features::map::{routes as map_routes, MapService};
use crate::features::news::{routes as news_routes, NewsService};
use crate::features::plumbers::{routes as plumbers_routes, PlumberService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::{routes as users_routes, UserService};
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize MinIO client for storage
    let minio_client = Arc::new(
        modules::storage::MinIOClient::new(config.minio.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    // Ensure bucket exists and public images are readable
    minio_client
        .prepare()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare MinIO bucket: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );

    // Initialize auth
    let session_service = Arc::new(SessionService::new(
        pool.clone(),
        TokenService::new(&config.auth.jwt_secret),
        config.auth.session_ttl,
    ));
    let user_service = Arc::new(UserService::new(pool.clone(), Arc::clone(&minio_client)));
    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        Arc::clone(&session_service),
        Arc::clone(&user_service),
        config.auth.clone(),
        config.app.frontend_url.clone(),
    ));
    tracing::info!(
        "Auth services initialized ({} admin email(s) configured)",
        config.auth.admin_emails.len()
    );

    // Initialize content services
    let report_service = Arc::new(ReportService::new(
        pool.clone(),
        Arc::clone(&minio_client),
        config.map.clone(),
    ));
    let news_service = Arc::new(NewsService::new(pool.clone(), Arc::clone(&minio_client)));
    let plumber_service = Arc::new(PlumberService::new(pool.clone()));
    tracing::info!("Report, news and plumber services initialized");

    // Initialize Map Service
    let map_service = Arc::new(MapService::new(
        config.map.clone(),
        Arc::clone(&report_service),
    ));
    tracing::info!("Map service initialized for {}", config.map.city_name);

    // Initialize Admin Service
    let admin_service = Arc::new(AdminService::new(pool.clone()));
    tracing::info!("Admin service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // API routes. Access is decided by the gate below, not by router grouping.
    let api_routes = Router::new()
        .merge(auth_routes::routes(auth_service))
        .merge(users_routes::routes(user_service))
        .merge(reports_routes::routes(report_service))
        .merge(news_routes::routes(news_service))
        .merge(plumbers_routes::routes(plumber_service))
        .merge(map_routes::routes(map_service))
        .nest("/api/admin", admin_routes::routes(admin_service));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(from_fn_with_state(session_service, middleware::access_gate))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
