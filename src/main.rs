mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{JwksClient, JwtValidator};
use crate::features::commissions::{routes as commissions_routes, CommissionService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::establishments::{
    routes as establishments_routes, EstablishmentService, OverviewService,
};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::groupings::{routes as groupings_routes, GroupingService};
use crate::features::prescriptions::{routes as prescriptions_routes, PrescriptionService};
use crate::features::regulatory_files::{
    routes as regulatory_files_routes, RegulatoryFileService,
};
use crate::features::tasks::{routes as tasks_routes, TaskService};
use crate::features::users::{routes as users_routes, ActivityLogService, UserService};
use crate::features::verifications::{routes as verifications_routes, VerificationService};
use crate::features::visits::{
    routes as visits_routes, PdfRenderer, VisitReportService, VisitService,
};
use crate::modules::identity::{IdentityAdminClient, TokenManager};
use crate::modules::storage::{MinIOClient, ObjectStore};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
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
        // Report rendering runs on the blocking pool
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env before the subscriber so RUST_LOG is picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Auth
    let jwks_client = Arc::new(JwksClient::new(
        &config.auth.issuer,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized (issuer: {})", config.auth.issuer);

    // Identity provider management API, used when admins create accounts
    let token_manager = Arc::new(TokenManager::new(&config.identity_admin));
    let identity_client = Arc::new(IdentityAdminClient::new(
        &config.identity_admin.api_base_url,
        token_manager,
    ));

    // Object storage
    let minio_client = Arc::new(
        MinIOClient::new(config.minio.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    minio_client
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );
    let store: Arc<dyn ObjectStore> = minio_client;

    // Services
    let activity_log_service = Arc::new(ActivityLogService::new(pool.clone()));
    let user_service = Arc::new(UserService::new(
        pool.clone(),
        identity_client,
        Arc::clone(&activity_log_service),
        config.identity_admin.temporary_password.clone(),
    ));
    let establishment_service = Arc::new(EstablishmentService::new(pool.clone()));
    let overview_service = Arc::new(OverviewService::new(pool.clone()));
    let grouping_service = Arc::new(GroupingService::new(pool.clone()));
    let commission_service = Arc::new(CommissionService::new(pool.clone()));
    let prescription_service = Arc::new(PrescriptionService::new(pool.clone()));
    let regulatory_file_service = Arc::new(RegulatoryFileService::new(pool.clone()));
    let verification_service = Arc::new(VerificationService::new(pool.clone()));
    let visit_service = Arc::new(VisitService::new(pool.clone()));
    let visit_report_service = Arc::new(VisitReportService::new(
        pool.clone(),
        Arc::clone(&store),
        Arc::new(PdfRenderer::new(&config.report)),
    ));
    let task_service = Arc::new(TaskService::new(pool.clone()));
    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    let file_service = Arc::new(FileService::new(pool.clone(), store));
    tracing::info!(
        "Services initialized (report fonts: {}/{})",
        config.report.fonts_dir.display(),
        config.report.font_family
    );

    // Swagger
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi);
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new().merge(swagger_ui).layer(from_fn_with_state(
            Arc::new(credentials),
            middleware::swagger_basic_auth,
        ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(swagger_ui)
    };

    // Every API route requires a bearer token
    let protected_routes = Router::new()
        .merge(establishments_routes(establishment_service, overview_service))
        .merge(groupings_routes(grouping_service))
        .merge(commissions_routes(commission_service))
        .merge(prescriptions_routes(prescription_service))
        .merge(regulatory_files_routes(regulatory_file_service))
        .merge(verifications_routes(verification_service))
        .merge(visits_routes(visit_service, visit_report_service))
        .merge(tasks_routes(task_service))
        .merge(users_routes(user_service, activity_log_service))
        .merge(dashboard_routes(dashboard_service))
        .merge(files_routes(file_service))
        .route_layer(from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Use the client's X-Request-Id or mint a UUID v7
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

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
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
