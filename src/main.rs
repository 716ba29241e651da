mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::JwtValidator;
use crate::features::contributors::{
    routes as contributors_routes, ContributorService, PgContributorRepository,
};
use crate::features::daily_reports::{
    routes as daily_reports_routes, DailyReportService, PgDailyReportRepository,
};
use crate::features::exports::{routes as exports_routes, ExportService};
use crate::features::notifications::{
    InvitationMailer, LogNotifier, NotificationDispatcher, Notifier, SmtpNotifier,
};
use crate::features::projects::{routes as projects_routes, PgProjectRepository, ProjectService};
use crate::features::users::PgUserDirectory;
use crate::features::weekly_goals::{
    routes as weekly_goals_routes, PgWeeklyGoalRepository, WeeklyGoalService,
};
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

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        worker_threads,
        std::process::id()
    );

    let policy = config.period.policy();
    tracing::info!(
        "Configuration loaded: week starts {}, {}-day window, UTC offset {}",
        policy.week_start(),
        policy.window_days(),
        config.period.utc_offset
    );

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let jwt_validator = Arc::new(JwtValidator::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    // Repositories
    let project_repository = Arc::new(PgProjectRepository::new(pool.clone()));
    let contributor_repository = Arc::new(PgContributorRepository::new(pool.clone()));
    let goal_repository = Arc::new(PgWeeklyGoalRepository::new(pool.clone()));
    let report_repository = Arc::new(PgDailyReportRepository::new(pool.clone()));
    let user_directory = Arc::new(PgUserDirectory::new(pool.clone()));

    // Invitation mail goes through a bounded queue drained by one worker
    let (dispatcher, outbox) = NotificationDispatcher::channel(config.mail.queue_capacity);
    let notifier: Arc<dyn Notifier> = match &config.mail.smtp_host {
        Some(host) => {
            tracing::info!("Invitation mail via SMTP relay {}", host);
            Arc::new(
                SmtpNotifier::new(host, &config.mail, config.app.frontend_url.clone())
                    .map_err(|e| anyhow::anyhow!("Failed to configure SMTP: {}", e))?,
            )
        }
        None => {
            tracing::warn!("SMTP_HOST not set, invitation mail will only be logged");
            Arc::new(LogNotifier::new(config.app.frontend_url.clone()))
        }
    };
    let mailer = InvitationMailer::new(outbox, notifier);
    tokio::spawn(async move {
        mailer.run().await;
    });
    tracing::info!(
        "Invitation mailer spawned (queue capacity {})",
        config.mail.queue_capacity
    );

    // Services
    let contributor_service = Arc::new(ContributorService::new(
        contributor_repository,
        project_repository.clone(),
        user_directory,
        dispatcher,
    ));
    let weekly_goal_service = Arc::new(WeeklyGoalService::new(
        goal_repository,
        report_repository.clone(),
        project_repository.clone(),
        policy.clone(),
    ));
    let daily_report_service = Arc::new(DailyReportService::new(
        report_repository,
        project_repository.clone(),
        policy,
    ));
    let export_service = Arc::new(ExportService::new(
        Arc::clone(&weekly_goal_service),
        project_repository.clone(),
    ));
    let project_service = Arc::new(ProjectService::new(
        project_repository,
        Arc::clone(&contributor_service),
        Arc::clone(&weekly_goal_service),
    ));
    tracing::info!("Services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Every API route requires a bearer token
    let protected_routes = Router::new()
        .merge(projects_routes::routes(project_service))
        .merge(contributors_routes::routes(contributor_service))
        .merge(weekly_goals_routes::routes(weekly_goal_service))
        .merge(daily_reports_routes::routes(daily_report_service))
        .merge(exports_routes::routes(export_service))
        .route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(health_route)
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
