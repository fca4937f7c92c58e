//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::future::Future;
use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use student_records::Trace;
#[cfg(debug_assertions)]
use student_records::doc::ApiDoc;
use student_records::domain::StudentService;
use student_records::domain::ports::StudentRepository;
use student_records::inbound::http::health::{HealthState, live, ready};
use student_records::inbound::http::state::HttpState;
use student_records::inbound::http::students::{create_student, list_students};
use student_records::inbound::http::validation::json_config;
use student_records::outbound::memory::InMemoryStudentRepository;
use student_records::outbound::persistence::{
    DbPool, DieselStudentRepository, PoolConfig, run_pending_migrations,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn wire_service<R>(repository: R) -> HttpState
where
    R: StudentRepository + 'static,
{
    let service = Arc::new(StudentService::new(Arc::new(repository)));
    HttpState::new(service.clone(), service)
}

/// Use PostgreSQL when a pool is configured, otherwise a process-local store.
fn build_http_state(pool: Option<DbPool>) -> HttpState {
    match pool {
        Some(pool) => wire_service(DieselStudentRepository::new(pool)),
        None => wire_service(InMemoryStudentRepository::new()),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(list_students)
        .service(create_student);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Open the storage backend described by `settings`.
///
/// Applies pending migrations unless `skip_migrations` is set. Without a
/// database URL the server falls back to in-memory storage.
///
/// # Errors
///
/// Propagates migration and pool construction failures as I/O errors so
/// startup aborts instead of serving from a half-initialised database.
pub async fn build_server_config(settings: &ServerSettings) -> std::io::Result<ServerConfig> {
    let config = ServerConfig::new(settings.bind_addr()?);

    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; student records are kept in memory");
        return Ok(config);
    };

    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        run_pending_migrations(&database_url)
            .await
            .map_err(std::io::Error::other)?;
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(std::io::Error::other)?;
    Ok(config.with_db_pool(pool))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig { bind_addr, db_pool } = config;
    let deps = AppDependencies {
        health_state,
        http_state: web::Data::new(build_http_state(db_pool)),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .disable_signals()
        .bind(bind_addr)?
        .run();
    info!(%bind_addr, "listening");
    Ok(server)
}

/// Resolve on Ctrl-C, or on SIGTERM where Unix signals are available.
///
/// # Errors
///
/// Returns the I/O error raised while installing a signal listener.
pub async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use actix_web::rt::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = actix_web::rt::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        actix_web::rt::signal::ctrl_c().await
    }
}

/// Wait for `signal`, fail liveness probes, then stop the server gracefully.
///
/// Liveness flips before in-flight requests drain.
pub async fn drain_on_shutdown<S>(
    health_state: web::Data<HealthState>,
    handle: ServerHandle,
    signal: S,
) where
    S: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        warn!(error = %err, "shutdown signal listener failed");
        return;
    }
    info!("shutdown requested; draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}
