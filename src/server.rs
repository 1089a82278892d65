//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: record store selection,
//! migrations, admin bootstrap, metrics recorder, REST API and graceful
//! shutdown. The CLI binary is a thin wrapper around it.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{SessionRegistry, SharedSessionRegistry};
use crate::config::{AdminConfig, AppConfig};
use crate::domain::user::{CreateUserDto, GetUserDto};
use crate::domain::{DomainResult, Profile, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::PasswordHasher;
use crate::infrastructure::{init_database, run_migrations, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::common::PagingConfig;
use crate::interfaces::http::modules::metrics::describe_metrics;
use crate::interfaces::http::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{AppError, PageRequest};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin account if no admin exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// # Examples
///
/// ```rust,no_run
/// use b2bsteel::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// Signed-in sessions.
    pub sessions: SharedSessionRegistry,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// API port the server is listening on.
    pub api_port: u16,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    purge_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Open the record store (SQLite, or in-memory) and run migrations
    /// 3. Create the bootstrap admin (if enabled)
    /// 4. Start the REST API server (with Swagger UI)
    /// 5. Start the expired-session purge task
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;

        info!("Starting B2BSteel service...");

        let prometheus_handle = prometheus_handle();

        // ── Record store ───────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if app_cfg.database.in_memory {
                warn!("Using the in-memory store; data is lost on shutdown");
                (Arc::new(InMemoryRepositoryProvider::new()), None)
            } else {
                let db = init_database(&app_cfg.database.to_database_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    run_migrations(&db).await?;
                }
                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        let hasher = PasswordHasher::new(app_cfg.security.bcrypt_cost);
        if opts.create_default_admin && app_cfg.admin.enabled {
            bootstrap_admin(repos.as_ref(), &app_cfg.admin, &hasher).await?;
        }

        // ── Services ───────────────────────────────────────────
        let sessions: SharedSessionRegistry = Arc::new(SessionRegistry::new());
        let jwt_config = app_cfg.security.jwt_config();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            "Session tokens configured"
        );
        let paging = PagingConfig {
            default_page_size: app_cfg.requests.default_page_size,
            max_page_size: app_cfg.requests.max_page_size,
        };
        let services = ApiServices::new(
            Arc::clone(&repos),
            sessions.clone(),
            jwt_config,
            hasher,
            paging,
        );

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let purge_task = spawn_session_purge(sessions.clone(), shutdown_signal.clone());

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(services, prometheus_handle);

        let api_port = app_cfg.server.api_port;
        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router.into_make_service()).with_graceful_shutdown(
            async move {
                api_shutdown.wait().await;
                info!("REST API server received shutdown signal");
            },
        );

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            sessions,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
            purge_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds to finish.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let timeout = Duration::from_secs(self.shutdown.timeout_secs());
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(timeout_secs = timeout.as_secs(), "REST API server did not stop in time"),
        }
        self.purge_task.abort();

        if let Some(db) = self.db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("B2BSteel service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down B2BSteel service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; restarts
/// within the same process reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            info!("Prometheus metrics recorder installed");
            Some(PROM_HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Metrics disabled, recorder could not be installed: {}", e);
            None
        }
    }
}

fn spawn_session_purge(
    sessions: SharedSessionRegistry,
    shutdown: ShutdownSignal,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = sessions.purge_expired();
                    if purged > 0 {
                        info!(purged, remaining = sessions.session_count(), "Expired sessions purged");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
    })
}

/// Create the configured admin account unless an administrator already
/// exists. Returns the created user, if any.
pub async fn bootstrap_admin(
    repos: &dyn RepositoryProvider,
    admin: &AdminConfig,
    hasher: &PasswordHasher,
) -> DomainResult<Option<User>> {
    let users = repos.users();

    let existing_admins = users
        .list_users(GetUserDto {
            search: None,
            role: Some(UserRole::Admin),
            window: PageRequest::new(1, 1),
        })
        .await?;
    if existing_admins.total > 0 {
        return Ok(None);
    }

    let email = admin.email.trim().to_lowercase();
    if users.get_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "Bootstrap admin email belongs to a non-admin account; skipping");
        return Ok(None);
    }

    let created = users
        .create_user(CreateUserDto {
            email,
            password_hash: hasher.hash(&admin.password)?,
            role: UserRole::Admin,
            profile: Profile {
                contact_person: Some(admin.contact_person.clone()),
                ..Profile::default()
            },
        })
        .await?;

    info!(email = %created.email, "Bootstrap admin created");
    warn!("Please change the bootstrap admin password immediately");
    Ok(Some(created))
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_admin_runs_once() {
        let repos = InMemoryRepositoryProvider::new();
        let hasher = PasswordHasher::new(4);
        let admin = AdminConfig::default();

        let created = bootstrap_admin(&repos, &admin, &hasher).await.unwrap();
        let created = created.expect("admin created on empty store");
        assert_eq!(created.role, UserRole::Admin);
        assert!(hasher.verify(&admin.password, &created.password_hash));

        assert!(bootstrap_admin(&repos, &admin, &hasher).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bootstrap_admin_leaves_existing_account_alone() {
        let repos = InMemoryRepositoryProvider::new();
        let admin = AdminConfig::default();
        repos
            .users()
            .create_user(CreateUserDto {
                email: admin.email.clone(),
                password_hash: "x".into(),
                role: UserRole::Buyer,
                profile: Profile::default(),
            })
            .await
            .unwrap();

        let outcome = bootstrap_admin(&repos, &admin, &PasswordHasher::new(4)).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn in_memory_server_starts_and_stops() {
        let mut config = AppConfig::default();
        config.database.in_memory = true;
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.security.bcrypt_cost = 4;

        let handle = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await
        .unwrap();
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count_users().await.unwrap(), 1);

        handle.shutdown().await;
    }
}
