mod api;
mod dao;
mod model;
mod service;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::api::cors::cors_policy;
use crate::api::middleware::timing_middleware;
use crate::api::routes;
use crate::api::state::AppState;
use crate::dao::{atensi::AtensiDao, dashboard::DashboardDao, village::VillageDao};
use crate::model::config::{ApplicationArguments, Config, Database, LoggingConfig};
use crate::service::{atensi::AtensiService, dashboard::DashboardService, village::VillageService};

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use clap::Parser;
use prometheus::IntGauge;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/**
 * Loads configuration, connects to the database and serves the API until shutdown.
 */
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_file = dotenvy::dotenv();

    let args = ApplicationArguments::parse();

    let config = get_config(args.config_file.as_deref())?;

    init_tracing(&config.logging)?;
    log_env_file(&env_file);

    let connection_pool = create_connection_pool(&config.database).await?;
    tracing::info!("Connected to database {} on {}:{}", config.database.name, config.database.host, config.database.port);

    let atensi_service = AtensiService::new(AtensiDao::new(), connection_pool.clone());
    let village_service = VillageService::new(VillageDao::new(), connection_pool.clone());
    let dashboard_service = DashboardService::new(DashboardDao::new(), connection_pool.clone());

    let state = web::Data::new(AppState::new(atensi_service, village_service, dashboard_service));

    let prometheus = PrometheusMetricsBuilder::new("atensi_api")
        .endpoint("/metrics")
        .mask_unmatched_patterns("UNKNOWN")
        .build()
        .map_err(|err| std::io::Error::other(format!("Failed to create Prometheus metrics: {err}")))?;

    // Initialize custom metrics
    let max_connections_gauge = IntGauge::new("max_connections", "Connection pool maximum").map_err(|err| std::io::Error::other(format!("Failed to create max_connections gauge: {err}")))?;
    let min_connections_gauge = IntGauge::new("min_connections", "Connection pool minimum").map_err(|err| std::io::Error::other(format!("Failed to create min_connections gauge: {err}")))?;
    let active_connections_gauge = IntGauge::new("active_connections", "Connection pool active").map_err(|err| std::io::Error::other(format!("Failed to create active_connections gauge: {err}")))?;
    let idle_connections_gauge = IntGauge::new("idle_connections", "Connection pool idle").map_err(|err| std::io::Error::other(format!("Failed to create idle_connections gauge: {err}")))?;
    //Register custom prometheus metrics
    register_prometheus_metrics(&prometheus, &max_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &min_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &active_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &idle_connections_gauge)?;

    gather_db_metrics(max_connections_gauge, min_connections_gauge, active_connections_gauge, idle_connections_gauge, connection_pool);

    let cors_config = config.cors.clone();
    let server_init = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(timing_middleware))
            .wrap(prometheus.clone())
            .wrap(cors_policy(&cors_config))
            .app_data(state.clone())
            .configure(routes::configure)
    });

    tracing::info!("Server starting on {}:{}", config.server.host, config.server.http_port);
    server_init.bind((config.server.host.as_str(), config.server.http_port))?.workers(config.server.workers).run().await
}

/**
 * Initializes logging for the application.
 *
 * #Arguments
 * `logging`: Formatting toggles and additional filter directives.
 *
 * #Returns
 * A `Result` indicating success or failure.
 */
fn init_tracing(logging: &LoggingConfig) -> Result<(), std::io::Error> {
    let env_filter = logging.directives.iter().try_fold(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")), |filter, directive| {
        directive
            .parse::<Directive>()
            .map(|directive| filter.add_directive(directive))
            .map_err(|err| std::io::Error::other(format!("Invalid logging directive {directive}: {err}")))
    })?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(logging.target)
        .with_thread_ids(logging.thread_ids)
        .with_thread_names(logging.thread_names)
        .with_line_number(logging.line_number)
        .with_level(logging.level)
        .with_ansi(logging.ansi)
        .with_file(logging.file);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| std::io::Error::other(format!("Failed to initialize tracing: {err}")))
}

/**
 * Logs the outcome of loading the `.env` file.
 */
fn log_env_file(env_file: &dotenvy::Result<PathBuf>) {
    match env_file {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(err) => tracing::info!("No .env file found: {}", err),
    }
}

/**
 * Creates the `PostgreSQL` connection pool. The first connection is opened eagerly so that
 * an unreachable database stops the application at startup.
 *
 * #Arguments
 * `database`: Connection parameters and pool settings.
 */
async fn create_connection_pool(database: &Database) -> Result<Pool<Postgres>, std::io::Error> {
    let connect_options = PgConnectOptions::new()
        .host(&database.host)
        .port(database.port)
        .username(&database.user)
        .password(&database.password)
        .database(&database.name);
    PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_millis(database.acquire_timeout))
        .idle_timeout(Duration::from_millis(database.idle_timeout))
        .max_lifetime(Duration::from_millis(database.max_lifetime))
        .connect_with(connect_options)
        .await
        .map_err(|err| std::io::Error::other(format!("Failed to create database pool: {err}")))
}

/**
 * Registers custom Prometheus metrics.
 *
 * #Arguments
 * `prometheus_metrics`: The Prometheus metrics instance to register the gauge with.
 * `gauge`: The gauge to register.
 */
fn register_prometheus_metrics(prometheus_metrics: &PrometheusMetrics, gauge: &IntGauge) -> Result<(), std::io::Error> {
    prometheus_metrics.registry.register(Box::new(gauge.clone())).map_err(|err| std::io::Error::other(format!("Failed to register Prometheus gauge: {err}")))?;
    Ok(())
}

/**
 * Gathers database metrics in a separate thread.
 *
 * #Arguments
 * `max_connections_gauge`: Gauge for maximum connections.
 * `min_connections_gauge`: Gauge for minimum connections.
 * `active_connections_gauge`: Gauge for active connections.
 * `idle_connections_gauge`: Gauge for idle connections.
 * `connection_pool`: The connection pool to gather metrics from.
 */
fn gather_db_metrics(max_connections_gauge: IntGauge, min_connections_gauge: IntGauge, active_connections_gauge: IntGauge, idle_connections_gauge: IntGauge, connection_pool: Pool<Postgres>) {
    thread::spawn(move || {
        loop {
            max_connections_gauge.set(i64::from(connection_pool.options().get_max_connections()));
            min_connections_gauge.set(i64::from(connection_pool.options().get_min_connections()));
            active_connections_gauge.set(i64::from(connection_pool.size()));
            #[allow(clippy::cast_possible_wrap)]
            idle_connections_gauge.set(connection_pool.num_idle() as i64);
            thread::sleep(Duration::from_secs(1));
        }
    });
}

/**
 * Reads the configuration from the optional file and applies environment overrides.
 *
 * #Arguments
 * `config_file`: The path to the configuration file, if any.
 *
 * #Returns
 * A `Result` containing the parsed `Config` or an `std::io::Error` if reading or parsing fails.
*/
fn get_config(config_file: Option<&str>) -> Result<Config, std::io::Error> {
    let config = match config_file {
        Some(config_file) => {
            let config_str: String = std::fs::read_to_string(config_file).map_err(|err| std::io::Error::other(format!("Failed to read config file: {err}")))?;
            toml::from_str(&config_str).map_err(|err| std::io::Error::other(format!("Failed to parse config file: {err}")))?
        }
        None => Config::default(),
    };
    config.with_overrides(|key| std::env::var(key).ok()).map_err(|err| std::io::Error::other(format!("Failed to apply environment overrides: {err}")))
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(env_file: &dotenvy::Result<PathBuf>) -> String {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt().with_ansi(false).with_writer(move || writer.clone()).finish();
        tracing::subscriber::with_default(subscriber, || log_env_file(env_file));
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_missing_env_file_is_logged() {
        let env_file = dotenvy::from_filename("does-not-exist.env");
        let output = capture(&env_file);
        assert!(output.contains("INFO"));
        assert!(output.contains("No .env file found"));
    }

    #[test]
    fn test_loaded_env_file_is_logged() {
        let output = capture(&Ok(PathBuf::from("/srv/atensi/.env")));
        assert!(output.contains("Loaded environment from /srv/atensi/.env"));
    }
}
