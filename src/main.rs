use actix_web::{App, HttpServer, web};
use clap::{Parser, Subcommand};
use tracing::info;

use dispatch_scheduler::api::{self, job::JobService, schedule::ScheduleService, validation};
use dispatch_scheduler::shutdown::ShutdownCoordinator;
use dispatch_scheduler::{config, db, logging};

/// Field-service dispatch scheduling API
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config::Config {
        database_url,
        max_payload_size,
        max_db_connections,
        bind_addr,
        port,
        log_dir,
        drag_activation_distance,
    } = config::Config::from_env().map_err(std::io::Error::other)?;

    logging::init(&log_dir)?;

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .map_err(std::io::Error::other)?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    if let Some(Command::Migrate) = cli.command {
        pool.close().await;
        return Ok(());
    }

    info!("Starting dispatch-scheduler");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("  - Drag activation distance: {}px", drag_activation_distance);

    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let schedule_service = web::Data::new(ScheduleService::from_pool(
            server_pool.clone(),
            drag_activation_distance,
        ));

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(job_service)
            .app_data(schedule_service)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(api::configure)
    });

    info!("Server starting on http://{}:{}", bind_addr, port);

    let server = server.bind((bind_addr.as_str(), port))?.run();
    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
