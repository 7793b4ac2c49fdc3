use crate::config::load_app_config;
use crate::db::{init_db, Database, SqliteRecords};
use crate::router::{handle, AppState};
use astra::{Request, Server};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Configuration (.env + environment)
    let config = match load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    // 2️⃣ Database handle + schema
    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let state = AppState {
        records: SqliteRecords::new(db, config.zone),
        static_dir: config.static_dir.clone(),
    };

    // 3️⃣ Start the server
    tracing::info!(addr = %config.bind_addr, workers = config.max_workers, "starting server");

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req: Request, _info| {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "request failed");
                templates::html_error_response(err)
            }
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
