//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open the project store.
//! - Print a deterministic summary for quick local sanity checks.
//!
//! Usage: `myprojects_cli [config.toml]` (defaults to `./config.toml`).

use myprojects_core::db::open_db;
use myprojects_core::{
    core_version, init_logging, Config, DocumentCollection, ProjectRepository, SqliteCollection,
};
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("myprojects: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> Result<(), String> {
    let config = Config::load(config_path).map_err(|err| err.to_string())?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.database.path).map_err(|err| err.to_string())?;
    let collection = SqliteCollection::try_new(&conn, config.database.collection.as_str())
        .map_err(|err| err.to_string())?;
    let repo = ProjectRepository::new(collection);

    let scan = repo.scan_projects();
    log::info!(
        "event=cli_summary module=cli status=ok projects={} skipped={}",
        scan.projects.len(),
        scan.skipped.len()
    );

    println!("myprojects_core version={}", core_version());
    println!("config version={}", config.version);
    println!("collection={}", repo.collection().name());
    println!("projects={}", scan.projects.len());
    if !scan.skipped.is_empty() {
        println!("skipped_undecodable={}", scan.skipped.len());
    }
    if let Some(err) = scan.cursor_error {
        return Err(format!("listing stopped early: {err}"));
    }

    Ok(())
}
