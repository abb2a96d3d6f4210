mod app;
mod debounce;
mod paths;
mod table;
mod views;

use std::fs::File;

use simplelog::{Config, LevelFilter, WriteLogger};

#[tokio::main]
async fn main() {
    paths::rotate_logs();
    let log_path = paths::log_file().unwrap_or_else(|| "skatedeck-tui.log".into());
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let log_file = File::create(&log_path).expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    if let Err(e) = app::run().await {
        eprintln!("Error: {}", e);
    }
}
