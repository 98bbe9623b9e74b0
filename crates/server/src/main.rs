use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use flats_engine::registry::FlatRegistry;
use flats_server::commands::CommandHandler;
use flats_server::console::Console;
use flats_server::persistence;
use flats_server::settings::Settings;

#[tokio::main]
async fn main() {
    let data_dir: PathBuf = std::env::args()
        .skip_while(|a| a != "--data-dir")
        .nth(1)
        .unwrap_or_else(|| "flats".into())
        .into();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    tracing::info!("Flats claim server");

    let settings = match Settings::load_or_create(&data_dir.join("settings.json")) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {:#}", e);
            return;
        }
    };
    let catalog = settings.catalog();
    let claims_path = data_dir.join("claims.json");

    // ── Load claims ──────────────────────────────────────────────────────
    let mut registry = FlatRegistry::new();
    match persistence::load_flats(&claims_path, &catalog) {
        Ok(flats) => registry.replace_all(flats),
        Err(e) => {
            tracing::error!("Failed to load claims: {:#}", e);
            return;
        }
    }
    tracing::info!("{} flats ready", registry.len());

    let autosave_interval = Duration::from_secs(settings.autosave_interval_secs);
    let handler = Arc::new(Mutex::new(CommandHandler::new(registry, settings)));

    // ── Periodic autosave ────────────────────────────────────────────────
    // The snapshot is taken under the (briefly held) handler lock; only
    // the owned copy crosses to this task's serialization work.
    let save_handler = Arc::clone(&handler);
    let save_path = claims_path.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(autosave_interval);
        interval.tick().await; // first tick is immediate, skip it
        loop {
            interval.tick().await;
            let snapshot = save_handler
                .lock()
                .expect("command handler poisoned")
                .snapshot();
            match persistence::save_flats(&snapshot, &save_path) {
                Ok(n) => tracing::info!("Autosave complete: {} flats", n),
                Err(e) => tracing::error!("Autosave failed: {:#}", e),
            }
        }
    });

    // ── Console loop with graceful shutdown ──────────────────────────────
    let mut console = Console::new(Arc::clone(&handler), catalog);
    tokio::select! {
        _ = run_console(&mut console) => {
            tracing::info!("Console closed");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }

    // ── Save on shutdown ─────────────────────────────────────────────────
    let snapshot = handler.lock().expect("command handler poisoned").snapshot();
    match persistence::save_flats(&snapshot, &claims_path) {
        Ok(n) => tracing::info!("Shutdown save complete: {} flats", n),
        Err(e) => tracing::error!("Shutdown save failed: {:#}", e),
    }
}

/// Read console lines until EOF, dispatching each to the handler.
async fn run_console(console: &mut Console) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Flats console ready (type 'help')");
    while let Ok(Some(line)) = lines.next_line().await {
        let output = console.dispatch(&line);
        if !output.is_empty() {
            println!("{output}");
        }
    }
}
