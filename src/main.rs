mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppConfig;
use controller::{AppController, SearchPipeline};
use model::{AppModel, CatalogClient, FileStore, HttpCatalog, KeyValueStore, MemoryStore};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}, using defaults", e);
            AppConfig::default()
        }
    };

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!(api = %config.api_base_url, "=== Melodeck Starting ===");

    let storage: Arc<dyn KeyValueStore> = if config.persist_library {
        Arc::new(FileStore::new(config.data_dir.clone()))
    } else {
        Arc::new(MemoryStore::new())
    };
    let catalog: Arc<dyn CatalogClient> =
        Arc::new(HttpCatalog::new(config.api_base_url.clone(), config.request_timeout())?);

    let model = AppModel::new(storage).with_genres(config.genres.clone());
    let restored = model.rehydrate_library().await;
    tracing::info!(items = restored, "Library restored");

    let search = SearchPipeline::new(
        catalog.clone(),
        model.clone(),
        config.search_debounce(),
        config.min_query_len,
    );
    let controller = AppController::new(model.clone(), catalog, search);

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.load_home_sections().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &model, &controller).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Melodeck shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &AppModel,
    controller: &AppController,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let snapshot = model.snapshot().await;
        terminal.draw(|f| AppView::render(f, &snapshot))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
