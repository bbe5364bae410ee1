//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives catalog requests.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback, library and favorites actions
//! - `navigation`: Detail pages, browse caches and sidebar navigation
//! - `search`: Debounced search pipeline

mod input;
mod playback;
mod navigation;
mod search;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, CatalogClient, CatalogError};

pub use search::SearchPipeline;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: AppModel,
    pub(crate) catalog: Arc<dyn CatalogClient>,
    pub(crate) search: Arc<Mutex<SearchPipeline>>,
}

impl AppController {
    pub fn new(model: AppModel, catalog: Arc<dyn CatalogClient>, search: SearchPipeline) -> Self {
        Self {
            model,
            catalog,
            search: Arc::new(Mutex::new(search)),
        }
    }

    /// Cancel pending work before exit
    pub async fn shutdown(&self) {
        self.search.lock().await.dispose().await;
    }

    pub(crate) fn format_error(error: &CatalogError) -> String {
        match error {
            CatalogError::Status { status: 404 } => "Not found in the catalog.".to_string(),
            CatalogError::Status { status: 429 } => "Rate limited. Please wait a moment.".to_string(),
            CatalogError::Status { status } if *status >= 500 => {
                "Catalog is unavailable. Try again later.".to_string()
            }
            CatalogError::Request(e) if e.is_timeout() => "Catalog request timed out.".to_string(),
            CatalogError::Request(e) if e.is_connect() => "Cannot reach the catalog.".to_string(),
            other => format!("Error: {}", other),
        }
    }
}
