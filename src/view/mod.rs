//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, styles, scrollable lists)
//! - `layout`: Top bar and sidebar
//! - `content`: Main content area rendering
//! - `now_playing`: Now-playing bar
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod now_playing;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::AppSnapshot;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &AppSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + status
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Now-playing bar
            ])
            .split(frame.area());

        let ui_state = &snapshot.ui_state;

        layout::render_top_bar(frame, chunks[0], ui_state, &snapshot.search_phase);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar
                Constraint::Percentage(70), // Main content
            ])
            .split(chunks[1]);

        let favorites_count = (snapshot.favorites.albums.len(), snapshot.favorites.playlists.len());
        layout::render_sidebar(frame, main_chunks[0], ui_state, &snapshot.library, favorites_count);

        content::render_main_content(frame, main_chunks[1], snapshot);

        now_playing::render_now_playing_bar(frame, chunks[2], &snapshot.playback);

        if let Some(message) = &ui_state.error_message {
            overlays::render_error_notification(frame, message);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
