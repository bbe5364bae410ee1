//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = &self.model;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            model.set_should_quit(true).await;
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        match ui_state.active_section {
            ActiveSection::Search => {
                if self.handle_search_key(key).await {
                    return Ok(());
                }
            }
            ActiveSection::Sidebar => match key.code {
                KeyCode::Up => {
                    model.sidebar_move(false).await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.sidebar_move(true).await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    self.open_sidebar_entry(ui_state.selected_sidebar_entry()).await;
                    return Ok(());
                }
                _ => {}
            },
            ActiveSection::MainContent => {
                if self.handle_content_key(key).await {
                    return Ok(());
                }
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Char(' ') => self.toggle_playback().await,
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_track().await,
            KeyCode::Char('b') | KeyCode::Char('B') => self.previous_track().await,
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_shuffle().await,
            KeyCode::Char('c') | KeyCode::Char('C') => self.create_user_playlist().await,
            KeyCode::Char('/') => model.set_active_section(ActiveSection::Search).await,
            KeyCode::Char('h') | KeyCode::Char('H') => model.show_help_popup().await,
            _ => {}
        }
        Ok(())
    }

    /// Returns true when the key was consumed by the search box
    async fn handle_search_key(&self, key: KeyEvent) -> bool {
        let model = &self.model;
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => false,
            KeyCode::Enter => {
                let query = model.get_ui_state().await.search_query;
                self.search.lock().await.submit(&query).await;
                model.show_search_results().await;
                model.set_active_section(ActiveSection::MainContent).await;
                true
            }
            KeyCode::Esc => {
                let query = model.update_search_query(String::new()).await;
                self.search.lock().await.input(&query).await;
                true
            }
            KeyCode::Backspace => {
                let query = model.backspace_search().await;
                self.search.lock().await.input(&query).await;
                true
            }
            KeyCode::Char(c) => {
                let query = model.append_to_search(c).await;
                self.search.lock().await.input(&query).await;
                true
            }
            _ => false,
        }
    }

    /// Returns true when the key was consumed by the content pane
    async fn handle_content_key(&self, key: KeyEvent) -> bool {
        let model = &self.model;
        match key.code {
            KeyCode::Up => model.content_move(false).await,
            KeyCode::Down => model.content_move(true).await,
            KeyCode::Left => model.navigate_search_section(false).await,
            KeyCode::Right => model.navigate_search_section(true).await,
            KeyCode::Enter => {
                if let Some(item) = model.selected_content_item().await {
                    self.handle_selected_item(item).await;
                }
            }
            KeyCode::Backspace | KeyCode::Esc => {
                model.navigate_back().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.play_focused().await,
            KeyCode::Char('l') | KeyCode::Char('L') => self.toggle_library_focused().await,
            KeyCode::Char('f') => self.toggle_favorite_focused().await,
            KeyCode::Char('F') => self.toggle_follow_focused().await,
            KeyCode::Char('a') | KeyCode::Char('A') => self.add_focused_track_to_playlist().await,
            KeyCode::Char('x') | KeyCode::Char('X') => self.delete_focused().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.rename_focused_playlist().await,
            _ => return false,
        }
        true
    }
}
