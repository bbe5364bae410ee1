//! Layout rendering (top bar, sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, Library, SearchPhase, SidebarEntry, UiState};
use super::utils::border_style;

fn phase_label(phase: &SearchPhase) -> &'static str {
    match phase {
        SearchPhase::Idle => "",
        SearchPhase::Debouncing { .. } => "typing…",
        SearchPhase::InFlight { .. } => "searching…",
        SearchPhase::Settled { .. } => "done",
    }
}

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, phase: &SearchPhase) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(16), // Search status
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(is_focused)),
        );
    frame.render_widget(search, chunks[0]);

    let status = Paragraph::new(phase_label(phase))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);
}

/// Entry label with a count where the entry is a collection list
fn entry_label(entry: SidebarEntry, library: &Library, favorites_count: (usize, usize)) -> String {
    let count = match entry {
        SidebarEntry::LibraryAlbums => Some(library.albums.len()),
        SidebarEntry::LibraryPlaylists => Some(library.playlists.len()),
        SidebarEntry::UserPlaylists => Some(library.user_playlists.len()),
        SidebarEntry::Following => Some(library.followings.len()),
        SidebarEntry::FavoriteAlbums => Some(favorites_count.0),
        SidebarEntry::FavoritePlaylists => Some(favorites_count.1),
        _ => None,
    };
    match count {
        Some(n) => format!("{} ({})", entry.label(), n),
        None => entry.label().to_string(),
    }
}

pub fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    library: &Library,
    favorites_count: (usize, usize),
) {
    let is_focused = ui_state.active_section == ActiveSection::Sidebar;

    let items: Vec<ListItem> = SidebarEntry::ALL
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == ui_state.sidebar_selected && is_focused {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if i == ui_state.sidebar_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(entry_label(*entry, library, favorites_count)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Browse ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(is_focused)),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.sidebar_selected));

    frame.render_stateful_widget(list, area, &mut list_state);
}
