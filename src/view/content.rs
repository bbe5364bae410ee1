//! Main content area rendering (home, search results, detail views, lists)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};

use crate::model::{
    ActiveSection, AppSnapshot, ArtistDetail, ArtistRef, BrowseCache, BrowseKey, Collection,
    CollectionKind, ContentView, Library, Loadable, SearchResultSection, SearchResults, Timeframe,
    Track, TrackId, UserPlaylist,
};
use super::utils::{
    border_style, calculate_num_width, calculate_track_column_widths, content_block, format_duration,
    header_style, render_scrollable_list, row_style, truncate_string,
};

pub fn render_main_content(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let is_focused = snapshot.ui_state.active_section == ActiveSection::MainContent;
    let selected = snapshot.content_state.selected_index;
    let playing_id = snapshot
        .playback
        .now_playing
        .track
        .as_ref()
        .map(|t| &t.id);
    let library = &snapshot.library;

    match &snapshot.content_state.view {
        ContentView::Home => render_home(frame, area, snapshot, selected, is_focused, true),
        ContentView::Charts => render_home(frame, area, snapshot, selected, is_focused, false),
        ContentView::Genre { name } => {
            let key = BrowseKey::Genre(name.clone());
            if snapshot.browse.is_populated(&key) {
                render_collection_list(
                    frame,
                    area,
                    format!(" {} ", name),
                    snapshot.browse.genre(name),
                    selected,
                    is_focused,
                    library,
                );
            } else {
                render_message(frame, area, format!(" {} ", name), cold_message(&snapshot.browse, &key), is_focused);
            }
        }
        ContentView::Chart { timeframe } => match snapshot.browse.chart(*timeframe) {
            Some(queue) => render_track_list(
                frame,
                area,
                format!(" {} ", timeframe.label()),
                &queue.songs,
                selected,
                is_focused,
                playing_id,
            ),
            None => render_message(
                frame,
                area,
                format!(" {} ", timeframe.label()),
                cold_message(&snapshot.browse, &BrowseKey::Chart(*timeframe)),
                is_focused,
            ),
        },
        ContentView::SearchResults { section } => {
            render_search_results(frame, area, &snapshot.search.results, *section, selected, is_focused);
        }
        ContentView::Collection { kind, detail, .. } => match detail {
            Loadable::Pending => render_message(frame, area, format!(" {} ", kind.label()), "Loading...", is_focused),
            Loadable::Failed(message) => render_failure(frame, area, message, is_focused),
            Loadable::Ready(None) => {
                render_message(frame, area, format!(" {} ", kind.label()), "Nothing found for this id", is_focused)
            }
            Loadable::Ready(Some(collection)) => {
                render_collection_detail(frame, area, snapshot, collection, selected, is_focused, playing_id);
            }
        },
        ContentView::Artist { detail, .. } => match detail {
            Loadable::Pending => render_message(frame, area, " Artist ".to_string(), "Loading...", is_focused),
            Loadable::Failed(message) => render_failure(frame, area, message, is_focused),
            Loadable::Ready(None) => {
                render_message(frame, area, " Artist ".to_string(), "Nothing found for this id", is_focused)
            }
            Loadable::Ready(Some(artist)) => {
                render_artist_detail(frame, area, artist, library, selected, is_focused, playing_id);
            }
        },
        ContentView::LibraryAlbums => {
            render_collection_list(frame, area, " Saved Albums ".to_string(), &library.albums, selected, is_focused, library);
        }
        ContentView::LibraryPlaylists => render_collection_list(
            frame,
            area,
            " Saved Playlists ".to_string(),
            &library.playlists,
            selected,
            is_focused,
            library,
        ),
        ContentView::UserPlaylists => {
            render_user_playlists(frame, area, &library.user_playlists, selected, is_focused);
        }
        ContentView::UserPlaylist { id } => match library.user_playlist(*id) {
            Some(playlist) => render_track_list(
                frame,
                area,
                format!(" {} (a: add, x: remove) ", playlist.name),
                &playlist.songs,
                selected,
                is_focused,
                playing_id,
            ),
            None => render_message(frame, area, " Playlist ".to_string(), "This playlist was deleted", is_focused),
        },
        ContentView::Following => {
            render_artist_list(frame, area, " Following ", &library.followings, selected, is_focused);
        }
        ContentView::FavoriteAlbums => render_collection_list(
            frame,
            area,
            " Favorite Albums ".to_string(),
            &snapshot.favorites.albums,
            selected,
            is_focused,
            library,
        ),
        ContentView::FavoritePlaylists => render_collection_list(
            frame,
            area,
            " Favorite Playlists ".to_string(),
            &snapshot.favorites.playlists,
            selected,
            is_focused,
            library,
        ),
        ContentView::Queue => {
            let queue = &snapshot.playback.now_playing.queue;
            let title = if queue.name.is_empty() {
                " Queue ".to_string()
            } else {
                format!(" Queue: {} ", queue.name)
            };
            render_track_list(frame, area, title, &queue.songs, selected, is_focused, playing_id);
        }
    }
}

fn cold_message(browse: &BrowseCache, key: &BrowseKey) -> &'static str {
    if browse.is_fetching(key) {
        "Loading..."
    } else {
        "Nothing here yet"
    }
}

fn render_message(frame: &mut Frame, area: Rect, title: String, text: &str, is_focused: bool) {
    let content = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(content_block(title, is_focused));
    frame.render_widget(content, area);
}

fn render_failure(frame: &mut Frame, area: Rect, message: &str, is_focused: bool) {
    let content = Paragraph::new(format!("{}\n\nPress Backspace to go back", message))
        .style(Style::default().fg(Color::Red))
        .block(content_block(" Failed to load ".to_string(), is_focused));
    frame.render_widget(content, area);
}

fn render_home(
    frame: &mut Frame,
    area: Rect,
    snapshot: &AppSnapshot,
    selected: usize,
    is_focused: bool,
    with_genres: bool,
) {
    let browse = &snapshot.browse;
    let mut items: Vec<ListItem> = vec![ListItem::new(" Charts").style(header_style())];
    let mut index = 0;

    for timeframe in Timeframe::ALL {
        let detail = match browse.chart(timeframe) {
            Some(queue) => format!("{} songs", queue.songs.len()),
            None => cold_message(browse, &BrowseKey::Chart(timeframe)).to_string(),
        };
        items.push(
            ListItem::new(format!("   {:<20} {}", timeframe.label(), detail))
                .style(row_style(index == selected, is_focused, false)),
        );
        index += 1;
    }

    if with_genres {
        items.push(ListItem::new(""));
        items.push(ListItem::new(" Genres").style(header_style()));
        for genre in snapshot.genres.iter() {
            let key = BrowseKey::Genre(genre.clone());
            let detail = if browse.is_populated(&key) {
                format!("{} collections", browse.genre(genre).len())
            } else {
                cold_message(browse, &key).to_string()
            };
            items.push(
                ListItem::new(format!("   {:<20} {}", genre, detail))
                    .style(row_style(index == selected, is_focused, false)),
            );
            index += 1;
        }
    }

    // Header rows shift the visual index of the selection
    let visual = if selected < Timeframe::ALL.len() { selected + 1 } else { selected + 3 };
    let title = if with_genres { " Home " } else { " Charts " };
    render_scrollable_list(frame, area, items, visual, content_block(title.to_string(), is_focused));
}

fn render_track_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    tracks: &[Track],
    selected: usize,
    is_focused: bool,
    playing_id: Option<&TrackId>,
) {
    if tracks.is_empty() {
        render_message(frame, area, title, "No songs", is_focused);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let (num_width, title_width, artist_width, _) = calculate_track_column_widths(content_width, tracks.len());

    let mut items = vec![ListItem::new(format!(
        " {:<num_width$}   {:<title_width$}   {:<artist_width$}   {}",
        "#",
        "Title",
        "Artist",
        "Duration",
        num_width = num_width,
        title_width = title_width,
        artist_width = artist_width
    ))
    .style(header_style())];

    items.extend(tracks.iter().enumerate().map(|(i, track)| {
        let is_playing = playing_id == Some(&track.id);
        let playing_indicator = if is_playing { "▶" } else { " " };
        ListItem::new(format!(
            "{}{:<num_width$}   {}   {}   {}",
            playing_indicator,
            i + 1,
            truncate_string(&track.name, title_width),
            truncate_string(&track.artist_line(), artist_width),
            format_duration(track.duration),
            num_width = num_width
        ))
        .style(row_style(i == selected, is_focused, is_playing))
    }));

    // +1 for header row
    render_scrollable_list(frame, area, items, selected + 1, content_block(title, is_focused));
}

fn collection_markers(collection: &Collection, library: &Library) -> &'static str {
    let saved = match collection.kind {
        CollectionKind::Album => library.has_album(&collection.id),
        CollectionKind::Playlist => library.has_playlist(&collection.id),
    };
    if saved { "+" } else { " " }
}

fn render_collection_list(
    frame: &mut Frame,
    area: Rect,
    title: String,
    collections: &[Collection],
    selected: usize,
    is_focused: bool,
    library: &Library,
) {
    if collections.is_empty() {
        render_message(frame, area, title, "Nothing saved yet", is_focused);
        return;
    }

    let num_width = calculate_num_width(collections.len());
    let content_width = area.width.saturating_sub(4) as usize;
    let name_width = content_width.saturating_sub(1 + num_width + 3 + 2 + 3 + 10 + 3 + 8);

    let items: Vec<ListItem> = collections
        .iter()
        .enumerate()
        .map(|(i, collection)| {
            ListItem::new(format!(
                " {:<num_width$}   {} {}   {:<10}   {:>8}",
                i + 1,
                collection_markers(collection, library),
                truncate_string(&collection.name, name_width),
                collection.kind.label(),
                format!("{} songs", collection.songs.len()),
                num_width = num_width
            ))
            .style(row_style(i == selected, is_focused, false))
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, content_block(title, is_focused));
}

fn render_collection_detail(
    frame: &mut Frame,
    area: Rect,
    snapshot: &AppSnapshot,
    collection: &Collection,
    selected: usize,
    is_focused: bool,
    playing_id: Option<&TrackId>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let saved = collection_markers(collection, &snapshot.library) == "+";
    let favorited = snapshot.favorites.has_album(&collection.id) || snapshot.favorites.has_playlist(&collection.id);

    let mut spans = vec![Span::styled(
        collection.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(description) = collection.description.as_deref().filter(|d| !d.is_empty()) {
        spans.push(Span::raw(format!("  {}", description)));
    }
    let flags = format!(
        "{}{}",
        if saved { " [saved]" } else { "" },
        if favorited { " [favorite]" } else { "" }
    );
    spans.push(Span::styled(flags, Style::default().fg(Color::Green)));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} (p: play, l: save, f: favorite) ", collection.kind.label()))
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(header, chunks[0]);

    render_track_list(
        frame,
        chunks[1],
        format!(" {} songs ", collection.songs.len()),
        &collection.songs,
        selected,
        is_focused,
        playing_id,
    );
}

fn render_artist_detail(
    frame: &mut Frame,
    area: Rect,
    artist: &ArtistDetail,
    library: &Library,
    selected: usize,
    is_focused: bool,
    playing_id: Option<&TrackId>,
) {
    let following = if library.is_following(&artist.id) { " [following]" } else { "" };
    let title = format!(" {}{} (F: follow) ", artist.name, following);

    let mut items: Vec<ListItem> = vec![ListItem::new(" Top songs").style(header_style())];
    items.extend(artist.top_songs.iter().enumerate().map(|(i, track)| {
        let is_playing = playing_id == Some(&track.id);
        ListItem::new(format!(
            "  {} {}  {}",
            if is_playing { "▶" } else { " " },
            track.name,
            format_duration(track.duration)
        ))
        .style(row_style(i == selected, is_focused, is_playing))
    }));
    items.push(ListItem::new(" Albums").style(header_style()));
    let offset = artist.top_songs.len();
    items.extend(artist.top_albums.iter().enumerate().map(|(i, album)| {
        ListItem::new(format!("    {}", album.name)).style(row_style(offset + i == selected, is_focused, false))
    }));

    let visual = if selected < offset { selected + 1 } else { selected + 2 };
    render_scrollable_list(frame, area, items, visual, content_block(title, is_focused));
}

fn render_user_playlists(frame: &mut Frame, area: Rect, playlists: &[UserPlaylist], selected: usize, is_focused: bool) {
    let title = " My Playlists (c: create, x: delete) ".to_string();
    if playlists.is_empty() {
        render_message(frame, area, title, "Press c to create a playlist", is_focused);
        return;
    }

    let num_width = calculate_num_width(playlists.len());
    let items: Vec<ListItem> = playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            ListItem::new(format!(
                " {:<num_width$}   {:<30}   {:>4} songs   {}",
                i + 1,
                truncate_string(&playlist.name, 30),
                playlist.songs.len(),
                playlist.created_at.format("%Y-%m-%d"),
                num_width = num_width
            ))
            .style(row_style(i == selected, is_focused, false))
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, content_block(title, is_focused));
}

fn render_artist_list(frame: &mut Frame, area: Rect, title: &str, artists: &[ArtistRef], selected: usize, is_focused: bool) {
    if artists.is_empty() {
        render_message(frame, area, title.to_string(), "Not following anyone yet", is_focused);
        return;
    }

    let num_width = calculate_num_width(artists.len());
    let items: Vec<ListItem> = artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            ListItem::new(format!(" {:<num_width$}   {}", i + 1, artist.name, num_width = num_width))
                .style(row_style(i == selected, is_focused, false))
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, content_block(title.to_string(), is_focused));
}

fn render_search_results(
    frame: &mut Frame,
    area: Rect,
    results: &SearchResults,
    section: SearchResultSection,
    selected: usize,
    is_focused: bool,
) {
    // Split into tabs area and content area
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Results list
        ])
        .split(area);

    let tabs_content: Vec<Span> = SearchResultSection::ALL
        .iter()
        .flat_map(|&tab| {
            let style = if tab == section {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::styled(
                    format!(" {} ({}) ", tab.label(), results.bucket(tab).results.len()),
                    style,
                ),
                Span::raw("  "),
            ]
        })
        .collect();

    let tabs = Paragraph::new(Line::from(tabs_content)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Results (←/→ to switch) ")
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(tabs, chunks[0]);

    let hits = &results.bucket(section).results;
    if hits.is_empty() {
        render_message(
            frame,
            chunks[1],
            String::new(),
            &format!("  No {} found", section.label().to_lowercase()),
            is_focused,
        );
        return;
    }

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(hits.len());
    let kind_width = 8;
    let title_width = (content_width.saturating_sub(1 + num_width + 3 + 3 + kind_width + 3) * 50) / 100;
    let description_width = content_width.saturating_sub(1 + num_width + 3 + title_width + 3 + kind_width + 3);

    let items: Vec<ListItem> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            ListItem::new(format!(
                " {:<num_width$}   {}   {:<kind_width$}   {}",
                i + 1,
                truncate_string(&hit.title, title_width),
                hit.kind,
                truncate_string(&hit.description, description_width),
                num_width = num_width,
                kind_width = kind_width
            ))
            .style(row_style(i == selected, is_focused, false))
        })
        .collect();

    render_scrollable_list(frame, chunks[1], items, selected, content_block(String::new(), is_focused));
}
