//! Now-playing bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackInfo;
use super::utils::format_duration;

/// One-based position of the current track in its queue
fn queue_position(playback: &PlaybackInfo) -> Option<(usize, usize)> {
    let now = &playback.now_playing;
    let track = now.track.as_ref()?;
    let index = now.queue.songs.iter().position(|t| t.id == track.id)?;
    Some((index + 1, now.queue.songs.len()))
}

pub fn render_now_playing_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let now = &playback.now_playing;

    let status_text = match &now.track {
        None => " No track playing".to_string(),
        Some(track) => {
            let icon = if now.is_playing { " ▶" } else { "⏸ " };
            let album = track.album_name();
            if album.is_empty() {
                format!("{} {} | {}", icon, track.name, track.artist_line())
            } else {
                format!("{} {} | {} ({})", icon, track.name, track.artist_line(), album)
            }
        }
    };

    let shuffle_text = if now.is_shuffling { "Shuffle: On" } else { "Shuffle: Off" };
    let queue_text = if now.queue.name.is_empty() {
        "Queue: -".to_string()
    } else {
        format!("Queue: {}", now.queue.name)
    };

    let (ratio, label) = match queue_position(playback) {
        Some((position, total)) => (
            position as f64 / total as f64,
            format!(
                "{} / {}  ·  {}",
                position,
                total,
                format_duration(now.track.as_ref().and_then(|t| t.duration))
            ),
        ),
        None => (0.0, String::new()),
    };

    let title = format!("{} ", status_text);
    let controls_info = format!(" {} | {} ", shuffle_text, queue_text);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}
