//! Overlay rendering (error notification, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Rectangle of the given size centered in `area`, clipped to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_error_notification(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    // Wrapped line count plus the two borders
    let line_count = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_area = centered_rect(area, popup_width, (line_count + 2).min(area.height.saturating_sub(4)));

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("← / →", "Switch search category"),
        ("Enter", "Open / Play song"),
        ("Backspace / Esc", "Go back"),
        ("/", "Focus search"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("P", "Play whole collection"),
        ("N / B", "Next / Previous song"),
        ("S", "Toggle shuffle"),
        ("", ""),
        ("", "── Library ──"),
        ("L", "Save / Unsave in library"),
        ("f", "Favorite / Unfavorite"),
        ("F", "Follow / Unfollow artist"),
        ("C", "Create playlist"),
        ("A", "Add song to newest playlist"),
        ("X", "Delete playlist / Remove song"),
        ("R", "Rename playlist to search text"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q / Ctrl+Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 62, (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4)));

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    // Create help text lines
    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        desc.to_string(),
                        Style::default().fg(Color::White),
                    ),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
