//! Player view
//!
//! Video surface, two-segment progress bar and transport buttons. The
//! video itself plays in the external player window; in the terminal the
//! surface shows what is playing once the player reports ready, and an
//! empty placeholder of the same size otherwise.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::models::{format_timestamp, Orientation, PlaybackStatus, ViewportMetrics};
use crate::playback::progress_segments;
use crate::screens::player::{PlayerScreen, Transport};
use crate::ui::Theme;

/// Areas of the player view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAreas {
    pub surface: Rect,
    pub controls: Rect,
}

/// Landscape puts controls beside the surface; portrait stacks them
pub fn split(area: Rect, orientation: Orientation) -> PlayerAreas {
    match orientation {
        Orientation::Landscape => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);
            PlayerAreas {
                surface: chunks[0],
                controls: chunks[1],
            }
        }
        Orientation::Portrait => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            PlayerAreas {
                surface: chunks[0],
                controls: chunks[1],
            }
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, player: &PlayerScreen, viewport: &ViewportMetrics) {
    let areas = split(area, viewport.orientation);
    render_surface(frame, areas.surface, player);
    render_controls(frame, areas.controls, player);
}

fn render_surface(frame: &mut Frame, area: Rect, player: &PlayerScreen) {
    let status = player.status();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if status.is_ready() {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    // Placeholder keeps the exact same rect as the live surface
    if !status.is_ready() {
        frame.render_widget(block, area);
        return;
    }

    let state = player.state();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(player.title.clone(), Theme::title())),
        Line::from(""),
        Line::from(Span::styled(
            if state.is_playing { "▶ Playing" } else { "⏸ Paused" },
            Theme::dimmed(),
        )),
    ];
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, area);
}

/// Filled and remaining spans for a bar `width` cells wide
pub fn progress_bar(fraction: f64, width: usize) -> Line<'static> {
    let (filled, remaining) = progress_segments(fraction, width);
    Line::from(vec![
        Span::styled("█".repeat(filled), Theme::progress_filled()),
        Span::styled("░".repeat(remaining), Theme::progress_remaining()),
    ])
}

fn status_line(player: &PlayerScreen) -> Line<'static> {
    match player.status() {
        PlaybackStatus::Error => Line::from(Span::styled(
            player
                .error
                .clone()
                .unwrap_or_else(|| "Playback failed".to_string()),
            Theme::error(),
        )),
        PlaybackStatus::Loading => Line::from(Span::styled("Loading…", Theme::loading())),
        PlaybackStatus::Idle => Line::from(Span::styled("Idle", Theme::dimmed())),
        PlaybackStatus::ReadyToPlay => {
            let state = player.state();
            Line::from(Span::styled(
                format!(
                    "{} / {}",
                    format_timestamp(state.current_time_sec),
                    format_timestamp(state.duration_sec)
                ),
                Theme::dimmed(),
            ))
        }
    }
}

fn render_controls(frame: &mut Frame, area: Rect, player: &PlayerScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", player.title), Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let playing = player.state().is_playing;
    let buttons: Vec<Line> = Transport::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == player.selected {
                Theme::keybind()
            } else {
                Theme::nav_inactive()
            };
            Line::from(Span::styled(format!(" {} ", action.label(playing)), style))
        })
        .collect();

    let bar_width = inner.width.saturating_sub(2) as usize;
    let mut lines = vec![
        Line::from(""),
        progress_bar(player.fraction(), bar_width),
        status_line(player),
        Line::from(""),
    ];
    lines.extend(buttons);

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_is_side_by_side() {
        let areas = split(Rect::new(0, 0, 100, 30), Orientation::Landscape);
        assert_eq!(areas.surface.y, areas.controls.y);
        assert!(areas.controls.x > areas.surface.x);
    }

    #[test]
    fn test_portrait_is_stacked() {
        let areas = split(Rect::new(0, 0, 40, 60), Orientation::Portrait);
        assert_eq!(areas.surface.x, areas.controls.x);
        assert!(areas.controls.y > areas.surface.y);
    }

    #[test]
    fn test_progress_bar_segments() {
        let line = progress_bar(0.25, 40);
        assert_eq!(line.spans[0].content.chars().count(), 10);
        assert_eq!(line.spans[1].content.chars().count(), 30);
    }
}
