//! Terminal UI
//!
//! Rendering is a pure function of [`App`]: nothing here mutates state.
//! TV mode draws a navigation bar across the top; other platforms get a
//! header with the page title, a back hint and the page's actions instead.

pub mod about;
pub mod grid;
pub mod login;
pub mod player;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FocusZone, NavBar, NAV_ITEMS};
use crate::router::Route;
use crate::screens::{LoadState, Loader};

/// Main render function, dispatches on the current route
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Nav bar or header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    if app.platform.shows_nav_bar() {
        render_nav_bar(frame, chunks[0], app);
    } else {
        render_header(frame, chunks[0], app);
    }
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);
}

fn page_title(app: &App) -> String {
    match app.route() {
        Route::Home => "Libraries".to_string(),
        Route::Login => "Sign in".to_string(),
        Route::About => "About".to_string(),
        Route::Library(_) => app
            .library
            .title
            .clone()
            .unwrap_or_else(|| "Library".to_string()),
        Route::Play(_) => app.player.title.clone(),
    }
}

/// TV navigation bar
fn render_nav_bar(frame: &mut Frame, area: Rect, app: &App) {
    let active = NavBar::active_index(app.route());
    let mut spans = vec![Span::styled(" jellytv ", Theme::title()), Span::raw("  ")];
    for (i, (label, _)) in NAV_ITEMS.iter().enumerate() {
        let style = if app.zone == FocusZone::NavBar && app.nav.focused == Some(i) {
            Theme::keybind()
        } else if active == Some(i) {
            Theme::nav_active()
        } else {
            Theme::nav_inactive()
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw("  "));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );
    frame.render_widget(bar, area);
}

/// Header for platforms without a nav bar
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if app.router.can_go_back() {
        spans.push(Span::styled(" ← Back ", Theme::nav_inactive()));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(page_title(app), Theme::title()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let mut actions = Vec::new();
    if let Some(label) = refresh_label(app) {
        actions.push(Span::styled(format!(" r:{} ", label), Theme::keybind()));
        actions.push(Span::raw(" "));
    }
    if *app.route() != Route::Login {
        actions.push(Span::styled(" s:Sign in ", Theme::keybind()));
    }
    frame.render_widget(
        Paragraph::new(Line::from(actions)).alignment(Alignment::Right),
        inner,
    );
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.route() {
        Route::Home => render_loader_grid(
            frame,
            area,
            app,
            &app.home.libraries,
            "No libraries found",
            |frame, inner| {
                grid::render_grid(
                    frame,
                    inner,
                    crate::screens::HomeScreen::GRID,
                    app.home.tiles(),
                    &app.home.focus,
                    &app.viewport,
                    app.platform,
                )
            },
        ),
        Route::Library(_) if app.library.library_id().is_none() => {
            render_message(frame, area, "No library selected", Theme::dimmed())
        }
        Route::Library(_) => render_loader_grid(
            frame,
            area,
            app,
            &app.library.items,
            "No items found",
            |frame, inner| {
                grid::render_grid(
                    frame,
                    inner,
                    crate::screens::LibraryScreen::GRID,
                    app.library.tiles(),
                    &app.library.focus,
                    &app.viewport,
                    app.platform,
                )
            },
        ),
        Route::Login => login::render(frame, area, &app.login, app.platform),
        Route::About => about::render(frame, area, app),
        Route::Play(_) => player::render(frame, area, &app.player, &app.viewport),
    }
}

/// Loading/error/empty handling around a tile grid
fn render_loader_grid<T: AsRef<[crate::models::LibraryItem]>>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    loader: &Loader<T>,
    empty: &str,
    draw: impl FnOnce(&mut Frame, Rect),
) {
    let inner = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    };
    match loader.state() {
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, area, "Loading…", Theme::loading())
        }
        LoadState::Failed(msg) => {
            let mut lines = vec![Line::from(Span::styled(msg.clone(), Theme::error()))];
            if app.session.is_none() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Press s to sign in",
                    Theme::dimmed(),
                )));
            }
            render_lines(frame, area, lines);
        }
        LoadState::Loaded(items) if items.as_ref().is_empty() => {
            render_message(frame, area, empty, Theme::dimmed())
        }
        LoadState::Loaded(_) => draw(frame, inner),
    }
}

/// Centered single-line message
pub fn render_message(frame: &mut Frame, area: Rect, text: &str, style: ratatui::style::Style) {
    render_lines(frame, area, vec![Line::from(Span::styled(text.to_string(), style))]);
}

fn render_lines(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let target = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top),
        ..area
    };
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, target);
}

fn refresh_label(app: &App) -> Option<&'static str> {
    match app.route() {
        Route::Home => Some(app.home.refresh_label()),
        Route::Library(_) if app.library.library_id().is_some() => Some(app.library.refresh_label()),
        _ => None,
    }
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let session = match &app.session {
        Some(s) => Span::styled(
            format!(
                " {} @ {} ",
                s.user_name.as_deref().unwrap_or("signed in"),
                s.server_url
            ),
            Theme::success(),
        ),
        None => Span::styled(" Not signed in ", Theme::dimmed()),
    };

    let mut spans = vec![session, Span::raw(" │ ")];
    if let Some(label) = refresh_label(app) {
        spans.push(Span::styled(format!(" r:{} ", label), Theme::dimmed()));
    }
    let help = match app.route() {
        Route::Login => " Tab:next field  Enter:submit  Esc:back ",
        Route::Play(_) => " ←→:select  Enter:press  Space:play/pause  Esc:back ",
        _ => " ↵:open  s:sign in  a:about  o:sign out  q:quit ",
    };
    spans.push(Span::styled(help, Theme::dimmed()));

    let status = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(status, area);
}
