//! About page: client identity and connected server

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::screens::LoadState;
use crate::ui::Theme;

fn row(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>14}  ", label), Theme::dimmed()),
        Span::styled(value.into(), Theme::text()),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(""),
        row("Client", crate::api::jellyfin::CLIENT_NAME),
        row("Version", env!("CARGO_PKG_VERSION")),
        row("Device", app.device_id.clone()),
        row("Platform", if app.platform.is_tv { "tv" } else { "desktop" }),
        Line::from(""),
    ];

    match (&app.session, app.about.server.state()) {
        (None, _) => lines.push(Line::from(Span::styled(
            "Not connected to a server",
            Theme::dimmed(),
        ))),
        (Some(session), state) => {
            lines.push(row("Server URL", session.server_url.clone()));
            if let Some(user) = &session.user_name {
                lines.push(row("Signed in as", user.clone()));
            }
            match state {
                LoadState::Idle | LoadState::Loading => lines.push(Line::from(Span::styled(
                    "Loading server information…",
                    Theme::loading(),
                ))),
                LoadState::Failed(msg) => {
                    lines.push(Line::from(Span::styled(msg.clone(), Theme::error())))
                }
                LoadState::Loaded(info) => {
                    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".into());
                    lines.push(row("Server", or_unknown(&info.server_name)));
                    lines.push(row("Version", or_unknown(&info.version)));
                    if let Some(os) = &info.operating_system {
                        lines.push(row("OS", os.clone()));
                    }
                }
            }
        }
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(" About ", Theme::title())),
    );
    frame.render_widget(para, area);
}
