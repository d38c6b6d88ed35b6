//! Sign-in form

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::focus::Platform;
use crate::screens::login::{LoginField, LoginScreen, TextField};
use crate::ui::Theme;

const FORM_WIDTH: u16 = 56;

pub fn render(frame: &mut Frame, area: Rect, login: &LoginScreen, platform: Platform) {
    let width = FORM_WIDTH.min(area.width);
    let form = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3), // Server
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Submit
            Constraint::Length(1),
            Constraint::Length(2), // Error
            Constraint::Min(0),    // Tip
        ])
        .split(form);

    let focused = login.field;
    render_field(frame, rows[1], "Server URL", &login.server_url, false, focused == LoginField::ServerUrl);
    render_field(frame, rows[2], "Username", &login.username, false, focused == LoginField::Username);
    render_field(frame, rows[3], "Password", &login.password, true, focused == LoginField::Password);

    let submit_style = if focused == LoginField::Submit {
        Theme::keybind()
    } else if login.status.is_loading() {
        Theme::loading()
    } else {
        Theme::nav_inactive()
    };
    let submit = Paragraph::new(Span::styled(format!(" {} ", login.submit_label()), submit_style))
        .alignment(Alignment::Center);
    frame.render_widget(submit, rows[5]);

    if let Some(error) = login.error() {
        let para = Paragraph::new(Span::styled(error.to_string(), Theme::error()))
            .alignment(Alignment::Center);
        frame.render_widget(para, rows[7]);
    }

    if platform.is_tv {
        let tip = Paragraph::new(Span::styled(
            "Tip: Use the remote to focus inputs and type to edit.",
            Theme::dimmed(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(tip, rows[8]);
    }
}

/// What a field shows: the value, masked for secrets, with a cursor when focused
pub fn field_text(field: &TextField, secret: bool, focused: bool) -> String {
    let shown: Vec<char> = if secret {
        field.value().chars().map(|_| '•').collect()
    } else {
        field.value().chars().collect()
    };
    if !focused {
        return shown.into_iter().collect();
    }
    let cursor = field.cursor().min(shown.len());
    let before: String = shown[..cursor].iter().collect();
    let after: String = shown[cursor..].iter().collect();
    format!("{}│{}", before, after)
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, field: &TextField, secret: bool, focused: bool) {
    let border = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let para = Paragraph::new(field_text(field, secret, focused))
        .style(Theme::input())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(Span::styled(format!(" {} ", label), Theme::title())),
        );
    frame.render_widget(para, area);
}
