//! Login screen: server URL, username and password

use crossterm::event::{KeyCode, KeyEvent};

use crate::api::Session;
use crate::screens::{Fetch, Loader, Payload, Request};

pub const LOGIN_FALLBACK_ERROR: &str = "Login failed";

// =============================================================================
// Text input
// =============================================================================

/// Single-line text input with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Apply an editing key; false when the key is not an edit
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Screen
// =============================================================================

/// Focus order of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    ServerUrl,
    Username,
    Password,
    Submit,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::ServerUrl => LoginField::Username,
            LoginField::Username => LoginField::Password,
            LoginField::Password | LoginField::Submit => LoginField::Submit,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            LoginField::ServerUrl | LoginField::Username => LoginField::ServerUrl,
            LoginField::Password => LoginField::Username,
            LoginField::Submit => LoginField::Password,
        }
    }
}

/// What a key press on the form amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginInput {
    Handled,
    Submit(Request),
    /// Leave the screen
    Back,
    Ignored,
}

#[derive(Debug)]
pub struct LoginScreen {
    pub server_url: TextField,
    pub username: TextField,
    pub password: TextField,
    pub field: LoginField,
    pub status: Loader<()>,
}

impl LoginScreen {
    pub fn new(server_url: &str, username: &str) -> Self {
        Self {
            server_url: TextField::new(server_url),
            username: TextField::new(username),
            password: TextField::default(),
            field: LoginField::ServerUrl,
            status: Loader::new(),
        }
    }

    /// Fresh visit. Entered values survive; focus returns to the top.
    pub fn mount(&mut self) {
        self.field = LoginField::ServerUrl;
        self.status.reset();
    }

    pub fn unmount(&mut self) {
        self.status.reset();
    }

    fn active_field(&mut self) -> Option<&mut TextField> {
        match self.field {
            LoginField::ServerUrl => Some(&mut self.server_url),
            LoginField::Username => Some(&mut self.username),
            LoginField::Password => Some(&mut self.password),
            LoginField::Submit => None,
        }
    }

    /// Start signing in. URL and username are trimmed; the password is not.
    pub fn submit(&mut self) -> Option<Request> {
        if self.status.is_loading() {
            return None;
        }
        Some(Request {
            generation: self.status.begin(),
            fetch: Fetch::SignIn {
                server_url: self.server_url.value().trim().to_string(),
                username: self.username.value().trim().to_string(),
                password: self.password.value().to_string(),
            },
        })
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> LoginInput {
        match key.code {
            KeyCode::Esc => LoginInput::Back,
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                LoginInput::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.previous();
                LoginInput::Handled
            }
            KeyCode::Enter => match self.field {
                LoginField::Password | LoginField::Submit => match self.submit() {
                    Some(req) => LoginInput::Submit(req),
                    None => LoginInput::Handled,
                },
                _ => {
                    self.field = self.field.next();
                    LoginInput::Handled
                }
            },
            _ => match self.active_field() {
                Some(field) => {
                    if field.handle_key(key) {
                        LoginInput::Handled
                    } else {
                        LoginInput::Ignored
                    }
                }
                None => LoginInput::Ignored,
            },
        }
    }

    /// Apply a sign-in result. Returns the session on success.
    pub fn apply(&mut self, generation: u64, payload: Payload) -> Option<Session> {
        let Payload::SignIn(result) = payload else {
            return None;
        };
        let (outcome, session) = match result {
            Ok(session) => (Ok(()), Some(session)),
            Err(e) => (Err(e), None),
        };
        if !self.status.resolve(generation, outcome, LOGIN_FALLBACK_ERROR) {
            return None;
        }
        session
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.status.is_loading() {
            "Signing in…"
        } else {
            "Sign in"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_field_editing() {
        let mut field = TextField::new("héllo");
        assert_eq!(field.cursor(), 5);
        field.backspace();
        assert_eq!(field.value(), "héll");
        field.home();
        field.right();
        field.delete();
        assert_eq!(field.value(), "hll");
        field.insert('e');
        assert_eq!(field.value(), "hell");
        field.end();
        field.insert('!');
        assert_eq!(field.value(), "hell!");
    }

    #[test]
    fn test_keys_edit_only_the_active_field() {
        let mut login = LoginScreen::new("", "");
        assert_eq!(login.handle_key(&key(KeyCode::Char('x'))), LoginInput::Handled);
        assert_eq!(login.handle_key(&key(KeyCode::Backspace)), LoginInput::Handled);
        assert_eq!(login.handle_key(&key(KeyCode::Char('h'))), LoginInput::Handled);
        assert_eq!(login.server_url.value(), "h");
        // Not an editing key
        assert_eq!(login.handle_key(&key(KeyCode::F(5))), LoginInput::Ignored);

        login.field = LoginField::Submit;
        assert_eq!(login.handle_key(&key(KeyCode::Char('x'))), LoginInput::Ignored);
        assert_eq!(login.server_url.value(), "h");
        assert_eq!(login.username.value(), "");
    }

    #[test]
    fn test_enter_walks_fields_then_submits() {
        let mut login = LoginScreen::new(" https://jf.local/ ", " demo ");
        assert_eq!(login.handle_key(&key(KeyCode::Enter)), LoginInput::Handled);
        assert_eq!(login.field, LoginField::Username);
        login.handle_key(&key(KeyCode::Enter));
        assert_eq!(login.field, LoginField::Password);
        login.handle_key(&key(KeyCode::Char(' ')));
        login.handle_key(&key(KeyCode::Char('p')));

        let LoginInput::Submit(req) = login.handle_key(&key(KeyCode::Enter)) else {
            panic!("expected submit");
        };
        assert_eq!(
            req.fetch,
            Fetch::SignIn {
                server_url: "https://jf.local/".into(),
                username: "demo".into(),
                password: " p".into(),
            }
        );
        assert_eq!(login.submit_label(), "Signing in…");
    }

    #[test]
    fn test_double_submit_is_ignored_while_loading() {
        let mut login = LoginScreen::new("http://a", "u");
        assert!(login.submit().is_some());
        assert!(login.submit().is_none());
    }

    #[test]
    fn test_failure_keeps_fields() {
        let mut login = LoginScreen::new("http://a", "u");
        login.password = TextField::new("secret");
        let req = login.submit().unwrap();
        let session = login.apply(
            req.generation,
            Payload::SignIn(Err(ApiError::Auth("invalid username or password".into()))),
        );
        assert!(session.is_none());
        assert_eq!(login.error(), Some("Sign in failed: invalid username or password"));
        assert_eq!(login.password.value(), "secret");
        assert_eq!(login.server_url.value(), "http://a");
    }

    #[test]
    fn test_success_returns_session() {
        let mut login = LoginScreen::new("http://a", "u");
        let req = login.submit().unwrap();
        let session = Session::connect("http://a").unwrap();
        assert!(login
            .apply(req.generation, Payload::SignIn(Ok(session)))
            .is_some());
        assert!(login.error().is_none());
    }

    #[test]
    fn test_escape_requests_back() {
        let mut login = LoginScreen::new("http://a", "u");
        assert_eq!(login.handle_key(&key(KeyCode::Esc)), LoginInput::Back);
    }
}
