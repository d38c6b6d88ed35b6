//! App state and core application logic
//!
//! Owns the router and every screen, translates key presses into
//! navigation, and collects [`Effect`]s for the event loop to carry out.
//! Nothing in here touches the network or the terminal, so the whole flow
//! can be driven from tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::Session;
use crate::focus::{Direction, MenuKey, NavAction, Platform, RemoteButton};
use crate::layout::{layout_for, GridKind};
use crate::models::ViewportMetrics;
use crate::playback::{PlaybackSample, PlayerError, Sampler};
use crate::router::{Route, Router};
use crate::screens::player::{OpenPlayer, Transport};
use crate::screens::{
    login::LoginInput, AboutScreen, HomeScreen, LibraryScreen, LoginScreen, Payload, PlayerScreen,
    Request, Response,
};

// =============================================================================
// Effects
// =============================================================================

/// Side effects requested by the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a server request and feed the response back through [`App::apply`]
    Fetch(Request),
    /// Start a player for an item, then call [`App::player_opened`]
    OpenPlayer(OpenPlayer),
    /// Sign out, then call [`App::signed_out`]
    SignOut,
}

// =============================================================================
// Navigation bar
// =============================================================================

/// Entries of the TV navigation bar
pub const NAV_ITEMS: [(&str, &str); 3] = [("Home", "/"), ("Sign in", "/login"), ("About", "/about")];

/// Where remote focus currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusZone {
    NavBar,
    #[default]
    Content,
}

#[derive(Debug, Clone, Default)]
pub struct NavBar {
    pub focused: Option<usize>,
}

impl NavBar {
    /// Index of the entry matching `route`, if any
    pub fn active_index(route: &Route) -> Option<usize> {
        let path = route.path();
        NAV_ITEMS.iter().position(|(_, p)| *p == path)
    }

    fn move_by(&mut self, delta: isize) {
        let current = self.focused.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, NAV_ITEMS.len() as isize - 1);
        self.focused = Some(next as usize);
    }
}

/// Who is signed in, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub server_url: String,
    pub user_name: Option<String>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            server_url: session.server_url().to_string(),
            user_name: session.user_name().map(str::to_string),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    pub platform: Platform,
    pub router: Router,
    pub running: bool,
    pub viewport: ViewportMetrics,
    pub zone: FocusZone,
    pub nav: NavBar,
    pub session: Option<SessionSummary>,
    pub device_id: String,

    pub home: HomeScreen,
    pub library: LibraryScreen,
    pub login: LoginScreen,
    pub about: AboutScreen,
    pub player: PlayerScreen,

    /// Title for the next player mount, taken from the activated tile
    pending_title: Option<String>,
    effects: Vec<Effect>,
}

impl App {
    /// Create the app on the home route. Call [`App::start`] to mount it.
    pub fn new(platform: Platform, server_url: &str, username: &str) -> Self {
        Self {
            platform,
            router: Router::new(Route::Home),
            running: true,
            viewport: ViewportMetrics::default(),
            zone: FocusZone::Content,
            nav: NavBar::default(),
            session: None,
            device_id: String::new(),
            home: HomeScreen::new(),
            library: LibraryScreen::new(),
            login: LoginScreen::new(server_url, username),
            about: AboutScreen::new(),
            player: PlayerScreen::new(),
            pending_title: None,
            effects: Vec::new(),
        }
    }

    /// Mount the initial route
    pub fn start(&mut self) {
        let route = self.router.current().clone();
        self.mount(&route);
    }

    pub fn quit(&mut self) {
        self.running = false;
        let route = self.router.current().clone();
        self.unmount(&route);
    }

    /// Drain pending effects
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn set_viewport(&mut self, viewport: ViewportMetrics) {
        self.viewport = viewport;
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    fn fetch(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            self.effects.push(Effect::Fetch(request));
        }
    }

    // -------------------------------------------------------------------------
    // Mounting
    // -------------------------------------------------------------------------

    fn mount(&mut self, route: &Route) {
        tracing::debug!(route = %route, "mount");
        self.zone = FocusZone::Content;
        self.nav.focused = None;
        match route {
            Route::Home => {
                let req = self.home.mount(self.platform);
                self.fetch(Some(req));
            }
            Route::Login => self.login.mount(),
            Route::Library(id) => {
                let req = self.library.mount(self.platform, Some(id.clone()));
                self.fetch(req);
            }
            Route::About => {
                let req = self.about.mount(self.platform, self.session.is_some());
                self.fetch(req);
            }
            Route::Play(id) => {
                let title = self
                    .pending_title
                    .take()
                    .unwrap_or_else(|| "Untitled".to_string());
                let open = self.player.mount(self.platform, id.clone(), title);
                self.effects.push(Effect::OpenPlayer(open));
            }
        }
        // Nothing focusable in the content yet: on TV the nav bar takes it
        if self.platform.is_tv && *route == Route::About {
            self.focus_nav_bar();
        }
    }

    fn unmount(&mut self, route: &Route) {
        match route {
            Route::Home => self.home.unmount(),
            Route::Login => self.login.unmount(),
            Route::Library(_) => self.library.unmount(),
            Route::About => self.about.unmount(),
            Route::Play(_) => self.player.unmount(),
        }
    }

    /// Push a route, remounting screens as needed
    pub fn navigate(&mut self, route: Route) {
        let previous = self.router.current().clone();
        if let (Route::Library(_), Route::Library(id)) = (&previous, &route) {
            if self.router.push(route.clone()) {
                let req = self.library.set_library(self.platform, Some(id.clone()));
                self.fetch(req);
            }
            return;
        }
        if self.router.push(route.clone()) {
            self.unmount(&previous);
            self.mount(&route);
        }
    }

    /// Replace the current route (no history entry)
    pub fn replace(&mut self, route: Route) {
        let previous = self.router.current().clone();
        self.unmount(&previous);
        self.router.replace(route.clone());
        self.mount(&route);
    }

    /// Go back one route; false at the root
    pub fn back(&mut self) -> bool {
        if !self.router.can_go_back() {
            return false;
        }
        let previous = self.router.current().clone();
        self.unmount(&previous);
        self.router.back();
        let route = self.router.current().clone();
        self.mount(&route);
        true
    }

    /// Re-enter loading on the current screen
    pub fn refresh(&mut self) {
        let route = self.router.current().clone();
        let req = match route {
            Route::Home => Some(self.home.refresh()),
            Route::Library(_) => self.library.refresh(),
            Route::About if self.session.is_some() => self.about.refresh(),
            _ => None,
        };
        self.fetch(req);
    }

    fn menu_key(&self) -> &MenuKey {
        match self.router.current() {
            Route::Home => &self.home.menu,
            Route::Library(_) => &self.library.menu,
            Route::About => &self.about.menu,
            Route::Play(_) => &self.player.menu,
            // The login form handles its own escape key
            Route::Login => &self.home.menu,
        }
    }

    fn focus_nav_bar(&mut self) {
        self.zone = FocusZone::NavBar;
        self.nav.focused = Some(NavBar::active_index(self.router.current()).unwrap_or(0));
    }

    // -------------------------------------------------------------------------
    // Async results
    // -------------------------------------------------------------------------

    /// Apply a finished request. Stale and misrouted responses are ignored.
    pub fn apply(&mut self, response: Response) {
        let Response {
            generation,
            payload,
        } = response;
        match payload {
            payload @ Payload::Libraries(_) => {
                // Only the first load after mounting places focus; later
                // refreshes leave the zone wherever the user put it
                let fresh = self.home.focus.is_fresh();
                if self.home.apply(self.platform, generation, payload)
                    && fresh
                    && self.platform.is_tv
                    && *self.router.current() == Route::Home
                {
                    if self.home.tiles().is_empty() {
                        // Preferred focus falls back to the nav bar's first entry
                        self.zone = FocusZone::NavBar;
                        self.nav.focused = Some(0);
                    } else {
                        self.zone = FocusZone::Content;
                        self.nav.focused = None;
                    }
                }
            }
            payload @ Payload::Items(_) => {
                self.library.apply(self.platform, generation, payload);
            }
            payload @ Payload::SignIn(_) => {
                // The client holds the new session even when the form was
                // left before the answer arrived
                let signed_in = match &payload {
                    Payload::SignIn(Ok(session)) => {
                        self.session = Some(SessionSummary::from(session));
                        true
                    }
                    _ => false,
                };
                if self.login.apply(generation, payload).is_some() {
                    self.replace(Route::Home);
                } else if signed_in {
                    self.refresh();
                }
            }
            payload @ Payload::SystemInfo(_) => {
                self.about.apply(generation, payload);
            }
        }
    }

    /// The media client dropped its session
    pub fn signed_out(&mut self) {
        self.session = None;
        if *self.router.current() == Route::Home {
            self.refresh();
        } else {
            self.replace(Route::Home);
        }
    }

    pub fn player_opened(&mut self, generation: u64, sampler: Sampler) {
        self.player.attach(generation, sampler);
    }

    pub fn player_failed(&mut self, generation: u64, error: &PlayerError) {
        self.player.fail(generation, error);
    }

    /// A sample from the player's sampler
    pub fn on_playback_sample(&mut self, generation: u64, sample: PlaybackSample) {
        if matches!(self.router.current(), Route::Play(_)) {
            self.player.apply_sample(generation, sample);
        }
    }

    /// Drop a pressed tile back to focused once it has been drawn
    pub fn settle(&mut self) {
        self.home.focus.release();
        self.library.focus.release();
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        let route = self.router.current().clone();
        match route {
            Route::Login => return self.handle_login_key(&key),
            Route::Play(_) => {
                if self.handle_player_key(&key) {
                    return true;
                }
            }
            _ => {}
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('r') => {
                self.refresh();
                return true;
            }
            KeyCode::Char('s') => {
                self.navigate(Route::Login);
                return true;
            }
            KeyCode::Char('a') => {
                self.navigate(Route::About);
                return true;
            }
            KeyCode::Char('g') => {
                self.navigate(Route::Home);
                return true;
            }
            KeyCode::Char('o') => {
                self.effects.push(Effect::SignOut);
                return true;
            }
            _ => {}
        }

        let Some(button) = RemoteButton::from_key(&key) else {
            return false;
        };
        let action = match self.menu_key().action_for(button) {
            Some(action) => Some(action),
            // Without a TV remote, Esc acts as the header's Back button
            None if button == RemoteButton::Menu && !self.platform.is_tv => Some(NavAction::Back),
            None => None,
        };
        match action {
            Some(NavAction::Back) => self.back(),
            Some(NavAction::Move(direction)) => self.move_focus(direction),
            Some(NavAction::Activate) => self.activate(),
            Some(NavAction::TogglePlayback) => false,
            None => false,
        }
    }

    fn handle_login_key(&mut self, key: &KeyEvent) -> bool {
        match self.login.handle_key(key) {
            LoginInput::Submit(request) => {
                self.effects.push(Effect::Fetch(request));
                true
            }
            LoginInput::Back => {
                if !self.back() {
                    self.replace(Route::Home);
                }
                true
            }
            LoginInput::Handled => true,
            LoginInput::Ignored => false,
        }
    }

    fn handle_player_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.player.select_left(),
            KeyCode::Right | KeyCode::Char('l') => self.player.select_right(),
            KeyCode::Enter => {
                let action = self.player.selected_transport();
                self.player.transport(action);
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => self.player.transport(Transport::PlayPause),
            KeyCode::Char('[') => self.player.transport(Transport::Back),
            KeyCode::Char(']') => self.player.transport(Transport::Forward),
            KeyCode::Char('0') | KeyCode::Char('r') => self.player.transport(Transport::Rewind),
            _ => return false,
        }
        true
    }

    fn grid_kind(&self) -> Option<GridKind> {
        match self.router.current() {
            Route::Home => Some(HomeScreen::GRID),
            Route::Library(_) => Some(LibraryScreen::GRID),
            _ => None,
        }
    }

    fn move_focus(&mut self, direction: Direction) -> bool {
        if self.zone == FocusZone::NavBar {
            return match direction {
                Direction::Left => {
                    self.nav.move_by(-1);
                    true
                }
                Direction::Right => {
                    self.nav.move_by(1);
                    true
                }
                Direction::Down => {
                    let has_tiles = match self.router.current() {
                        Route::Home => !self.home.tiles().is_empty(),
                        Route::Library(_) => !self.library.tiles().is_empty(),
                        _ => false,
                    };
                    if has_tiles {
                        self.zone = FocusZone::Content;
                        self.nav.focused = None;
                        let focus = match self.router.current() {
                            Route::Library(_) => &mut self.library.focus,
                            _ => &mut self.home.focus,
                        };
                        if focus.focused().is_none() {
                            focus.focus(0);
                        }
                    }
                    has_tiles
                }
                Direction::Up => false,
            };
        }

        let Some(kind) = self.grid_kind() else {
            if self.platform.shows_nav_bar() && direction == Direction::Up {
                self.focus_nav_bar();
                return true;
            }
            return false;
        };
        let columns = layout_for(self.viewport.width, kind).column_count;
        let focus = match kind {
            GridKind::Library => &mut self.home.focus,
            GridKind::Item => &mut self.library.focus,
        };
        let moved = focus.move_focus(direction, columns);
        if !moved && direction == Direction::Up && self.platform.shows_nav_bar() {
            focus.blur();
            self.focus_nav_bar();
            return true;
        }
        moved
    }

    fn activate(&mut self) -> bool {
        if self.zone == FocusZone::NavBar {
            let Some(route) = self
                .nav
                .focused
                .and_then(|i| NAV_ITEMS.get(i))
                .and_then(|(_, path)| Route::parse(path))
            else {
                return false;
            };
            self.navigate(route);
            return true;
        }

        let route = self.router.current().clone();
        match route {
            Route::Home => {
                self.home.focus.press();
                let Some(tile) = self.home.focused_tile() else {
                    return false;
                };
                let Some(id) = tile.id.clone() else {
                    return false;
                };
                self.library.title = tile.name.clone();
                self.navigate(Route::Library(id));
                true
            }
            Route::Library(_) => {
                self.library.focus.press();
                let Some(tile) = self.library.focused_tile() else {
                    return false;
                };
                let Some(id) = tile.id.clone() else {
                    return false;
                };
                self.pending_title = Some(tile.display_name("Untitled").to_string());
                self.navigate(Route::Play(id));
                true
            }
            _ => false,
        }
    }
}
