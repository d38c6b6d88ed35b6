//! End-to-end app flow tests
//!
//! Drives the app with key events and canned responses:
//! Home -> Library -> Player, sign-in replacing the login route, TV focus
//! rules, the menu key and stale responses.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jellytv::api::{ApiError, Session};
use jellytv::app::{App, Effect, FocusZone};
use jellytv::focus::{Platform, TileInteraction};
use jellytv::models::{LibraryItem, ViewportMetrics};
use jellytv::router::Route;
use jellytv::screens::{Fetch, LoadState, Payload, Request, Response};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(key(code))
}

fn requests(app: &mut App) -> Vec<Request> {
    app.take_effects()
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Fetch(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn single_request(app: &mut App) -> Request {
    let mut reqs = requests(app);
    assert_eq!(reqs.len(), 1, "expected exactly one request, got {:?}", reqs);
    reqs.remove(0)
}

fn libraries() -> Vec<LibraryItem> {
    vec![
        LibraryItem::new("lib-1", "Movies"),
        LibraryItem::new("lib-2", "Shows"),
        LibraryItem::new("lib-3", "Music"),
    ]
}

fn items() -> Vec<LibraryItem> {
    (0..10)
        .map(|i| LibraryItem::new(format!("item-{}", i), format!("Film {}", i)))
        .collect()
}

/// TV app with libraries loaded on the home screen
fn tv_home() -> App {
    let mut app = App::new(Platform::tv(), "http://jf.local", "alice");
    app.set_viewport(ViewportMetrics::new(1920, 1080, 16.0));
    app.start();
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    app
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_home_to_library_to_player_and_back() {
    let mut app = tv_home();
    assert_eq!(app.home.focused_tile().and_then(|t| t.id.as_deref()), Some("lib-1"));

    press(&mut app, KeyCode::Right);
    assert!(press(&mut app, KeyCode::Enter));
    assert_eq!(app.route(), &Route::Library("lib-2".into()));
    assert_eq!(app.library.title.as_deref(), Some("Shows"));

    let req = single_request(&mut app);
    assert_eq!(req.fetch, Fetch::Items("lib-2".into()));
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Items(Ok(items())),
    });
    // Fresh mount: first tile has preferred focus
    assert_eq!(app.library.focus.focused(), Some(0));

    press(&mut app, KeyCode::Down);
    assert!(press(&mut app, KeyCode::Enter));
    // 1920px item grid has 6 columns
    assert_eq!(app.route(), &Route::Play("item-6".into()));
    assert_eq!(app.player.title, "Film 6");
    let effects = app.take_effects();
    assert!(matches!(&effects[..], [Effect::OpenPlayer(open)] if open.item_id == "item-6"));

    // Menu button backs out of the player into a reloaded library
    assert!(press(&mut app, KeyCode::Esc));
    assert_eq!(app.route(), &Route::Library("lib-2".into()));
    assert!(!app.player.has_player());
    assert_eq!(single_request(&mut app).fetch, Fetch::Items("lib-2".into()));

    assert!(press(&mut app, KeyCode::Esc));
    assert_eq!(app.route(), &Route::Home);
    assert!(!press(&mut app, KeyCode::Esc));
}

#[test]
fn test_desktop_escape_goes_back_without_menu_key() {
    let mut app = App::new(Platform::desktop(), "http://jf.local", "alice");
    app.start();
    app.take_effects();
    assert!(!app.home.menu.is_enabled());

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.route(), &Route::About);
    assert!(press(&mut app, KeyCode::Esc));
    assert_eq!(app.route(), &Route::Home);
}

#[test]
fn test_bouncing_between_pages_keeps_history_short() {
    let mut app = App::new(Platform::desktop(), "http://jf.local", "alice");
    app.start();
    for _ in 0..20 {
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('g'));
    }
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(app.router.depth(), 0);

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.router.depth(), 1);
    assert!(press(&mut app, KeyCode::Esc));
    assert!(!app.router.can_go_back());
}

#[test]
fn test_menu_key_enabled_once_per_mount() {
    let mut app = tv_home();
    assert!(app.home.menu.is_enabled());
    assert_eq!(app.home.menu.enable_count(), 1);

    // Re-render-like events do not enable again
    app.refresh();
    app.set_viewport(ViewportMetrics::new(2400, 1080, 16.0));
    assert_eq!(app.home.menu.enable_count(), 1);

    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.home.menu.enable_count(), 2);
}

// =============================================================================
// Sign-in
// =============================================================================

#[test]
fn test_sign_in_replaces_login_route() {
    let mut app = App::new(Platform::desktop(), "http://jf.local", "alice");
    app.start();
    app.take_effects();

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.route(), &Route::Login);
    assert_eq!(app.router.depth(), 1);

    // Server -> Username -> Password, then type and submit
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    for c in "pw".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    let req = single_request(&mut app);
    assert_eq!(
        req.fetch,
        Fetch::SignIn {
            server_url: "http://jf.local".into(),
            username: "alice".into(),
            password: "pw".into(),
        }
    );
    assert_eq!(app.login.submit_label(), "Signing in…");

    let session = Session::connect("http://jf.local").unwrap();
    app.apply(Response {
        generation: req.generation,
        payload: Payload::SignIn(Ok(session)),
    });

    assert_eq!(app.route(), &Route::Home);
    assert!(app.session.is_some());
    // Home reloads after sign-in
    assert_eq!(single_request(&mut app).fetch, Fetch::Libraries);
    // Back skips the replaced login entry
    assert!(app.back());
    assert_eq!(app.route(), &Route::Home);
    assert!(!app.router.can_go_back());
}

#[test]
fn test_sign_in_finishing_after_leaving_form_is_kept() {
    let mut app = App::new(Platform::desktop(), "http://jf.local", "alice");
    app.start();
    app.take_effects();

    press(&mut app, KeyCode::Char('s'));
    app.login.field = jellytv::screens::login::LoginField::Submit;
    press(&mut app, KeyCode::Enter);
    let req = single_request(&mut app);

    // Leave the form while the request is in flight
    assert!(press(&mut app, KeyCode::Esc));
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(single_request(&mut app).fetch, Fetch::Libraries);

    app.apply(Response {
        generation: req.generation,
        payload: Payload::SignIn(Ok(Session::connect("http://jf.local").unwrap())),
    });
    assert!(app.session.is_some());
    assert_eq!(app.route(), &Route::Home);
    // The page shown reloads with the new session
    assert_eq!(single_request(&mut app).fetch, Fetch::Libraries);
}

#[test]
fn test_failed_sign_in_stays_with_values() {
    let mut app = App::new(Platform::tv(), "http://jf.local", "alice");
    app.start();
    app.take_effects();
    app.navigate(Route::Login);

    app.login.field = jellytv::screens::login::LoginField::Submit;
    press(&mut app, KeyCode::Enter);
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::SignIn(Err(ApiError::Auth("invalid username or password".into()))),
    });

    assert_eq!(app.route(), &Route::Login);
    assert_eq!(
        app.login.error(),
        Some("Sign in failed: invalid username or password")
    );
    assert_eq!(app.login.username.value(), "alice");
    assert!(app.session.is_none());
}

#[test]
fn test_typing_q_on_login_does_not_quit() {
    let mut app = App::new(Platform::desktop(), "", "");
    app.start();
    app.navigate(Route::Login);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.running);
    assert_eq!(app.login.server_url.value(), "q");
}

#[test]
fn test_sign_out_clears_session() {
    let mut app = tv_home();
    app.session = Some(jellytv::app::SessionSummary {
        server_url: "http://jf.local".into(),
        user_name: Some("alice".into()),
    });
    press(&mut app, KeyCode::Char('o'));
    assert_eq!(app.take_effects(), vec![Effect::SignOut]);

    app.signed_out();
    assert!(app.session.is_none());
    assert_eq!(single_request(&mut app).fetch, Fetch::Libraries);
}

// =============================================================================
// TV focus
// =============================================================================

#[test]
fn test_tv_empty_home_focuses_nav_bar() {
    let mut app = App::new(Platform::tv(), "http://jf.local", "alice");
    app.start();
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Err(ApiError::NotAuthenticated)),
    });

    assert_eq!(app.zone, FocusZone::NavBar);
    assert_eq!(app.nav.focused, Some(0));
    assert_eq!(
        app.home.libraries.error(),
        Some("Not signed in. Use Sign in to continue.")
    );

    // Right then Select opens the sign-in page
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.route(), &Route::Login);
}

#[test]
fn test_up_from_top_row_reaches_nav_bar_and_back() {
    let mut app = tv_home();
    assert!(press(&mut app, KeyCode::Up));
    assert_eq!(app.zone, FocusZone::NavBar);
    assert_eq!(app.home.focus.focused(), None);

    assert!(press(&mut app, KeyCode::Down));
    assert_eq!(app.zone, FocusZone::Content);
    assert_eq!(app.home.focus.focused(), Some(0));
}

#[test]
fn test_refresh_keeps_focus_in_nav_bar() {
    let mut app = tv_home();
    assert!(press(&mut app, KeyCode::Up));
    assert_eq!(app.zone, FocusZone::NavBar);

    press(&mut app, KeyCode::Char('r'));
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    assert_eq!(app.zone, FocusZone::NavBar);
    assert_eq!(app.nav.focused, Some(0));
    assert_eq!(app.home.focus.focused(), None);
}

#[test]
fn test_refresh_keeps_moved_focus() {
    let mut app = tv_home();
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    app.refresh();
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    assert_eq!(app.zone, FocusZone::Content);
    assert_eq!(app.home.focus.focused(), Some(2));
}

#[test]
fn test_select_presses_tile_for_one_frame() {
    let mut app = App::new(Platform::tv(), "http://jf.local", "alice");
    app.start();
    let req = single_request(&mut app);
    let loose = LibraryItem {
        name: Some("Loose".into()),
        ..LibraryItem::default()
    };
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Ok(vec![loose])),
    });

    // A tile without an id cannot open, but still shows the press
    assert!(!press(&mut app, KeyCode::Enter));
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(app.home.focus.interaction(0), TileInteraction::Pressed);

    app.settle();
    assert_eq!(app.home.focus.interaction(0), TileInteraction::Focused);
}

#[test]
fn test_desktop_has_no_preferred_focus() {
    let mut app = App::new(Platform::desktop(), "http://jf.local", "alice");
    app.start();
    let req = single_request(&mut app);
    app.apply(Response {
        generation: req.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    assert_eq!(app.home.focus.focused(), None);
    assert_eq!(app.zone, FocusZone::Content);

    // Enter does nothing until something is focused
    assert!(!press(&mut app, KeyCode::Enter));
    press(&mut app, KeyCode::Down);
    assert_eq!(app.home.focus.focused(), Some(0));
}

// =============================================================================
// Races
// =============================================================================

#[test]
fn test_stale_library_response_is_dropped() {
    let mut app = tv_home();
    press(&mut app, KeyCode::Enter);
    let first = single_request(&mut app);

    // Leave and come back to another library before the first answers
    app.back();
    let reload = single_request(&mut app);
    app.apply(Response {
        generation: reload.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    let second = single_request(&mut app);
    assert_ne!(first.generation, second.generation);

    app.apply(Response {
        generation: first.generation,
        payload: Payload::Items(Ok(vec![LibraryItem::new("old", "Old")])),
    });
    assert_eq!(app.library.items.state(), &LoadState::Loading);

    app.apply(Response {
        generation: second.generation,
        payload: Payload::Items(Ok(items())),
    });
    assert_eq!(app.library.tiles().len(), 10);
}

#[test]
fn test_refresh_race_keeps_latest() {
    let mut app = tv_home();
    app.refresh();
    let older = single_request(&mut app);
    app.refresh();
    let newer = single_request(&mut app);
    assert_eq!(app.home.refresh_label(), "Refreshing…");

    app.apply(Response {
        generation: newer.generation,
        payload: Payload::Libraries(Ok(vec![LibraryItem::new("new", "New")])),
    });
    app.apply(Response {
        generation: older.generation,
        payload: Payload::Libraries(Ok(libraries())),
    });
    assert_eq!(app.home.tiles().len(), 1);
    assert_eq!(app.home.refresh_label(), "Refresh");
}

#[test]
fn test_ctrl_c_quits_anywhere() {
    let mut app = tv_home();
    app.navigate(Route::Login);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(!app.running);
}
