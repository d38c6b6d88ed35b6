//! Home screen: the user's libraries as square tiles

use crate::focus::{GridFocus, MenuKey, Platform};
use crate::layout::GridKind;
use crate::models::LibraryItem;
use crate::screens::{Fetch, Loader, Payload, Request};

/// Shown when loading fails without a message of its own
pub const HOME_FALLBACK_ERROR: &str = "Not signed in. Use Sign in to continue.";

#[derive(Debug, Default)]
pub struct HomeScreen {
    pub libraries: Loader<Vec<LibraryItem>>,
    pub focus: GridFocus,
    pub menu: MenuKey,
}

impl HomeScreen {
    pub const GRID: GridKind = GridKind::Library;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh visit: reset focus, claim the menu key, start loading
    pub fn mount(&mut self, platform: Platform) -> Request {
        self.focus = GridFocus::mount(platform, 0);
        if platform.is_tv {
            self.menu.enable();
        }
        self.refresh()
    }

    pub fn unmount(&mut self) {
        self.libraries.reset();
        self.menu.release();
    }

    /// Re-enter `Loading` from any state
    pub fn refresh(&mut self) -> Request {
        Request {
            generation: self.libraries.begin(),
            fetch: Fetch::Libraries,
        }
    }

    /// Apply a response; false when it was not for this screen or stale
    pub fn apply(&mut self, platform: Platform, generation: u64, payload: Payload) -> bool {
        let Payload::Libraries(result) = payload else {
            return false;
        };
        if !self
            .libraries
            .resolve(generation, result, HOME_FALLBACK_ERROR)
        {
            return false;
        }
        self.focus.set_len(platform, self.tiles().len());
        true
    }

    pub fn tiles(&self) -> &[LibraryItem] {
        self.libraries.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn focused_tile(&self) -> Option<&LibraryItem> {
        self.focus.focused().and_then(|i| self.tiles().get(i))
    }

    /// Label of the refresh action
    pub fn refresh_label(&self) -> &'static str {
        if self.libraries.is_loading() {
            "Refreshing…"
        } else {
            "Refresh"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn libraries() -> Vec<LibraryItem> {
        vec![
            LibraryItem::new("1", "Movies"),
            LibraryItem::new("2", "Shows"),
        ]
    }

    #[test]
    fn test_mount_starts_loading() {
        let mut home = HomeScreen::new();
        let req = home.mount(Platform::tv());
        assert_eq!(req.fetch, Fetch::Libraries);
        assert!(home.libraries.is_loading());
        assert_eq!(home.refresh_label(), "Refreshing…");
        assert!(home.menu.is_enabled());
    }

    #[test]
    fn test_loaded_libraries_take_preferred_focus_on_tv() {
        let mut home = HomeScreen::new();
        let req = home.mount(Platform::tv());
        assert!(home.apply(Platform::tv(), req.generation, Payload::Libraries(Ok(libraries()))));
        assert_eq!(home.tiles().len(), 2);
        assert_eq!(home.focused_tile().and_then(|l| l.name.as_deref()), Some("Movies"));
    }

    #[test]
    fn test_desktop_has_no_focus_and_no_menu_key() {
        let mut home = HomeScreen::new();
        let req = home.mount(Platform::desktop());
        home.apply(Platform::desktop(), req.generation, Payload::Libraries(Ok(libraries())));
        assert_eq!(home.focused_tile(), None);
        assert!(!home.menu.is_enabled());
    }

    #[test]
    fn test_failure_clears_tiles() {
        let mut home = HomeScreen::new();
        let req = home.mount(Platform::tv());
        home.apply(Platform::tv(), req.generation, Payload::Libraries(Ok(libraries())));

        let req = home.refresh();
        home.apply(
            Platform::tv(),
            req.generation,
            Payload::Libraries(Err(ApiError::NotAuthenticated)),
        );
        assert!(home.tiles().is_empty());
        assert_eq!(home.libraries.error(), Some(HOME_FALLBACK_ERROR));
        assert_eq!(home.focused_tile(), None);
    }

    #[test]
    fn test_refresh_race_keeps_newest() {
        let mut home = HomeScreen::new();
        let first = home.mount(Platform::tv());
        let second = home.refresh();

        assert!(home.apply(
            Platform::tv(),
            second.generation,
            Payload::Libraries(Ok(vec![LibraryItem::new("new", "New")])),
        ));
        assert!(!home.apply(
            Platform::tv(),
            first.generation,
            Payload::Libraries(Ok(vec![LibraryItem::new("old", "Old")])),
        ));
        assert_eq!(home.tiles()[0].id.as_deref(), Some("new"));
    }
}
