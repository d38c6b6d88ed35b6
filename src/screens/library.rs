//! Library screen: items of one library as poster tiles

use crate::focus::{GridFocus, MenuKey, Platform};
use crate::layout::GridKind;
use crate::models::LibraryItem;
use crate::screens::{Fetch, Loader, Payload, Request};

pub const LIBRARY_FALLBACK_ERROR: &str = "Failed to load library items";

#[derive(Debug, Default)]
pub struct LibraryScreen {
    library_id: Option<String>,
    /// Name of the library, when known from the tile that opened it
    pub title: Option<String>,
    pub items: Loader<Vec<LibraryItem>>,
    pub focus: GridFocus,
    pub menu: MenuKey,
}

impl LibraryScreen {
    pub const GRID: GridKind = GridKind::Item;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn library_id(&self) -> Option<&str> {
        self.library_id.as_deref()
    }

    /// Fresh visit for `library_id`. No request when the id is absent.
    pub fn mount(&mut self, platform: Platform, library_id: Option<String>) -> Option<Request> {
        self.library_id = library_id.filter(|id| !id.is_empty());
        self.items.reset();
        self.focus = GridFocus::mount(platform, 0);
        if platform.is_tv {
            self.menu.enable();
        }
        self.refresh()
    }

    pub fn unmount(&mut self) {
        self.items.reset();
        self.menu.release();
    }

    /// Switch to another library while mounted. Reloads only on change.
    pub fn set_library(&mut self, platform: Platform, library_id: Option<String>) -> Option<Request> {
        let library_id = library_id.filter(|id| !id.is_empty());
        if library_id == self.library_id {
            return None;
        }
        self.library_id = library_id;
        self.items.reset();
        self.focus = GridFocus::mount(platform, 0);
        self.refresh()
    }

    /// Re-enter `Loading`; never fires without a library id
    pub fn refresh(&mut self) -> Option<Request> {
        let id = self.library_id.clone()?;
        Some(Request {
            generation: self.items.begin(),
            fetch: Fetch::Items(id),
        })
    }

    pub fn apply(&mut self, platform: Platform, generation: u64, payload: Payload) -> bool {
        let Payload::Items(result) = payload else {
            return false;
        };
        if !self.items.resolve(generation, result, LIBRARY_FALLBACK_ERROR) {
            return false;
        }
        self.focus.set_len(platform, self.tiles().len());
        true
    }

    pub fn tiles(&self) -> &[LibraryItem] {
        self.items.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn focused_tile(&self) -> Option<&LibraryItem> {
        self.focus.focused().and_then(|i| self.tiles().get(i))
    }

    pub fn refresh_label(&self) -> &'static str {
        if self.items.is_loading() {
            "Refreshing…"
        } else {
            "Refresh"
        }
    }
}
