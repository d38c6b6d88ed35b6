//! About screen: client identity and, when connected, the server's
//! public information

use crate::focus::{MenuKey, Platform};
use crate::models::SystemInfo;
use crate::screens::{Fetch, Loader, Payload, Request};

pub const ABOUT_FALLBACK_ERROR: &str = "Server information unavailable";

#[derive(Debug, Default)]
pub struct AboutScreen {
    pub server: Loader<SystemInfo>,
    pub menu: MenuKey,
}

impl AboutScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches server info only when a session exists
    pub fn mount(&mut self, platform: Platform, has_session: bool) -> Option<Request> {
        self.server.reset();
        if platform.is_tv {
            self.menu.enable();
        }
        if has_session {
            self.refresh()
        } else {
            None
        }
    }

    pub fn unmount(&mut self) {
        self.server.reset();
        self.menu.release();
    }

    pub fn refresh(&mut self) -> Option<Request> {
        Some(Request {
            generation: self.server.begin(),
            fetch: Fetch::SystemInfo,
        })
    }

    pub fn apply(&mut self, generation: u64, payload: Payload) -> bool {
        let Payload::SystemInfo(result) = payload else {
            return false;
        };
        self.server.resolve(generation, result, ABOUT_FALLBACK_ERROR)
    }
}
