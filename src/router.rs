//! Routes and navigation history
//!
//! Pushing keeps the previous route on the history stack; replacing does
//! not, which is how a successful sign-in leaves no way back to the form.
//! Pushing a route that is already in the history unwinds back to it, so
//! bouncing between two pages never grows the stack.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Library(String),
    About,
    Play(String),
}

impl Route {
    /// Parse an application path such as `/library/abc`
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/about" => Some(Route::About),
            _ => {
                if let Some(id) = trimmed.strip_prefix("/library/") {
                    (!id.is_empty() && !id.contains('/')).then(|| Route::Library(id.to_string()))
                } else if let Some(id) = trimmed.strip_prefix("/play/") {
                    (!id.is_empty() && !id.contains('/')).then(|| Route::Play(id.to_string()))
                } else {
                    None
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Library(id) => format!("/library/{}", id),
            Route::About => "/about".to_string(),
            Route::Play(id) => format!("/play/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Navigate forward. Returns false (and does nothing) for the current route.
    pub fn push(&mut self, route: Route) -> bool {
        if self.current == route {
            return false;
        }
        if let Some(at) = self.history.iter().position(|r| *r == route) {
            self.history.truncate(at);
            self.current = route;
            return true;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
        true
    }

    /// Swap the current route without recording it in history
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    /// Pop one entry; false when there is nowhere to go
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }
}
