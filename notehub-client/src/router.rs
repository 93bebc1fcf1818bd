use notehub_common::domain::{NoteId, UserId};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    Note(NoteId),
    Admin,
    AdminUser(UserId),
}

impl Route {
    /// `None` for paths that are not declared.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = path
            .split('/')
            .filter(|x| !x.is_empty())
            .collect::<Vec<_>>();

        match segments.as_slice() {
            [] => Some(Self::Root),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["dashboard"] => Some(Self::Dashboard),
            ["notes", id] => id.parse().ok().map(Self::Note),
            ["admin"] => Some(Self::Admin),
            ["admin", "users", id] => id.parse().ok().map(Self::AdminUser),
            _ => None,
        }
    }

    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "/"),
            Self::Login => write!(f, "/login"),
            Self::Register => write!(f, "/register"),
            Self::Dashboard => write!(f, "/dashboard"),
            Self::Note(id) => write!(f, "/notes/{id}"),
            Self::Admin => write!(f, "/admin"),
            Self::AdminUser(id) => write!(f, "/admin/users/{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    /// Where the user ends up.
    pub fn route(&self) -> Route {
        match self {
            Self::Render(r) | Self::Redirect(r) => *r,
        }
    }
}

/// Decides what a path shows given only whether a token is held. The token itself is not
/// checked, an invalid one surfaces later as a 401.
pub fn guard(path: &str, has_token: bool) -> Resolution {
    let route = Route::parse(path).unwrap_or(Route::Root);

    match (route, has_token) {
        (Route::Root, true) => Resolution::Redirect(Route::Dashboard),
        (Route::Root, false) => Resolution::Redirect(Route::Login),
        (r, true) if r.is_public() => Resolution::Redirect(Route::Dashboard),
        (r, false) if !r.is_public() => Resolution::Redirect(Route::Login),
        (r, _) => Resolution::Render(r),
    }
}

/// Current location, shared between the views and the http layer.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<Mutex<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Route::Root)),
        }
    }

    pub fn current(&self) -> Route {
        *self.lock()
    }

    pub fn navigate(&self, path: &str, has_token: bool) -> Resolution {
        let resolution = guard(path, has_token);
        debug!(path, to = %resolution.route(), "navigate");
        *self.lock() = resolution.route();
        resolution
    }

    /// Runs the guard again for the current location, after the session changed.
    pub fn refresh(&self, has_token: bool) -> Resolution {
        let current = self.current().to_string();
        self.navigate(&current, has_token)
    }

    /// Moves without consulting the guard.
    pub fn force(&self, route: Route) {
        debug!(to = %route, "forced navigation");
        *self.lock() = route;
    }

    fn lock(&self) -> MutexGuard<'_, Route> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
