//! What each route shows, minus the presentation.

use crate::error::ApiError;
use notehub_common::domain::{Note, Plan, User, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub username: String,
    pub is_admin: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteView {
    pub note: Note,
    pub plans: Vec<Plan>,
}

impl NoteView {
    pub fn completed(&self) -> usize {
        self.plans.iter().filter(|x| x.is_done).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminPanel {
    Table { users: Vec<User>, notes: Vec<Note> },
    AccessDenied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminUserDetail {
    Table { user_id: UserId, notes: Vec<Note> },
    AccessDenied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login,
    Register,
    Dashboard(Dashboard),
    Note(NoteView),
    Admin(AdminPanel),
    AdminUser(AdminUserDetail),
}

/// 403 means "show the access denied screen", not "show an error".
pub(crate) fn permitted<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_forbidden() => Ok(None),
        Err(e) => Err(e),
    }
}
