//! One module per backend resource. Each operation is exactly one request.

use crate::api_client::ApiClient;

pub mod admin;
pub mod auth;
pub mod health;
pub mod notes;
pub mod plans;
pub mod users;

impl ApiClient {
    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub fn users(&self) -> users::UsersApi<'_> {
        users::UsersApi::new(self)
    }

    pub fn notes(&self) -> notes::NotesApi<'_> {
        notes::NotesApi::new(self)
    }

    pub fn plans(&self) -> plans::PlansApi<'_> {
        plans::PlansApi::new(self)
    }

    pub fn admin(&self) -> admin::AdminApi<'_> {
        admin::AdminApi::new(self)
    }

    pub fn health(&self) -> health::HealthApi<'_> {
        health::HealthApi::new(self)
    }
}
