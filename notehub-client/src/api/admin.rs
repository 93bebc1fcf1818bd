use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::domain::{Note, User, UserId};

/// System wide listings. The backend answers 403 unless the session user is an admin.
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.client.get("/admin/users").await
    }

    pub async fn notes(&self) -> Result<Vec<Note>, ApiError> {
        self.client.get("/admin/notes").await
    }

    pub async fn user_notes(&self, user_id: UserId) -> Result<Vec<Note>, ApiError> {
        self.client
            .get(&format!("/admin/users/{user_id}/notes"))
            .await
    }
}
