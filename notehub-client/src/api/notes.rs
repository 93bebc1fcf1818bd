use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::api::{NoteCreate, NoteUpdate};
use notehub_common::domain::{Note, NoteId};
use reqwest::Method;

pub struct NotesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Notes owned by the signed in user.
    pub async fn list(&self) -> Result<Vec<Note>, ApiError> {
        self.client.get("/notes").await
    }

    pub async fn get(&self, id: NoteId) -> Result<Note, ApiError> {
        self.client.get(&format!("/notes/{id}")).await
    }

    pub async fn create(&self, note: &NoteCreate) -> Result<Note, ApiError> {
        self.client.send_json(Method::POST, "/notes", note).await
    }

    pub async fn update(&self, id: NoteId, update: &NoteUpdate) -> Result<Note, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("/notes/{id}"), update)
            .await
    }

    pub async fn delete(&self, id: NoteId) -> Result<(), ApiError> {
        self.client.delete(&format!("/notes/{id}")).await
    }
}
