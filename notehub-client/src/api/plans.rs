use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::api::{PlanCreate, PlanUpdate};
use notehub_common::domain::{NoteId, Plan, PlanId};
use reqwest::Method;

/// Plans only exist under a note, so every call is scoped by the note id.
pub struct PlansApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PlansApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, note_id: NoteId) -> Result<Vec<Plan>, ApiError> {
        self.client.get(&format!("/notes/{note_id}/plans")).await
    }

    pub async fn create(&self, note_id: NoteId, plan: &PlanCreate) -> Result<Plan, ApiError> {
        self.client
            .send_json(Method::POST, &format!("/notes/{note_id}/plans"), plan)
            .await
    }

    pub async fn update(
        &self,
        note_id: NoteId,
        plan_id: PlanId,
        update: &PlanUpdate,
    ) -> Result<Plan, ApiError> {
        self.client
            .send_json(
                Method::PUT,
                &format!("/notes/{note_id}/plans/{plan_id}"),
                update,
            )
            .await
    }

    pub async fn delete(&self, note_id: NoteId, plan_id: PlanId) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/notes/{note_id}/plans/{plan_id}"))
            .await
    }
}
