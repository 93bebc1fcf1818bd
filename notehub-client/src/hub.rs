use crate::api_client::ApiClient;
use crate::cache::{Mutation, QueryCache, QueryKey};
use crate::error::ApiError;
use crate::router::{Navigator, Resolution, Route};
use crate::session::{Session, SessionStore};
use crate::settings::Settings;
use crate::view::{permitted, AdminPanel, AdminUserDetail, Dashboard, NoteView, View};
use eyre::Result;
use notehub_common::api::{NoteCreate, NoteUpdate, PlanCreate, PlanUpdate};
use notehub_common::domain::{Note, NoteId, Plan, PlanId, User, UserId};

/// Owns everything a front end needs: the session, the http client that reads it, the query
/// cache and the current location.
///
/// Reads go through the cache. Writes go straight to the backend and then invalidate whatever
/// [`Mutation::invalidates`] lists for them.
#[derive(Clone)]
pub struct NoteHub {
    api: ApiClient,
    session: SessionStore,
    cache: QueryCache,
    navigator: Navigator,
}

impl NoteHub {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_session(settings, SessionStore::new(&settings.session_path))
    }

    pub fn with_session(settings: &Settings, session: SessionStore) -> Result<Self> {
        let navigator = Navigator::new();
        let cache = QueryCache::new();
        let api = ApiClient::new(settings, session.clone(), cache.clone(), navigator.clone())?;

        Ok(Self {
            api,
            session,
            cache,
            navigator,
        })
    }

    /// Restores the persisted session. No request is made.
    pub fn initialize(&self) {
        self.session.initialize();
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        self.session.login(&self.api, username, password).await?;
        self.cache.clear();
        self.navigator.refresh(true);
        Ok(())
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        self.session.register(&self.api, username, password).await?;
        self.cache.clear();
        self.navigator.refresh(true);
        Ok(())
    }

    pub fn logout(&self) -> bool {
        let signed_out = self.session.logout();
        self.cache.clear();
        self.navigator.refresh(false);
        signed_out
    }

    pub fn navigate(&self, path: &str) -> Resolution {
        self.navigator.navigate(path, self.session.is_authenticated())
    }

    /// Navigates to `path` and loads whatever the guard lets through.
    pub async fn open(&self, path: &str) -> Result<View, ApiError> {
        let view = match self.navigate(path).route() {
            Route::Login => View::Login,
            Route::Register => View::Register,
            Route::Root | Route::Dashboard => View::Dashboard(self.dashboard().await?),
            Route::Note(id) => View::Note(self.note_view(id).await?),
            Route::Admin => View::Admin(self.admin_panel().await?),
            Route::AdminUser(id) => View::AdminUser(self.admin_user_detail(id).await?),
        };
        Ok(view)
    }

    // Queries

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::current_user(), move || async move {
                api.users().me().await
            })
            .await
    }

    pub async fn notes(&self) -> Result<Vec<Note>, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::notes(), move || async move { api.notes().list().await })
            .await
    }

    pub async fn note(&self, id: NoteId) -> Result<Note, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::note(id), move || async move { api.notes().get(id).await })
            .await
    }

    pub async fn plans(&self, note_id: NoteId) -> Result<Vec<Plan>, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::note_plans(note_id), move || async move {
                api.plans().list(note_id).await
            })
            .await
    }

    pub async fn admin_users(&self) -> Result<Vec<User>, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::admin_users(), move || async move {
                api.admin().users().await
            })
            .await
    }

    pub async fn admin_notes(&self) -> Result<Vec<Note>, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::admin_notes(), move || async move {
                api.admin().notes().await
            })
            .await
    }

    pub async fn admin_user_notes(&self, user_id: UserId) -> Result<Vec<Note>, ApiError> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::admin_user_notes(user_id), move || async move {
                api.admin().user_notes(user_id).await
            })
            .await
    }

    // Mutations

    pub async fn create_note(&self, title: &str, content: &str) -> Result<Note, ApiError> {
        let note = NoteCreate {
            title: title.into(),
            content: content.into(),
        };
        let note = self.api.notes().create(&note).await?;
        self.cache.apply(Mutation::CreateNote);
        Ok(note)
    }

    pub async fn update_note(&self, id: NoteId, update: &NoteUpdate) -> Result<Note, ApiError> {
        let note = self.api.notes().update(id, update).await?;
        self.cache.apply(Mutation::UpdateNote(id));
        Ok(note)
    }

    pub async fn delete_note(&self, id: NoteId) -> Result<(), ApiError> {
        self.api.notes().delete(id).await?;
        self.cache.apply(Mutation::DeleteNote(id));
        Ok(())
    }

    pub async fn create_plan(&self, note_id: NoteId, title: &str) -> Result<Plan, ApiError> {
        let plan = self
            .api
            .plans()
            .create(note_id, &PlanCreate::new(title))
            .await?;
        self.cache.apply(Mutation::CreatePlan(note_id));
        Ok(plan)
    }

    pub async fn update_plan(
        &self,
        note_id: NoteId,
        plan_id: PlanId,
        update: &PlanUpdate,
    ) -> Result<Plan, ApiError> {
        let plan = self.api.plans().update(note_id, plan_id, update).await?;
        self.cache.apply(Mutation::UpdatePlan(note_id));
        Ok(plan)
    }

    /// Flips `is_done` based on the copy the caller holds.
    pub async fn toggle_plan(&self, plan: &Plan) -> Result<Plan, ApiError> {
        self.update_plan(plan.note_id, plan.id, &PlanUpdate::done(!plan.is_done))
            .await
    }

    pub async fn rename_plan(
        &self,
        note_id: NoteId,
        plan_id: PlanId,
        title: &str,
    ) -> Result<Plan, ApiError> {
        self.update_plan(note_id, plan_id, &PlanUpdate::rename(title))
            .await
    }

    pub async fn delete_plan(&self, note_id: NoteId, plan_id: PlanId) -> Result<(), ApiError> {
        self.api.plans().delete(note_id, plan_id).await?;
        self.cache.apply(Mutation::DeletePlan(note_id));
        Ok(())
    }

    // Views

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let notes = self.notes().await?;
        let user = self.session.user();

        Ok(Dashboard {
            username: user.as_ref().map(|x| x.username.clone()).unwrap_or_default(),
            is_admin: user.is_some_and(|x| x.is_admin),
            notes,
        })
    }

    pub async fn note_view(&self, id: NoteId) -> Result<NoteView, ApiError> {
        let note = self.note(id).await?;
        let plans = self.plans(id).await?;
        Ok(NoteView { note, plans })
    }

    pub async fn admin_panel(&self) -> Result<AdminPanel, ApiError> {
        let Some(users) = permitted(self.admin_users().await)? else {
            return Ok(AdminPanel::AccessDenied);
        };
        let Some(notes) = permitted(self.admin_notes().await)? else {
            return Ok(AdminPanel::AccessDenied);
        };
        Ok(AdminPanel::Table { users, notes })
    }

    pub async fn admin_user_detail(&self, user_id: UserId) -> Result<AdminUserDetail, ApiError> {
        match permitted(self.admin_user_notes(user_id).await)? {
            Some(notes) => Ok(AdminUserDetail::Table { user_id, notes }),
            None => Ok(AdminUserDetail::AccessDenied),
        }
    }
}
