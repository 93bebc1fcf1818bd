use super::{render, signed_in};
use clap::Subcommand;
use eyre::Result;
use notehub_client::router::Route;
use notehub_client::NoteHub;
use notehub_common::domain::UserId;

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    /// Every user and every note
    Panel,
    /// Notes of a single user
    User { id: UserId },
}

impl Cmd {
    pub(crate) async fn run(self, hub: &NoteHub) -> Result<()> {
        match self {
            Self::Panel => {
                if signed_in(hub, Route::Admin) {
                    render::admin_panel(&hub.admin_panel().await?);
                }
            }
            Self::User { id } => {
                if signed_in(hub, Route::AdminUser(id)) {
                    render::admin_user(&hub.admin_user_detail(id).await?);
                }
            }
        }

        Ok(())
    }
}
