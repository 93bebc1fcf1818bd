use super::{render, signed_in};
use clap::Subcommand;
use eyre::{eyre, Result};
use notehub_client::router::Route;
use notehub_client::NoteHub;
use notehub_common::domain::{NoteId, PlanId};

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    List { note: NoteId },
    Add { note: NoteId, title: String },
    /// Mark a plan done, or not done if it already is
    Toggle { note: NoteId, plan: PlanId },
    Rename { note: NoteId, plan: PlanId, title: String },
    Delete { note: NoteId, plan: PlanId },
}

impl Cmd {
    pub(crate) async fn run(self, hub: &NoteHub) -> Result<()> {
        if !signed_in(hub, Route::Dashboard) {
            return Ok(());
        }

        match self {
            Self::List { note } => render::plans(&hub.plans(note).await?),
            Self::Add { note, title } => {
                let plan = hub.create_plan(note, &title).await?;
                println!("Plan {} added to note {note}.", plan.id);
            }
            Self::Toggle { note, plan } => {
                let current = hub
                    .plans(note)
                    .await?
                    .into_iter()
                    .find(|x| x.id == plan)
                    .ok_or_else(|| eyre!("Plan {plan} not found in note {note}"))?;
                let plan = hub.toggle_plan(&current).await?;
                let state = if plan.is_done { "done" } else { "open" };
                println!("Plan {} is now {state}.", plan.id);
            }
            Self::Rename { note, plan, title } => {
                hub.rename_plan(note, plan, &title).await?;
                println!("Plan {plan} renamed.");
            }
            Self::Delete { note, plan } => {
                hub.delete_plan(note, plan).await?;
                println!("Plan {plan} deleted.");
            }
        }

        Ok(())
    }
}
