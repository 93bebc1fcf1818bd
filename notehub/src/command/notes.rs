use super::{render, signed_in};
use clap::Subcommand;
use eyre::{bail, Result};
use notehub_client::router::Route;
use notehub_client::NoteHub;
use notehub_common::api::NoteUpdate;
use notehub_common::domain::NoteId;

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    List,
    Show {
        id: NoteId,
    },
    Create {
        title: String,
        #[arg(long, short, default_value = "")]
        content: String,
    },
    Edit {
        id: NoteId,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        content: Option<String>,
    },
    Delete {
        id: NoteId,
    },
}

impl Cmd {
    pub(crate) async fn run(self, hub: &NoteHub) -> Result<()> {
        if !signed_in(hub, Route::Dashboard) {
            return Ok(());
        }

        match self {
            Self::List => render::dashboard(&hub.dashboard().await?),
            Self::Show { id } => render::note(&hub.note_view(id).await?),
            Self::Create { title, content } => {
                let note = hub.create_note(&title, &content).await?;
                println!("Note {} created.", note.id);
            }
            Self::Edit { id, title, content } => {
                let update = NoteUpdate { title, content };
                if update.is_empty() {
                    bail!("Nothing to update. Pass --title and/or --content.");
                }
                hub.update_note(id, &update).await?;
                println!("Note {id} updated.");
            }
            Self::Delete { id } => {
                hub.delete_note(id).await?;
                println!("Note {id} deleted.");
            }
        }

        Ok(())
    }
}
