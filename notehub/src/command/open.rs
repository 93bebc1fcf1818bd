use super::render;
use clap::Parser;
use eyre::Result;
use notehub_client::router::Resolution;
use notehub_client::NoteHub;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// Client route such as /dashboard, /notes/3 or /admin
    path: String,
}

impl Cmd {
    pub(crate) async fn run(self, hub: &NoteHub) -> Result<()> {
        if let Resolution::Redirect(to) = hub.navigate(&self.path) {
            println!("Redirected to {to}\n");
        }

        let view = hub.open(&self.path).await?;
        render::view(&view);
        Ok(())
    }
}
