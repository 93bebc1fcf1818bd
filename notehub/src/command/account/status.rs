use clap::Parser;
use eyre::Result;
use notehub_client::{ApiError, NoteHub};

#[derive(Parser, Debug)]
pub struct Cmd {
    /// Ask the backend whether the stored token is still accepted
    #[arg(long)]
    verify: bool,
}

impl Cmd {
    pub async fn run(self, hub: &NoteHub) -> Result<()> {
        let session = hub.session();
        let Some(user) = session.user() else {
            println!("Unauthenticated");
            return Ok(());
        };

        let role = if user.is_admin { " (admin)" } else { "" };
        println!("Logged in as {}{role} [id {}]", user.username, user.id);

        if !self.verify {
            return Ok(());
        }

        match hub.api().users().me().await {
            Ok(me) => println!("Token accepted for {}", me.username),
            Err(ApiError::Unauthorized(_)) => {
                println!("The backend rejected the stored token. Log in again.")
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}
