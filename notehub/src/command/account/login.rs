use clap::Parser;
use eyre::{Context, Result};
use notehub_client::utils::{read_input, read_input_hidden};
use notehub_client::NoteHub;

#[derive(Parser, Debug)]
pub struct Cmd {
    #[arg(long, short)]
    pub username: Option<String>,
    #[arg(long, short)]
    pub password: Option<String>,
}

impl Cmd {
    pub async fn run(self, hub: &NoteHub) -> Result<()> {
        if hub.session().is_authenticated() {
            println!("You are already logged in.");
            return Ok(());
        }

        let username = match self.username {
            Some(v) => v,
            None => read_input("username")?,
        };
        let password = match self.password {
            Some(v) => v,
            None => read_input_hidden("password")?,
        };

        hub.login(&username, &password)
            .await
            .wrap_err("Failed to log in")?;

        println!("Logged in as {username}!");
        Ok(())
    }
}
