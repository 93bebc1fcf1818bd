use clap::Parser;
use eyre::{Context, Result};
use notehub_client::utils::{read_input, read_input_hidden};
use notehub_client::NoteHub;

#[derive(Parser, Debug)]
pub struct Cmd {
    #[arg(short, long)]
    username: Option<String>,
    #[arg(short, long)]
    password: Option<String>,
}

impl Cmd {
    pub async fn run(self, hub: &NoteHub) -> Result<()> {
        let username = match self.username {
            Some(v) => v,
            None => read_input("username")?,
        };
        let password = match self.password {
            Some(v) => v,
            None => read_input_hidden("password")?,
        };

        // Registering also signs in, so whoever was signed in before is replaced.
        hub.register(&username, &password)
            .await
            .wrap_err("Failed to register user")?;

        println!("Registered and logged in as {username}!");
        Ok(())
    }
}
