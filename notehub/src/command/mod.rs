use clap::Subcommand;
use eyre::Result;
use notehub_client::router::{Resolution, Route};
use notehub_client::settings::Settings;
use notehub_client::NoteHub;
use tracing_subscriber::{self, fmt, prelude::*, EnvFilter};

mod account;
mod admin;
mod info;
mod notes;
mod open;
mod plans;
mod render;

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum NoteHubCmd {
    /// Sign in, sign up and sign out
    #[command(subcommand)]
    Account(account::Cmd),

    #[command(subcommand)]
    Notes(notes::Cmd),

    /// Checklist items attached to a note
    #[command(subcommand)]
    Plans(plans::Cmd),

    /// System wide listings, admin accounts only
    #[command(subcommand)]
    Admin(admin::Cmd),

    /// Show what a client route would render
    Open(open::Cmd),

    /// Paths, session and backend status
    Info,
}

impl NoteHubCmd {
    #[tokio::main]
    pub async fn run(self) -> Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();

        tracing::trace!(command = ?self, "client command");

        let settings = Settings::new()?;
        let hub = NoteHub::new(&settings)?;
        hub.initialize();

        match self {
            Self::Account(cmd) => cmd.run(&hub).await,
            Self::Notes(cmd) => cmd.run(&hub).await,
            Self::Plans(cmd) => cmd.run(&hub).await,
            Self::Admin(cmd) => cmd.run(&hub).await,
            Self::Open(cmd) => cmd.run(&hub).await,
            Self::Info => info::run(&settings, &hub).await,
        }
    }
}

/// Runs `route` through the guard. Prints a hint and returns false when it bounces to login.
fn signed_in(hub: &NoteHub, route: Route) -> bool {
    match hub.navigate(&route.to_string()) {
        Resolution::Redirect(Route::Login) => {
            println!("You are not logged in. Run `notehub account login` first.");
            false
        }
        _ => true,
    }
}
