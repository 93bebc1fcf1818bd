use clap::Subcommand;
use eyre::Result;
use notehub_client::NoteHub;

mod login;
mod logout;
mod register;
mod status;

#[derive(Subcommand, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    Login(login::Cmd),
    Register(register::Cmd),
    Logout,
    Status(status::Cmd),
}

impl Cmd {
    pub(crate) async fn run(self, hub: &NoteHub) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.run(hub).await,
            Self::Register(cmd) => cmd.run(hub).await,
            Self::Logout => logout::run(hub),
            Self::Status(cmd) => cmd.run(hub).await,
        }
    }
}
