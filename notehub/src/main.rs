use clap::Parser;
use eyre::Result;
use notehub::command::NoteHubCmd;
use notehub::VERSION;

#[derive(Parser)]
#[command(
    author = "NoteHub",
    version = VERSION,
    about = "Notes and daily plans from the terminal",
    )]
struct NoteHub {
    #[command(subcommand)]
    notehub: NoteHubCmd,
}

impl NoteHub {
    fn run(self) -> Result<()> {
        self.notehub.run()
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    NoteHub::parse().run()
}
