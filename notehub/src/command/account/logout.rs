use eyre::Result;
use notehub_client::NoteHub;

pub fn run(hub: &NoteHub) -> Result<()> {
    if !hub.logout() {
        println!("You are not logged in.");
        return Ok(());
    }

    println!("You are logged out!");
    Ok(())
}
