use crate::VERSION;
use eyre::Result;
use notehub_client::settings::Settings;
use notehub_client::NoteHub;

pub async fn run(settings: &Settings, hub: &NoteHub) -> Result<()> {
    let env_config_dir = std::env::var("NOTEHUB_CONFIG_DIR");

    let vars = format!(
        "VARS:\nNOTEHUB_CONFIG_DIR = {:?}",
        env_config_dir.unwrap_or("None".into())
    );
    println!("{vars}\n");

    let mut paths = String::from("PATHS:\n");
    paths.push_str(&format!("config_path: {:?}\n", Settings::config_file()));
    paths.push_str(&format!("session_path: {:?}", settings.session_path));
    println!("{paths}\n");

    println!("ACCOUNT:");
    let session = hub.session();
    println!(
        "Auth: {}",
        session
            .user()
            .map(|x| x.username.clone())
            .unwrap_or("Unauthenticated".into())
    );
    println!();

    println!("SERVER:");
    println!("Address: {}", hub.api().address());
    match hub.api().health().check().await {
        Ok(res) => println!("Health: {} ({})", res.status, res.service),
        Err(e) => println!("Health: unreachable ({e})"),
    }

    println!();
    println!("Version: {VERSION}");
    Ok(())
}
