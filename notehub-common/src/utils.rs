use std::ffi::OsString;
use std::path::PathBuf;
use tracing::warn;

#[cfg(not(target_os = "windows"))]
const HOME_VAR: &str = "HOME";

#[cfg(target_os = "windows")]
const HOME_VAR: &str = "USERPROFILE";

pub fn home_dir() -> PathBuf {
    home_or_current(std::env::var_os(HOME_VAR))
}

fn home_or_current(home: Option<OsString>) -> PathBuf {
    match home.filter(|x| !x.is_empty()) {
        Some(home) => PathBuf::from(home),
        None => {
            warn!("${HOME_VAR} is not set, config and session files go to the current directory");
            PathBuf::from(".")
        }
    }
}

pub fn config_dir() -> PathBuf {
    let config_dir =
        std::env::var("XDG_CONFIG_HOME").map_or_else(|_| home_dir().join(".config"), PathBuf::from);
    config_dir.join("notehub")
}

pub fn data_dir() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map_or_else(|_| home_dir().join(".local").join("share"), PathBuf::from);
    data_dir.join("notehub")
}
