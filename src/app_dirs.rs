use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lexdrill").map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn records_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("lexdrill");
            Some(state_dir.join("records.jsonl"))
        } else {
            ProjectDirs::from("", "", "lexdrill")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("records.jsonl"))
        }
    }
}
