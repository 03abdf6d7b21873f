use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("cloudquiz"),
            )
        } else {
            ProjectDirs::from("", "", "cloudquiz").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    /// Default destination for `RUST_LOG` output
    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("cloudquiz.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cloudquiz").map(|pd| pd.config_dir().join("config.json"))
    }
}
