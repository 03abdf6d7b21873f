use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::content::Cloud;
use crate::settings::{
    InterviewSettings, Role, Seniority, CONSULTANT_CATEGORIES, DEFAULT_CODE_SNIPPET_COUNT,
    DEFAULT_QUESTION_COUNT, DEFAULT_TIME_LIMIT_MINUTES, DEVELOPER_CATEGORIES,
};

/// Defaults for the settings form, read from `config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub role: Role,
    /// Parsed leniently; unknown values become Junior
    pub seniority: String,
    pub cloud: Cloud,
    pub question_count: usize,
    pub code_snippet_count: usize,
    /// Minutes
    pub time_limit: u32,
    pub developer_categories: Vec<String>,
    pub consultant_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::Developer,
            seniority: Seniority::Junior.to_string(),
            cloud: Cloud::Marketing,
            question_count: DEFAULT_QUESTION_COUNT,
            code_snippet_count: DEFAULT_CODE_SNIPPET_COUNT,
            time_limit: DEFAULT_TIME_LIMIT_MINUTES,
            developer_categories: DEVELOPER_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            consultant_categories: CONSULTANT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    /// Interview settings seeded from this config, with no candidate name yet
    pub fn settings(&self) -> InterviewSettings {
        let mut settings = InterviewSettings {
            candidate_name: String::new(),
            role: self.role,
            seniority: Seniority::parse_or_default(&self.seniority),
            question_count: self.question_count,
            code_snippet_count: self.code_snippet_count,
            selected_categories: Default::default(),
            time_limit: self.time_limit,
            cloud: self.cloud,
        };
        settings.apply_role_categories(&self.developer_categories, &self.consultant_categories);
        settings
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path =
            AppDirs::config_path().unwrap_or_else(|| PathBuf::from("cloudquiz_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring malformed config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }
}
