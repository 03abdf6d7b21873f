use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::content::{Cloud, Difficulty};
use crate::error::ValidationError;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const DEFAULT_CODE_SNIPPET_COUNT: usize = 3;
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

/// Categories offered to developers by default
pub const DEVELOPER_CATEGORIES: [&str; 3] = ["ampscript", "ssjs", "marketing_cloud"];
/// Categories offered to consultants by default
pub const CONSULTANT_CATEGORIES: [&str; 1] = ["marketing_cloud"];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[strum(serialize = "Developer")]
    Developer,
    #[strum(serialize = "Consultant")]
    Consultant,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Seniority {
    #[default]
    Junior,
    Advanced,
    Senior,
    Specialist,
}

impl Seniority {
    /// Lenient parse used for config values: anything unknown becomes Junior
    pub fn parse_or_default(value: &str) -> Self {
        match Seniority::from_str(value.trim(), true) {
            Ok(s) => s,
            Err(_) => {
                if !value.trim().is_empty() {
                    warn!("unknown seniority `{value}`, defaulting to Junior");
                }
                Seniority::Junior
            }
        }
    }

    /// Difficulty tiers eligible for this seniority
    pub fn difficulties(&self) -> &'static [Difficulty] {
        match self {
            Seniority::Junior => &[Difficulty::Easy],
            Seniority::Advanced => &[Difficulty::Easy, Difficulty::Medium],
            Seniority::Senior => &[Difficulty::Medium, Difficulty::Hard],
            Seniority::Specialist => &[Difficulty::Hard, Difficulty::Expert],
        }
    }

    pub fn allows(&self, difficulty: Difficulty) -> bool {
        self.difficulties().contains(&difficulty)
    }
}

/// Everything the interviewer picks before starting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    pub candidate_name: String,
    pub role: Role,
    pub seniority: Seniority,
    pub question_count: usize,
    /// Requested snippets; see [`InterviewSettings::effective_code_snippet_count`]
    pub code_snippet_count: usize,
    pub selected_categories: BTreeSet<String>,
    /// Minutes
    pub time_limit: u32,
    pub cloud: Cloud,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            candidate_name: String::new(),
            role: Role::Developer,
            seniority: Seniority::Junior,
            question_count: DEFAULT_QUESTION_COUNT,
            code_snippet_count: DEFAULT_CODE_SNIPPET_COUNT,
            selected_categories: DEVELOPER_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            time_limit: DEFAULT_TIME_LIMIT_MINUTES,
            cloud: Cloud::Marketing,
        }
    }
}

/// Partial update of [`InterviewSettings`]; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub candidate_name: Option<String>,
    pub role: Option<Role>,
    pub seniority: Option<Seniority>,
    pub question_count: Option<usize>,
    pub code_snippet_count: Option<usize>,
    pub selected_categories: Option<BTreeSet<String>>,
    pub time_limit: Option<u32>,
    pub cloud: Option<Cloud>,
}

impl InterviewSettings {
    /// Number of code snippets to draw; always 0 for consultants
    pub fn effective_code_snippet_count(&self) -> usize {
        match self.role {
            Role::Developer => self.code_snippet_count,
            Role::Consultant => 0,
        }
    }

    pub fn time_limit_secs(&self) -> u64 {
        u64::from(self.time_limit) * 60
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(name) = patch.candidate_name {
            self.candidate_name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(seniority) = patch.seniority {
            self.seniority = seniority;
        }
        if let Some(count) = patch.question_count {
            self.question_count = count;
        }
        if let Some(count) = patch.code_snippet_count {
            self.code_snippet_count = count;
        }
        if let Some(categories) = patch.selected_categories {
            self.selected_categories = categories;
        }
        if let Some(minutes) = patch.time_limit {
            self.time_limit = minutes;
        }
        if let Some(cloud) = patch.cloud {
            self.cloud = cloud;
        }
        if self.role == Role::Consultant {
            self.code_snippet_count = 0;
        }
    }

    /// Replace the selected categories with the list configured for the current role
    pub fn apply_role_categories<S: AsRef<str>>(&mut self, developer: &[S], consultant: &[S]) {
        let categories = match self.role {
            Role::Developer => developer,
            Role::Consultant => consultant,
        };
        self.selected_categories = categories.iter().map(|c| c.as_ref().to_string()).collect();
        if self.role == Role::Consultant {
            self.code_snippet_count = 0;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.candidate_name.trim().is_empty() {
            return Err(ValidationError::EmptyCandidateName);
        }
        if self.selected_categories.is_empty() {
            return Err(ValidationError::NoCategories);
        }
        if self.question_count == 0 {
            return Err(ValidationError::ZeroQuestions);
        }
        if self.time_limit == 0 {
            return Err(ValidationError::ZeroTimeLimit);
        }
        Ok(())
    }
}
