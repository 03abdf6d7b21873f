use include_dir::{include_dir, Dir};
use itertools::Itertools;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::model::{Cloud, CodeSnippet, Question};
use crate::error::ContentError;

static CONTENT_DIR: Dir = include_dir!("src/content/data");

pub const QUESTIONS_FILE: &str = "questions.json";
pub const SNIPPETS_FILE: &str = "code_snippets.json";

/// Read-only pool of questions and code snippets
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    questions: Vec<Question>,
    snippets: Vec<CodeSnippet>,
}

impl ContentStore {
    /// Build a store from already parsed records, validating them
    pub fn new(questions: Vec<Question>, snippets: Vec<CodeSnippet>) -> Result<Self, ContentError> {
        let store = Self {
            questions,
            snippets,
        };
        store.validate()?;
        Ok(store)
    }

    /// The pool compiled into the binary
    pub fn bundled() -> Result<Self, ContentError> {
        let questions = bundled_file(QUESTIONS_FILE)?;
        let snippets = bundled_file(SNIPPETS_FILE)?;
        Self::from_json(questions, snippets)
    }

    /// Load `questions.json` and `code_snippets.json` from a directory
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
        };
        let questions = read(QUESTIONS_FILE)?;
        let snippets = read(SNIPPETS_FILE)?;
        Self::from_json(&questions, &snippets)
    }

    pub fn from_json(questions: &str, snippets: &str) -> Result<Self, ContentError> {
        let questions = serde_json::from_str(questions).map_err(|source| ContentError::Json {
            file: QUESTIONS_FILE.to_string(),
            source,
        })?;
        let snippets = serde_json::from_str(snippets).map_err(|source| ContentError::Json {
            file: SNIPPETS_FILE.to_string(),
            source,
        })?;
        Self::new(questions, snippets)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn snippets(&self) -> &[CodeSnippet] {
        &self.snippets
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn snippet(&self, id: &str) -> Option<&CodeSnippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Distinct question categories offered for a cloud, sorted
    pub fn categories(&self, cloud: Cloud) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|q| q.cloud == cloud)
            .map(|q| q.category.as_str())
            .unique()
            .sorted()
            .collect()
    }

    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(q.id.as_str()) {
                return Err(ContentError::DuplicateId(q.id.clone()));
            }
            if q.possible_answers.is_empty() {
                return Err(ContentError::EmptyAnswers(q.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for s in &self.snippets {
            if !seen.insert(s.id.as_str()) {
                return Err(ContentError::DuplicateId(s.id.clone()));
            }
            let lines = s.line_count();
            for (idx, issue) in s.issues.iter().enumerate() {
                if issue.possible_fixes.is_empty() {
                    return Err(ContentError::EmptyFixes {
                        id: s.id.clone(),
                        issue: idx,
                    });
                }
                if issue.line == 0 || issue.line > lines {
                    return Err(ContentError::IssueLineOutOfRange {
                        id: s.id.clone(),
                        issue: idx,
                        line: issue.line,
                        lines,
                    });
                }
            }
        }

        Ok(())
    }
}

fn bundled_file(name: &str) -> Result<&'static str, ContentError> {
    CONTENT_DIR
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| ContentError::MissingFile(name.to_string()))
}
