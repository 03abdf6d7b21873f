use std::path::PathBuf;

use thiserror::Error;

/// Settings that cannot start an interview
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please enter the candidate name")]
    EmptyCandidateName,
    #[error("select at least one category")]
    NoCategories,
    #[error("question count must be at least 1")]
    ZeroQuestions,
    #[error("time limit must be at least 1 minute")]
    ZeroTimeLimit,
}

/// Misuse of the interview session surfaced to the caller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no interview is in progress")]
    NotInProgress,
    #[error("settings cannot change while an interview is in progress")]
    AlreadyInProgress,
    #[error("question `{0}` is not part of this interview")]
    UnknownQuestion(String),
    #[error("code snippet `{0}` is not part of this interview")]
    UnknownSnippet(String),
    #[error("question `{id}` has no answer #{index}")]
    AnswerOutOfRange { id: String, index: usize },
    #[error("code snippet `{id}` has no issue #{index}")]
    IssueOutOfRange { id: String, index: usize },
    #[error("issue #{issue} of code snippet `{id}` has no fix #{index}")]
    FixOutOfRange {
        id: String,
        issue: usize,
        index: usize,
    },
}

/// Question or snippet pool that failed to load
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content file `{0}` not found")]
    MissingFile(String),
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse `{file}`")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate id `{0}` in content pool")]
    DuplicateId(String),
    #[error("question `{0}` has no possible answers")]
    EmptyAnswers(String),
    #[error("issue #{issue} of code snippet `{id}` has no possible fixes")]
    EmptyFixes { id: String, issue: usize },
    #[error("issue #{issue} of code snippet `{id}` points at line {line}, but the code has {lines} lines")]
    IssueLineOutOfRange {
        id: String,
        issue: usize,
        line: usize,
        lines: usize,
    },
}
