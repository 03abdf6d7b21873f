use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Product line used to partition the content pool
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
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    #[default]
    #[strum(serialize = "Marketing Cloud")]
    Marketing,
    #[strum(serialize = "Sales Cloud")]
    Sales,
    #[strum(serialize = "Service Cloud")]
    Service,
    #[strum(serialize = "Commerce Cloud")]
    Commerce,
    #[strum(serialize = "CPQ")]
    Cpq,
    #[strum(serialize = "Pardot")]
    Pardot,
}

impl Cloud {
    /// Every cloud in display order
    pub fn all() -> &'static [Cloud] {
        Cloud::value_variants()
    }

    /// Identifier used in content files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Cloud::Marketing => "marketing",
            Cloud::Sales => "sales",
            Cloud::Service => "service",
            Cloud::Commerce => "commerce",
            Cloud::Cpq => "cpq",
            Cloud::Pardot => "pardot",
        }
    }
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
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// One selectable answer (or fix) with the points it is worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub cloud: Cloud,
    pub possible_answers: Vec<Choice>,
}

impl Question {
    /// Highest score any answer can earn
    pub fn best_score(&self) -> i32 {
        best_of(&self.possible_answers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeIssue {
    /// 1-based line in the snippet's code
    pub line: usize,
    pub description: String,
    pub possible_fixes: Vec<Choice>,
}

impl CodeIssue {
    pub fn best_score(&self) -> i32 {
        best_of(&self.possible_fixes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub id: String,
    pub language: String,
    pub title: String,
    pub description: String,
    pub code: String,
    pub cloud: Cloud,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub issues: Vec<CodeIssue>,
}

impl CodeSnippet {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }

    /// Index of the issue reported on a 1-based line, if any
    pub fn issue_at_line(&self, line: usize) -> Option<usize> {
        self.issues.iter().position(|issue| issue.line == line)
    }

    pub fn best_score(&self) -> i32 {
        self.issues.iter().map(CodeIssue::best_score).sum()
    }
}

fn best_of(choices: &[Choice]) -> i32 {
    choices.iter().map(|c| c.score).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_deserialization() {
        let json = r#"
        {
            "id": "q1",
            "text": "What does AMPscript run on?",
            "category": "ampscript",
            "difficulty": "easy",
            "cloud": "marketing",
            "possibleAnswers": [
                { "text": "The server", "score": 10, "isCorrect": true },
                { "text": "The browser", "score": 0 }
            ]
        }
        "#;

        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, "q1");
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.cloud, Cloud::Marketing);
        assert_eq!(q.possible_answers[0].is_correct, Some(true));
        assert_eq!(q.possible_answers[1].is_correct, None);
        assert_eq!(q.best_score(), 10);
    }

    #[test]
    fn test_snippet_optional_fields_default_to_none() {
        let json = r#"
        {
            "id": "cs1",
            "language": "ampscript",
            "title": "Lookup",
            "description": "Fix the lookup",
            "code": "%%[\nSET @a = 1\n]%%",
            "cloud": "marketing",
            "issues": [
                {
                    "line": 2,
                    "description": "missing var",
                    "possibleFixes": [
                        { "text": "VAR @a", "score": 10, "isCorrect": true },
                        { "text": "nothing", "score": 2 }
                    ]
                }
            ]
        }
        "#;

        let s: CodeSnippet = serde_json::from_str(json).unwrap();
        assert_eq!(s.category, None);
        assert_eq!(s.difficulty, None);
        assert_eq!(s.line_count(), 3);
        assert_eq!(s.issue_at_line(2), Some(0));
        assert_eq!(s.issue_at_line(1), None);
        assert_eq!(s.best_score(), 10);
    }

    #[test]
    fn test_cloud_display_and_key() {
        assert_eq!(Cloud::Marketing.to_string(), "Marketing Cloud");
        assert_eq!(Cloud::Cpq.to_string(), "CPQ");
        assert_eq!(Cloud::Cpq.key(), "cpq");
        assert_eq!(Cloud::all().len(), 6);
        assert_eq!(Cloud::default(), Cloud::Marketing);
    }

    #[test]
    fn test_best_score_of_empty_choices_is_zero() {
        assert_eq!(best_of(&[]), 0);
    }
}
