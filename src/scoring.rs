use log::warn;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::content::{CodeSnippet, Question};
use crate::settings::Role;

/// Question id -> chosen answer index
pub type Answers = HashMap<String, usize>;
/// Snippet id -> (issue index -> chosen fix index)
pub type CodeAnswers = HashMap<String, BTreeMap<usize, usize>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemScore {
    pub id: String,
    pub score: i32,
    /// Best score the item could have earned
    pub max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Results {
    pub total_score: i32,
    pub question_scores: Vec<ItemScore>,
    pub code_scores: Vec<ItemScore>,
    pub time_spent_secs: u64,
    pub max_score: i32,
}

impl Results {
    /// Share of the achievable score, rounded to a whole percent
    pub fn percentage(&self) -> u32 {
        if self.max_score <= 0 {
            return 0;
        }
        let pct = (f64::from(self.total_score.max(0)) / f64::from(self.max_score)) * 100.0;
        pct.round() as u32
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }
}

/// Compute per-item and total scores for a finished interview.
///
/// Code snippets only count for developers; consultants get an empty list.
pub fn score(
    questions: &[Question],
    answers: &Answers,
    snippets: &[CodeSnippet],
    code_answers: &CodeAnswers,
    role: Role,
    elapsed_secs: i64,
) -> Results {
    let question_scores: Vec<ItemScore> = questions
        .iter()
        .map(|q| ItemScore {
            id: q.id.clone(),
            score: answers
                .get(&q.id)
                .map_or(0, |&idx| choice_score(&q.id, &q.possible_answers, idx)),
            max: q.best_score(),
        })
        .collect();

    let code_scores: Vec<ItemScore> = match role {
        Role::Developer => snippets
            .iter()
            .map(|s| ItemScore {
                id: s.id.clone(),
                score: snippet_score(s, code_answers.get(&s.id)),
                max: s.best_score(),
            })
            .collect(),
        Role::Consultant => Vec::new(),
    };

    let all = || question_scores.iter().chain(code_scores.iter());
    let total_score = all().map(|s| s.score).sum();
    let max_score = all().map(|s| s.max).sum();

    Results {
        total_score,
        max_score,
        time_spent_secs: elapsed_secs.max(0) as u64,
        question_scores,
        code_scores,
    }
}

fn snippet_score(snippet: &CodeSnippet, fixes: Option<&BTreeMap<usize, usize>>) -> i32 {
    let Some(fixes) = fixes else {
        return 0;
    };
    snippet
        .issues
        .iter()
        .enumerate()
        .map(|(issue_idx, issue)| {
            fixes
                .get(&issue_idx)
                .map_or(0, |&fix| choice_score(&snippet.id, &issue.possible_fixes, fix))
        })
        .sum()
}

fn choice_score(id: &str, choices: &[crate::content::Choice], idx: usize) -> i32 {
    match choices.get(idx) {
        Some(choice) => choice.score,
        None => {
            warn!("ignoring out of range choice #{idx} recorded for `{id}`");
            0
        }
    }
}

/// Feedback band for a score percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Grade {
    Excellent,
    #[strum(serialize = "Very good")]
    VeryGood,
    Good,
    Acceptable,
    Fair,
    #[strum(serialize = "Needs improvement")]
    NeedsImprovement,
}

impl Grade {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            0..=49 => Grade::NeedsImprovement,
            50..=59 => Grade::Fair,
            60..=69 => Grade::Acceptable,
            70..=79 => Grade::Good,
            80..=89 => Grade::VeryGood,
            _ => Grade::Excellent,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            Grade::Excellent => {
                "Excellent! You demonstrate exceptional knowledge in the evaluated topics."
            }
            Grade::VeryGood => {
                "Very good! You have a solid understanding of the evaluated concepts."
            }
            Grade::Good => "Good. You have shown good knowledge of the main topics.",
            Grade::Acceptable => {
                "Acceptable. You have basic knowledge but there are areas to improve."
            }
            Grade::Fair => "Fair. You need to reinforce several important concepts.",
            Grade::NeedsImprovement => {
                "You need to significantly improve your knowledge in these topics."
            }
        }
    }
}

/// Format seconds for the results screen, e.g. "2 minutes and 5 seconds"
pub fn format_duration(secs: u64) -> String {
    format!("{} minutes and {} seconds", secs / 60, secs % 60)
}

/// Format seconds as a countdown clock, e.g. "04:09"
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
