use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::content::{Cloud, CodeSnippet, ContentStore, Difficulty, Question};
use crate::settings::{InterviewSettings, Seniority};

/// Attributes the selector filters on
pub trait Selectable: Clone {
    fn cloud(&self) -> Cloud;
    /// `None` means the item is not tagged and passes the category filter
    fn category(&self) -> Option<&str>;
    /// `None` means the item is not tagged and passes the difficulty filter
    fn difficulty(&self) -> Option<Difficulty>;
}

impl Selectable for Question {
    fn cloud(&self) -> Cloud {
        self.cloud
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn difficulty(&self) -> Option<Difficulty> {
        Some(self.difficulty)
    }
}

impl Selectable for CodeSnippet {
    fn cloud(&self) -> Cloud {
        self.cloud
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Questions,
    CodeSnippets,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Questions => write!(f, "questions"),
            ContentKind::CodeSnippets => write!(f, "code snippets"),
        }
    }
}

/// Non-blocking notice that the pool could not fully satisfy the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    CategoryFallback {
        kind: ContentKind,
        cloud: Cloud,
    },
    DifficultyFallback {
        kind: ContentKind,
        cloud: Cloud,
        seniority: Seniority,
    },
    Shortfall {
        kind: ContentKind,
        requested: usize,
        available: usize,
    },
    NoSnippetsForCloud {
        cloud: Cloud,
    },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::CategoryFallback { kind, cloud } => write!(
                f,
                "No {kind} match the selected categories. Using all {kind} for {cloud}."
            ),
            SelectionWarning::DifficultyFallback {
                kind,
                cloud,
                seniority,
            } => write!(
                f,
                "No {kind} match the {seniority} difficulty level. Using all {kind} for {cloud}."
            ),
            SelectionWarning::Shortfall {
                kind,
                requested,
                available,
            } => write!(
                f,
                "Only {available} {kind} match the current filters. Using them instead of the requested {requested}."
            ),
            SelectionWarning::NoSnippetsForCloud { cloud } => {
                write!(f, "No code snippets available for {cloud}.")
            }
        }
    }
}

/// Content drawn for one interview, in presentation order
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub questions: Vec<Question>,
    pub snippets: Vec<CodeSnippet>,
    pub warnings: Vec<SelectionWarning>,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Category,
    Difficulty,
}

enum StageOutcome<'a, T> {
    Narrowed(Vec<&'a T>),
    Fallback,
}

/// Filters run in order; a stage that empties the candidate set falls back to its input
const STAGES: [Stage; 2] = [Stage::Category, Stage::Difficulty];

impl Stage {
    fn apply<'a, T: Selectable>(
        &self,
        candidates: &[&'a T],
        settings: &InterviewSettings,
    ) -> StageOutcome<'a, T> {
        let narrowed: Vec<&'a T> = match self {
            Stage::Category => {
                if settings.selected_categories.is_empty() {
                    return StageOutcome::Narrowed(candidates.to_vec());
                }
                candidates
                    .iter()
                    .copied()
                    .filter(|item| {
                        item.category()
                            .map_or(true, |c| settings.selected_categories.contains(c))
                    })
                    .collect()
            }
            Stage::Difficulty => candidates
                .iter()
                .copied()
                .filter(|item| {
                    item.difficulty()
                        .map_or(true, |d| settings.seniority.allows(d))
                })
                .collect(),
        };

        if narrowed.is_empty() {
            StageOutcome::Fallback
        } else {
            StageOutcome::Narrowed(narrowed)
        }
    }

    fn fallback_warning(&self, kind: ContentKind, settings: &InterviewSettings) -> SelectionWarning {
        match self {
            Stage::Category => SelectionWarning::CategoryFallback {
                kind,
                cloud: settings.cloud,
            },
            Stage::Difficulty => SelectionWarning::DifficultyFallback {
                kind,
                cloud: settings.cloud,
                seniority: settings.seniority,
            },
        }
    }
}

/// Draw the questions and code snippets for an interview.
///
/// The pool is never mutated; the same RNG state yields the same selection.
pub fn select_content<R: Rng + ?Sized>(
    settings: &InterviewSettings,
    store: &ContentStore,
    rng: &mut R,
) -> Selection {
    let mut warnings = Vec::new();

    let questions = select_items(
        store.questions(),
        ContentKind::Questions,
        settings.question_count,
        settings,
        rng,
        &mut warnings,
    );
    let snippets = select_items(
        store.snippets(),
        ContentKind::CodeSnippets,
        settings.effective_code_snippet_count(),
        settings,
        rng,
        &mut warnings,
    );

    for warning in &warnings {
        warn!("{warning}");
    }
    debug!(
        "selected {} questions and {} code snippets for {}",
        questions.len(),
        snippets.len(),
        settings.cloud
    );

    Selection {
        questions,
        snippets,
        warnings,
    }
}

fn select_items<T: Selectable, R: Rng + ?Sized>(
    pool: &[T],
    kind: ContentKind,
    count: usize,
    settings: &InterviewSettings,
    rng: &mut R,
    warnings: &mut Vec<SelectionWarning>,
) -> Vec<T> {
    if count == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<&T> = pool
        .iter()
        .filter(|item| item.cloud() == settings.cloud)
        .collect();

    if candidates.is_empty() && kind == ContentKind::CodeSnippets {
        warnings.push(SelectionWarning::NoSnippetsForCloud {
            cloud: settings.cloud,
        });
        return Vec::new();
    }

    if !candidates.is_empty() {
        for stage in STAGES {
            match stage.apply(&candidates, settings) {
                StageOutcome::Narrowed(narrowed) => candidates = narrowed,
                StageOutcome::Fallback => warnings.push(stage.fallback_warning(kind, settings)),
            }
        }
    }

    if candidates.len() < count {
        warnings.push(SelectionWarning::Shortfall {
            kind,
            requested: count,
            available: candidates.len(),
        });
    }

    candidates.shuffle(rng);
    candidates.into_iter().take(count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Choice;
    use crate::settings::Role;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    fn question(id: &str, category: &str, difficulty: Difficulty, cloud: Cloud) -> Question {
        Question {
            id: id.to_string(),
            text: format!("question {id}"),
            category: category.to_string(),
            difficulty,
            cloud,
            possible_answers: vec![Choice {
                text: "a".to_string(),
                score: 10,
                is_correct: Some(true),
            }],
        }
    }

    fn snippet(id: &str, cloud: Cloud, difficulty: Option<Difficulty>) -> CodeSnippet {
        CodeSnippet {
            id: id.to_string(),
            language: "ampscript".to_string(),
            title: id.to_string(),
            description: String::new(),
            code: "line".to_string(),
            cloud,
            category: None,
            difficulty,
            issues: vec![],
        }
    }

    fn settings(categories: &[&str], seniority: Seniority, questions: usize) -> InterviewSettings {
        InterviewSettings {
            candidate_name: "Ana".to_string(),
            seniority,
            question_count: questions,
            code_snippet_count: 1,
            selected_categories: categories.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
            ..Default::default()
        }
    }

    fn store() -> ContentStore {
        ContentStore::new(
            vec![
                question("m1", "ampscript", Difficulty::Easy, Cloud::Marketing),
                question("m2", "ampscript", Difficulty::Easy, Cloud::Marketing),
                question("m3", "ssjs", Difficulty::Easy, Cloud::Marketing),
                question("m4", "ssjs", Difficulty::Hard, Cloud::Marketing),
                question("m5", "marketing_cloud", Difficulty::Expert, Cloud::Marketing),
                question("s1", "apex", Difficulty::Easy, Cloud::Sales),
            ],
            vec![
                snippet("cs1", Cloud::Marketing, Some(Difficulty::Easy)),
                snippet("cs2", Cloud::Marketing, None),
                snippet("cs3", Cloud::Marketing, Some(Difficulty::Expert)),
            ],
        )
        .unwrap()
    }

    fn ids<T, F: Fn(&T) -> &str>(items: &[T], f: F) -> Vec<String> {
        items.iter().map(|i| f(i).to_string()).collect()
    }

    #[test]
    fn test_returns_requested_count_of_unique_matching_questions() {
        let store = store();
        let s = settings(&["ampscript", "ssjs"], Seniority::Junior, 2);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select_content(&s, &store, &mut rng);

            assert_eq!(selection.questions.len(), 2);
            let unique: HashSet<_> = selection.questions.iter().map(|q| &q.id).collect();
            assert_eq!(unique.len(), 2);
            for q in &selection.questions {
                assert_eq!(q.cloud, Cloud::Marketing);
                assert_eq!(q.difficulty, Difficulty::Easy);
                assert!(s.selected_categories.contains(&q.category));
            }
            assert!(selection.warnings.is_empty());
        }
    }

    #[test]
    fn test_same_seed_gives_same_selection() {
        let store = store();
        let s = settings(&["ampscript", "ssjs"], Seniority::Junior, 2);

        let a = select_content(&s, &store, &mut StdRng::seed_from_u64(7));
        let b = select_content(&s, &store, &mut StdRng::seed_from_u64(7));

        assert_eq!(ids(&a.questions, |q| &q.id), ids(&b.questions, |q| &q.id));
        assert_eq!(ids(&a.snippets, |c| &c.id), ids(&b.snippets, |c| &c.id));
    }

    #[test]
    fn test_pool_is_not_mutated() {
        let store = store();
        let before = ids(store.questions(), |q| &q.id);
        let s = settings(&["ampscript"], Seniority::Junior, 5);

        let _ = select_content(&s, &store, &mut StdRng::seed_from_u64(1));
        assert_eq!(ids(store.questions(), |q| &q.id), before);
    }

    #[test]
    fn test_unknown_category_falls_back_to_cloud() {
        let store = store();
        let s = settings(&["flows"], Seniority::Specialist, 10);

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(3));

        let mut got = ids(&selection.questions, |q| &q.id);
        got.sort();
        // Specialist still narrows the cloud-wide set to hard/expert
        assert_eq!(got, vec!["m4", "m5"]);
        assert!(selection.warnings.contains(&SelectionWarning::CategoryFallback {
            kind: ContentKind::Questions,
            cloud: Cloud::Marketing,
        }));
    }

    #[test]
    fn test_difficulty_fallback_uses_category_survivors() {
        let store = store();
        // only easy ampscript questions exist, Specialist wants hard/expert
        let s = settings(&["ampscript"], Seniority::Specialist, 10);

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(3));

        let mut got = ids(&selection.questions, |q| &q.id);
        got.sort();
        assert_eq!(got, vec!["m1", "m2"]);
        assert!(selection
            .warnings
            .iter()
            .any(|w| matches!(w, SelectionWarning::DifficultyFallback { kind: ContentKind::Questions, .. })));
    }

    #[test]
    fn test_shortfall_is_a_warning_not_an_error() {
        let store = store();
        let s = settings(&["ampscript"], Seniority::Junior, 5);

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(9));

        assert_eq!(selection.questions.len(), 2);
        assert!(selection.warnings.contains(&SelectionWarning::Shortfall {
            kind: ContentKind::Questions,
            requested: 5,
            available: 2,
        }));
    }

    #[test]
    fn test_untagged_snippets_pass_difficulty_filter() {
        let store = store();
        let mut s = settings(&["ampscript"], Seniority::Junior, 1);
        s.code_snippet_count = 5;

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(2));

        let mut got = ids(&selection.snippets, |c| &c.id);
        got.sort();
        assert_eq!(got, vec!["cs1", "cs2"]);
    }

    #[test]
    fn test_no_snippets_for_cloud_is_empty_without_error() {
        let store = store();
        let mut s = settings(&["apex"], Seniority::Junior, 1);
        s.cloud = Cloud::Sales;

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(2));

        assert_eq!(ids(&selection.questions, |q| &q.id), vec!["s1"]);
        assert!(selection.snippets.is_empty());
        assert!(selection
            .warnings
            .contains(&SelectionWarning::NoSnippetsForCloud { cloud: Cloud::Sales }));
    }

    #[test]
    fn test_consultant_never_gets_snippets() {
        let store = store();
        let mut s = settings(&["ampscript"], Seniority::Junior, 1);
        s.role = Role::Consultant;

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(2));

        assert!(selection.snippets.is_empty());
        assert!(!selection
            .warnings
            .iter()
            .any(|w| matches!(w, SelectionWarning::NoSnippetsForCloud { .. })));
    }

    #[test]
    fn test_empty_cloud_yields_no_questions() {
        let store = store();
        let mut s = settings(&["ampscript"], Seniority::Junior, 3);
        s.cloud = Cloud::Pardot;
        s.code_snippet_count = 0;

        let selection = select_content(&s, &store, &mut StdRng::seed_from_u64(2));

        assert!(selection.questions.is_empty());
        assert_eq!(
            selection.warnings,
            vec![SelectionWarning::Shortfall {
                kind: ContentKind::Questions,
                requested: 3,
                available: 0,
            }]
        );
    }

    #[test]
    fn test_warning_messages() {
        let w = SelectionWarning::Shortfall {
            kind: ContentKind::Questions,
            requested: 5,
            available: 2,
        };
        assert_eq!(
            w.to_string(),
            "Only 2 questions match the current filters. Using them instead of the requested 5."
        );
        assert_eq!(
            SelectionWarning::NoSnippetsForCloud { cloud: Cloud::Cpq }.to_string(),
            "No code snippets available for CPQ."
        );
    }
}
