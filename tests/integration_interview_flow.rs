use std::collections::HashSet;

use assert_matches::assert_matches;
use cloudquiz::{
    clock::ManualClock,
    content::{Choice, Cloud, CodeIssue, CodeSnippet, ContentStore, Difficulty, Question},
    selection::{select_content, SelectionWarning},
    settings::{InterviewSettings, Role, Seniority, SettingsPatch},
    Interview, Phase, ValidationError,
};
use rand::{rngs::StdRng, SeedableRng};

fn choices(scores: &[i32]) -> Vec<Choice> {
    scores
        .iter()
        .map(|&score| Choice {
            text: format!("worth {score}"),
            score,
            is_correct: Some(score == 10),
        })
        .collect()
}

fn question(id: &str, category: &str, difficulty: Difficulty, scores: &[i32]) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {id}?"),
        category: category.to_string(),
        difficulty,
        cloud: Cloud::Marketing,
        possible_answers: choices(scores),
    }
}

fn marketing_pool() -> ContentStore {
    ContentStore::new(
        vec![
            question("q1", "ssjs", Difficulty::Easy, &[2, 10, 0]),
            question("q2", "ssjs", Difficulty::Easy, &[10, 5]),
            question("q3", "ampscript", Difficulty::Easy, &[0, 0, 8, 1]),
        ],
        vec![CodeSnippet {
            id: "cs1".to_string(),
            language: "ampscript".to_string(),
            title: "Lookup".to_string(),
            description: "Fix the lookup".to_string(),
            code: "%%[\nSET @x = Lookup('DE', 'Name')\n]%%".to_string(),
            cloud: Cloud::Marketing,
            category: Some("ampscript".to_string()),
            difficulty: Some(Difficulty::Easy),
            issues: vec![CodeIssue {
                line: 2,
                description: "Lookup needs a filter".to_string(),
                possible_fixes: choices(&[0, 10, 3]),
            }],
        }],
    )
    .expect("valid pool")
}

fn scenario_settings() -> InterviewSettings {
    InterviewSettings {
        candidate_name: "Ana".to_string(),
        role: Role::Developer,
        seniority: Seniority::Junior,
        question_count: 2,
        code_snippet_count: 1,
        time_limit: 1,
        cloud: Cloud::Marketing,
        ..Default::default()
    }
}

fn best_index(choices: &[Choice]) -> usize {
    choices
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| c.score)
        .map(|(i, _)| i)
        .unwrap()
}

fn interview(seed: u64) -> (Interview, ManualClock) {
    let clock = ManualClock::default();
    let interview = Interview::new(marketing_pool())
        .with_settings(scenario_settings())
        .with_seed(seed)
        .with_clock(Box::new(clock.clone()));
    (interview, clock)
}

#[test]
fn best_answers_score_the_sum_of_their_points() {
    let (mut iv, clock) = interview(3);
    iv.start().unwrap();

    assert_eq!(iv.questions().len(), 2);
    assert_eq!(iv.snippets().len(), 1);
    assert_eq!(iv.time_remaining(), 60);

    let mut expected = 0;
    while let Some(q) = iv.current_question().cloned() {
        let best = best_index(&q.possible_answers);
        iv.answer_question(&q.id, best).unwrap();
        expected += q.possible_answers[best].score;
        iv.next_question();
    }
    assert_eq!(iv.phase(), Phase::CodeCorrection);

    let snippet = iv.current_snippet().cloned().unwrap();
    let fix = best_index(&snippet.issues[0].possible_fixes);
    iv.answer_code_issue(&snippet.id, 0, fix).unwrap();
    expected += snippet.issues[0].possible_fixes[fix].score;

    clock.advance_secs(42);
    iv.finish();

    let results = iv.results();
    assert_eq!(results.total_score, expected);
    assert_eq!(results.max_score, expected);
    assert_eq!(results.percentage(), 100);
    assert_eq!(results.question_scores.len(), 2);
    assert_eq!(results.code_scores.len(), 1);
    assert_eq!(results.time_spent_secs, 42);
}

#[test]
fn untouched_interview_times_out_after_sixty_ticks() {
    let (mut iv, clock) = interview(1);
    iv.start().unwrap();

    for _ in 0..60 {
        assert_eq!(iv.phase(), Phase::Questions);
        clock.advance_secs(1);
        iv.tick();
    }

    assert_eq!(iv.phase(), Phase::Finished);
    assert_eq!(iv.results().time_spent_secs, 60);
    assert_eq!(iv.results().total_score, 0);
    assert_eq!(iv.countdown_id(), None);

    // further ticks are ignored
    iv.tick();
    assert_eq!(iv.results().time_spent_secs, 60);
}

#[test]
fn unmatched_category_falls_back_to_the_whole_cloud() {
    let store = marketing_pool();
    let settings = InterviewSettings {
        selected_categories: ["cpq_core".to_string()].into_iter().collect(),
        ..scenario_settings()
    };

    let selection = select_content(&settings, &store, &mut StdRng::seed_from_u64(9));

    assert_eq!(selection.questions.len(), 2);
    assert!(selection
        .questions
        .iter()
        .all(|q| q.cloud == Cloud::Marketing));
    assert!(selection
        .warnings
        .iter()
        .any(|w| matches!(w, SelectionWarning::CategoryFallback { .. })));
}

#[test]
fn reset_forgets_only_the_candidate() {
    let (mut iv, _clock) = interview(5);
    iv.update_settings(SettingsPatch {
        seniority: Some(Seniority::Advanced),
        question_count: Some(3),
        ..Default::default()
    })
    .unwrap();
    iv.start().unwrap();
    iv.finish();
    assert_eq!(iv.phase(), Phase::Finished);

    iv.reset();

    let settings = iv.settings();
    assert_eq!(settings.candidate_name, "");
    assert_eq!(settings.cloud, Cloud::Marketing);
    assert_eq!(settings.role, Role::Developer);
    assert_eq!(settings.seniority, Seniority::Advanced);
    assert_eq!(settings.question_count, 3);
    assert_eq!(settings.code_snippet_count, 1);
    assert_eq!(iv.phase(), Phase::Configuring);

    // a new candidate can start straight away
    assert_eq!(iv.start(), Err(ValidationError::EmptyCandidateName));
    iv.update_settings(SettingsPatch {
        candidate_name: Some("Bo".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_matches!(iv.start(), Ok(()));
    assert_eq!(iv.countdown_id(), Some(2));
}

#[test]
fn bundled_selection_is_exact_unique_and_filtered() {
    let store = ContentStore::bundled().unwrap();
    let settings = InterviewSettings {
        candidate_name: "Ana".to_string(),
        seniority: Seniority::Advanced,
        question_count: 5,
        code_snippet_count: 2,
        ..Default::default()
    };

    for seed in 0..25 {
        let selection = select_content(&settings, &store, &mut StdRng::seed_from_u64(seed));

        assert_eq!(selection.questions.len(), 5);
        let ids: HashSet<_> = selection.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 5, "duplicate question drawn for seed {seed}");
        for q in &selection.questions {
            assert_eq!(q.cloud, Cloud::Marketing);
            assert!(settings.selected_categories.contains(&q.category));
            assert!(Seniority::Advanced.allows(q.difficulty));
        }
        assert!(selection.warnings.is_empty());
    }
}

#[test]
fn same_seed_same_interview() {
    let store = ContentStore::bundled().unwrap();
    let settings = InterviewSettings {
        candidate_name: "Ana".to_string(),
        ..Default::default()
    };

    let draw = |seed| {
        let mut iv = Interview::new(store.clone())
            .with_settings(settings.clone())
            .with_seed(seed);
        iv.start().unwrap();
        iv.questions()
            .iter()
            .map(|q| q.id.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(draw(11), draw(11));
}

#[test]
fn consultants_and_zero_snippets_never_see_code() {
    for patch in [
        SettingsPatch {
            role: Some(Role::Consultant),
            ..Default::default()
        },
        SettingsPatch {
            code_snippet_count: Some(0),
            ..Default::default()
        },
    ] {
        let (mut iv, _clock) = interview(2);
        iv.update_settings(patch).unwrap();
        iv.start().unwrap();

        let mut phases = vec![iv.phase()];
        while iv.is_in_progress() {
            iv.next_question();
            phases.push(iv.phase());
        }

        assert!(!phases.contains(&Phase::CodeCorrection));
        assert!(iv.results().code_scores.is_empty());
    }
}

#[test]
fn jumping_to_code_starts_at_the_first_snippet() {
    let (mut iv, _clock) = interview(4);
    iv.start().unwrap();
    assert_eq!(iv.code_snippet_index(), None);

    iv.next_code_snippet();

    assert_eq!(iv.code_snippet_index(), Some(0));
    assert_eq!(iv.current_snippet().map(|s| s.id.as_str()), Some("cs1"));
}

#[test]
fn finishing_twice_does_not_double_count() {
    let (mut iv, clock) = interview(6);
    iv.start().unwrap();
    let first = iv.questions()[0].clone();
    let best = best_index(&first.possible_answers);
    iv.answer_question(&first.id, best).unwrap();
    clock.advance_secs(10);

    iv.finish();
    let once = iv.results().clone();
    clock.advance_secs(10);
    iv.finish();

    assert_eq!(iv.results(), &once);
    assert_eq!(once.total_score, first.possible_answers[best].score);
}

#[test]
fn answers_after_finish_are_rejected() {
    let (mut iv, _clock) = interview(8);
    iv.start().unwrap();
    let id = iv.questions()[0].id.clone();
    iv.finish();

    assert!(iv.answer_question(&id, 0).is_err());
    assert!(iv.answer_code_issue("cs1", 0, 0).is_err());
    assert_eq!(iv.results().total_score, 0);
}
