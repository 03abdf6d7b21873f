use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::content::{CodeSnippet, ContentStore, Question};
use crate::countdown::Countdown;
use crate::error::{SessionError, ValidationError};
use crate::scoring::{self, Answers, CodeAnswers, Results};
use crate::selection::{select_content, SelectionWarning};
use crate::settings::{InterviewSettings, SettingsPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    #[strum(serialize = "configuring")]
    Configuring,
    #[strum(serialize = "questions")]
    Questions,
    #[strum(serialize = "code-correction")]
    CodeCorrection,
    #[strum(serialize = "finished")]
    Finished,
}

/// Position within the current phase, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// A single interview run: settings, drawn content, answers, countdown and results
#[derive(Debug)]
pub struct Interview {
    store: ContentStore,
    settings: InterviewSettings,
    phase: Phase,
    questions: Vec<Question>,
    snippets: Vec<CodeSnippet>,
    question_index: Option<usize>,
    code_snippet_index: Option<usize>,
    answers: Answers,
    code_answers: CodeAnswers,
    started_at: Option<DateTime<Local>>,
    time_remaining: u64,
    countdown: Option<Countdown>,
    countdowns_armed: u64,
    results: Results,
    warnings: Vec<SelectionWarning>,
    rng: StdRng,
    clock: Box<dyn Clock>,
}

impl Interview {
    pub fn new(store: ContentStore) -> Self {
        Self {
            store,
            settings: InterviewSettings::default(),
            phase: Phase::Configuring,
            questions: Vec::new(),
            snippets: Vec::new(),
            question_index: None,
            code_snippet_index: None,
            answers: Answers::new(),
            code_answers: CodeAnswers::new(),
            started_at: None,
            time_remaining: 0,
            countdown: None,
            countdowns_armed: 0,
            results: Results::default(),
            warnings: Vec::new(),
            rng: StdRng::from_entropy(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_settings(mut self, settings: InterviewSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Make content selection reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, Phase::Questions | Phase::CodeCorrection)
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Change settings; only allowed while no interview is running
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), SessionError> {
        if self.is_in_progress() {
            return Err(SessionError::AlreadyInProgress);
        }
        self.settings.apply(patch);
        Ok(())
    }

    /// Draw content and begin the question phase.
    ///
    /// Invalid settings leave the interview untouched. Any countdown from a
    /// previous run is cancelled before the new one is armed.
    pub fn start(&mut self) -> Result<(), ValidationError> {
        self.settings.validate()?;

        self.cancel_countdown();
        let selection = select_content(&self.settings, &self.store, &mut self.rng);

        self.questions = selection.questions;
        self.snippets = selection.snippets;
        self.warnings = selection.warnings;
        self.question_index = if self.questions.is_empty() {
            None
        } else {
            Some(0)
        };
        self.code_snippet_index = None;
        self.answers.clear();
        self.code_answers.clear();
        self.results = Results::default();
        self.started_at = Some(self.clock.now());
        self.time_remaining = self.settings.time_limit_secs();
        self.phase = Phase::Questions;
        self.arm_countdown(Instant::now());

        info!(
            "interview started for {} ({} {}, {}): {} questions, {} code snippets, {}s",
            self.settings.candidate_name,
            self.settings.seniority,
            self.settings.role,
            self.settings.cloud,
            self.questions.len(),
            self.snippets.len(),
            self.time_remaining
        );

        if self.questions.is_empty() {
            self.leave_questions();
        }
        Ok(())
    }

    /// Record (or replace) the answer for a question
    pub fn answer_question(&mut self, question_id: &str, answer: usize) -> Result<(), SessionError> {
        if !self.is_in_progress() {
            return Err(SessionError::NotInProgress);
        }
        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        if answer >= question.possible_answers.len() {
            warn!("rejecting answer #{answer} for question `{question_id}`");
            return Err(SessionError::AnswerOutOfRange {
                id: question_id.to_string(),
                index: answer,
            });
        }

        self.answers.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// Record (or replace) the fix chosen for one issue of a snippet
    pub fn answer_code_issue(
        &mut self,
        snippet_id: &str,
        issue: usize,
        fix: usize,
    ) -> Result<(), SessionError> {
        if !self.is_in_progress() {
            return Err(SessionError::NotInProgress);
        }
        let snippet = self
            .snippets
            .iter()
            .find(|s| s.id == snippet_id)
            .ok_or_else(|| SessionError::UnknownSnippet(snippet_id.to_string()))?;
        let Some(code_issue) = snippet.issues.get(issue) else {
            return Err(SessionError::IssueOutOfRange {
                id: snippet_id.to_string(),
                index: issue,
            });
        };
        if fix >= code_issue.possible_fixes.len() {
            warn!("rejecting fix #{fix} for issue #{issue} of `{snippet_id}`");
            return Err(SessionError::FixOutOfRange {
                id: snippet_id.to_string(),
                issue,
                index: fix,
            });
        }

        self.code_answers
            .entry(snippet_id.to_string())
            .or_default()
            .insert(issue, fix);
        Ok(())
    }

    /// Move to the next question, or on to the code phase after the last one
    pub fn next_question(&mut self) {
        if self.phase != Phase::Questions {
            return;
        }
        match self.question_index {
            Some(i) if i + 1 < self.questions.len() => self.question_index = Some(i + 1),
            _ => self.leave_questions(),
        }
    }

    /// Move to the next code snippet, finishing after the last one.
    ///
    /// With no current snippet this always lands on the first one.
    pub fn next_code_snippet(&mut self) {
        if !self.is_in_progress() {
            return;
        }
        match self.code_snippet_index {
            None if !self.snippets.is_empty() => self.enter_code_phase(),
            Some(i) if i + 1 < self.snippets.len() => self.code_snippet_index = Some(i + 1),
            _ => self.finish(),
        }
    }

    /// Score the interview and stop the countdown; repeated calls do nothing
    pub fn finish(&mut self) {
        if !self.is_in_progress() {
            return;
        }

        let elapsed = self
            .started_at
            .map_or(0, |start| (self.clock.now() - start).num_seconds());
        self.results = scoring::score(
            &self.questions,
            &self.answers,
            &self.snippets,
            &self.code_answers,
            self.settings.role,
            elapsed,
        );
        self.cancel_countdown();
        self.question_index = None;
        self.code_snippet_index = None;
        self.phase = Phase::Finished;

        info!(
            "interview finished: {}/{} in {}s",
            self.results.total_score, self.results.max_score, self.results.time_spent_secs
        );
    }

    /// Discard the run and return to configuring; only the candidate name is forgotten
    pub fn reset(&mut self) {
        self.cancel_countdown();
        self.questions.clear();
        self.snippets.clear();
        self.question_index = None;
        self.code_snippet_index = None;
        self.answers.clear();
        self.code_answers.clear();
        self.results = Results::default();
        self.warnings.clear();
        self.started_at = None;
        self.time_remaining = 0;
        self.phase = Phase::Configuring;
        self.settings.candidate_name.clear();
        debug!("interview reset");
    }

    /// Consume one second of the countdown, finishing when it reaches zero
    pub fn tick(&mut self) {
        if !self.is_in_progress() || self.countdown.is_none() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            info!("time is up");
            self.finish();
        }
    }

    /// Fire every countdown tick that has come due by `now`
    pub fn poll_countdown(&mut self, now: Instant) {
        let due = match self.countdown.as_mut() {
            Some(countdown) => countdown.due_ticks(now),
            None => return,
        };
        for _ in 0..due {
            if self.countdown.is_none() {
                break;
            }
            self.tick();
        }
    }

    pub fn countdown_id(&self) -> Option<u64> {
        self.countdown.as_ref().map(Countdown::id)
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Less than a fifth of the time limit is left
    pub fn is_time_running_out(&self) -> bool {
        self.is_in_progress() && self.time_remaining * 5 < self.settings.time_limit_secs()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn snippets(&self) -> &[CodeSnippet] {
        &self.snippets
    }

    pub fn question_index(&self) -> Option<usize> {
        self.question_index
    }

    pub fn code_snippet_index(&self) -> Option<usize> {
        self.code_snippet_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question_index.and_then(|i| self.questions.get(i))
    }

    pub fn current_snippet(&self) -> Option<&CodeSnippet> {
        self.code_snippet_index.and_then(|i| self.snippets.get(i))
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn code_answers(&self) -> &CodeAnswers {
        &self.code_answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn fix_for(&self, snippet_id: &str, issue: usize) -> Option<usize> {
        self.code_answers
            .get(snippet_id)
            .and_then(|fixes: &BTreeMap<usize, usize>| fixes.get(&issue).copied())
    }

    pub fn progress(&self) -> Option<Progress> {
        match self.phase {
            Phase::Questions => Some(Progress {
                current: self.question_index.map_or(0, |i| i + 1),
                total: self.questions.len(),
            }),
            Phase::CodeCorrection => Some(Progress {
                current: self.code_snippet_index.map_or(0, |i| i + 1),
                total: self.snippets.len(),
            }),
            Phase::Configuring | Phase::Finished => None,
        }
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn warnings(&self) -> &[SelectionWarning] {
        &self.warnings
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    fn leave_questions(&mut self) {
        self.question_index = None;
        if self.snippets.is_empty() {
            self.finish();
        } else {
            self.enter_code_phase();
        }
    }

    fn enter_code_phase(&mut self) {
        self.question_index = None;
        self.code_snippet_index = Some(0);
        self.phase = Phase::CodeCorrection;
        debug!("entering code correction with {} snippets", self.snippets.len());
    }

    fn arm_countdown(&mut self, now: Instant) {
        self.countdowns_armed += 1;
        self.countdown = Some(Countdown::arm(self.countdowns_armed, now));
        debug!("armed countdown #{}", self.countdowns_armed);
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            debug!("cancelled countdown #{}", countdown.id());
        }
    }
}
