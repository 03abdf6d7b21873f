pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use cloudquiz::{
    app_dirs::AppDirs,
    availability::CloudAvailability,
    config::{Config, ConfigStore, FileConfigStore},
    content::{Cloud, ContentStore},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::{Interview, Phase},
    settings::{Role, Seniority, SettingsPatch},
};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{debug, info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;
const TIME_LIMIT_STEP: u32 = 5;
const MAX_TIME_LIMIT: u32 = 180;

/// timed technical interview quiz for cloud platform roles
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz for technical interviews: multiple-choice questions and code-correction exercises, filtered by role, seniority and cloud, scored at the end."
)]
pub struct Cli {
    /// candidate name (can also be typed on the settings screen)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// role being interviewed for
    #[clap(short = 'r', long, value_enum)]
    role: Option<Role>,

    /// seniority level, selects question difficulty
    #[clap(short = 's', long, value_enum)]
    seniority: Option<Seniority>,

    /// cloud product line
    #[clap(short = 'c', long, value_enum)]
    cloud: Option<Cloud>,

    /// number of multiple-choice questions
    #[clap(short = 'q', long)]
    questions: Option<usize>,

    /// number of code snippets (developers only)
    #[clap(short = 'k', long)]
    snippets: Option<usize>,

    /// time limit in minutes
    #[clap(short = 't', long)]
    time_limit: Option<u32>,

    /// comma separated question categories for the chosen role
    #[clap(long, value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// seed for a reproducible question draw
    #[clap(long)]
    seed: Option<u64>,

    /// directory holding questions.json and code_snippets.json
    #[clap(long)]
    content_dir: Option<PathBuf>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write logs to this file (defaults to the state dir when RUST_LOG is set)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// print what each cloud offers and exit
    #[clap(long)]
    list_clouds: bool,
}

impl Cli {
    /// Layer command line flags over the loaded config
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(role) = self.role {
            cfg.role = role;
        }
        if let Some(seniority) = self.seniority {
            cfg.seniority = seniority.to_string();
        }
        if let Some(cloud) = self.cloud {
            cfg.cloud = cloud;
        }
        if let Some(n) = self.questions {
            cfg.question_count = n;
        }
        if let Some(n) = self.snippets {
            cfg.code_snippet_count = n;
        }
        if let Some(minutes) = self.time_limit {
            cfg.time_limit = minutes;
        }
        if let Some(categories) = &self.categories {
            match cfg.role {
                Role::Developer => cfg.developer_categories = categories.clone(),
                Role::Consultant => cfg.consultant_categories = categories.clone(),
            }
        }
        cfg
    }

    fn load_config(&self) -> Config {
        let store = match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        debug!("loading config from {}", store.path().display());
        self.apply_to(store.load())
    }

    fn load_content(&self) -> Result<ContentStore, Box<dyn Error>> {
        let store = match &self.content_dir {
            Some(dir) => ContentStore::from_dir(dir)?,
            None => ContentStore::bundled()?,
        };
        Ok(store)
    }
}

/// Settings form rows, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FormField {
    #[strum(serialize = "Candidate")]
    Name,
    Role,
    Seniority,
    Cloud,
    Questions,
    #[strum(serialize = "Code snippets")]
    Snippets,
    #[strum(serialize = "Time limit")]
    TimeLimit,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Role,
        FormField::Seniority,
        FormField::Cloud,
        FormField::Questions,
        FormField::Snippets,
        FormField::TimeLimit,
    ];

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct FormState {
    pub focus: FormField,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            focus: FormField::Name,
            error: None,
        }
    }
}

/// Highlighted rows on the question and code screens
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QuizCursor {
    pub answer: usize,
    pub issue: usize,
    pub fix: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub interview: Interview,
    pub config: Config,
    pub form: FormState,
    pub cursor: QuizCursor,
}

impl App {
    pub fn new(interview: Interview, config: Config) -> Self {
        let mut app = Self {
            interview,
            config,
            form: FormState::default(),
            cursor: QuizCursor::default(),
        };
        app.fit_to_cloud();
        app
    }

    pub fn availability(&self) -> CloudAvailability {
        CloudAvailability::for_cloud(self.interview.store(), self.interview.settings().cloud)
    }

    fn patch(&mut self, patch: SettingsPatch) {
        if let Err(e) = self.interview.update_settings(patch) {
            warn!("settings not changed: {e}");
        }
    }

    /// Categories configured for `role`
    fn role_categories(&self, role: Role) -> Vec<String> {
        match role {
            Role::Developer => self.config.developer_categories.clone(),
            Role::Consultant => self.config.consultant_categories.clone(),
        }
    }

    fn set_role(&mut self, role: Role) {
        let avail = self.availability();
        let snippets = match role {
            Role::Developer => self.config.code_snippet_count.min(avail.max_code_snippets),
            Role::Consultant => 0,
        };
        self.patch(SettingsPatch {
            role: Some(role),
            code_snippet_count: Some(snippets),
            selected_categories: Some(self.role_categories(role).into_iter().collect()),
            ..Default::default()
        });
    }

    /// Keep role, seniority and counts within what the current cloud offers
    fn fit_to_cloud(&mut self) {
        let avail = self.availability();
        let settings = self.interview.settings().clone();

        if !avail.supports_role(settings.role) {
            debug!("{} has no code snippets, switching to consultant", avail.cloud);
            self.set_role(Role::Consultant);
        }
        let seniority = if avail.supports_seniority(settings.seniority) {
            settings.seniority
        } else {
            avail.seniorities.first().copied().unwrap_or_default()
        };
        self.patch(SettingsPatch {
            seniority: Some(seniority),
            question_count: Some(settings.question_count.clamp(1, avail.max_questions)),
            code_snippet_count: Some(settings.code_snippet_count.min(avail.max_code_snippets)),
            ..Default::default()
        });
    }

    fn adjust_focused(&mut self, forward: bool) {
        let avail = self.availability();
        let settings = self.interview.settings().clone();

        match self.form.focus {
            FormField::Name => {}
            FormField::Role => {
                let role = cycle(&avail.roles, settings.role, forward);
                if role != settings.role {
                    self.set_role(role);
                }
            }
            FormField::Seniority => self.patch(SettingsPatch {
                seniority: Some(cycle(&avail.seniorities, settings.seniority, forward)),
                ..Default::default()
            }),
            FormField::Cloud => {
                self.patch(SettingsPatch {
                    cloud: Some(cycle(Cloud::all(), settings.cloud, forward)),
                    ..Default::default()
                });
                self.fit_to_cloud();
            }
            FormField::Questions => {
                let n = step(settings.question_count, 1, forward);
                self.patch(SettingsPatch {
                    question_count: Some(n.clamp(1, avail.max_questions)),
                    ..Default::default()
                });
            }
            FormField::Snippets => {
                if settings.role == Role::Developer {
                    let n = step(settings.code_snippet_count, 1, forward);
                    self.patch(SettingsPatch {
                        code_snippet_count: Some(n.min(avail.max_code_snippets)),
                        ..Default::default()
                    });
                }
            }
            FormField::TimeLimit => {
                let minutes = if forward {
                    (settings.time_limit + TIME_LIMIT_STEP).min(MAX_TIME_LIMIT)
                } else {
                    settings.time_limit.saturating_sub(TIME_LIMIT_STEP).max(1)
                };
                self.patch(SettingsPatch {
                    time_limit: Some(minutes),
                    ..Default::default()
                });
            }
        }
    }

    fn edit_name(&mut self, f: impl FnOnce(&mut String)) {
        let mut name = self.interview.settings().candidate_name.clone();
        f(&mut name);
        self.patch(SettingsPatch {
            candidate_name: Some(name),
            ..Default::default()
        });
    }

    pub fn start(&mut self) {
        let role = self.interview.settings().role;
        self.patch(SettingsPatch {
            selected_categories: Some(self.role_categories(role).into_iter().collect()),
            ..Default::default()
        });

        match self.interview.start() {
            Ok(()) => {
                self.form.error = None;
                self.sync_cursor();
            }
            Err(e) => {
                info!("interview not started: {e}");
                self.form.error = Some(e.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        self.interview.reset();
        self.form = FormState::default();
        self.cursor = QuizCursor::default();
    }

    /// Point the cursor at whatever is already recorded for the current item
    fn sync_cursor(&mut self) {
        let answer = self
            .interview
            .current_question()
            .and_then(|q| self.interview.answer_for(&q.id))
            .unwrap_or(0);
        let fix = self
            .interview
            .current_snippet()
            .and_then(|s| self.interview.fix_for(&s.id, 0))
            .unwrap_or(0);
        self.cursor = QuizCursor {
            answer,
            issue: 0,
            fix,
        };
    }

    fn record_answer(&mut self, index: usize) {
        let Some(id) = self.interview.current_question().map(|q| q.id.clone()) else {
            return;
        };
        match self.interview.answer_question(&id, index) {
            Ok(()) => self.cursor.answer = index,
            Err(e) => debug!("answer ignored: {e}"),
        }
    }

    fn record_fix(&mut self, index: usize) {
        let Some(id) = self.interview.current_snippet().map(|s| s.id.clone()) else {
            return;
        };
        match self.interview.answer_code_issue(&id, self.cursor.issue, index) {
            Ok(()) => self.cursor.fix = index,
            Err(e) => debug!("fix ignored: {e}"),
        }
    }

    fn select_issue(&mut self, forward: bool) {
        let Some(snippet) = self.interview.current_snippet() else {
            return;
        };
        let count = snippet.issues.len();
        if count == 0 {
            return;
        }
        let issue = if forward {
            (self.cursor.issue + 1) % count
        } else {
            (self.cursor.issue + count - 1) % count
        };
        let fix = self.interview.fix_for(&snippet.id, issue).unwrap_or(0);
        self.cursor.issue = issue;
        self.cursor.fix = fix;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        if key.code == KeyCode::Esc {
            return Flow::Quit;
        }

        match self.interview.phase() {
            Phase::Configuring => self.on_settings_key(key),
            Phase::Questions => self.on_question_key(key),
            Phase::CodeCorrection => self.on_code_key(key),
            Phase::Finished => {
                if key.code == KeyCode::Char('r') {
                    self.reset();
                }
            }
        }
        Flow::Continue
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start(),
            KeyCode::Down | KeyCode::Tab => self.form.focus = self.form.focus.next(),
            KeyCode::Up | KeyCode::BackTab => self.form.focus = self.form.focus.prev(),
            KeyCode::Right => self.adjust_focused(true),
            KeyCode::Left => self.adjust_focused(false),
            KeyCode::Backspace if self.form.focus == FormField::Name => {
                self.edit_name(|name| {
                    name.pop();
                });
            }
            KeyCode::Char(c) if self.form.focus == FormField::Name => {
                self.edit_name(|name| name.push(c));
            }
            KeyCode::Char(' ') => self.adjust_focused(true),
            _ => {}
        }
    }

    fn on_question_key(&mut self, key: KeyEvent) {
        let answers = self
            .interview
            .current_question()
            .map_or(0, |q| q.possible_answers.len());

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.answer = self.cursor.answer.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor.answer + 1 < answers {
                    self.cursor.answer += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.record_answer(self.cursor.answer),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < answers {
                    self.record_answer(index);
                }
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.interview.next_question();
                self.sync_cursor();
            }
            KeyCode::Char('c') => {
                self.interview.next_code_snippet();
                self.sync_cursor();
            }
            KeyCode::Char('f') => self.interview.finish(),
            _ => {}
        }
    }

    fn on_code_key(&mut self, key: KeyEvent) {
        let fixes = self
            .interview
            .current_snippet()
            .and_then(|s| s.issues.get(self.cursor.issue))
            .map_or(0, |issue| issue.possible_fixes.len());

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.fix = self.cursor.fix.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor.fix + 1 < fixes {
                    self.cursor.fix += 1;
                }
            }
            KeyCode::Tab | KeyCode::Right => self.select_issue(true),
            KeyCode::BackTab | KeyCode::Left => self.select_issue(false),
            KeyCode::Enter | KeyCode::Char(' ') => self.record_fix(self.cursor.fix),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < fixes {
                    self.record_fix(index);
                }
            }
            KeyCode::Char('n') => {
                self.interview.next_code_snippet();
                self.sync_cursor();
            }
            KeyCode::Char('f') => self.interview.finish(),
            _ => {}
        }
    }

    /// Fire due countdown seconds; true when the screen should be redrawn
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.interview.is_in_progress() {
            return false;
        }
        self.interview.poll_countdown(now);
        true
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    if options.is_empty() {
        return current;
    }
    let len = options.len();
    match options.iter().position(|o| *o == current) {
        Some(i) if forward => options[(i + 1) % len],
        Some(i) => options[(i + len - 1) % len],
        None => options[0],
    }
}

fn step(value: usize, by: usize, forward: bool) -> usize {
    if forward {
        value.saturating_add(by)
    } else {
        value.saturating_sub(by)
    }
}

/// Route logs to a file; the terminal belongs to the TUI
fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let path = match log_file {
        Some(p) => p.to_path_buf(),
        None if std::env::var_os("RUST_LOG").is_some() => match AppDirs::log_path() {
            Some(p) => p,
            None => return Ok(()),
        },
        None => return Ok(()),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn print_clouds(store: &ContentStore) {
    for avail in CloudAvailability::all(store) {
        let roles = avail
            .roles
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let seniorities = avail
            .seniorities
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<16} {:>3} questions  {:>2} snippets  roles: {}  levels: {}",
            avail.cloud.key(),
            avail.total_questions,
            avail.code_snippets,
            roles,
            seniorities
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let store = cli.load_content()?;
    if cli.list_clouds {
        print_clouds(&store);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.load_config();
    let mut settings = config.settings();
    if let Some(name) = &cli.name {
        settings.candidate_name = name.clone();
    }
    let mut interview = Interview::new(store).with_settings(settings);
    if let Some(seed) = cli.seed {
        interview = interview.with_seed(seed);
    }
    let mut app = App::new(interview, config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            QuizEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            QuizEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            QuizEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
