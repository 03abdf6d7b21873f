use ratatui::Frame;

use cloudquiz::session::Phase;

use crate::{
    ui::{
        code::render_code, question::render_question, results::render_results,
        settings_form::render_settings_form,
    },
    App,
};

/// A UI screen boundary, one per interview phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_settings_form(app, f);
    }
}

pub struct QuestionScreen;

impl Screen for QuestionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_question(app, f);
    }
}

pub struct CodeScreen;

impl Screen for CodeScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_code(app, f);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_results(app, f);
    }
}

pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Configuring => Box::new(SettingsScreen),
        Phase::Questions => Box::new(QuestionScreen),
        Phase::CodeCorrection => Box::new(CodeScreen),
        Phase::Finished => Box::new(ResultsScreen),
    }
}
