use wordquiz::config::{Config, MAX_DISTRACTORS};
use wordquiz::deck::record::IdRange;
use wordquiz::deck::source::{BundledDeck, Corpus, DataSource, DeckFile};
use wordquiz::engine::sampler::QuizMode;
use wordquiz::error::QuizError;
use wordquiz::session::quiz::{AnswerOutcome, QuizEngine, QuizPhase, QuizState};
use wordquiz::session::result::QuizSummary;

use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Quiz,
    QuizResult,
    Settings,
}

pub const SETTINGS_FIELDS: usize = 9;

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub corpus: Option<Corpus>,
    pub engine: QuizEngine,
    pub quiz: QuizState,
    /// Shown over the answered question until the learner continues.
    pub feedback: Option<AnswerOutcome>,
    pub choice_selected: usize,
    pub typed_input: String,
    pub last_summary: Option<QuizSummary>,
    /// User-facing message for the menu, e.g. why a quiz could not start.
    pub notice: Option<String>,
    pub menu: Menu,
    pub theme: Theme,
    pub settings_selected: usize,
    pub should_quit: bool,
}

pub fn load_corpus(config: &Config) -> Result<Corpus, QuizError> {
    match config.deck {
        Some(ref path) => DeckFile::new(path).load_corpus(),
        None => BundledDeck::default().load_corpus(),
    }
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();

        let engine = match seed {
            Some(seed) => QuizEngine::seeded(seed, config.engine_options()),
            None => QuizEngine::from_entropy(config.engine_options()),
        };

        let mut app = Self {
            screen: AppScreen::Menu,
            config,
            corpus: None,
            engine,
            quiz: QuizState::default(),
            feedback: None,
            choice_selected: 0,
            typed_input: String::new(),
            last_summary: None,
            notice: None,
            menu: Menu::new(),
            theme,
            settings_selected: 0,
            should_quit: false,
        };
        app.reload_deck();
        app
    }

    pub fn reload_deck(&mut self) {
        match load_corpus(&self.config) {
            Ok(corpus) => {
                tracing::info!("loaded {} words from {}", corpus.len(), corpus.origin());
                self.notice = (corpus.dropped() > 0)
                    .then(|| format!("Skipped {} malformed rows", corpus.dropped()));
                self.corpus = Some(corpus);
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.notice = Some(e.to_string());
                self.corpus = None;
            }
        }
    }

    pub fn deck_bounds(&self) -> Option<IdRange> {
        self.corpus.as_ref().and_then(Corpus::id_bounds)
    }

    pub fn start_quiz(&mut self, mode: QuizMode) {
        let Some(corpus) = self.corpus.as_ref() else {
            self.notice = Some("No deck loaded; check the deck path in settings".to_string());
            return;
        };
        let Some(bounds) = corpus.id_bounds() else {
            return;
        };

        let records = corpus.in_group(self.config.group.as_deref());
        let mut request = self.config.sample_request(bounds);
        request.mode = mode;

        self.quiz.reset();
        self.engine.options = self.config.engine_options();
        match self
            .engine
            .launch(&mut self.quiz, &records, &request, self.config.direction)
        {
            Ok(()) => {
                self.notice = None;
                self.feedback = None;
                self.last_summary = None;
                self.choice_selected = 0;
                self.typed_input.clear();
                self.screen = AppScreen::Quiz;
            }
            Err(e) => {
                if e.is_recoverable() {
                    tracing::info!("quiz not started: {e}");
                } else {
                    tracing::error!("quiz not started: {e}");
                }
                self.notice = Some(e.to_string());
                self.screen = AppScreen::Menu;
            }
        }
    }

    pub fn choice_count(&self) -> usize {
        self.quiz.current_view().map_or(0, |v| v.choices.len())
    }

    pub fn next_choice(&mut self) {
        let n = self.choice_count();
        if n > 0 {
            self.choice_selected = (self.choice_selected + 1) % n;
        }
    }

    pub fn prev_choice(&mut self) {
        let n = self.choice_count();
        if n > 0 {
            self.choice_selected = (self.choice_selected + n - 1) % n;
        }
    }

    /// Answers with choice `index` (zero-based) of the current question.
    pub fn pick_choice(&mut self, index: usize) {
        let Some(choice) = self
            .quiz
            .current_view()
            .and_then(|v| v.choices.get(index).cloned())
        else {
            return;
        };
        self.submit(&choice);
    }

    pub fn submit_typed(&mut self) {
        if self.typed_input.trim().is_empty() {
            return;
        }
        let answer = std::mem::take(&mut self.typed_input);
        self.submit(&answer);
    }

    fn submit(&mut self, answer: &str) {
        if self.feedback.is_some() {
            return;
        }
        match self.engine.submit_answer(&mut self.quiz, answer) {
            Ok(outcome) => self.feedback = Some(outcome),
            Err(e) => tracing::error!("{e}"),
        }
    }

    pub fn continue_after_feedback(&mut self) {
        let Some(outcome) = self.feedback.take() else {
            return;
        };
        self.choice_selected = 0;
        if outcome.finished {
            self.finish_quiz();
        }
    }

    fn finish_quiz(&mut self) {
        self.last_summary = self.quiz.session().map(QuizSummary::from_session);
        self.screen = AppScreen::QuizResult;
    }

    /// Leaves a running quiz. Shows the partial result if anything was
    /// answered.
    pub fn abandon_quiz(&mut self) {
        let answered = self.quiz.session().map_or(0, |s| s.current_index());
        self.feedback = None;
        if answered > 0 && self.quiz.phase() != QuizPhase::NotStarted {
            self.finish_quiz();
        } else {
            self.go_to_menu();
        }
    }

    pub fn retry_quiz(&mut self) {
        self.start_quiz(self.config.mode);
    }

    pub fn retest_missed(&mut self) {
        self.start_quiz(QuizMode::RetestMissed);
    }

    pub fn reset_history(&mut self) {
        let cleared = self.engine.history().len();
        self.engine.history().reset();
        self.notice = Some(format!("Cleared {cleared} words from the asked history"));
    }

    pub fn go_to_menu(&mut self) {
        self.quiz.reset();
        self.feedback = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        self.config.normalize();
        if let Err(e) = self.config.save() {
            tracing::warn!("could not save config: {e:#}");
        }
        self.engine.options = self.config.engine_options();
        self.go_to_menu();
    }

    fn set_theme(&mut self, name: String) {
        self.config.theme = name;
        if let Some(theme) = Theme::load(&self.config.theme) {
            self.theme = theme;
        }
    }

    fn cycle_theme(&mut self, forward: bool) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let next = match themes.iter().position(|t| *t == self.config.theme) {
            Some(idx) if forward => (idx + 1) % themes.len(),
            Some(idx) => (idx + themes.len() - 1) % themes.len(),
            None => 0,
        };
        self.set_theme(themes[next].clone());
    }

    fn cycle_mode(&mut self, forward: bool) {
        let modes = QuizMode::ALL;
        let idx = modes
            .iter()
            .position(|&m| m == self.config.mode)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % modes.len()
        } else {
            (idx + modes.len() - 1) % modes.len()
        };
        self.config.mode = modes[next];
    }

    fn step_bound(&self, current: Option<u32>, auto: u32, forward: bool) -> Option<u32> {
        let bounds = self.deck_bounds()?;
        let value = current.unwrap_or(auto);
        let stepped = if forward {
            value.saturating_add(1).min(bounds.end)
        } else {
            value.saturating_sub(1).max(bounds.start)
        };
        Some(stepped)
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        let bounds = self.deck_bounds().unwrap_or(IdRange::ALL);
        match self.settings_selected {
            0 => self.config.direction = self.config.direction.reversed(),
            1 => {
                self.config.range_start =
                    self.step_bound(self.config.range_start, bounds.start, forward)
            }
            2 => {
                self.config.range_end = self.step_bound(self.config.range_end, bounds.end, forward)
            }
            3 => {
                self.config.question_count = if forward {
                    (self.config.question_count + 1).min(100)
                } else {
                    self.config.question_count.saturating_sub(1).max(1)
                }
            }
            4 => {
                self.config.distractor_count = if forward {
                    (self.config.distractor_count + 1).min(MAX_DISTRACTORS)
                } else {
                    self.config.distractor_count.saturating_sub(1)
                }
            }
            5 => self.cycle_mode(forward),
            6 => self.config.answer_match = self.config.answer_match.toggled(),
            7 => self.config.typed_answers = !self.config.typed_answers,
            8 => self.cycle_theme(forward),
            _ => {}
        }
    }

    /// Returns the selected range bound to "follow the deck".
    pub fn settings_clear(&mut self) {
        match self.settings_selected {
            1 => self.config.range_start = None,
            2 => self.config.range_end = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default(), Some(7))
    }

    fn answer_current_correctly(app: &mut App) {
        let key = app
            .quiz
            .session()
            .and_then(|s| s.current_question())
            .map(|q| q.correct_answer.clone())
            .unwrap();
        let index = app
            .quiz
            .current_view()
            .unwrap()
            .choices
            .iter()
            .position(|c| *c == key)
            .unwrap();
        app.pick_choice(index);
    }

    #[test]
    fn bundled_deck_loads_on_start() {
        let app = app();
        assert!(app.corpus.is_some());
        assert_eq!(app.screen, AppScreen::Menu);
    }

    #[test]
    fn full_quiz_reaches_result_screen() {
        let mut app = app();
        app.config.question_count = 3;
        app.start_quiz(QuizMode::Normal);
        assert_eq!(app.screen, AppScreen::Quiz);
        for _ in 0..3 {
            answer_current_correctly(&mut app);
            assert!(app.feedback.as_ref().unwrap().correct);
            app.continue_after_feedback();
        }
        assert_eq!(app.screen, AppScreen::QuizResult);
        let summary = app.last_summary.as_ref().unwrap();
        assert!(summary.is_perfect());
    }

    #[test]
    fn second_pick_before_continue_is_ignored() {
        let mut app = app();
        app.start_quiz(QuizMode::Normal);
        app.pick_choice(0);
        app.pick_choice(0);
        assert_eq!(app.quiz.session().unwrap().current_index(), 1);
    }

    #[test]
    fn empty_range_surfaces_notice_and_stays_on_menu() {
        let mut app = app();
        app.config.range_start = Some(1000);
        app.config.range_end = Some(2000);
        app.start_quiz(QuizMode::Normal);
        assert_eq!(app.screen, AppScreen::Menu);
        assert!(app.notice.as_ref().unwrap().contains("1000..=2000"));
        assert_eq!(app.quiz.phase(), QuizPhase::NotStarted);
    }

    #[test]
    fn retest_without_misses_reports_notice() {
        let mut app = app();
        app.retest_missed();
        assert_eq!(app.screen, AppScreen::Menu);
        assert!(app.notice.as_ref().unwrap().contains("retest-missed"));
    }

    #[test]
    fn wrong_answer_enables_retest() {
        let mut app = app();
        app.config.question_count = 1;
        app.config.typed_answers = true;
        app.start_quiz(QuizMode::Normal);
        app.typed_input = "definitely wrong".to_string();
        app.submit_typed();
        assert!(!app.feedback.as_ref().unwrap().correct);
        app.continue_after_feedback();
        assert_eq!(app.screen, AppScreen::QuizResult);

        app.retest_missed();
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.quiz.session().unwrap().total(), 1);
    }

    #[test]
    fn cycling_themes_replaces_the_active_theme() {
        let mut app = app();
        let themes = Theme::available_themes();
        app.settings_selected = 8;
        for _ in 0..themes.len() * 2 {
            app.settings_cycle(true);
            assert_eq!(app.theme.name, app.config.theme);
        }
        assert!(themes.contains(&app.config.theme));
    }

    #[test]
    fn settings_bounds_step_within_deck() {
        let mut app = app();
        let bounds = app.deck_bounds().unwrap();
        app.settings_selected = 1;
        app.settings_cycle(false);
        assert_eq!(app.config.range_start, Some(bounds.start));
        app.settings_cycle(true);
        assert_eq!(app.config.range_start, Some(bounds.start + 1));
        app.settings_clear();
        assert_eq!(app.config.range_start, None);
    }
}
