mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing_subscriber::EnvFilter;

use wordquiz::config::Config;
use wordquiz::engine::answer::AnswerMatch;
use wordquiz::engine::sampler::QuizMode;
use wordquiz::session::question::QuizDirection;

use app::{App, AppScreen, SETTINGS_FIELDS};
use event::{AppEvent, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::menu::MenuAction;
use ui::components::question_card::{FeedbackCard, QuestionCard};
use ui::components::quiz_progress::QuizProgress;
use ui::layout::{ScreenLayout, pack_hint_lines};

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    TermToMeaning,
    MeaningToTerm,
}

impl From<DirectionArg> for QuizDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::TermToMeaning => QuizDirection::TermToMeaning,
            DirectionArg::MeaningToTerm => QuizDirection::MeaningToTerm,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    AvoidAsked,
    RetestMissed,
}

impl From<ModeArg> for QuizMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Normal => QuizMode::Normal,
            ModeArg::AvoidAsked => QuizMode::AvoidAsked,
            ModeArg::RetestMissed => QuizMode::RetestMissed,
        }
    }
}

#[derive(Parser)]
#[command(name = "wordquiz", version, about = "Terminal vocabulary quiz")]
struct Cli {
    #[arg(short, long, help = "Deck file (.json or .toml); bundled sample deck if omitted")]
    deck: Option<PathBuf>,

    #[arg(long, value_enum, help = "Which side of each word is asked")]
    direction: Option<DirectionArg>,

    #[arg(long, help = "First word id to include")]
    start: Option<u32>,

    #[arg(long, help = "Last word id to include")]
    end: Option<u32>,

    #[arg(short = 'n', long, help = "Questions per quiz")]
    count: Option<usize>,

    #[arg(long, help = "Wrong choices shown per question")]
    distractors: Option<usize>,

    #[arg(short, long, value_enum, help = "Word selection mode")]
    mode: Option<ModeArg>,

    #[arg(short, long, help = "Only quiz words from this group")]
    group: Option<String>,

    #[arg(long, help = "Type answers instead of picking a choice")]
    typed: bool,

    #[arg(long, help = "Ignore case when checking typed answers")]
    ignore_case: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seed for reproducible word and choice order")]
    seed: Option<u64>,

    #[arg(long, help = "Validate the deck and exit")]
    check: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(ref deck) = self.deck {
            config.deck = Some(deck.display().to_string());
        }
        if let Some(direction) = self.direction {
            config.direction = direction.into();
        }
        if self.start.is_some() {
            config.range_start = self.start;
        }
        if self.end.is_some() {
            config.range_end = self.end;
        }
        if let Some(count) = self.count {
            config.question_count = count;
        }
        if let Some(distractors) = self.distractors {
            config.distractor_count = distractors;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.group.is_some() {
            config.group = self.group.clone();
        }
        if self.typed {
            config.typed_answers = true;
        }
        if self.ignore_case {
            config.answer_match = AnswerMatch::CaseInsensitive;
        }
        if let Some(ref theme) = self.theme {
            config.theme = theme.clone();
        }
        config.normalize();
    }
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordquiz");
    fs::create_dir_all(&dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("wordquiz.log"))?;

    let filter = EnvFilter::try_from_env("WORDQUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    cli.apply(&mut config);

    if cli.check {
        return run_check(&config);
    }

    let mut app = App::new(config, cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_check(config: &Config) -> Result<()> {
    let corpus = app::load_corpus(config)?;
    println!("{}", corpus.origin());
    println!("  words:   {}", corpus.len());
    println!("  dropped: {}", corpus.dropped());
    if let Some(bounds) = corpus.id_bounds() {
        println!("  ids:     {bounds}");
    }
    let groups = corpus.groups();
    if !groups.is_empty() {
        println!("  groups:  {}", groups.join(", "));
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizResult => handle_result_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::StartQuiz => app.start_quiz(app.config.mode),
        MenuAction::RetestMissed => app.retest_missed(),
        MenuAction::ResetHistory => app.reset_history(),
        MenuAction::Settings => app.go_to_settings(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                run_menu_action(app, action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.abandon_quiz();
        return;
    }

    if app.feedback.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(_)) {
            app.continue_after_feedback();
        }
        return;
    }

    if app.config.typed_answers {
        match key.code {
            KeyCode::Enter => app.submit_typed(),
            KeyCode::Backspace => {
                app.typed_input.pop();
            }
            KeyCode::Char(ch) => app.typed_input.push(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.prev_choice(),
        KeyCode::Down | KeyCode::Char('j') => app.next_choice(),
        KeyCode::Enter => app.pick_choice(app.choice_selected),
        KeyCode::Char(ch) => {
            if let Some(n) = ch.to_digit(10).filter(|n| *n >= 1) {
                app.pick_choice(n as usize - 1);
            }
        }
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.retry_quiz(),
        KeyCode::Char('r') if !app.engine.ledger().is_empty() => app.retest_missed(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_selected = (app.settings_selected + 1).min(SETTINGS_FIELDS - 1);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        KeyCode::Backspace | KeyCode::Delete => app.settings_clear(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuizResult => render_result(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let deck_info = match app.corpus {
        Some(ref corpus) => format!(" {} | {} words", corpus.origin(), corpus.len()),
        None => " no deck loaded".to_string(),
    };
    let progress_info = format!(
        " | asked {} | missed {}",
        app.engine.history().len(),
        app.engine.ledger().len()
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordquiz ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            deck_info,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
        Span::styled(
            progress_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = ScreenLayout::new(frame.area(), 2);
    render_header(frame, app, layout.header);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(layout.main);

    let menu_area = ui::layout::centered_rect(50, 90, body[0]);
    frame.render_widget(app.menu.view(&app.theme), menu_area);

    if let Some(ref notice) = app.notice {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("  {notice}"),
            Style::default().fg(colors.warning()),
        )));
        frame.render_widget(line, body[1]);
    }

    let hints: Vec<String> = app
        .menu
        .items()
        .iter()
        .map(|item| format!("[{}] {}", item.key, item.label))
        .collect();
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    render_footer(frame, app, layout.footer, &hint_refs);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area(), 2);
    render_header(frame, app, layout.header);

    let Some(session) = app.quiz.session() else {
        return;
    };

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(layout.main);
    let card_area = ui::layout::centered_rect(70, 100, main[0]);

    let hints: &[&str] = if let Some(ref outcome) = app.feedback {
        frame.render_widget(FeedbackCard::new(outcome, &app.theme), card_area);
        &["[Enter] Continue", "[Esc] Stop"]
    } else if let Some(view) = app.quiz.current_view() {
        let card = QuestionCard::new(view, app.choice_selected, &app.theme);
        if app.config.typed_answers {
            frame.render_widget(card.typed(&app.typed_input), card_area);
            &["[Enter] Submit", "[Esc] Stop"]
        } else {
            frame.render_widget(card, card_area);
            &["[1-9] Answer", "[j/k] Move", "[Enter] Pick", "[Esc] Stop"]
        }
    } else {
        &["[Esc] Stop"]
    };

    let progress = QuizProgress::new(
        session.correct_count(),
        session.missed().len(),
        session.total(),
        &app.theme,
    );
    frame.render_widget(progress, main[1]);

    render_footer(frame, app, layout.footer, hints);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area(), 1);
    render_header(frame, app, layout.header);

    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(60, 80, layout.main);
        let dashboard = Dashboard::new(summary, app.engine.ledger().len(), &app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = ScreenLayout::new(frame.area(), 1);
    render_header(frame, app, layout.header);

    let centered = ui::layout::centered_rect(60, 90, layout.main);
    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let bounds = app.deck_bounds();
    let bound_text = |value: Option<u32>, auto: Option<u32>| match (value, auto) {
        (Some(v), _) => v.to_string(),
        (None, Some(a)) => format!("auto ({a})"),
        (None, None) => "auto".to_string(),
    };
    let config = &app.config;

    let fields: Vec<(&str, String)> = vec![
        ("Direction", config.direction.label().to_string()),
        (
            "Range start",
            bound_text(config.range_start, bounds.map(|b| b.start)),
        ),
        ("Range end", bound_text(config.range_end, bounds.map(|b| b.end))),
        ("Questions", config.question_count.to_string()),
        ("Wrong choices", config.distractor_count.to_string()),
        ("Mode", config.mode.to_string()),
        ("Answer matching", config.answer_match.to_string()),
        (
            "Typed answers",
            if config.typed_answers { "on" } else { "off" }.to_string(),
        ),
        ("Theme", config.theme.clone()),
    ];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  Arrows to navigate, Enter/Right to change, Backspace resets a bound",
        Style::default().fg(colors.text_dim()),
    )))
    .render(rows[0], frame.buffer_mut());

    let field_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(2)).collect::<Vec<_>>())
        .split(rows[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default().fg(if is_selected {
            colors.prompt()
        } else {
            colors.text_dim()
        });

        let line = Line::from(vec![
            Span::styled(format!("{indicator}{label:<18}"), label_style),
            Span::styled(format!("< {value} >"), value_style),
        ]);
        Paragraph::new(line).render(field_rows[i], frame.buffer_mut());
    }

    Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back",
        Style::default().fg(colors.accent()),
    )))
    .render(rows[3], frame.buffer_mut());
}
