use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    StartQuiz,
    RetestMissed,
    ResetHistory,
    Settings,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

const ITEMS: [MenuItem; 5] = [
    MenuItem {
        key: '1',
        label: "Start Quiz",
        description: "Quiz words from the configured range",
        action: MenuAction::StartQuiz,
    },
    MenuItem {
        key: '2',
        label: "Retest Missed",
        description: "Quiz only the words you got wrong",
        action: MenuAction::RetestMissed,
    },
    MenuItem {
        key: 'r',
        label: "Reset History",
        description: "Allow already-asked words again",
        action: MenuAction::ResetHistory,
    },
    MenuItem {
        key: 'c',
        label: "Settings",
        description: "Direction, range, question count, mode",
        action: MenuAction::Settings,
    },
    MenuItem {
        key: 'q',
        label: "Quit",
        description: "Leave wordquiz",
        action: MenuAction::Quit,
    },
];

#[derive(Default)]
pub struct Menu {
    pub selected: usize,
}

/// A [`Menu`] paired with the theme it is drawn in.
pub struct MenuView<'a> {
    menu: &'a Menu,
    theme: &'a Theme,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<'a>(&'a self, theme: &'a Theme) -> MenuView<'a> {
        MenuView { menu: self, theme }
    }

    pub fn items(&self) -> &'static [MenuItem] {
        &ITEMS
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % ITEMS.len();
    }

    pub fn prev(&mut self) {
        self.selected = (self.selected + ITEMS.len() - 1) % ITEMS.len();
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        ITEMS.get(self.selected).map(|item| item.action)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        ITEMS
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.action)
    }
}

impl MenuView<'_> {
    fn item_lines(&self, index: usize, item: &MenuItem) -> [Line<'static>; 3] {
        let colors = &self.theme.colors;
        let (marker, label_style) = if index == self.menu.selected {
            (
                '>',
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (' ', Style::default().fg(colors.fg()))
        };
        [
            Line::from(Span::styled(
                format!(" {marker} [{}] {}", item.key, item.label),
                label_style,
            )),
            Line::from(Span::styled(
                format!("       {}", item.description),
                Style::default().fg(colors.text_dim()),
            )),
            Line::default(),
        ]
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [title_area, items_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(inner);

        Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "wordquiz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Vocabulary Quiz",
                Style::default().fg(colors.fg()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(title_area, buf);

        let lines: Vec<Line> = ITEMS
            .iter()
            .enumerate()
            .flat_map(|(i, item)| self.item_lines(i, item))
            .collect();
        Paragraph::new(lines).render(items_area, buf);
    }
}
