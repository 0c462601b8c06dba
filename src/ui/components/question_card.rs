use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use wordquiz::session::question::QuestionView;
use wordquiz::session::quiz::AnswerOutcome;

use crate::ui::theme::Theme;

pub struct QuestionCard<'a> {
    view: QuestionView<'a>,
    selected: usize,
    /// Text typed so far when answers are typed rather than picked.
    typed: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(view: QuestionView<'a>, selected: usize, theme: &'a Theme) -> Self {
        Self {
            view,
            selected,
            typed: None,
            theme,
        }
    }

    pub fn typed(mut self, text: &'a str) -> Self {
        self.typed = Some(text);
        self
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Question {} of {} ",
                self.view.position + 1,
                self.view.total
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.view.prompt,
                Style::default()
                    .fg(colors.prompt())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        ];
        if let Some(pos) = self.view.record.part_of_speech.as_deref() {
            lines.push(
                Line::from(Span::styled(
                    format!("({pos})"),
                    Style::default().fg(colors.text_dim()),
                ))
                .alignment(Alignment::Center),
            );
        }
        lines.push(Line::from(""));

        match self.typed {
            Some(text) => {
                lines.push(Line::from(vec![
                    Span::styled("  Answer: ", Style::default().fg(colors.fg())),
                    Span::styled(
                        format!("{text}_"),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
            None => {
                for (i, choice) in self.view.choices.iter().enumerate() {
                    let style = if i == self.selected {
                        Style::default()
                            .fg(colors.choice_selected_fg())
                            .bg(colors.choice_selected_bg())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    lines.push(Line::from(Span::styled(
                        format!("  [{}] {choice}", i + 1),
                        style,
                    )));
                }
                if self.view.short_of_choices {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "  (not enough other words for a full set of choices)",
                        Style::default().fg(colors.warning()),
                    )));
                }
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Verdict for the question just answered.
pub struct FeedbackCard<'a> {
    outcome: &'a AnswerOutcome,
    theme: &'a Theme,
}

impl<'a> FeedbackCard<'a> {
    pub fn new(outcome: &'a AnswerOutcome, theme: &'a Theme) -> Self {
        Self { outcome, theme }
    }
}

impl Widget for FeedbackCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, color) = if self.outcome.correct {
            (" Correct! ", colors.success())
        } else {
            (" Incorrect ", colors.error())
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.outcome.prompt.as_str(),
                Style::default()
                    .fg(colors.prompt())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
        ];
        if self.outcome.correct {
            lines.push(Line::from(Span::styled(
                format!("  {}", self.outcome.correct_answer),
                Style::default().fg(colors.success()),
            )));
        } else {
            lines.push(Line::from(vec![
                Span::styled("  You answered: ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.outcome.given.as_str(),
                    Style::default().fg(colors.error()),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  The answer is: ", Style::default().fg(colors.fg())),
                Span::styled(
                    self.outcome.correct_answer.as_str(),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
