use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use wordquiz::session::result::QuizSummary;

use crate::ui::theme::Theme;

pub struct Dashboard<'a> {
    pub summary: &'a QuizSummary,
    /// Words currently waiting in the missed ledger.
    pub ledger_len: usize,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(summary: &'a QuizSummary, ledger_len: usize, theme: &'a Theme) -> Self {
        Self {
            summary,
            ledger_len,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if self.summary.answered < self.summary.total {
            title_spans.push(Span::styled(
                format!(
                    "  (stopped after {} of {})",
                    self.summary.answered, self.summary.total
                ),
                Style::default().fg(colors.text_dim()),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let accuracy = self.summary.accuracy_percent();
        let acc_color = if accuracy >= 90.0 {
            colors.success()
        } else if accuracy >= 60.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let score_line = Line::from(vec![
            Span::styled("  Score:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}/{}", self.summary.correct_count, self.summary.total),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({accuracy:.0}%)"),
                Style::default().fg(colors.text_dim()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let mode_line = Line::from(vec![
            Span::styled("  Mode:     ", Style::default().fg(colors.fg())),
            Span::styled(
                format!(
                    "{}, {}",
                    self.summary.mode,
                    self.summary.direction.label()
                ),
                Style::default().fg(colors.fg()),
            ),
        ]);
        Paragraph::new(mode_line).render(layout[2], buf);

        let report_color = if self.summary.missed.is_empty() {
            colors.success()
        } else {
            colors.fg()
        };
        let mut report_lines = Vec::new();
        if !self.summary.missed.is_empty() {
            report_lines.push(Line::from(Span::styled(
                "  Missed:",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )));
        }
        for line in self.summary.report().lines() {
            report_lines.push(Line::from(Span::styled(
                format!("  {line}"),
                Style::default().fg(report_color),
            )));
        }
        Paragraph::new(report_lines)
            .wrap(Wrap { trim: false })
            .render(layout[3], buf);

        let mut help = vec![
            Span::styled("  [a] Again  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Menu", Style::default().fg(colors.accent())),
        ];
        if self.ledger_len > 0 {
            help.insert(
                1,
                Span::styled(
                    format!("[r] Retest {} missed  ", self.ledger_len),
                    Style::default().fg(colors.accent()),
                ),
            );
        }
        Paragraph::new(Line::from(help)).render(layout[4], buf);
    }
}
