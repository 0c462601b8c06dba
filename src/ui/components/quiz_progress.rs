use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bar split into correct, missed and remaining questions.
pub struct QuizProgress<'a> {
    correct: usize,
    missed: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> QuizProgress<'a> {
    pub fn new(correct: usize, missed: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            correct,
            missed,
            total,
            theme,
        }
    }

    fn cells(&self, width: u16) -> (u16, u16) {
        if self.total == 0 {
            return (0, 0);
        }
        let scale = |n: usize| ((n * width as usize) / self.total) as u16;
        let correct = scale(self.correct);
        let answered = scale(self.correct + self.missed).min(width);
        (correct, answered)
    }
}

impl Widget for QuizProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let answered = self.correct + self.missed;
        let block = Block::bordered()
            .title(format!(" {answered}/{} answered ", self.total))
            .border_style(Style::default().fg(colors.bar_filled()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (correct_cells, answered_cells) = self.cells(inner.width);
        for offset in 0..inner.width {
            let bg = if offset < correct_cells {
                colors.success()
            } else if offset < answered_cells {
                colors.error()
            } else {
                colors.bar_empty()
            };
            buf[(inner.x + offset, inner.y)].set_style(Style::default().bg(bg));
        }

        let label = format!("{} correct", self.correct);
        let label_x = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
