use ratatui::layout::{Constraint, Flex, Layout, Rect};

const HINT_INDENT: &str = "  ";
const HINT_GAP: &str = "  ";

/// Header, body and footer rows shared by every screen.
pub struct ScreenLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let [header, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(footer_lines.max(1)),
        ])
        .areas(area);
        Self {
            header,
            main,
            footer,
        }
    }
}

/// Lays key hints out left to right, starting a new line whenever the next
/// hint would overflow `width`. A hint wider than `width` gets a line of its
/// own.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let fits = lines.last().is_some_and(|line| {
            line.chars().count() + HINT_GAP.len() + hint.chars().count() <= width
        });
        match lines.last_mut() {
            Some(line) if fits => {
                line.push_str(HINT_GAP);
                line.push_str(hint);
            }
            _ => lines.push(format!("{HINT_INDENT}{hint}")),
        }
    }
    lines
}

/// A box `percent_x` by `percent_y` of `area`, centered, but no smaller than
/// what a question card needs unless `area` itself is smaller.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 48;
    const MIN_HEIGHT: u16 = 14;

    let scaled = |len: u16, percent: u16, min: u16| {
        (len.saturating_mul(percent.min(100)) / 100)
            .max(min)
            .min(len)
    };
    let width = scaled(area.width, percent_x, MIN_WIDTH);
    let height = scaled(area.height, percent_y, MIN_HEIGHT);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_when_too_wide() {
        let lines = pack_hint_lines(&["[1-4] Answer", "[Esc] Quit"], 16);
        assert_eq!(lines, vec!["  [1-4] Answer", "  [Esc] Quit"]);
        let one = pack_hint_lines(&["[1-4] Answer", "[Esc] Quit"], 80);
        assert_eq!(one, vec!["  [1-4] Answer  [Esc] Quit"]);
    }

    #[test]
    fn empty_hints_are_skipped() {
        assert_eq!(pack_hint_lines(&["", "[q] Menu"], 40), vec!["  [q] Menu"]);
        assert!(pack_hint_lines(&[], 40).is_empty());
    }

    #[test]
    fn centered_rect_never_exceeds_area() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_rect(50, 50, area), area);

        let big = Rect::new(0, 0, 200, 60);
        let rect = centered_rect(50, 50, big);
        assert_eq!(rect.width, 100);
        assert_eq!(rect.x, 50);
    }
}
