use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App, clipboard::Clipboard, engagement::EngagementState, progress::BarColor,
};

const VERTICAL_MARGIN: u16 = 1;
const PAPER: Color = Color::White;

/// Text color for a fade level: black at full contrast, paper white when
/// fully faded.
pub fn ink_color(intensity: u8) -> Color {
    Color::Rgb(intensity, intensity, intensity)
}

fn bar_fill_color(color: BarColor) -> Color {
    match color {
        BarColor::Normal => Color::Black,
        BarColor::Complete => Color::Green,
    }
}

/// Number of filled cells for `progress` on a bar `width` cells wide.
pub fn filled_cells(progress: f64, width: u16) -> u16 {
    let clamped = progress.clamp(0.0, 1.0);
    (width as f64 * clamped) as u16
}

fn editor_lines(text: &str, cursor: usize, ink: Style) -> Vec<Line<'static>> {
    let cursor_style = ink.add_modifier(Modifier::REVERSED);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();

    for (i, c) in text.chars().enumerate() {
        if i == cursor {
            if !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), ink));
            }
            let shown = match c {
                '\n' => " ".to_string(),
                '\t' => "    ".to_string(),
                _ => c.to_string(),
            };
            spans.push(Span::styled(shown, cursor_style));
            if c != '\n' {
                continue;
            }
        }
        if c == '\n' {
            if !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), ink));
            }
            lines.push(Line::from(std::mem::take(&mut spans)));
        } else if c == '\t' {
            run.push_str("    ");
        } else {
            run.push(c);
        }
    }

    if !run.is_empty() {
        spans.push(Span::styled(run, ink));
    }
    if cursor >= text.chars().count() {
        spans.push(Span::styled(" ", cursor_style));
    }
    lines.push(Line::from(spans));
    lines
}

fn state_label(state: EngagementState) -> (&'static str, Color) {
    match state {
        EngagementState::Idle => ("start typing", Color::Gray),
        EngagementState::Typing => ("keep going", Color::Cyan),
        EngagementState::Warning => ("don't stop!", Color::Yellow),
        EngagementState::Failed => ("text cut to clipboard", Color::Red),
        EngagementState::Succeeded => ("goal reached", Color::Green),
    }
}

impl<C: Clipboard> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let editor_width = self.max_row_characters.saturating_add(2).min(area.width);
        let column = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(editor_width),
                Constraint::Fill(1),
            ])
            .split(area)[1];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // progress bar
                Constraint::Min(3),    // editor
                Constraint::Length(1), // status
            ])
            .split(column);

        // progress bar
        let bar_area = chunks[0];
        let filled = filled_cells(self.machine.current_progress(), bar_area.width);
        let bar = Line::from(vec![
            Span::styled(
                "█".repeat(filled as usize),
                Style::default()
                    .fg(bar_fill_color(self.machine.bar_color()))
                    .bg(PAPER),
            ),
            Span::styled(
                " ".repeat(bar_area.width.saturating_sub(filled) as usize),
                Style::default().bg(PAPER),
            ),
        ]);
        Paragraph::new(bar).render(bar_area, buf);

        // editor
        let ink = Style::default()
            .fg(ink_color(self.buffer.intensity()))
            .bg(PAPER);
        let paused = if self.clock.is_paused() { " (paused)" } else { "" };
        let editor = Paragraph::new(editor_lines(
            self.buffer.as_str(),
            self.buffer.cursor(),
            ink,
        ))
        .style(Style::default().bg(PAPER))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray).bg(PAPER))
                .title(format!("inkdash{paused}")),
        )
        .wrap(Wrap { trim: false });
        editor.render(chunks[1], buf);

        // status
        let (label, label_color) = state_label(self.machine.current_state());
        let counts = format!(
            "{}/{} words",
            self.word_count(),
            self.machine.config().goal_words
        );
        let hint = "(esc) quit";
        let gap = chunks[2]
            .width
            .saturating_sub((label.width() + counts.width() + hint.width()) as u16)
            / 2;
        let status = Line::from(vec![
            Span::styled(
                label,
                Style::default()
                    .fg(label_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(gap as usize)),
            Span::raw(counts),
            Span::raw(" ".repeat(gap as usize)),
            Span::styled(
                hint,
                Style::default()
                    .add_modifier(Modifier::DIM)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);
        Paragraph::new(status).render(chunks[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::runtime::AppEvent;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn render(app: &App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_ink_color_tracks_intensity() {
        assert_eq!(ink_color(0), Color::Rgb(0, 0, 0));
        assert_eq!(ink_color(255), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_filled_cells_clamps() {
        assert_eq!(filled_cells(0.0, 40), 0);
        assert_eq!(filled_cells(0.5, 40), 20);
        assert_eq!(filled_cells(3.0, 40), 40);
    }

    #[test]
    fn test_editor_lines_split_on_newline() {
        let lines = editor_lines("ab\ncd", 5, Style::default());
        assert_eq!(lines.len(), 2);
        let last: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(last, "cd ");
    }

    #[test]
    fn test_editor_lines_cursor_mid_text() {
        let lines = editor_lines("abc", 1, Style::default());
        assert_eq!(lines.len(), 1);
        let contents: Vec<&str> = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_editor_lines_tab_under_cursor_keeps_width() {
        let line_text = |cursor| -> String {
            editor_lines("a\tb", cursor, Style::default())[0]
                .spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect()
        };
        assert_eq!(line_text(1), "a    b");
        assert_eq!(line_text(1), line_text(0));

        let lines = editor_lines("a\tb", 1, Style::default());
        assert_eq!(lines[0].spans[1].content.as_ref(), "    ");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_render_shows_text_and_status() {
        let mut app = App::headless(&Config::default()).unwrap();
        for c in "hello".chars() {
            app.handle_event(AppEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
        let buf = render(&app, 60, 10);
        let screen: String = (0..10).map(|y| row_text(&buf, y)).collect();
        assert!(screen.contains("hello"));
        assert!(screen.contains("1/150 words"));
        assert!(screen.contains("keep going"));
    }
}
