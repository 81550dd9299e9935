//! Upload screen: path entry, file status rows and the start button

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::ingest::Ingestion;
use crate::theme::Base16Palette;

const REMOVE_MARK: &str = " ✕ ";

/// Single-line text entry for file paths
#[derive(Debug, Default, Clone)]
pub struct PathInput {
    buffer: String,
    /// Cursor position in chars
    cursor: usize,
}

impl PathInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    /// Take the text out, leaving the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }
}

/// Clickable regions of the upload screen from the last render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadLayout {
    pub start_button: Rect,
    pub remove_document: Option<Rect>,
    pub remove_record: Option<Rect>,
}

pub fn render(
    f: &mut Frame,
    area: Rect,
    ingestion: &Ingestion,
    input: &PathInput,
    palette: &Base16Palette,
) -> UploadLayout {
    let width = area.width.clamp(20, 72);
    let column = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        width: width.min(area.width),
        ..area
    };
    let [_, title, drop, error, document_row, record_row, start, _, hints] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(column);

    let muted = Style::default().fg(palette.muted());
    let primary = Style::default().fg(palette.primary());

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Claims Review",
                primary.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Upload a claim PDF and its extracted JSON data to begin review.",
                muted,
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        title,
    );

    let drop_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(primary);
    let drop_inner = drop_block.inner(drop);
    f.render_widget(drop_block, drop);
    let prompt = Line::from(vec![
        Span::styled("> ", primary.add_modifier(Modifier::BOLD)),
        Span::styled(input.as_str().to_string(), Style::default().fg(palette.text())),
    ]);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Drop files here or type a path and press Enter",
                Style::default().fg(palette.text()),
            )),
            Line::from(Span::styled("Accepts PDF and JSON files", muted)),
            prompt,
        ]),
        drop_inner,
    );
    if drop_inner.height >= 3 {
        let before: String = input.as_str().chars().take(input.cursor()).collect();
        let x = drop_inner.x + 2 + before.width() as u16;
        if x < drop_inner.x + drop_inner.width {
            f.set_cursor_position((x, drop_inner.y + 2));
        }
    }

    if let Some(err) = ingestion.error() {
        f.render_widget(
            Paragraph::new(Span::styled(
                err.to_string(),
                Style::default().fg(palette.destructive()),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            error,
        );
    }

    let remove_document = file_row(
        f,
        document_row,
        "PDF Document",
        ingestion.document().map(|d| d.name()),
        None,
        palette,
    );
    let remove_record = file_row(
        f,
        record_row,
        "JSON Data",
        ingestion.record().map(|r| r.name.as_str()),
        ingestion.reading_record(),
        palette,
    );

    let ready = ingestion.can_proceed();
    let button_style = if ready {
        Style::default()
            .fg(palette.base_00)
            .bg(palette.primary())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted()).bg(palette.base_01)
    };
    let button = Rect {
        y: start.y + start.height.saturating_sub(1) / 2,
        height: start.height.min(1),
        ..start
    };
    f.render_widget(
        Paragraph::new(Span::styled("Start Review", button_style))
            .alignment(Alignment::Center)
            .style(button_style),
        button,
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter: start  Ctrl+D: remove PDF  Ctrl+R: remove JSON  ?: help  Esc: quit",
            muted,
        ))
        .alignment(Alignment::Center),
        hints,
    );

    UploadLayout {
        start_button: button,
        remove_document,
        remove_record,
    }
}

/// One status row. Returns the remove button area when a file is present.
fn file_row(
    f: &mut Frame,
    area: Rect,
    label: &str,
    file: Option<&str>,
    reading: Option<&str>,
    palette: &Base16Palette,
) -> Option<Rect> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.base_02));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }

    let muted = Style::default().fg(palette.muted());
    let (icon_style, detail) = match (file, reading) {
        (Some(name), _) => (Style::default().fg(palette.primary()), name.to_string()),
        (None, _) => (muted, "Not uploaded".to_string()),
    };
    let status: Vec<Span> = match (file, reading) {
        (_, Some(name)) => vec![Span::styled(format!("Reading {name}…"), muted)],
        (Some(_), None) => vec![
            Span::styled("✓", Style::default().fg(palette.success())),
            Span::styled(REMOVE_MARK, muted),
        ],
        (None, None) => vec![Span::styled("Waiting…", muted)],
    };
    let status_width: usize = status.iter().map(|s| s.content.width()).sum();

    let left = Line::from(vec![
        Span::styled("■ ", icon_style),
        Span::styled(
            label.to_string(),
            Style::default().fg(palette.text()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {detail}"), muted),
    ]);
    f.render_widget(Paragraph::new(left), inner);

    let status_area = Rect {
        x: inner.x + inner.width.saturating_sub(status_width as u16),
        width: (status_width as u16).min(inner.width),
        ..inner
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);

    (file.is_some() && reading.is_none()).then(|| {
        let width = REMOVE_MARK.width() as u16;
        Rect {
            x: inner.x + inner.width.saturating_sub(width),
            width: width.min(inner.width),
            height: 1,
            ..inner
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = PathInput::new();
        input.insert_str("/tmp/clam.pdf");
        for _ in 0..6 {
            input.left();
        }
        input.insert('i');
        assert_eq!(input.as_str(), "/tmp/claim.pdf");
        input.end();
        input.backspace();
        assert_eq!(input.as_str(), "/tmp/claim.pd");
        input.home();
        input.delete();
        assert_eq!(input.as_str(), "tmp/claim.pd");
        assert_eq!(input.take(), "tmp/claim.pd");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn handles_multibyte_text() {
        let mut input = PathInput::new();
        input.insert_str("résumé\n.json");
        assert_eq!(input.as_str(), "résumé.json");
        input.home();
        input.right();
        input.right();
        input.backspace();
        assert_eq!(input.as_str(), "rsumé.json");
    }
}
