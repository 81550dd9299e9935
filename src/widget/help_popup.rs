use crate::inputs::KeySeq;
use crate::theme::current_theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const HELP_TEXT: &str = include_str!("../help.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpPopupAction {
    Close,
}

pub struct HelpPopup {
    scroll_offset: usize,
    last_popup_area: Option<Rect>,
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpPopup {
    pub fn new() -> Self {
        HelpPopup {
            scroll_offset: 0,
            last_popup_area: None,
        }
    }

    fn line_count() -> usize {
        HELP_TEXT.lines().count()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let palette = current_theme();
        let max_content_width = HELP_TEXT
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(80);

        // 2 columns of margin on each side plus borders
        let desired_width = (max_content_width + 6).min(area.width as usize);

        let popup_area = content_sized_rect(desired_width as u16, 90, area);
        self.last_popup_area = Some(popup_area);

        f.render_widget(Clear, popup_area);

        let lines: Vec<Line> = HELP_TEXT
            .lines()
            .skip(self.scroll_offset)
            .map(|line| {
                Line::from(Span::styled(
                    format!("  {line}"),
                    Style::default().fg(palette.base_05),
                ))
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" Help - Press ? or ESC to close ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_0c))
                .style(Style::default().bg(palette.base_00)),
        );

        f.render_widget(paragraph, popup_area);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset < Self::line_count().saturating_sub(1) {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn half_page(&self) -> usize {
        self.last_popup_area
            .map(|area| (area.height as usize / 2).max(1))
            .unwrap_or(10)
    }

    pub fn handle_key(&mut self, key: KeyEvent, key_seq: &mut KeySeq) -> Option<HelpPopupAction> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('g') => {
                key_seq.push(key);
                if key_seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]) {
                    self.scroll_offset = 0;
                    key_seq.clear();
                }
            }
            KeyCode::Char('G') => {
                self.scroll_offset = Self::line_count().saturating_sub(1);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset =
                    (self.scroll_offset + self.half_page()).min(Self::line_count().saturating_sub(1));
            }
            KeyCode::PageDown => {
                self.scroll_offset =
                    (self.scroll_offset + self.half_page()).min(Self::line_count().saturating_sub(1));
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.half_page());
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.half_page());
            }
            KeyCode::Esc | KeyCode::Char('?') => return Some(HelpPopupAction::Close),
            _ => {}
        }
        None
    }
}

fn content_sized_rect(width: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    let available_width = r.width;
    let width = width.min(available_width);
    let margin = (available_width.saturating_sub(width)) / 2;

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(width),
            Constraint::Length(margin),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(popup: &mut HelpPopup, seq: &mut KeySeq, c: char) -> Option<HelpPopupAction> {
        popup.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), seq)
    }

    #[test]
    fn scrolls_within_bounds() {
        let mut popup = HelpPopup::new();
        let mut seq = KeySeq::new();
        press(&mut popup, &mut seq, 'k');
        assert_eq!(popup.scroll_offset(), 0);
        press(&mut popup, &mut seq, 'j');
        press(&mut popup, &mut seq, 'j');
        assert_eq!(popup.scroll_offset(), 2);
        press(&mut popup, &mut seq, 'G');
        assert_eq!(popup.scroll_offset(), HelpPopup::line_count() - 1);
        press(&mut popup, &mut seq, 'g');
        press(&mut popup, &mut seq, 'g');
        assert_eq!(popup.scroll_offset(), 0);
    }

    #[test]
    fn closes_on_question_mark() {
        let mut popup = HelpPopup::new();
        let mut seq = KeySeq::new();
        assert!(matches!(
            press(&mut popup, &mut seq, '?'),
            Some(HelpPopupAction::Close)
        ));
    }

    #[test]
    fn help_mentions_every_screen() {
        assert!(HELP_TEXT.contains("UPLOAD SCREEN"));
        assert!(HELP_TEXT.contains("DOCUMENT PANE"));
        assert!(HELP_TEXT.contains("DATA PANE"));
    }
}
