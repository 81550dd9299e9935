//! Right-hand pane: the five collapsible claim sections in one scrollable
//! column, with a cursor that walks section headers and page links.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::claim::ClaimRecord;
use crate::panels::{PanelContext, build_section};
use crate::sections::{SectionId, SectionVisibility};
use crate::theme::Base16Palette;

/// Columns panel bodies are indented under their header
const BODY_INDENT: u16 = 2;

/// What activating a focusable does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneAction {
    ToggleSection(SectionId),
    JumpToPage(i64),
}

/// A focusable span of the pane content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusItem {
    /// Section the item belongs to
    pub section: SectionId,
    pub line: usize,
    pub column: u16,
    pub width: u16,
    pub action: PaneAction,
}

#[derive(Debug, Default, Clone)]
pub struct PaneContent {
    pub lines: Vec<Line<'static>>,
    pub focusables: Vec<FocusItem>,
}

/// Lay out all sections for a pane `width` columns wide
pub fn build_content(
    record: &ClaimRecord,
    visibility: &SectionVisibility,
    palette: &Base16Palette,
    width: u16,
    current_page: usize,
) -> PaneContent {
    let mut content = PaneContent::default();
    let body_ctx = PanelContext {
        theme: palette,
        width: width.saturating_sub(BODY_INDENT),
        current_page,
    };
    let header_style = Style::default()
        .fg(palette.primary())
        .add_modifier(Modifier::BOLD);

    for (idx, section) in SectionId::all().iter().copied().enumerate() {
        if idx > 0 {
            content.lines.push(Line::default());
        }
        let expanded = visibility.is_expanded(section);
        let header_line = content.lines.len();
        content.lines.push(Line::from(vec![
            Span::styled(if expanded { "▾ " } else { "▸ " }, header_style),
            Span::styled(section.label(), header_style),
            Span::styled(
                format!("  [{}]", idx + 1),
                Style::default().fg(palette.muted()),
            ),
        ]));
        content.focusables.push(FocusItem {
            section,
            line: header_line,
            column: 0,
            width: width.max(1),
            action: PaneAction::ToggleSection(section),
        });

        if !expanded {
            continue;
        }
        let view = build_section(section, record, &body_ctx);
        let base = content.lines.len();
        let indent = " ".repeat(BODY_INDENT as usize);
        for line in view.lines() {
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(Span::raw(indent.clone()));
            spans.extend(line.spans.iter().cloned());
            content.lines.push(Line::from(spans));
        }
        content
            .focusables
            .extend(view.targets().iter().map(|target| FocusItem {
                section,
                line: base + target.line,
                column: target.column.saturating_add(BODY_INDENT),
                width: target.width,
                action: PaneAction::JumpToPage(target.page),
            }));
    }
    content
}

#[derive(Debug, Default)]
pub struct DataPane {
    cursor: usize,
    scroll: usize,
    /// Content area from the last render
    inner: Rect,
    content: PaneContent,
}

impl DataPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner_area(&self) -> Rect {
        self.inner
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn content(&self) -> &PaneContent {
        &self.content
    }

    pub fn focused_item(&self) -> Option<&FocusItem> {
        self.content.focusables.get(self.cursor)
    }

    /// Rebuild content for `area` and draw it
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        record: &ClaimRecord,
        visibility: &SectionVisibility,
        current_page: usize,
        focused: bool,
        palette: &Base16Palette,
    ) {
        let (text_color, border_color, bg) = palette.get_panel_colors(focused);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                " Claim Data ",
                Style::default().fg(text_color).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(bg));
        self.inner = block.inner(area);
        f.render_widget(block, area);

        self.set_content(build_content(
            record,
            visibility,
            palette,
            self.inner.width,
            current_page,
        ));

        let visible: Vec<Line> = self
            .content
            .lines
            .iter()
            .skip(self.scroll)
            .take(self.inner.height as usize)
            .cloned()
            .collect();
        f.render_widget(Paragraph::new(visible), self.inner);

        if let Some(rect) = self.focus_rect() {
            let (selection_bg, selection_fg) = palette.get_selection_colors(focused);
            f.buffer_mut().set_style(
                rect,
                Style::default().bg(selection_bg).fg(selection_fg),
            );
        }
    }

    /// Replace the content. The cursor stays on the item it was on; if that
    /// item is gone (its section collapsed) it moves to the section header.
    pub fn set_content(&mut self, content: PaneContent) {
        let anchor = self.focused_item().copied().map(|item| {
            let nth = self.content.focusables[..self.cursor]
                .iter()
                .filter(|f| f.section == item.section && f.action == item.action)
                .count();
            (item, nth)
        });
        self.content = content;

        let focusables = &self.content.focusables;
        let reanchored = anchor.and_then(|(item, nth)| {
            focusables
                .iter()
                .enumerate()
                .filter(|(_, f)| f.section == item.section && f.action == item.action)
                .nth(nth)
                .or_else(|| {
                    focusables.iter().enumerate().find(|(_, f)| {
                        f.action == PaneAction::ToggleSection(item.section)
                    })
                })
                .map(|(idx, _)| idx)
        });
        self.cursor = reanchored
            .unwrap_or(self.cursor)
            .min(focusables.len().saturating_sub(1));
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.content
            .lines
            .len()
            .saturating_sub(self.inner.height as usize)
    }

    fn focus_rect(&self) -> Option<Rect> {
        let item = self.focused_item()?;
        let row = item.line.checked_sub(self.scroll)?;
        if row >= self.inner.height as usize || item.column >= self.inner.width {
            return None;
        }
        Some(Rect {
            x: self.inner.x + item.column,
            y: self.inner.y + row as u16,
            width: item.width.min(self.inner.width - item.column),
            height: 1,
        })
    }

    /// Move the cursor by `delta` focusables and scroll it into view
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.content.focusables.len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let Some(line) = self.focused_item().map(|item| item.line) else {
            return;
        };
        let height = (self.inner.height as usize).max(1);
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
    }

    /// Put the cursor on a section header
    pub fn focus_section(&mut self, section: SectionId) {
        if let Some(idx) = self
            .content
            .focusables
            .iter()
            .position(|item| item.action == PaneAction::ToggleSection(section))
        {
            self.cursor = idx;
            self.scroll_to_cursor();
        }
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
    }

    pub fn activate(&self) -> Option<PaneAction> {
        self.focused_item().map(|item| item.action)
    }

    /// Action under a screen cell; moves the cursor there
    pub fn click(&mut self, column: u16, row: u16) -> Option<PaneAction> {
        let inner = self.inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        let line = self.scroll + (row - inner.y) as usize;
        let col = column - inner.x;
        let idx = self.content.focusables.iter().position(|item| {
            item.line == line && col >= item.column && col < item.column.saturating_add(item.width)
        })?;
        self.cursor = idx;
        Some(self.content.focusables[idx].action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::current_theme;

    fn record() -> ClaimRecord {
        ClaimRecord::from_json_str(
            r#"{
                "claim_id": "C-9",
                "edited_data": {"nme_analysis": {"bills": [
                    {"bill": {"invoice_number": "INV-1", "page_number": 3}, "items": []}
                ]}},
                "segments": {"aggregated_segments": {
                    "claim_forms": {"page_ranges": [{"start": 1, "end": 1}, {"start": 5, "end": 8}]}
                }}
            }"#,
        )
        .unwrap()
    }

    fn pane(visibility: &SectionVisibility) -> DataPane {
        let mut pane = DataPane::new();
        pane.inner = Rect::new(10, 1, 60, 200);
        pane.set_content(build_content(
            &record(),
            visibility,
            current_theme(),
            60,
            1,
        ));
        pane
    }

    #[test]
    fn focus_order_walks_headers_and_links() {
        let pane = pane(&SectionVisibility::new());
        let actions: Vec<_> = pane.content().focusables.iter().map(|f| f.action).collect();
        assert_eq!(
            actions,
            [
                PaneAction::ToggleSection(SectionId::Summary),
                PaneAction::ToggleSection(SectionId::Patient),
                PaneAction::ToggleSection(SectionId::Bills),
                PaneAction::JumpToPage(3),
                PaneAction::ToggleSection(SectionId::Audit),
                PaneAction::ToggleSection(SectionId::Segments),
                PaneAction::JumpToPage(1),
                PaneAction::JumpToPage(5),
            ]
        );
    }

    #[test]
    fn collapsed_section_hides_body_and_links() {
        let mut visibility = SectionVisibility::new();
        visibility.toggle(SectionId::Segments);
        let pane = pane(&visibility);
        assert!(!pane
            .content()
            .focusables
            .iter()
            .any(|f| matches!(f.action, PaneAction::JumpToPage(1))));
        let last = pane.content().lines.last().unwrap();
        assert!(last.spans[0].content.starts_with('▸'));
    }

    #[test]
    fn cursor_moves_and_clamps() {
        let mut pane = pane(&SectionVisibility::new());
        pane.move_cursor(-1);
        assert_eq!(pane.activate(), Some(PaneAction::ToggleSection(SectionId::Summary)));
        pane.move_cursor(3);
        assert_eq!(pane.activate(), Some(PaneAction::JumpToPage(3)));
        pane.move_cursor(100);
        assert_eq!(pane.activate(), Some(PaneAction::JumpToPage(5)));
    }

    #[test]
    fn click_maps_cells_to_actions() {
        let mut pane = pane(&SectionVisibility::new());
        let chip = *pane
            .content()
            .focusables
            .iter()
            .find(|f| f.action == PaneAction::JumpToPage(5))
            .unwrap();
        let row = 1 + chip.line as u16;
        let column = 10 + chip.column + 1;
        assert_eq!(pane.click(column, row), Some(PaneAction::JumpToPage(5)));
        assert_eq!(pane.activate(), Some(PaneAction::JumpToPage(5)));

        assert_eq!(
            pane.click(15, 1),
            Some(PaneAction::ToggleSection(SectionId::Summary))
        );
        assert_eq!(pane.click(0, 0), None);
    }

    fn rebuild(pane: &mut DataPane, visibility: &SectionVisibility) {
        pane.set_content(build_content(
            &record(),
            visibility,
            current_theme(),
            60,
            1,
        ));
    }

    #[test]
    fn cursor_follows_its_item_when_sections_above_collapse() {
        let mut visibility = SectionVisibility::new();
        let mut pane = pane(&visibility);
        pane.move_cursor(7);
        let before = *pane.focused_item().unwrap();
        assert_eq!(before.action, PaneAction::JumpToPage(5));

        visibility.toggle(SectionId::Summary);
        visibility.toggle(SectionId::Bills);
        rebuild(&mut pane, &visibility);
        let after = pane.focused_item().unwrap();
        assert_eq!(after.action, PaneAction::JumpToPage(5));
        assert_eq!(after.section, SectionId::Segments);
        assert!(after.line < before.line);

        visibility.toggle(SectionId::Bills);
        rebuild(&mut pane, &visibility);
        assert_eq!(pane.activate(), Some(PaneAction::JumpToPage(5)));
    }

    #[test]
    fn collapsing_the_focused_section_lands_on_its_header() {
        let mut visibility = SectionVisibility::new();
        let mut pane = pane(&visibility);
        pane.move_cursor(3);
        assert_eq!(pane.activate(), Some(PaneAction::JumpToPage(3)));

        visibility.toggle(SectionId::Bills);
        rebuild(&mut pane, &visibility);
        assert_eq!(
            pane.activate(),
            Some(PaneAction::ToggleSection(SectionId::Bills))
        );
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let mut pane = pane(&SectionVisibility::new());
        pane.inner.height = 5;
        pane.move_cursor(7);
        let line = pane.focused_item().unwrap().line;
        assert!(line >= pane.scroll() && line < pane.scroll() + 5);
    }
}
