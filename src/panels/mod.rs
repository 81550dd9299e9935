//! Data panels: plain mappings from slices of the claim record to styled
//! lines. Panels that can move the document carry [`JumpTarget`]s that say
//! which cells of which line request which page.

pub mod audit;
pub mod bills;
pub mod patient;
pub mod segments;
pub mod summary;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::claim::ClaimRecord;
use crate::sections::SectionId;
use crate::theme::Base16Palette;

/// Everything a panel needs besides its slice of the record
#[derive(Clone, Copy)]
pub struct PanelContext<'a> {
    pub theme: &'a Base16Palette,
    /// Columns available for text
    pub width: u16,
    /// Page shown in the document view, 0 when none is
    pub current_page: usize,
}

/// A clickable span inside a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTarget {
    /// Line index within the panel
    pub line: usize,
    /// First column of the span
    pub column: u16,
    pub width: u16,
    /// Requested page, unclamped
    pub page: i64,
}

/// One piece of a line that may carry a jump
pub enum Part {
    Text(Span<'static>),
    Link { span: Span<'static>, page: i64 },
}

impl Part {
    pub fn text(content: impl Into<String>, style: Style) -> Self {
        Part::Text(Span::styled(content.into(), style))
    }

    pub fn link(content: impl Into<String>, style: Style, page: i64) -> Self {
        Part::Link {
            span: Span::styled(content.into(), style),
            page,
        }
    }

    fn span(&self) -> &Span<'static> {
        match self {
            Part::Text(span) | Part::Link { span, .. } => span,
        }
    }

    fn width(&self) -> usize {
        self.span().content.width()
    }

    fn is_blank(&self) -> bool {
        matches!(self, Part::Text(span) if span.content.trim().is_empty())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PanelView {
    lines: Vec<Line<'static>>,
    targets: Vec<JumpTarget>,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn targets(&self) -> &[JumpTarget] {
        &self.targets
    }

    pub fn push(&mut self, line: impl Into<Line<'static>>) {
        self.lines.push(line.into());
    }

    pub fn push_blank(&mut self) {
        self.lines.push(Line::default());
    }

    /// Word-wrapped text, each line indented by `indent` columns
    pub fn push_wrapped(&mut self, text: &str, style: Style, indent: usize, width: u16) {
        if text.trim().is_empty() {
            return;
        }
        let available = (width as usize).saturating_sub(indent).max(8);
        let pad = " ".repeat(indent);
        for wrapped in textwrap::wrap(text, available) {
            self.lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(wrapped.into_owned(), style),
            ]));
        }
    }

    /// A single line made of parts; links become jump targets
    pub fn push_parts(&mut self, parts: Vec<Part>) {
        let line = self.lines.len();
        let mut column = 0usize;
        let mut spans = Vec::with_capacity(parts.len());
        for part in parts {
            let width = part.width();
            match part {
                Part::Text(span) => spans.push(span),
                Part::Link { span, page } => {
                    self.targets.push(JumpTarget {
                        line,
                        column: clamp_u16(column),
                        width: clamp_u16(width),
                        page,
                    });
                    spans.push(span);
                }
            }
            column += width;
        }
        self.lines.push(Line::from(spans));
    }

    /// Like [`push_parts`](Self::push_parts), continuing on new lines
    /// (indented by `indent`) when the parts exceed `width`. A blank part
    /// that does not fit ends the line and is dropped.
    pub fn push_parts_wrapped(&mut self, parts: Vec<Part>, width: u16, indent: usize) {
        let width = width as usize;
        let mut row: Vec<Part> = Vec::new();
        let mut row_width = 0;
        for part in parts {
            let part_width = part.width();
            if !row.is_empty() && row_width + part_width > width && row_width > indent {
                self.push_parts(std::mem::take(&mut row));
                row.push(Part::text(" ".repeat(indent), Style::default()));
                row_width = indent;
                if part.is_blank() {
                    continue;
                }
            }
            row_width += part_width;
            row.push(part);
        }
        if !row.is_empty() {
            self.push_parts(row);
        }
    }
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// `text` cut or padded to exactly `width` columns
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if text.width() <= width {
        out.push_str(text);
        used = text.width();
    } else if width > 0 {
        for c in text.chars() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// `text` right-aligned in `width` columns
pub fn fit_right(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        text.to_string()
    } else {
        format!("{}{text}", " ".repeat(width - w))
    }
}

/// Build the body of one section
pub fn build_section(section: SectionId, record: &ClaimRecord, ctx: &PanelContext) -> PanelView {
    match section {
        SectionId::Summary => summary::build(record, ctx),
        SectionId::Patient => patient::build(record, ctx),
        SectionId::Bills => bills::build(record.bills(), ctx),
        SectionId::Audit => audit::build(&record.audit_analysis, ctx),
        SectionId::Segments => segments::build(record.segments(), ctx),
    }
}
